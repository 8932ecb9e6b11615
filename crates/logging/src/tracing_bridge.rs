//! crates/logging/src/tracing_bridge.rs
//! Bridge between the tracing crate and the data-path verbosity flags.
//!
//! [`DatapathLayer`] is a `tracing-subscriber` layer that maps events with a
//! `datapath::*` target onto a [`DebugFlag`], gates them against the current
//! thread's [`VerbosityConfig`] and collects the survivors as
//! [`DiagnosticEvent`](super::DiagnosticEvent)s.
//!
//! # Usage
//!
//! ```rust,ignore
//! use logging::{VerbosityConfig, init_tracing};
//!
//! init_tracing(VerbosityConfig::from_verbose_level(2));
//! logging::trace_edit!("replaced {} bytes", 12);
//! ```

use super::config::VerbosityConfig;
use super::levels::DebugFlag;
use super::thread_local::{debug_gte, emit_debug};
use tracing::{Level, Subscriber};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::{Context, Layer};
use tracing_subscriber::registry::LookupSpan;

/// Prefix shared by every data-path tracing target.
pub const TARGET_PREFIX: &str = "datapath::";

/// A tracing layer that routes data-path events into the verbosity system.
#[derive(Clone, Debug, Default)]
pub struct DatapathLayer {
    _private: (),
}

impl DatapathLayer {
    /// Create a new layer.
    #[must_use]
    pub const fn new() -> Self {
        Self { _private: () }
    }

    /// Map a tracing target to a debug flag.
    ///
    /// Only exact `datapath::<flag>` targets match, so unrelated crates that
    /// happen to share a module name never leak into the collector.
    #[must_use]
    pub fn target_to_debug_flag(target: &str) -> Option<DebugFlag> {
        target
            .strip_prefix(TARGET_PREFIX)
            .and_then(DebugFlag::from_name)
    }

    /// Map a tracing level to a verbosity level.
    #[must_use]
    pub const fn level_to_verbosity_level(level: &Level) -> u8 {
        match *level {
            Level::ERROR | Level::WARN | Level::INFO => 1,
            Level::DEBUG => 2,
            Level::TRACE => 3,
        }
    }
}

impl<S> Layer<S> for DatapathLayer
where
    S: Subscriber + for<'a> LookupSpan<'a>,
{
    fn on_event(&self, event: &tracing::Event<'_>, _ctx: Context<'_, S>) {
        let metadata = event.metadata();
        let Some(flag) = Self::target_to_debug_flag(metadata.target()) else {
            return;
        };

        let level = Self::level_to_verbosity_level(metadata.level());
        if !debug_gte(flag, level) {
            return;
        }

        let mut visitor = MessageVisitor::default();
        event.record(&mut visitor);
        if let Some(message) = visitor.message {
            emit_debug(flag, level, message);
        }
    }
}

/// Visitor to extract message from tracing event.
#[derive(Default)]
struct MessageVisitor {
    message: Option<String>,
}

impl tracing::field::Visit for MessageVisitor {
    fn record_debug(&mut self, field: &tracing::field::Field, value: &dyn std::fmt::Debug) {
        if field.name() == "message" {
            self.message = Some(format!("{value:?}"));
        }
    }

    fn record_str(&mut self, field: &tracing::field::Field, value: &str) {
        if field.name() == "message" {
            self.message = Some(value.to_owned());
        }
    }
}

/// Initialize tracing with the given verbosity configuration.
///
/// Installs a global subscriber made of a registry and [`DatapathLayer`],
/// and stores `config` as the calling thread's verbosity.
///
/// # Panics
///
/// Panics if a global subscriber has already been installed.
pub fn init_tracing(config: VerbosityConfig) {
    use tracing_subscriber::layer::SubscriberExt;
    use tracing_subscriber::util::SubscriberInitExt;

    super::thread_local::init(config);

    tracing_subscriber::registry()
        .with(DatapathLayer::new())
        .init();
}

/// Initialize tracing with a custom filter in front of the verbosity gate.
///
/// # Panics
///
/// Panics if a global subscriber has already been installed.
pub fn init_tracing_with_filter<F>(config: VerbosityConfig, filter: F)
where
    F: Layer<tracing_subscriber::Registry> + Send + Sync + 'static,
{
    use tracing_subscriber::layer::SubscriberExt;
    use tracing_subscriber::util::SubscriberInitExt;

    super::thread_local::init(config);

    tracing_subscriber::registry()
        .with(filter)
        .with(DatapathLayer::new())
        .init();
}

/// Builds an [`EnvFilter`] from `RUST_LOG`, falling back to `default_directive`
/// when the variable is unset or unparsable.
#[must_use]
pub fn env_filter_or(default_directive: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directive))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::thread_local::{drain_events, init};
    use tracing_subscriber::layer::SubscriberExt;

    #[test]
    fn targets_map_to_flags() {
        assert_eq!(
            DatapathLayer::target_to_debug_flag("datapath::edit"),
            Some(DebugFlag::Edit)
        );
        assert_eq!(
            DatapathLayer::target_to_debug_flag("datapath::ssl"),
            Some(DebugFlag::Ssl)
        );
        assert_eq!(DatapathLayer::target_to_debug_flag("datapath::http"), None);
        assert_eq!(DatapathLayer::target_to_debug_flag("other::edit"), None);
        assert_eq!(DatapathLayer::target_to_debug_flag("edit"), None);
    }

    #[test]
    fn levels_map_to_verbosity() {
        assert_eq!(DatapathLayer::level_to_verbosity_level(&Level::ERROR), 1);
        assert_eq!(DatapathLayer::level_to_verbosity_level(&Level::WARN), 1);
        assert_eq!(DatapathLayer::level_to_verbosity_level(&Level::INFO), 1);
        assert_eq!(DatapathLayer::level_to_verbosity_level(&Level::DEBUG), 2);
        assert_eq!(DatapathLayer::level_to_verbosity_level(&Level::TRACE), 3);
    }

    #[test]
    fn layer_collects_only_enabled_events() {
        let mut config = VerbosityConfig::default();
        config.debug.edit = 2;
        init(config);
        drain_events();

        let subscriber = tracing_subscriber::registry().with(DatapathLayer::new());
        tracing::subscriber::with_default(subscriber, || {
            crate::trace_edit!("edit refused: {} bytes", 4);
            crate::trace_realign!("suppressed: realign flag is off");
            tracing::debug!(target: "unrelated", "ignored");
        });

        let events = drain_events();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].flag, DebugFlag::Edit);
        assert_eq!(events[0].level, 2);
        assert_eq!(events[0].message, "edit refused: 4 bytes");
    }

    #[test]
    fn trace_level_events_need_level_three() {
        let mut config = VerbosityConfig::default();
        config.debug.sniff = 2;
        init(config);
        drain_events();

        let subscriber = tracing_subscriber::registry().with(DatapathLayer::new());
        tracing::subscriber::with_default(subscriber, || {
            crate::trace_sniff!("verdict");
        });
        assert!(drain_events().is_empty());

        crate::apply_debug_flag("sniff3").unwrap();
        let subscriber = tracing_subscriber::registry().with(DatapathLayer::new());
        tracing::subscriber::with_default(subscriber, || {
            crate::trace_sniff!("verdict");
        });
        assert_eq!(drain_events().len(), 1);
    }
}
