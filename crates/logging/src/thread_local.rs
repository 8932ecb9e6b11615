//! crates/logging/src/thread_local.rs
//! Thread-local storage for verbosity configuration and event collection.

use super::config::{FlagError, VerbosityConfig};
use super::levels::DebugFlag;
use std::cell::RefCell;

thread_local! {
    static VERBOSITY: RefCell<VerbosityConfig> = RefCell::new(VerbosityConfig::default());
    #[allow(clippy::missing_const_for_thread_local)]
    static EVENTS: RefCell<Vec<DiagnosticEvent>> = RefCell::new(Vec::new());
}

/// Diagnostic event collected during execution.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DiagnosticEvent {
    /// The debug flag category.
    pub flag: DebugFlag,
    /// The verbosity level the event was emitted at.
    pub level: u8,
    /// The diagnostic message.
    pub message: String,
}

/// Initialize verbosity configuration for the current thread.
pub fn init(config: VerbosityConfig) {
    VERBOSITY.with(|v| {
        *v.borrow_mut() = config;
    });
}

/// Check if the debug flag is at or above the specified level.
pub fn debug_gte(flag: DebugFlag, level: u8) -> bool {
    VERBOSITY.with(|v| v.borrow().debug.get(flag) >= level)
}

/// Emit a debug diagnostic event.
pub fn emit_debug(flag: DebugFlag, level: u8, message: String) {
    EVENTS.with(|e| {
        e.borrow_mut().push(DiagnosticEvent {
            flag,
            level,
            message,
        });
    });
}

/// Drain all collected events, clearing the internal buffer.
pub fn drain_events() -> Vec<DiagnosticEvent> {
    EVENTS.with(|e| e.borrow_mut().drain(..).collect())
}

/// Apply a debug flag token to the current configuration.
pub fn apply_debug_flag(token: &str) -> Result<(), FlagError> {
    VERBOSITY.with(|v| v.borrow_mut().apply_debug_flag(token))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn init_and_check() {
        let mut config = VerbosityConfig::default();
        config.debug.ssl = 3;
        init(config);

        assert!(debug_gte(DebugFlag::Ssl, 1));
        assert!(debug_gte(DebugFlag::Ssl, 3));
        assert!(!debug_gte(DebugFlag::Ssl, 4));
        assert!(!debug_gte(DebugFlag::Rdp, 1));
        assert!(debug_gte(DebugFlag::Rdp, 0));
    }

    #[test]
    fn emit_and_drain_preserve_order() {
        init(VerbosityConfig::default());
        drain_events();

        emit_debug(DebugFlag::Edit, 2, "first".to_owned());
        emit_debug(DebugFlag::Pool, 3, "second".to_owned());

        let events = drain_events();
        assert_eq!(
            events,
            vec![
                DiagnosticEvent {
                    flag: DebugFlag::Edit,
                    level: 2,
                    message: "first".to_owned(),
                },
                DiagnosticEvent {
                    flag: DebugFlag::Pool,
                    level: 3,
                    message: "second".to_owned(),
                },
            ]
        );
        assert!(drain_events().is_empty());
    }

    #[test]
    fn apply_debug_flag_updates_thread_config() {
        init(VerbosityConfig::default());
        apply_debug_flag("payload2").unwrap();
        assert!(debug_gte(DebugFlag::Payload, 2));
        assert!(apply_debug_flag("not_a_flag").is_err());
    }

    #[test]
    fn reinit_overwrites_config() {
        init(VerbosityConfig::from_verbose_level(4));
        assert!(debug_gte(DebugFlag::Buffer, 3));
        init(VerbosityConfig::default());
        assert!(!debug_gte(DebugFlag::Buffer, 1));
    }

    #[test]
    fn configuration_is_per_thread() {
        init(VerbosityConfig::from_verbose_level(4));
        let other = std::thread::spawn(|| debug_gte(DebugFlag::Edit, 1))
            .join()
            .unwrap();
        assert!(!other);
        assert!(debug_gte(DebugFlag::Edit, 1));
    }
}
