#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

//! # Overview
//!
//! `logging` gives the data-path crates one vocabulary for diagnostics: a
//! fixed set of `datapath::*` tracing targets, a macro per target, and a
//! per-flag debug verbosity model that decides which events are kept.
//!
//! # Design
//!
//! Call sites emit plain [`tracing`] events through the macros
//! ([`trace_buffer!`], [`trace_edit!`], [`trace_realign!`], [`trace_pool!`],
//! [`trace_sniff!`], [`trace_ssl!`], [`trace_rdp!`], [`trace_payload!`]).
//! Without a subscriber those compile down to a disabled callsite check.
//! With the `subscriber` feature, `DatapathLayer` maps each target to a
//! [`DebugFlag`], compares the event level against the thread's
//! [`VerbosityConfig`] and stores accepted events as [`DiagnosticEvent`]s,
//! which tests drain with [`drain_events`].
//!
//! # Invariants
//!
//! - Every target carried by the macros maps to exactly one [`DebugFlag`].
//! - Verbosity and collected events are per thread; workers never observe
//!   each other's configuration.
//!
//! # Examples
//!
//! ```
//! use logging::{DebugFlag, VerbosityConfig, debug_log, drain_events, init};
//!
//! let mut config = VerbosityConfig::default();
//! config.apply_debug_flag("pool2").unwrap();
//! init(config);
//!
//! debug_log!(Pool, 2, "pool exhausted at {} buffers", 8);
//! debug_log!(Pool, 3, "suppressed");
//!
//! let events = drain_events();
//! assert_eq!(events.len(), 1);
//! assert_eq!(events[0].flag, DebugFlag::Pool);
//! assert_eq!(events[0].message, "pool exhausted at 8 buffers");
//! ```

mod config;
mod levels;
mod thread_local;
#[cfg(feature = "subscriber")]
mod tracing_bridge;
mod tracing_macros;

pub use config::{FlagError, VerbosityConfig};
pub use levels::{DebugFlag, DebugLevels};
pub use thread_local::{
    DiagnosticEvent, apply_debug_flag, debug_gte, drain_events, emit_debug, init,
};
#[cfg(feature = "subscriber")]
pub use tracing_bridge::{
    DatapathLayer, TARGET_PREFIX, env_filter_or, init_tracing, init_tracing_with_filter,
};
