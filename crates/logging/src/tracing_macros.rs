//! crates/logging/src/tracing_macros.rs
//! Convenience macros for data-path tracing.
//!
//! Each macro pins one `datapath::*` target and a level, so call sites stay
//! short and every event lands on the flag the verbosity layer expects.
//! Callers must depend on `tracing` themselves.

/// Emit a buffer data-flow trace.
///
/// # Example
/// ```ignore
/// trace_buffer!("put_block refused: {} bytes", len);
/// ```
#[macro_export]
macro_rules! trace_buffer {
    ($($arg:tt)*) => {
        ::tracing::trace!(target: "datapath::buffer", $($arg)*)
    };
}

/// Emit a structural edit trace at debug level.
///
/// # Example
/// ```ignore
/// trace_edit!("edit refused: {} bytes requested", growth);
/// ```
#[macro_export]
macro_rules! trace_edit {
    ($($arg:tt)*) => {
        ::tracing::debug!(target: "datapath::edit", $($arg)*)
    };
}

/// Emit a realignment trace.
///
/// # Example
/// ```ignore
/// trace_realign!("realign via bounce rotation");
/// ```
#[macro_export]
macro_rules! trace_realign {
    ($($arg:tt)*) => {
        ::tracing::trace!(target: "datapath::realign", $($arg)*)
    };
}

/// Emit a buffer pool trace.
///
/// # Example
/// ```ignore
/// trace_pool!("allocating {} byte buffer", size);
/// ```
#[macro_export]
macro_rules! trace_pool {
    ($($arg:tt)*) => {
        ::tracing::trace!(target: "datapath::pool", $($arg)*)
    };
}

/// Emit a generic sniffer verdict trace.
///
/// # Example
/// ```ignore
/// trace_sniff!("probe closed with incomplete data");
/// ```
#[macro_export]
macro_rules! trace_sniff {
    ($($arg:tt)*) => {
        ::tracing::trace!(target: "datapath::sniff", $($arg)*)
    };
}

/// Emit an SSL/TLS inspection trace.
///
/// # Example
/// ```ignore
/// trace_ssl!("record version {}.{}", major, minor);
/// ```
#[macro_export]
macro_rules! trace_ssl {
    ($($arg:tt)*) => {
        ::tracing::trace!(target: "datapath::ssl", $($arg)*)
    };
}

/// Emit an RDP cookie trace.
///
/// # Example
/// ```ignore
/// trace_rdp!("cookie value spans {} bytes", len);
/// ```
#[macro_export]
macro_rules! trace_rdp {
    ($($arg:tt)*) => {
        ::tracing::trace!(target: "datapath::rdp", $($arg)*)
    };
}

/// Emit a payload extraction trace.
///
/// # Example
/// ```ignore
/// trace_payload!("length prefix {} at {}", len, offset);
/// ```
#[macro_export]
macro_rules! trace_payload {
    ($($arg:tt)*) => {
        ::tracing::trace!(target: "datapath::payload", $($arg)*)
    };
}

/// Record a debug event straight into the thread-local collector when the
/// flag is enabled at `level`, bypassing any installed subscriber.
///
/// # Example
/// ```ignore
/// debug_log!(Pool, 1, "pool exhausted at {}", limit);
/// ```
#[macro_export]
macro_rules! debug_log {
    ($flag:ident, $level:expr, $($arg:tt)*) => {
        if $crate::debug_gte($crate::DebugFlag::$flag, $level) {
            $crate::emit_debug($crate::DebugFlag::$flag, $level, format!($($arg)*));
        }
    };
}
