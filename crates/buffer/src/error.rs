use std::io;

use thiserror::Error;

/// Reasons a structural edit was refused.
///
/// A rejected edit never mutates the buffer: the sent and pending regions, the
/// read cursor and every stored byte are exactly as they were before the call.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Error)]
pub enum EditError {
    /// The edit would grow the live window past the storage capacity or into
    /// sent data that wrapped ahead of the pending end.
    #[error("no space left in buffer: edit needs {requested} more bytes, {available} available")]
    NoSpace {
        /// Number of additional bytes the edit required.
        requested: usize,
        /// Number of bytes that could be grown into without violating placement.
        available: usize,
    },
    /// The edited span does not lie inside the pending region.
    #[error("edit span {pos}..{end} lies outside the {pending} pending bytes")]
    OutOfRange {
        /// Start of the span, relative to the first pending byte.
        pos: usize,
        /// End of the span (exclusive), relative to the first pending byte.
        end: usize,
        /// Number of pending bytes at the time of the call.
        pending: usize,
    },
}

impl EditError {
    /// Returns `true` when the edit was refused for lack of space.
    #[must_use]
    pub const fn is_no_space(&self) -> bool {
        matches!(self, Self::NoSpace { .. })
    }
}

impl From<EditError> for io::Error {
    fn from(err: EditError) -> Self {
        let kind = match err {
            EditError::NoSpace { .. } => io::ErrorKind::OutOfMemory,
            EditError::OutOfRange { .. } => io::ErrorKind::InvalidInput,
        };
        io::Error::new(kind, err)
    }
}

/// Failures reported when a [`BufferConfig`](crate::BufferConfig) is rejected.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Error)]
pub enum ConfigError {
    /// The buffer size was zero.
    #[error("buffer size must be greater than zero")]
    ZeroSize,
    /// The rewrite reserve would leave no room for incoming data.
    #[error("buffer reserve {reserve} must be smaller than buffer size {size}")]
    ReserveTooLarge {
        /// Configured buffer size.
        size: usize,
        /// Configured reserve.
        reserve: usize,
    },
}

impl From<ConfigError> for io::Error {
    fn from(err: ConfigError) -> Self {
        io::Error::new(io::ErrorKind::InvalidInput, err)
    }
}

/// Failures reported by [`BufferPool`](crate::BufferPool).
#[derive(Clone, Copy, Debug, Eq, PartialEq, Error)]
pub enum PoolError {
    /// Every buffer the pool may hand out is currently in use.
    #[error("buffer pool exhausted: all {limit} buffers are in use")]
    Exhausted {
        /// Maximum number of outstanding buffers.
        limit: usize,
    },
}

impl From<PoolError> for io::Error {
    fn from(err: PoolError) -> Self {
        io::Error::new(io::ErrorKind::WouldBlock, err)
    }
}
