//! Thread-safe pool of connection buffers.
//!
//! Buffers are allocated lazily from one [`BufferConfig`] and recycled instead
//! of freed: when a guard drops, its buffer is cleared and pushed back onto an
//! idle stack so the next connection reuses the allocation.
//!
//! # Design
//!
//! The pool uses a stack for idle buffers, which hands the most recently used
//! (and most likely cache-warm) storage to the next caller. An optional limit
//! caps how many buffers may be outstanding at once; acquiring past it fails
//! with [`PoolError::Exhausted`] instead of allocating.
//!
//! # Ownership Model
//!
//! [`PooledBuffer`] holds an [`Arc`] to the pool so it can live inside a
//! connection object. [`BorrowedBuffer`] borrows the pool for callers with a
//! shorter-lived scope.

use std::ops::{Deref, DerefMut};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::config::BufferConfig;
use crate::error::{ConfigError, PoolError};
use crate::ring::RingBuffer;

#[derive(Debug, Default)]
struct PoolState {
    idle: Vec<RingBuffer>,
    outstanding: usize,
}

/// A thread-safe pool of [`RingBuffer`]s sharing one configuration.
#[derive(Debug)]
pub struct BufferPool {
    state: Mutex<PoolState>,
    config: BufferConfig,
    max_idle: usize,
    limit: Option<usize>,
}

impl BufferPool {
    /// Creates a pool that retains at most `max_idle` idle buffers and never
    /// refuses to allocate.
    pub fn new(config: BufferConfig, max_idle: usize) -> Result<Self, ConfigError> {
        Ok(Self {
            state: Mutex::new(PoolState::default()),
            config: config.validate()?,
            max_idle,
            limit: None,
        })
    }

    /// Creates a pool that hands out at most `limit` buffers at a time.
    pub fn with_limit(
        config: BufferConfig,
        max_idle: usize,
        limit: usize,
    ) -> Result<Self, ConfigError> {
        let mut pool = Self::new(config, max_idle.min(limit))?;
        pool.limit = Some(limit);
        Ok(pool)
    }

    /// Acquires a buffer through an owned pool reference.
    ///
    /// Preferred when the guard is stored in a connection object that outlives
    /// the current borrow of the pool.
    pub fn acquire_from(pool: Arc<Self>) -> Result<PooledBuffer, PoolError> {
        let buffer = pool.take()?;
        Ok(PooledBuffer {
            buffer: Some(buffer),
            pool,
        })
    }

    /// Acquires a buffer whose guard borrows the pool.
    pub fn acquire(&self) -> Result<BorrowedBuffer<'_>, PoolError> {
        let buffer = self.take()?;
        Ok(BorrowedBuffer {
            buffer: Some(buffer),
            pool: self,
        })
    }

    /// Number of idle buffers ready for reuse.
    #[must_use]
    pub fn idle(&self) -> usize {
        self.lock().idle.len()
    }

    /// Number of buffers currently handed out.
    #[must_use]
    pub fn outstanding(&self) -> usize {
        self.lock().outstanding
    }

    /// Configuration applied to every buffer of this pool.
    #[must_use]
    pub const fn config(&self) -> BufferConfig {
        self.config
    }

    fn take(&self) -> Result<RingBuffer, PoolError> {
        let mut state = self.lock();
        if let Some(limit) = self.limit {
            if state.outstanding >= limit {
                logging::trace_pool!("pool exhausted at {limit} outstanding buffers");
                return Err(PoolError::Exhausted { limit });
            }
        }
        state.outstanding += 1;
        let reused = state.idle.pop();
        drop(state);

        Ok(reused.unwrap_or_else(|| {
            logging::trace_pool!("allocating {} byte buffer", self.config.size);
            RingBuffer::with_reserve(self.config.size, self.config.reserve)
        }))
    }

    fn release(&self, mut buffer: RingBuffer) {
        buffer.clear();
        let mut state = self.lock();
        state.outstanding = state.outstanding.saturating_sub(1);
        if state.idle.len() < self.max_idle {
            state.idle.push(buffer);
        }
    }

    fn lock(&self) -> MutexGuard<'_, PoolState> {
        // The state stays consistent across a panic: every mutation is a
        // single push, pop or counter update.
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// RAII guard that returns its buffer to the pool on drop (owned version).
#[derive(Debug)]
pub struct PooledBuffer {
    buffer: Option<RingBuffer>,
    pool: Arc<BufferPool>,
}

/// RAII guard that returns its buffer to the pool on drop (borrowed version).
#[derive(Debug)]
pub struct BorrowedBuffer<'a> {
    buffer: Option<RingBuffer>,
    pool: &'a BufferPool,
}

macro_rules! impl_guard {
    ($guard:ty) => {
        impl Deref for $guard {
            type Target = RingBuffer;

            fn deref(&self) -> &RingBuffer {
                self.buffer
                    .as_ref()
                    .unwrap_or_else(|| unreachable!("pooled buffer is present until drop"))
            }
        }

        impl DerefMut for $guard {
            fn deref_mut(&mut self) -> &mut RingBuffer {
                self.buffer
                    .as_mut()
                    .unwrap_or_else(|| unreachable!("pooled buffer is present until drop"))
            }
        }

        impl Drop for $guard {
            fn drop(&mut self) {
                if let Some(buffer) = self.buffer.take() {
                    self.pool.release(buffer);
                }
            }
        }
    };
}

impl_guard!(PooledBuffer);
impl_guard!(BorrowedBuffer<'_>);

#[cfg(test)]
mod tests {
    use super::*;

    fn small() -> BufferConfig {
        BufferConfig::new(64, 8)
    }

    #[test]
    fn acquired_buffer_uses_pool_config() {
        let pool = BufferPool::new(small(), 2).unwrap();
        let buffer = pool.acquire().unwrap();
        assert_eq!(buffer.capacity(), 64);
        assert_eq!(buffer.reserve(), 8);
        assert_eq!(pool.outstanding(), 1);
    }

    #[test]
    fn dropped_buffer_is_cleared_and_reused() {
        let pool = Arc::new(BufferPool::new(small(), 2).unwrap());
        {
            let mut buffer = BufferPool::acquire_from(Arc::clone(&pool)).unwrap();
            buffer.fill(b"request bytes");
            buffer.forward(3);
        }
        assert_eq!(pool.idle(), 1);
        assert_eq!(pool.outstanding(), 0);

        let buffer = BufferPool::acquire_from(Arc::clone(&pool)).unwrap();
        assert!(buffer.is_empty());
        assert_eq!(buffer.read_cursor(), 0);
        assert_eq!(pool.idle(), 0);
    }

    #[test]
    fn idle_stack_is_bounded() {
        let pool = BufferPool::new(small(), 1).unwrap();
        let first = pool.acquire().unwrap();
        let second = pool.acquire().unwrap();
        drop(first);
        drop(second);
        assert_eq!(pool.idle(), 1);
    }

    #[test]
    fn limit_refuses_extra_buffers_until_one_returns() {
        let pool = BufferPool::with_limit(small(), 4, 2).unwrap();
        let first = pool.acquire().unwrap();
        let _second = pool.acquire().unwrap();
        assert_eq!(
            pool.acquire().unwrap_err(),
            PoolError::Exhausted { limit: 2 }
        );
        drop(first);
        assert!(pool.acquire().is_ok());
    }

    #[test]
    fn invalid_config_is_rejected() {
        assert_eq!(
            BufferPool::new(BufferConfig::new(0, 0), 1).unwrap_err(),
            ConfigError::ZeroSize
        );
    }

    #[test]
    fn pool_is_shareable_across_threads() {
        let pool = Arc::new(BufferPool::new(small(), 4).unwrap());
        let handles: Vec<_> = (0..4)
            .map(|_| {
                let pool = Arc::clone(&pool);
                std::thread::spawn(move || {
                    let mut buffer = BufferPool::acquire_from(pool).unwrap();
                    buffer.fill(b"x");
                    buffer.pending_len()
                })
            })
            .collect();
        for handle in handles {
            assert_eq!(handle.join().unwrap(), 1);
        }
        assert_eq!(pool.outstanding(), 0);
    }
}
