#![deny(unsafe_code)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(missing_docs)]

//! # Overview
//!
//! `buffer` provides the single channel through which request and response
//! bytes flow in the data plane: a fixed-capacity wrap-around byte store,
//! [`RingBuffer`], with in-place structural edits and two realignment
//! strategies.
//!
//! # Design
//!
//! The buffer tracks a read cursor and two adjacent regions behind it: bytes
//! already sent (kept for bookkeeping) and pending bytes awaiting analysis.
//! Every public position is logical, counted from the start of a region, so
//! callers never reason about wrap-around. Physical offsets are derived with a
//! single modulo helper at the moment storage is touched.
//!
//! Edits ([`RingBuffer::replace`], [`RingBuffer::insert_line`]) validate span
//! and growth before mutating; a refused edit returns [`EditError`] and leaves
//! the buffer untouched. Realignment either rotates storage in place
//! ([`RingBuffer::bounce_realign`]) or copies through a worker-owned
//! [`RealignScratch`] ([`RingBuffer::slow_realign`]).
//!
//! # Invariants
//!
//! - `sent_len() + pending_len() <= capacity()` after every operation.
//! - An empty buffer has its read cursor at offset 0.
//! - The live window wraps past the storage end at most once.
//!
//! # Examples
//!
//! ```
//! use buffer::{RealignScratch, RingBuffer};
//!
//! let mut buf = RingBuffer::new(16);
//! buf.fill(b"0123456789");
//! buf.forward(8);
//! buf.consume(8);
//! buf.fill(b"abcdefghij");
//! assert!(buf.pending_wraps());
//!
//! let mut scratch = RealignScratch::for_buffer(&buf);
//! buf.realign(&mut scratch);
//! assert_eq!(buf.pending_slices().0, b"89abcdefghij");
//! ```

mod config;
mod dump;
mod edit;
mod error;
mod pool;
mod realign;
mod ring;

pub use config::BufferConfig;
pub use dump::Dump;
pub use edit::LINE_TERMINATOR;
pub use error::{ConfigError, EditError, PoolError};
pub use pool::{BorrowedBuffer, BufferPool, PooledBuffer};
pub use realign::RealignScratch;
pub use ring::RingBuffer;
