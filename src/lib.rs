#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

//! # Overview
//!
//! `datapath` is the data-plane core of a TCP/HTTP load balancer. It bundles
//! three workspace crates behind one dependency:
//!
//! - [`buffer`]: the wrap-around [`RingBuffer`] every request and response
//!   byte flows through, its in-place edits, realignment and pooling;
//! - [`sniff`]: stateless sniffers that read SSL/TLS, RDP and raw payload
//!   facts out of a buffer's pending bytes without copying them;
//! - [`logging`]: the `datapath::*` tracing targets and the per-flag debug
//!   verbosity model.
//!
//! Connection handling, polling and configuration files belong to the
//! embedding proxy; this crate only sees buffers and the bytes in them.
//!
//! # Examples
//!
//! ```
//! use datapath::{BufferConfig, BufferPool, Probe, Sniff, ssl};
//!
//! let pool = BufferPool::new(BufferConfig::new(1024, 64), 4).unwrap();
//! let mut request = pool.acquire().unwrap();
//! request.fill(&[0x16, 0x03, 0x01, 0x00]);
//!
//! // Not enough bytes yet: inspect again after the next read.
//! assert_eq!(ssl::sni(&Probe::request(&request)), Sniff::Incomplete);
//! ```

pub use buffer;
pub use logging;
pub use sniff;

pub use buffer::{
    BufferConfig, BufferPool, ConfigError, EditError, PoolError, PooledBuffer, RealignScratch,
    RingBuffer,
};
pub use sniff::{
    ArgsError, Direction, PayloadArgs, PayloadLvArgs, PayloadSlice, Probe, Sniff, SniffKind,
    SslVersion, Stream, ValueOffset, payload, payload_lv, rdp_cookie, rdp_cookie_count, ssl,
};
