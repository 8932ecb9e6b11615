#![deny(unsafe_code)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(missing_docs)]

//! # Overview
//!
//! `sniff` inspects the pending bytes of a [`buffer::RingBuffer`] and
//! extracts the facts a load balancer routes on: SSL/TLS hello type, protocol
//! version and server name, the RDP routing cookie, and raw payload windows.
//!
//! # Design
//!
//! Sniffers are plain functions taking a [`Probe`]: the buffer of one
//! direction plus a flag telling whether more bytes can still arrive. They
//! hold no state between calls and re-parse from the first pending byte every
//! time, so the caller simply invokes them again after each read.
//!
//! Every sniffer answers with a three-way [`Sniff`]:
//!
//! - [`Sniff::Matched`] is final and carries a scalar or a [`PayloadSlice`]
//!   borrowing the buffer;
//! - [`Sniff::Incomplete`] asks to be called again with more data;
//! - [`Sniff::NoMatch`] is final: the bytes are not this protocol.
//!
//! A closed probe turns an incomplete verdict into a no-match before it is
//! returned.
//!
//! Reads go through bounds-checked accessors over the two storage segments,
//! so a wrapped buffer needs no realignment and a short one is never read
//! past.
//!
//! # Examples
//!
//! ```
//! use buffer::RingBuffer;
//! use sniff::{PayloadArgs, Probe, Sniff, payload, ssl};
//!
//! let mut buf = RingBuffer::new(256);
//! buf.fill(b"\x16\x03\x01");
//!
//! let probe = Probe::request(&buf);
//! assert_eq!(ssl::hello_type(&probe), Sniff::Incomplete);
//! assert_eq!(ssl::hello_type(&probe.closed(true)), Sniff::NoMatch);
//!
//! let head = payload(&probe, &PayloadArgs::new(0, 1)).matched().unwrap();
//! assert_eq!(head, b"\x16");
//! ```

mod error;
mod outcome;
mod payload;
mod probe;
mod rdp;
mod slice;
pub mod ssl;
mod view;

pub use error::ArgsError;
pub use outcome::{ParseSniffKindError, Sniff, SniffKind};
pub use payload::{MAX_LEN_SIZE, PayloadArgs, PayloadLvArgs, ValueOffset, payload, payload_lv};
pub use probe::{Direction, Probe, Stream};
pub use rdp::{rdp_cookie, rdp_cookie_count};
pub use slice::PayloadSlice;
pub use ssl::SslVersion;
