//! SSL/TLS handshake inspection.
//!
//! Three sniffers share this module: [`hello_type`] classifies the first
//! handshake message, [`version`] extracts the protocol version from either
//! an SSLv3+ record or a legacy SSLv2 hello, and [`sni`] pulls the server
//! name out of a complete ClientHello. All of them read big-endian fields
//! through bounds-checked accessors, so a short buffer is always reported as
//! incomplete and never read past.

mod hello_type;
mod sni;
mod version;

use core::fmt;

pub use hello_type::hello_type;
pub use sni::sni;
pub use version::version;

/// Handshake record content type.
pub const CONTENT_HANDSHAKE: u8 = 0x16;
/// Handshake message type of a ClientHello.
pub const HANDSHAKE_CLIENT_HELLO: u8 = 0x01;
/// SSLv2 message type of a client hello.
pub const SSLV2_CLIENT_HELLO: u8 = 0x01;
/// Extension type carrying the server name list.
pub const EXT_SERVER_NAME: u16 = 0x0000;
/// Server name type of a DNS host name.
pub const NAME_TYPE_HOST_NAME: u8 = 0x00;

/// Size of the SSLv3+ record header (type, version, length).
pub(crate) const RECORD_HEADER_LEN: usize = 5;

/// Returns `true` when `byte` can open an SSLv3+ record: one of the four
/// defined content types (0x14..=0x17) or the 0xFF marker.
#[must_use]
#[inline]
pub const fn is_record_type(byte: u8) -> bool {
    matches!(byte, 0x14..=0x17 | 0xFF)
}

/// Protocol version as carried on the wire.
///
/// Ordering follows the wire value, so `SslVersion::SSL_3_0 < SslVersion::TLS_1_2`.
///
/// # Examples
///
/// ```
/// use sniff::ssl::SslVersion;
///
/// let version = SslVersion::new(3, 3);
/// assert_eq!(version, SslVersion::TLS_1_2);
/// assert_eq!(version.as_u32(), 0x0003_0003);
/// assert_eq!(version.to_string(), "3.3");
/// ```
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct SslVersion {
    /// Major version byte.
    pub major: u8,
    /// Minor version byte.
    pub minor: u8,
}

impl SslVersion {
    /// SSL 2.0.
    pub const SSL_2_0: Self = Self::new(0, 2);
    /// SSL 3.0, the first version using the record header format.
    pub const SSL_3_0: Self = Self::new(3, 0);
    /// TLS 1.0.
    pub const TLS_1_0: Self = Self::new(3, 1);
    /// TLS 1.1.
    pub const TLS_1_1: Self = Self::new(3, 2);
    /// TLS 1.2.
    pub const TLS_1_2: Self = Self::new(3, 3);

    /// Creates a version from its two wire bytes.
    #[must_use]
    pub const fn new(major: u8, minor: u8) -> Self {
        Self { major, minor }
    }

    /// Packs the version as `(major << 16) | minor`, the integer form used in
    /// routing rules.
    #[must_use]
    pub const fn as_u32(self) -> u32 {
        ((self.major as u32) << 16) | self.minor as u32
    }
}

impl fmt::Display for SslVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.major, self.minor)
    }
}

impl From<SslVersion> for u32 {
    fn from(version: SslVersion) -> Self {
        version.as_u32()
    }
}
