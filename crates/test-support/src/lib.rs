#![deny(unsafe_code)]

//! Fixtures shared by the workspace's tests.
//!
//! Builders here produce well-formed wire messages (TLS ClientHello records,
//! legacy SSLv2 hellos, RDP connection requests) that individual tests then
//! truncate or corrupt. The buffer helpers lay those bytes out in a
//! [`RingBuffer`] through its public API only, so a test exercising a
//! wrapped layout reaches it the same way live traffic would.

use buffer::RingBuffer;

/// Returns a buffer of `capacity` bytes holding `data` as pending bytes
/// from storage offset 0.
///
/// # Panics
///
/// Panics when `data` does not fit.
#[must_use]
pub fn buffer_with(capacity: usize, data: &[u8]) -> RingBuffer {
    let mut buf = RingBuffer::new(capacity);
    assert_eq!(buf.fill(data), data.len(), "fixture does not fit the buffer");
    buf
}

/// Returns a buffer of `capacity` bytes whose pending region holds `data`
/// starting at storage offset `cursor`, wrapping past the storage end when
/// `data` is long enough.
///
/// # Panics
///
/// Panics when `cursor` is not below `capacity` or `data` does not fit.
#[must_use]
pub fn wrapped_buffer(capacity: usize, cursor: usize, data: &[u8]) -> RingBuffer {
    assert!(cursor < capacity, "cursor {cursor} outside capacity {capacity}");
    assert!(data.len() <= capacity, "fixture does not fit the buffer");

    let mut buf = RingBuffer::new(capacity);
    let first = data.len().min(capacity - cursor);
    buf.fill(&vec![0; cursor]);
    buf.fill(&data[..first]);
    buf.forward(cursor);
    buf.consume(cursor);
    buf.fill(&data[first..]);
    buf
}

/// Encodes a server_name extension body holding one entry.
#[must_use]
pub fn server_name_list(name_type: u8, name: &[u8]) -> Vec<u8> {
    let entry_len = 3 + name.len();
    let mut list = Vec::with_capacity(2 + entry_len);
    list.extend_from_slice(&u16_be(entry_len));
    list.push(name_type);
    list.extend_from_slice(&u16_be(name.len()));
    list.extend_from_slice(name);
    list
}

fn u16_be(value: usize) -> [u8; 2] {
    u16::try_from(value)
        .expect("length exceeds 16 bits")
        .to_be_bytes()
}

fn u24_be(value: usize) -> [u8; 3] {
    let value = u32::try_from(value).expect("length exceeds 24 bits");
    assert!(value < 1 << 24, "length exceeds 24 bits");
    let [_, a, b, c] = value.to_be_bytes();
    [a, b, c]
}

/// Builder for a TLS ClientHello wrapped in a handshake record.
#[derive(Clone, Debug)]
pub struct ClientHello {
    record_version: (u8, u8),
    client_version: (u8, u8),
    session_id: Vec<u8>,
    cipher_suites: Vec<u8>,
    extensions: Vec<(u16, Vec<u8>)>,
}

impl Default for ClientHello {
    fn default() -> Self {
        Self::new()
    }
}

impl ClientHello {
    /// A TLS 1.0 record carrying a TLS 1.2 hello with two cipher suites, the
    /// null compression method and no extensions.
    #[must_use]
    pub fn new() -> Self {
        Self {
            record_version: (3, 1),
            client_version: (3, 3),
            session_id: Vec::new(),
            cipher_suites: vec![0x13, 0x01, 0xc0, 0x2f],
            extensions: Vec::new(),
        }
    }

    /// Sets the version in the record header.
    #[must_use]
    pub const fn record_version(mut self, major: u8, minor: u8) -> Self {
        self.record_version = (major, minor);
        self
    }

    /// Sets the version inside the hello body.
    #[must_use]
    pub const fn client_version(mut self, major: u8, minor: u8) -> Self {
        self.client_version = (major, minor);
        self
    }

    /// Sets the session id.
    #[must_use]
    pub fn session_id(mut self, id: &[u8]) -> Self {
        self.session_id = id.to_vec();
        self
    }

    /// Appends a raw extension.
    #[must_use]
    pub fn extension(mut self, ext_type: u16, data: &[u8]) -> Self {
        self.extensions.push((ext_type, data.to_vec()));
        self
    }

    /// Appends a server_name extension naming `host`.
    #[must_use]
    pub fn server_name(self, host: &str) -> Self {
        self.extension(0x0000, &server_name_list(0x00, host.as_bytes()))
    }

    /// Encodes the handshake message: type, 24-bit length and hello body.
    #[must_use]
    pub fn handshake(&self) -> Vec<u8> {
        let mut body = Vec::new();
        body.extend_from_slice(&[self.client_version.0, self.client_version.1]);
        body.extend_from_slice(&[0x5a; 32]);
        body.push(u8::try_from(self.session_id.len()).expect("session id too long"));
        body.extend_from_slice(&self.session_id);
        body.extend_from_slice(&u16_be(self.cipher_suites.len()));
        body.extend_from_slice(&self.cipher_suites);
        body.extend_from_slice(&[0x01, 0x00]);

        let mut extensions = Vec::new();
        for (ext_type, data) in &self.extensions {
            extensions.extend_from_slice(&ext_type.to_be_bytes());
            extensions.extend_from_slice(&u16_be(data.len()));
            extensions.extend_from_slice(data);
        }
        body.extend_from_slice(&u16_be(extensions.len()));
        body.extend_from_slice(&extensions);

        let mut message = vec![0x01];
        message.extend_from_slice(&u24_be(body.len()));
        message.extend_from_slice(&body);
        message
    }

    /// Encodes the full record: header followed by the handshake message.
    #[must_use]
    pub fn record(&self) -> Vec<u8> {
        let handshake = self.handshake();
        let mut record = vec![0x16, self.record_version.0, self.record_version.1];
        record.extend_from_slice(&u16_be(handshake.len()));
        record.extend_from_slice(&handshake);
        record
    }
}

/// Builder for a legacy SSLv2 client hello.
///
/// Without padding the two-byte header form is used; with padding the
/// three-byte form carries the padding length.
#[derive(Clone, Debug)]
pub struct SslV2Hello {
    version: (u8, u8),
    padding: u8,
    cipher_specs: Vec<u8>,
    session_id: Vec<u8>,
    challenge: Vec<u8>,
}

impl SslV2Hello {
    /// A hello advertising `major.minor` with three cipher specs, no session
    /// id and a 16-byte challenge.
    #[must_use]
    pub fn new(major: u8, minor: u8) -> Self {
        Self {
            version: (major, minor),
            padding: 0,
            cipher_specs: vec![0x01, 0x00, 0x80, 0x07, 0x00, 0xc0, 0x00, 0x00, 0x2f],
            session_id: Vec::new(),
            challenge: vec![0xc4; 16],
        }
    }

    /// Switches to the three-byte header with `padding` trailing bytes.
    #[must_use]
    pub const fn padding(mut self, padding: u8) -> Self {
        self.padding = padding;
        self
    }

    /// Replaces the cipher spec list.
    #[must_use]
    pub fn cipher_specs(mut self, specs: &[u8]) -> Self {
        self.cipher_specs = specs.to_vec();
        self
    }

    /// Sets the session id.
    #[must_use]
    pub fn session_id(mut self, id: &[u8]) -> Self {
        self.session_id = id.to_vec();
        self
    }

    /// Sets the challenge.
    #[must_use]
    pub fn challenge(mut self, challenge: &[u8]) -> Self {
        self.challenge = challenge.to_vec();
        self
    }

    /// Encodes header, message type, fields, lists and padding.
    #[must_use]
    pub fn bytes(&self) -> Vec<u8> {
        let record_len =
            9 + self.cipher_specs.len() + self.session_id.len() + self.challenge.len();
        let [high, low] = u16_be(record_len);

        let mut out = if self.padding == 0 {
            vec![0x80 | (high & 0x7f), low]
        } else {
            vec![high & 0x3f, low, self.padding]
        };
        out.push(0x01);
        out.extend_from_slice(&[self.version.0, self.version.1]);
        out.extend_from_slice(&u16_be(self.cipher_specs.len()));
        out.extend_from_slice(&u16_be(self.session_id.len()));
        out.extend_from_slice(&u16_be(self.challenge.len()));
        out.extend_from_slice(&self.cipher_specs);
        out.extend_from_slice(&self.session_id);
        out.extend_from_slice(&self.challenge);
        out.extend(std::iter::repeat_n(0u8, usize::from(self.padding)));
        out
    }
}

/// TPKT header and X.224 connection request that precede an RDP cookie.
pub const RDP_PREFIX: [u8; 11] = [
    0x03, 0x00, 0x00, 0x2a, 0x25, 0xe0, 0x00, 0x00, 0x00, 0x00, 0x00,
];

/// Returns an RDP connection request whose payload after the fixed prefix
/// is `tail`.
#[must_use]
pub fn rdp_request(tail: &[u8]) -> Vec<u8> {
    let mut out = RDP_PREFIX.to_vec();
    out.extend_from_slice(tail);
    out
}

/// Returns an RDP connection request carrying `Cookie: <name>=<value>\r\n`.
#[must_use]
pub fn rdp_cookie_request(name: &str, value: &str) -> Vec<u8> {
    rdp_request(format!("Cookie: {name}={value}\r\n").as_bytes())
}
