use crate::outcome::Sniff;
use crate::probe::Probe;
use crate::slice::PayloadSlice;
use crate::ssl::{
    CONTENT_HANDSHAKE, EXT_SERVER_NAME, HANDSHAKE_CLIENT_HELLO, NAME_TYPE_HOST_NAME,
    RECORD_HEADER_LEN, SslVersion,
};
use crate::view::{InputView, need, run};

/// Handshake header: message type and 24-bit length.
const HANDSHAKE_HEADER_LEN: usize = 4;
/// Client version and random.
const VERSION_AND_RANDOM_LEN: usize = 2 + 32;
/// Smallest ClientHello body that can still carry one extension: version,
/// random, empty session id, one cipher suite, one compression method, the
/// extension block length and one empty extension.
const MIN_HELLO_LEN: usize = VERSION_AND_RANDOM_LEN + 1 + 2 + 2 + 1 + 1 + 2 + 4;
/// Smallest record able to hold such a ClientHello.
const MIN_RECORD_LEN: usize = HANDSHAKE_HEADER_LEN + MIN_HELLO_LEN;
/// Longest session id allowed by the protocol.
const MAX_SESSION_ID_LEN: usize = 32;

/// Extracts the host name from the server_name extension of a ClientHello.
///
/// The whole handshake message must be buffered before any inner field is
/// trusted, so truncation at any point reports [`Sniff::Incomplete`]. Once
/// it is, every length is checked against the bytes remaining in its
/// enclosing structure and any inconsistency is a [`Sniff::NoMatch`]. The
/// returned slice borrows the buffer.
///
/// # Examples
///
/// ```
/// use buffer::RingBuffer;
/// use sniff::{Probe, ssl};
///
/// let buf = RingBuffer::new(64);
/// assert!(ssl::sni(&Probe::request(&buf)).requires_more_data());
/// ```
pub fn sni<'a>(probe: &Probe<'a>) -> Sniff<PayloadSlice<'a>> {
    let verdict = run(probe, inspect);
    logging::trace_ssl!("server name on {}: {}", probe.direction(), verdict.kind());
    verdict
}

fn inspect<'a>(input: &InputView<'a>) -> Sniff<PayloadSlice<'a>> {
    if need!(input.byte(0)) != CONTENT_HANDSHAKE {
        return Sniff::NoMatch;
    }
    if need!(input.byte(1)) < SslVersion::SSL_3_0.major {
        return Sniff::NoMatch;
    }
    if need!(input.be16(3)) < MIN_RECORD_LEN {
        return Sniff::NoMatch;
    }

    let handshake = RECORD_HEADER_LEN;
    if need!(input.byte(handshake)) != HANDSHAKE_CLIENT_HELLO {
        return Sniff::NoMatch;
    }
    let hello_len = need!(input.be24(handshake + 1));
    if hello_len < MIN_HELLO_LEN {
        return Sniff::NoMatch;
    }

    let body = handshake + HANDSHAKE_HEADER_LEN;
    if input.len() < body + hello_len {
        return Sniff::Incomplete;
    }

    let client_version = SslVersion::new(need!(input.byte(body)), need!(input.byte(body + 1)));
    if client_version < SslVersion::TLS_1_0 {
        return Sniff::NoMatch;
    }

    let mut pos = body + VERSION_AND_RANDOM_LEN;
    let mut remaining = hello_len - VERSION_AND_RANDOM_LEN;

    let session_id_len = usize::from(need!(input.byte(pos)));
    if session_id_len > MAX_SESSION_ID_LEN || session_id_len + 1 > remaining {
        return Sniff::NoMatch;
    }
    pos += 1 + session_id_len;
    remaining -= 1 + session_id_len;

    if remaining < 4 {
        return Sniff::NoMatch;
    }
    let cipher_len = need!(input.be16(pos));
    if cipher_len < 2 || cipher_len + 2 > remaining {
        return Sniff::NoMatch;
    }
    pos += 2 + cipher_len;
    remaining -= 2 + cipher_len;

    if remaining < 2 {
        return Sniff::NoMatch;
    }
    let compression_len = usize::from(need!(input.byte(pos)));
    if compression_len < 1 || compression_len + 1 > remaining {
        return Sniff::NoMatch;
    }
    pos += 1 + compression_len;
    remaining -= 1 + compression_len;

    if remaining < 2 {
        return Sniff::NoMatch;
    }
    let extensions_len = need!(input.be16(pos));
    if extensions_len > remaining - 2 {
        return Sniff::NoMatch;
    }
    pos += 2;
    remaining = extensions_len;

    while remaining >= 4 {
        let ext_type = need!(input.be16(pos));
        let ext_len = need!(input.be16(pos + 2));
        if ext_len > remaining - 4 {
            return Sniff::NoMatch;
        }

        if ext_type == usize::from(EXT_SERVER_NAME) {
            match server_name(input, pos + 4, ext_len) {
                Sniff::Matched(Some(name)) => return Sniff::Matched(name),
                Sniff::Matched(None) => {}
                Sniff::Incomplete => return Sniff::Incomplete,
                Sniff::NoMatch => return Sniff::NoMatch,
            }
        }

        pos += 4 + ext_len;
        remaining -= 4 + ext_len;
    }

    Sniff::NoMatch
}

/// Reads the first entry of a server name list spanning `len` bytes at `at`.
///
/// A well formed entry that is not a host name matches as `None`, and the
/// caller keeps scanning the remaining extensions.
fn server_name<'a>(
    input: &InputView<'a>,
    at: usize,
    len: usize,
) -> Sniff<Option<PayloadSlice<'a>>> {
    if len < 2 {
        return Sniff::NoMatch;
    }
    let list_len = need!(input.be16(at));
    if list_len < 4 || list_len > len - 2 {
        return Sniff::NoMatch;
    }

    let name_type = need!(input.byte(at + 2));
    let name_len = need!(input.be16(at + 3));
    if name_len + 3 > list_len {
        return Sniff::NoMatch;
    }
    if name_type != NAME_TYPE_HOST_NAME {
        return Sniff::Matched(None);
    }

    let name = need!(input.slice(at + 5, name_len));
    logging::trace_ssl!("server name spans {} bytes at {}", name_len, at + 5);
    Sniff::Matched(Some(name))
}
