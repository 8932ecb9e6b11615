use crate::outcome::Sniff;
use crate::probe::Probe;
use crate::ssl::{RECORD_HEADER_LEN, SSLV2_CLIENT_HELLO, SslVersion, is_record_type};
use crate::view::{InputView, need, run};

/// Largest SSLv3+ record body: 2^14 bytes of plaintext plus 2048 bytes of
/// compression and MAC expansion.
const MAX_RECORD_LEN: usize = (1 << 14) + 2048;

/// Version, cipher list length, session id length and challenge length.
const SSLV2_FIELDS_LEN: usize = 8;

/// Header and body extents of the first message, as declared by its header.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
struct Message {
    version: SslVersion,
    body_start: usize,
    body_len: usize,
}

/// Extracts the protocol version of the first request message.
///
/// Two wire formats are recognised. An SSLv3+ record header supplies the
/// record version directly. A legacy SSLv2 client hello (short two-byte or
/// long three-byte header) supplies the version field inside the hello,
/// after its cipher, session id and challenge lengths have been checked
/// against each other and against the outer record length.
///
/// Either way the verdict waits until the declared message body is buffered,
/// capped at what the buffer could ever hold so an oversized declaration
/// cannot stall forever. Only the request direction carries a client hello;
/// probing the response is a no-match.
pub fn version(probe: &Probe<'_>) -> Sniff<SslVersion> {
    let verdict = if probe.direction().is_request() {
        run(probe, inspect)
    } else {
        Sniff::NoMatch
    };
    logging::trace_ssl!("ssl version on {}: {}", probe.direction(), verdict.kind());
    verdict
}

fn inspect(input: &InputView<'_>) -> Sniff<SslVersion> {
    let first = need!(input.byte(0));
    let parsed = if is_record_type(first) {
        record(input)
    } else {
        sslv2_hello(input)
    };
    let message = match parsed {
        Sniff::Matched(message) => message,
        Sniff::Incomplete => return Sniff::Incomplete,
        Sniff::NoMatch => return Sniff::NoMatch,
    };

    // Never wait for more than the buffer can hold next to its sent bytes.
    let buffer = input.buffer();
    let ceiling = buffer.max_len().saturating_sub(buffer.sent_len());
    let expected = (message.body_start + message.body_len).min(ceiling);
    if input.len() < expected {
        return Sniff::Incomplete;
    }

    logging::trace_ssl!(
        "message version {} with {} body bytes",
        message.version,
        message.body_len
    );
    Sniff::Matched(message.version)
}

fn record(input: &InputView<'_>) -> Sniff<Message> {
    if input.len() < RECORD_HEADER_LEN {
        return Sniff::Incomplete;
    }
    let version = SslVersion::new(need!(input.byte(1)), need!(input.byte(2)));
    let body_len = need!(input.be16(3));

    if version < SslVersion::SSL_3_0 {
        return Sniff::NoMatch;
    }
    if !(1..=MAX_RECORD_LEN).contains(&body_len) {
        return Sniff::NoMatch;
    }
    Sniff::Matched(Message {
        version,
        body_start: RECORD_HEADER_LEN,
        body_len,
    })
}

fn sslv2_hello(input: &InputView<'_>) -> Sniff<Message> {
    let first = need!(input.byte(0));

    // Top bit set: two-byte header with a 15-bit length. Clear: three-byte
    // header with a 14-bit length and a padding length byte.
    let (record_len, padding, header_len) = if first & 0x80 != 0 {
        if input.len() < 3 {
            return Sniff::Incomplete;
        }
        let len = (usize::from(first & 0x7F) << 8) | usize::from(need!(input.byte(1)));
        (len, 0, 2)
    } else {
        if input.len() < 4 {
            return Sniff::Incomplete;
        }
        let len = (usize::from(first & 0x3F) << 8) | usize::from(need!(input.byte(1)));
        (len, usize::from(need!(input.byte(2))), 3)
    };

    if need!(input.byte(header_len)) != SSLV2_CLIENT_HELLO {
        return Sniff::NoMatch;
    }

    let fields = header_len + 1;
    if input.len() < fields + SSLV2_FIELDS_LEN {
        return Sniff::Incomplete;
    }
    let version = SslVersion::new(need!(input.byte(fields)), need!(input.byte(fields + 1)));
    let cipher_len = need!(input.be16(fields + 2));
    let session_id_len = need!(input.be16(fields + 4));
    let challenge_len = need!(input.be16(fields + 6));

    if cipher_len % 3 != 0 {
        return Sniff::NoMatch;
    }
    if session_id_len != 0 && session_id_len != 16 {
        return Sniff::NoMatch;
    }
    if !(16..=32).contains(&challenge_len) {
        return Sniff::NoMatch;
    }
    if record_len != 1 + SSLV2_FIELDS_LEN + cipher_len + session_id_len + challenge_len {
        return Sniff::NoMatch;
    }

    Sniff::Matched(Message {
        version,
        body_start: fields + SSLV2_FIELDS_LEN,
        body_len: cipher_len + session_id_len + challenge_len + padding,
    })
}
