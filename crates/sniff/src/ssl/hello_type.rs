use crate::outcome::Sniff;
use crate::probe::Probe;
use crate::ssl::{RECORD_HEADER_LEN, SslVersion, is_record_type};
use crate::view::{InputView, need, run};

/// Record header plus the handshake type and 24-bit handshake length.
const HELLO_HEADER_LEN: usize = RECORD_HEADER_LEN + 4;

/// Returns the handshake message type of the first SSLv3+ record.
///
/// The record must carry a known content type, a version of at least 3.0 and
/// room for a handshake header. The verdict is only [`Sniff::Matched`] once
/// the whole declared handshake message is buffered. Works in either
/// direction.
pub fn hello_type(probe: &Probe<'_>) -> Sniff<u8> {
    let verdict = run(probe, inspect);
    logging::trace_ssl!(
        "hello type on {}: {}",
        probe.direction(),
        verdict.kind()
    );
    verdict
}

fn inspect(input: &InputView<'_>) -> Sniff<u8> {
    let content_type = need!(input.byte(0));
    if !is_record_type(content_type) {
        return Sniff::NoMatch;
    }
    if input.len() < HELLO_HEADER_LEN {
        return Sniff::Incomplete;
    }

    let version = SslVersion::new(need!(input.byte(1)), need!(input.byte(2)));
    if version < SslVersion::SSL_3_0 {
        return Sniff::NoMatch;
    }
    if need!(input.be16(3)) < 4 {
        return Sniff::NoMatch;
    }

    let handshake_type = need!(input.byte(5));
    let handshake_len = need!(input.be24(6));
    if input.len() < handshake_len + HELLO_HEADER_LEN {
        return Sniff::Incomplete;
    }
    Sniff::Matched(handshake_type)
}
