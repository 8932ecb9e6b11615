//! RDP connection request cookie extraction.
//!
//! A Remote Desktop client may place a routing cookie right after the fixed
//! TPKT and X.224 headers of its connection request:
//!
//! ```text
//! [11 header bytes] Cookie: mstshash=<value>\r\n
//! ```
//!
//! Only that line is looked at. The rest of the RDP negotiation is opaque.

use crate::outcome::Sniff;
use crate::probe::Probe;
use crate::slice::PayloadSlice;
use crate::view::{InputView, need, run};

/// TPKT header plus the fixed part of the X.224 connection request.
const PREFIX_LEN: usize = 11;
const COOKIE_TOKEN: &[u8] = b"Cookie:";

/// Extracts the value of the RDP routing cookie from the request.
///
/// With `name`, the cookie must carry that name (compared ignoring ASCII
/// case); without one, whatever name comes before the first `=` is accepted,
/// provided no line break precedes it. An empty name counts as none. The
/// value ends at the first carriage return, which must be followed by a line
/// feed. The response direction never carries a cookie.
///
/// # Examples
///
/// ```
/// use buffer::RingBuffer;
/// use sniff::{Probe, rdp_cookie};
///
/// let mut buf = RingBuffer::new(64);
/// buf.fill(&[0; 11]);
/// buf.fill(b"Cookie: mstshash=desk42\r\n");
///
/// let value = rdp_cookie(&Probe::request(&buf), Some(&b"MSTSHASH"[..])).matched().unwrap();
/// assert_eq!(value, b"desk42");
/// ```
pub fn rdp_cookie<'a>(probe: &Probe<'a>, name: Option<&[u8]>) -> Sniff<PayloadSlice<'a>> {
    let name = name.filter(|name| !name.is_empty());
    let verdict = if probe.direction().is_request() {
        run(probe, |input| inspect(input, name))
    } else {
        Sniff::NoMatch
    };
    logging::trace_rdp!("rdp cookie on {}: {}", probe.direction(), verdict.kind());
    verdict
}

/// Reports whether the request carries the RDP cookie: `Matched(1)` when it
/// does, `Matched(0)` once it definitively does not.
///
/// While undecided the outcome stays [`Sniff::Incomplete`]; on a closed
/// probe that settles into `Matched(0)`, since absence is then final.
pub fn rdp_cookie_count(probe: &Probe<'_>, name: Option<&[u8]>) -> Sniff<u32> {
    match rdp_cookie(&probe.closed(false), name) {
        Sniff::Matched(_) => Sniff::Matched(1),
        Sniff::NoMatch => Sniff::Matched(0),
        Sniff::Incomplete if probe.is_closed() => Sniff::Matched(0),
        Sniff::Incomplete => Sniff::Incomplete,
    }
}

fn inspect<'a>(input: &InputView<'a>, name: Option<&[u8]>) -> Sniff<PayloadSlice<'a>> {
    if input.len() <= PREFIX_LEN {
        return Sniff::Incomplete;
    }
    if !need!(input.eq_ignore_ascii_case_at(PREFIX_LEN, COOKIE_TOKEN)) {
        return Sniff::NoMatch;
    }

    let mut pos = PREFIX_LEN + COOKIE_TOKEN.len();
    while input.byte(pos) == Some(b' ') {
        pos += 1;
    }

    let value_start = match name {
        Some(name) => {
            if !need!(input.eq_ignore_ascii_case_at(pos, name)) {
                return Sniff::NoMatch;
            }
            if need!(input.byte(pos + name.len())) != b'=' {
                return Sniff::NoMatch;
            }
            pos + name.len() + 1
        }
        None => {
            let separator = need!(input.find3(pos, b'=', b'\r', b'\n'));
            if need!(input.byte(separator)) != b'=' {
                return Sniff::NoMatch;
            }
            separator + 1
        }
    };

    let value_end = need!(input.find(value_start, b'\r'));
    if need!(input.byte(value_end + 1)) != b'\n' {
        return Sniff::NoMatch;
    }

    logging::trace_rdp!(
        "cookie value spans {} bytes at {}",
        value_end - value_start,
        value_start
    );
    input
        .slice(value_start, value_end - value_start)
        .map_or(Sniff::Incomplete, Sniff::Matched)
}
