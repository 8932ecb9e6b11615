//! Raw payload extraction at fixed or length-prefixed positions.
//!
//! Both extractors address bytes relative to the first pending byte. A window
//! that could never fit in the buffer, whatever arrives later, is a
//! permanent no-match; a window that fits but is not fully buffered yet is
//! incomplete.

use core::fmt;
use core::str::FromStr;

use crate::error::ArgsError;
use crate::outcome::Sniff;
use crate::probe::Probe;
use crate::slice::PayloadSlice;
use crate::view::{InputView, need, run};

/// Widest length field, in bytes.
pub const MAX_LEN_SIZE: usize = 4;

/// Arguments of [`payload`]: a window of `size` bytes at `offset`.
///
/// A `size` of zero selects everything pending from `offset` onward.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
pub struct PayloadArgs {
    /// Offset of the first byte.
    pub offset: usize,
    /// Number of bytes, or zero for the rest of the pending data.
    pub size: usize,
}

impl PayloadArgs {
    /// Creates the arguments.
    #[must_use]
    pub const fn new(offset: usize, size: usize) -> Self {
        Self { offset, size }
    }
}

impl FromStr for PayloadArgs {
    type Err = ArgsError;

    /// Parses `"<offset>,<size>"`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let fields: Vec<&str> = s.split(',').map(str::trim).collect();
        let [offset, size] = fields.as_slice() else {
            return Err(ArgsError::syntax(s, "expected <offset>,<size>"));
        };
        Ok(Self::new(parse_unsigned(s, offset)?, parse_unsigned(s, size)?))
    }
}

impl fmt::Display for PayloadArgs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.offset, self.size)
    }
}

/// Where the value of a length-prefixed payload starts.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
pub enum ValueOffset {
    /// Right after the length field.
    #[default]
    Implicit,
    /// At a fixed offset from the first pending byte.
    Absolute(usize),
    /// At a signed distance from the end of the length field.
    Relative(isize),
}

impl fmt::Display for ValueOffset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Implicit => Ok(()),
            Self::Absolute(offset) => write!(f, "{offset}"),
            Self::Relative(delta) => write!(f, "{delta:+}"),
        }
    }
}

/// Arguments of [`payload_lv`]: a big-endian length field of `len_size`
/// bytes at `len_offset`, followed (or preceded) by the value it measures.
///
/// The text form is `"<len_offset>,<len_size>[,<value_offset>]"`, where a
/// value offset with an explicit sign is relative to the end of the length
/// field and an unsigned one is absolute.
///
/// # Examples
///
/// ```
/// use sniff::{PayloadLvArgs, ValueOffset};
///
/// let args: PayloadLvArgs = "0,2,+3".parse().unwrap();
/// assert_eq!(args.value_offset(), ValueOffset::Relative(3));
/// assert!("4,1,-6".parse::<PayloadLvArgs>().is_err());
/// ```
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct PayloadLvArgs {
    len_offset: usize,
    len_size: usize,
    value_offset: ValueOffset,
}

impl PayloadLvArgs {
    /// Validates and creates the arguments.
    ///
    /// Only the shape is checked: a non-zero length width of at most
    /// [`MAX_LEN_SIZE`] bytes, a length field that ends within the offset
    /// range, and a relative offset that does not point before the first
    /// pending byte. Fit against a particular buffer is
    /// decided when sniffing.
    pub fn new(
        len_offset: usize,
        len_size: usize,
        value_offset: ValueOffset,
    ) -> Result<Self, ArgsError> {
        if len_size == 0 {
            return Err(ArgsError::ZeroSize);
        }
        if len_size > MAX_LEN_SIZE {
            return Err(ArgsError::LengthTooWide { width: len_size });
        }
        let Some(len_end) = len_offset.checked_add(len_size) else {
            return Err(ArgsError::OffsetOverflow {
                len_offset,
                len_size,
            });
        };
        if let ValueOffset::Relative(delta) = value_offset
            && len_end.checked_add_signed(delta).is_none()
        {
            if delta > 0 {
                return Err(ArgsError::OffsetOverflow {
                    len_offset,
                    len_size,
                });
            }
            return Err(ArgsError::OffsetTooNegative {
                len_offset,
                len_size,
                delta,
            });
        }
        Ok(Self {
            len_offset,
            len_size,
            value_offset,
        })
    }

    /// Offset of the length field.
    #[must_use]
    pub const fn len_offset(&self) -> usize {
        self.len_offset
    }

    /// Width of the length field in bytes.
    #[must_use]
    pub const fn len_size(&self) -> usize {
        self.len_size
    }

    /// Where the value starts.
    #[must_use]
    pub const fn value_offset(&self) -> ValueOffset {
        self.value_offset
    }

    fn len_end(&self) -> Option<usize> {
        self.len_offset.checked_add(self.len_size)
    }

    fn value_start(&self) -> Option<usize> {
        match self.value_offset {
            ValueOffset::Implicit => self.len_end(),
            ValueOffset::Absolute(offset) => Some(offset),
            ValueOffset::Relative(delta) => self.len_end()?.checked_add_signed(delta),
        }
    }
}

impl FromStr for PayloadLvArgs {
    type Err = ArgsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let fields: Vec<&str> = s.split(',').map(str::trim).collect();
        let (len_offset, len_size, value_offset) = match fields.as_slice() {
            [len_offset, len_size] => (len_offset, len_size, ValueOffset::Implicit),
            [len_offset, len_size, value] => {
                let value_offset = if value.starts_with(['+', '-']) {
                    ValueOffset::Relative(
                        value
                            .parse()
                            .map_err(|_| ArgsError::syntax(s, "invalid relative offset"))?,
                    )
                } else {
                    ValueOffset::Absolute(parse_unsigned(s, value)?)
                };
                (len_offset, len_size, value_offset)
            }
            _ => {
                return Err(ArgsError::syntax(
                    s,
                    "expected <len_offset>,<len_size>[,<value_offset>]",
                ));
            }
        };
        Self::new(
            parse_unsigned(s, len_offset)?,
            parse_unsigned(s, len_size)?,
            value_offset,
        )
    }
}

impl fmt::Display for PayloadLvArgs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.len_offset, self.len_size)?;
        if self.value_offset != ValueOffset::Implicit {
            write!(f, ",{}", self.value_offset)?;
        }
        Ok(())
    }
}

fn parse_unsigned(input: &str, field: &str) -> Result<usize, ArgsError> {
    field
        .parse()
        .map_err(|_| ArgsError::syntax(input, "fields must be unsigned integers"))
}

/// Returns `args.size` bytes at `args.offset` once they are all pending.
///
/// With a size of zero, returns everything pending from the offset onward.
/// That view is flagged [`may_change`](PayloadSlice::may_change) unless the
/// probe is closed or the buffer is full, since more bytes could extend it.
pub fn payload<'a>(probe: &Probe<'a>, args: &PayloadArgs) -> Sniff<PayloadSlice<'a>> {
    let closed = probe.is_closed();
    let verdict = run(probe, |input| fixed(input, args, closed));
    logging::trace_payload!(
        "payload({args}) on {}: {}",
        probe.direction(),
        verdict.kind()
    );
    verdict
}

fn fixed<'a>(input: &InputView<'a>, args: &PayloadArgs, closed: bool) -> Sniff<PayloadSlice<'a>> {
    let buffer = input.buffer();
    let capacity = buffer.capacity();

    if args.size == 0 {
        if args.offset > capacity {
            return Sniff::NoMatch;
        }
        let Some(len) = input.len().checked_sub(args.offset) else {
            return Sniff::Incomplete;
        };
        let rest = need!(input.slice(args.offset, len));
        return Sniff::Matched(rest.with_may_change(!closed && !buffer.is_full()));
    }

    match args.offset.checked_add(args.size) {
        Some(end) if end <= capacity => {}
        _ => return Sniff::NoMatch,
    }
    Sniff::Matched(need!(input.slice(args.offset, args.size)))
}

/// Reads a length field and returns the value it measures once every value
/// byte is pending.
///
/// A length field or value window that reaches past the buffer capacity is
/// a permanent no-match, as is a zero length.
pub fn payload_lv<'a>(probe: &Probe<'a>, args: &PayloadLvArgs) -> Sniff<PayloadSlice<'a>> {
    let verdict = run(probe, |input| length_value(input, args));
    logging::trace_payload!(
        "payload_lv({args}) on {}: {}",
        probe.direction(),
        verdict.kind()
    );
    verdict
}

fn length_value<'a>(input: &InputView<'a>, args: &PayloadLvArgs) -> Sniff<PayloadSlice<'a>> {
    let capacity = input.buffer().capacity();
    match args.len_end() {
        Some(end) if end <= capacity => {}
        _ => return Sniff::NoMatch,
    }

    let value_len = need!(input.be(args.len_offset, args.len_size)) as usize;
    if value_len == 0 {
        return Sniff::NoMatch;
    }
    let Some(start) = args.value_start() else {
        return Sniff::NoMatch;
    };
    match start.checked_add(value_len) {
        Some(end) if end <= capacity => {}
        _ => {
            logging::trace_payload!(
                "value of {} bytes at {} exceeds capacity {}",
                value_len,
                start,
                capacity
            );
            return Sniff::NoMatch;
        }
    }

    Sniff::Matched(need!(input.slice(start, value_len)))
}

#[cfg(test)]
mod tests {
    use buffer::RingBuffer;
    use test_support::{buffer_with, wrapped_buffer};

    use super::*;
    use crate::probe::Stream;

    fn fixed_at(buf: &RingBuffer, offset: usize, size: usize) -> Sniff<Vec<u8>> {
        payload(&Probe::request(buf), &PayloadArgs::new(offset, size)).map(|s| s.to_vec())
    }

    fn lv(buf: &RingBuffer, args: &str) -> Sniff<Vec<u8>> {
        let args: PayloadLvArgs = args.parse().unwrap();
        payload_lv(&Probe::request(buf), &args).map(|s| s.to_vec())
    }

    #[test]
    fn fixed_window() {
        let buf = buffer_with(64, b"\x00\x05hello world");
        assert_eq!(fixed_at(&buf, 2, 5), Sniff::Matched(b"hello".to_vec()));
        assert_eq!(fixed_at(&buf, 2, 20), Sniff::Incomplete);
        assert!(payload(&Probe::request(&buf).closed(true), &PayloadArgs::new(2, 20)).is_no_match());
    }

    #[test]
    fn fixed_window_beyond_capacity_never_matches() {
        let buf = RingBuffer::new(16);
        assert_eq!(fixed_at(&buf, 10, 10), Sniff::NoMatch);
        assert_eq!(fixed_at(&buf, usize::MAX, 2), Sniff::NoMatch);
        assert_eq!(fixed_at(&buf, 10, 6), Sniff::Incomplete);
    }

    #[test]
    fn rest_of_buffer_may_change_until_closed_or_full() {
        let buf = buffer_with(64, b"abcdef");
        let rest = payload(&Probe::request(&buf), &PayloadArgs::new(2, 0))
            .matched()
            .unwrap();
        assert_eq!(rest, b"cdef");
        assert!(rest.may_change());

        let closed = payload(&Probe::request(&buf).closed(true), &PayloadArgs::new(2, 0))
            .matched()
            .unwrap();
        assert!(!closed.may_change());

        let mut full = RingBuffer::with_reserve(16, 4);
        full.fill(b"0123456789ab");
        let rest = payload(&Probe::request(&full), &PayloadArgs::new(0, 0))
            .matched()
            .unwrap();
        assert_eq!(rest.len(), 12);
        assert!(!rest.may_change());
    }

    #[test]
    fn rest_of_buffer_offset_checks() {
        let buf = buffer_with(16, b"abc");
        assert_eq!(fixed_at(&buf, 3, 0), Sniff::Matched(Vec::new()));
        assert_eq!(fixed_at(&buf, 4, 0), Sniff::Incomplete);
        assert_eq!(fixed_at(&buf, 17, 0), Sniff::NoMatch);
    }

    #[test]
    fn reads_the_selected_direction() {
        let request = buffer_with(16, b"req");
        let response = buffer_with(16, b"resp");
        let args = PayloadArgs::new(0, 4);

        let stream = Stream::new(&request).with_response(&response);
        let probe = stream.probe(crate::Direction::Response, false);
        assert_eq!(payload(&probe, &args).matched().unwrap(), b"resp");

        let stream = Stream::new(&request);
        let probe = stream.probe(crate::Direction::Response, false);
        assert!(payload(&probe, &args).is_no_match());
    }

    #[test]
    fn implicit_value_offset() {
        let buf = buffer_with(64, b"\x00\x05hello!");
        assert_eq!(lv(&buf, "0,2"), Sniff::Matched(b"hello".to_vec()));
    }

    #[test]
    fn relative_and_absolute_value_offsets() {
        let buf = buffer_with(64, b"\x00\x03xabc");
        assert_eq!(lv(&buf, "0,2,+1"), Sniff::Matched(b"abc".to_vec()));

        let buf = buffer_with(64, b"abcde\x03f");
        assert_eq!(lv(&buf, "5,1,-2"), Sniff::Matched(b"e\x03f".to_vec()));

        let buf = buffer_with(64, b"\x00\x00\x00\x00\x00\x02....xy");
        assert_eq!(lv(&buf, "4,2,10"), Sniff::Matched(b"xy".to_vec()));
    }

    #[test]
    fn value_arrives_later() {
        let mut buf = buffer_with(64, b"\x00\x00\x00\x04ab");
        assert_eq!(lv(&buf, "0,4"), Sniff::Incomplete);
        buf.fill(b"cd");
        assert_eq!(lv(&buf, "0,4"), Sniff::Matched(b"abcd".to_vec()));
    }

    #[test]
    fn windows_past_capacity_are_permanent_no_match() {
        let empty = RingBuffer::new(16);
        assert_eq!(lv(&empty, "15,2"), Sniff::NoMatch);
        assert_eq!(lv(&empty, "0,1,20"), Sniff::Incomplete);

        let buf = buffer_with(16, &[20]);
        assert_eq!(lv(&buf, "0,1"), Sniff::NoMatch);

        let buf = buffer_with(16, &[15]);
        assert_eq!(lv(&buf, "0,1"), Sniff::Incomplete);
    }

    #[test]
    fn zero_length_is_no_match() {
        let buf = buffer_with(16, b"\x00\x00rest");
        assert_eq!(lv(&buf, "0,2"), Sniff::NoMatch);
    }

    #[test]
    fn length_field_across_storage_end() {
        let buf = wrapped_buffer(16, 14, b"\x00\x03xyz");
        assert!(buf.pending_wraps());
        assert_eq!(lv(&buf, "0,2"), Sniff::Matched(b"xyz".to_vec()));
    }

    #[test]
    fn parses_text_arguments() {
        assert_eq!("0,4".parse::<PayloadArgs>(), Ok(PayloadArgs::new(0, 4)));
        assert_eq!(" 3 , 0 ".parse::<PayloadArgs>(), Ok(PayloadArgs::new(3, 0)));

        let implicit: PayloadLvArgs = "0,2".parse().unwrap();
        assert_eq!(implicit.len_offset(), 0);
        assert_eq!(implicit.len_size(), 2);
        assert_eq!(implicit.value_offset(), ValueOffset::Implicit);
        assert_eq!(
            "5,1,-2".parse::<PayloadLvArgs>().unwrap().value_offset(),
            ValueOffset::Relative(-2)
        );
        assert_eq!(
            "5,1,10".parse::<PayloadLvArgs>().unwrap().value_offset(),
            ValueOffset::Absolute(10)
        );
    }

    #[test]
    fn rejects_malformed_arguments() {
        assert!(matches!("1".parse::<PayloadArgs>(), Err(ArgsError::Syntax { .. })));
        assert!(matches!("a,1".parse::<PayloadArgs>(), Err(ArgsError::Syntax { .. })));
        assert!(matches!("-1,1".parse::<PayloadArgs>(), Err(ArgsError::Syntax { .. })));
        assert!(matches!("1,2,3,4".parse::<PayloadLvArgs>(), Err(ArgsError::Syntax { .. })));
        assert!(matches!("1,2,+x".parse::<PayloadLvArgs>(), Err(ArgsError::Syntax { .. })));
        assert_eq!("0,0".parse::<PayloadLvArgs>(), Err(ArgsError::ZeroSize));
        assert_eq!(
            "0,5".parse::<PayloadLvArgs>(),
            Err(ArgsError::LengthTooWide { width: 5 })
        );
        assert_eq!(
            "1,1,-3".parse::<PayloadLvArgs>(),
            Err(ArgsError::OffsetTooNegative {
                len_offset: 1,
                len_size: 1,
                delta: -3,
            })
        );
        assert!("1,1,-2".parse::<PayloadLvArgs>().is_ok());
        assert_eq!(
            format!("{},1,+0", usize::MAX).parse::<PayloadLvArgs>(),
            Err(ArgsError::OffsetOverflow {
                len_offset: usize::MAX,
                len_size: 1,
            })
        );
        assert!(matches!(
            PayloadLvArgs::new(usize::MAX - 1, 2, ValueOffset::Implicit),
            Err(ArgsError::OffsetOverflow { .. })
        ));
        assert!(matches!(
            PayloadLvArgs::new(usize::MAX - 1, 1, ValueOffset::Relative(1)),
            Err(ArgsError::OffsetOverflow { .. })
        ));
    }

    #[test]
    fn display_round_trips_text_form() {
        for text in ["0,2", "0,2,+3", "5,1,-2", "5,1,10"] {
            assert_eq!(text.parse::<PayloadLvArgs>().unwrap().to_string(), text);
        }
        assert_eq!(PayloadArgs::new(4, 8).to_string(), "4,8");
    }
}
