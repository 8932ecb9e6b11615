use std::io;

/// Error returned when payload extractor arguments are rejected.
///
/// Arguments are checked for shape only. Whether they can ever fit a given
/// buffer is decided at sniff time, where an impossible window is a
/// permanent no-match.
#[derive(Clone, Debug, Eq, PartialEq, thiserror::Error)]
pub enum ArgsError {
    /// A length field width of zero was supplied.
    #[error("payload length must be > 0")]
    ZeroSize,
    /// The length field is wider than the four bytes a length can occupy.
    #[error("length field of {width} bytes exceeds the 4 byte maximum")]
    LengthTooWide {
        /// Requested width in bytes.
        width: usize,
    },
    /// A relative value offset points before the start of the buffer.
    #[error("payload offset too negative: {len_offset} + {len_size} + ({delta}) < 0")]
    OffsetTooNegative {
        /// Offset of the length field.
        len_offset: usize,
        /// Width of the length field.
        len_size: usize,
        /// Relative value offset.
        delta: isize,
    },
    /// The length field ends past the largest addressable offset.
    #[error("length field at {len_offset} of {len_size} bytes overflows the offset range")]
    OffsetOverflow {
        /// Offset of the length field.
        len_offset: usize,
        /// Width of the length field.
        len_size: usize,
    },
    /// The text form has the wrong number of fields or an unparsable number.
    #[error("invalid payload arguments '{input}': {reason}")]
    Syntax {
        /// Text that failed to parse.
        input: String,
        /// What was wrong with it.
        reason: &'static str,
    },
}

impl ArgsError {
    pub(crate) fn syntax(input: &str, reason: &'static str) -> Self {
        Self::Syntax {
            input: input.to_owned(),
            reason,
        }
    }
}

impl From<ArgsError> for io::Error {
    fn from(err: ArgsError) -> Self {
        Self::new(io::ErrorKind::InvalidInput, err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_carry_the_offending_values() {
        assert_eq!(ArgsError::ZeroSize.to_string(), "payload length must be > 0");
        assert_eq!(
            ArgsError::LengthTooWide { width: 5 }.to_string(),
            "length field of 5 bytes exceeds the 4 byte maximum"
        );
        assert_eq!(
            ArgsError::OffsetTooNegative {
                len_offset: 1,
                len_size: 1,
                delta: -3,
            }
            .to_string(),
            "payload offset too negative: 1 + 1 + (-3) < 0"
        );
        assert_eq!(
            ArgsError::OffsetOverflow {
                len_offset: 7,
                len_size: 2,
            }
            .to_string(),
            "length field at 7 of 2 bytes overflows the offset range"
        );
        assert_eq!(
            ArgsError::syntax("1", "expected 2 fields").to_string(),
            "invalid payload arguments '1': expected 2 fields"
        );
    }

    #[test]
    fn converts_to_invalid_input() {
        let err: io::Error = ArgsError::ZeroSize.into();
        assert_eq!(err.kind(), io::ErrorKind::InvalidInput);
    }
}
