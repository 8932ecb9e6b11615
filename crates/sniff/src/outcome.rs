use core::fmt;
use core::str::FromStr;

/// Three-way verdict produced by every sniffer.
///
/// [`Sniff::Matched`] is final and carries the extracted value.
/// [`Sniff::Incomplete`] means the bytes seen so far are consistent with the
/// protocol but do not yet decide it; the caller re-invokes the sniffer once
/// more data arrives. [`Sniff::NoMatch`] is final: the data structurally does
/// not satisfy the protocol and will not start to once more bytes arrive.
///
/// # Examples
///
/// ```
/// use sniff::{Sniff, SniffKind};
///
/// let pending: Sniff<u8> = Sniff::Incomplete;
/// assert!(pending.requires_more_data());
/// assert_eq!(pending.settle(true), Sniff::NoMatch);
/// assert_eq!(Sniff::Matched(1u8).map(u32::from).kind(), SniffKind::Matched);
/// ```
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
#[must_use = "a sniffer verdict must be inspected"]
pub enum Sniff<T> {
    /// The protocol was recognised and the value extracted.
    Matched(T),
    /// Not enough bytes are buffered to decide.
    Incomplete,
    /// The buffered bytes do not belong to the protocol.
    NoMatch,
}

impl<T> Sniff<T> {
    /// Returns `true` when a value was extracted.
    #[must_use]
    #[inline]
    pub const fn is_matched(&self) -> bool {
        matches!(self, Self::Matched(_))
    }

    /// Reports whether the sniffer must be re-invoked after more bytes arrive.
    #[must_use = "determine if additional bytes must be read"]
    #[inline]
    pub const fn requires_more_data(&self) -> bool {
        matches!(self, Self::Incomplete)
    }

    /// Returns `true` when the data definitively does not match.
    #[must_use]
    #[inline]
    pub const fn is_no_match(&self) -> bool {
        matches!(self, Self::NoMatch)
    }

    /// Returns `true` for the two final verdicts.
    #[must_use]
    #[inline]
    pub const fn is_decided(&self) -> bool {
        !self.requires_more_data()
    }

    /// Extracts the matched value, discarding the other verdicts.
    #[must_use]
    pub fn matched(self) -> Option<T> {
        match self {
            Self::Matched(value) => Some(value),
            Self::Incomplete | Self::NoMatch => None,
        }
    }

    /// Transforms the matched value, keeping the other verdicts unchanged.
    pub fn map<U, F>(self, f: F) -> Sniff<U>
    where
        F: FnOnce(T) -> U,
    {
        match self {
            Self::Matched(value) => Sniff::Matched(f(value)),
            Self::Incomplete => Sniff::Incomplete,
            Self::NoMatch => Sniff::NoMatch,
        }
    }

    /// Applies the end-of-stream policy: once no more bytes can arrive, an
    /// undecided verdict becomes [`Sniff::NoMatch`].
    pub fn settle(self, closed: bool) -> Self {
        match self {
            Self::Incomplete if closed => Self::NoMatch,
            other => other,
        }
    }

    /// Returns the verdict category without its value.
    #[must_use]
    pub const fn kind(&self) -> SniffKind {
        match self {
            Self::Matched(_) => SniffKind::Matched,
            Self::Incomplete => SniffKind::Incomplete,
            Self::NoMatch => SniffKind::NoMatch,
        }
    }
}

/// Value-less category of a [`Sniff`] verdict, used in diagnostics.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum SniffKind {
    /// See [`Sniff::Matched`].
    Matched,
    /// See [`Sniff::Incomplete`].
    Incomplete,
    /// See [`Sniff::NoMatch`].
    NoMatch,
}

impl SniffKind {
    /// Returns the concise identifier used when logging verdicts.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Matched => "matched",
            Self::Incomplete => "incomplete",
            Self::NoMatch => "no-match",
        }
    }
}

impl fmt::Display for SniffKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing a [`SniffKind`] from text fails.
#[derive(Clone, Copy, Debug, Eq, PartialEq, thiserror::Error)]
#[error("unrecognized sniff verdict (expected matched, incomplete, or no-match)")]
pub struct ParseSniffKindError;

impl FromStr for SniffKind {
    type Err = ParseSniffKindError;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        match input.trim() {
            "matched" => Ok(Self::Matched),
            "incomplete" => Ok(Self::Incomplete),
            "no-match" => Ok(Self::NoMatch),
            _ => Err(ParseSniffKindError),
        }
    }
}
