//! Zero-copy views into a buffer's pending region.

use core::iter::{Chain, Copied};
use core::slice;

use buffer::RingBuffer;

/// Read-only window of pending bytes inside a [`RingBuffer`].
///
/// The window may straddle the storage end, so it is held as up to two
/// segments. The borrow ties it to the buffer: any edit needs `&mut` access,
/// which the compiler refuses while a slice is alive.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct PayloadSlice<'a> {
    head: &'a [u8],
    tail: &'a [u8],
    offset: usize,
    may_change: bool,
}

impl<'a> PayloadSlice<'a> {
    /// Borrows `len` pending bytes starting `offset` bytes into the pending
    /// region, or `None` when they are not all present.
    #[must_use]
    pub fn new(buffer: &'a RingBuffer, offset: usize, len: usize) -> Option<Self> {
        let (head, tail) = buffer.pending_range(offset, len)?;
        Some(Self {
            head,
            tail,
            offset,
            may_change: false,
        })
    }

    /// Marks the view as provisional: more bytes could still extend it.
    #[must_use]
    pub const fn with_may_change(mut self, may_change: bool) -> Self {
        self.may_change = may_change;
        self
    }

    /// Offset of the first byte, relative to the start of the pending region.
    #[must_use]
    pub const fn offset(&self) -> usize {
        self.offset
    }

    /// Number of bytes in the view.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.head.len() + self.tail.len()
    }

    /// Returns `true` for an empty view.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns `true` when the result could still change as more bytes arrive.
    #[must_use]
    pub const fn may_change(&self) -> bool {
        self.may_change
    }

    /// The two storage segments, in order; the second is empty unless the
    /// view wraps.
    #[must_use]
    pub const fn as_slices(&self) -> (&'a [u8], &'a [u8]) {
        (self.head, self.tail)
    }

    /// The bytes as one slice, when they do not wrap.
    #[must_use]
    pub const fn contiguous(&self) -> Option<&'a [u8]> {
        if self.tail.is_empty() {
            Some(self.head)
        } else {
            None
        }
    }

    /// Iterates over the bytes in order.
    pub fn iter(&self) -> Chain<Copied<slice::Iter<'a, u8>>, Copied<slice::Iter<'a, u8>>> {
        self.head.iter().copied().chain(self.tail.iter().copied())
    }

    /// Copies the bytes into an owned vector.
    #[must_use]
    pub fn to_vec(&self) -> Vec<u8> {
        [self.head, self.tail].concat()
    }

    /// Returns `true` when the view begins with `prefix`.
    #[must_use]
    pub fn starts_with(&self, prefix: &[u8]) -> bool {
        prefix.len() <= self.len() && self.iter().zip(prefix).all(|(a, &b)| a == b)
    }

    /// Compares against `other`, ignoring ASCII case.
    #[must_use]
    pub fn eq_ignore_ascii_case(&self, other: &[u8]) -> bool {
        other.len() == self.len()
            && self
                .iter()
                .zip(other)
                .all(|(a, b)| a.eq_ignore_ascii_case(b))
    }

    fn eq_bytes(&self, other: &[u8]) -> bool {
        other.len() == self.len() && self.iter().eq(other.iter().copied())
    }
}

impl<'a> IntoIterator for &PayloadSlice<'a> {
    type Item = u8;
    type IntoIter = Chain<Copied<slice::Iter<'a, u8>>, Copied<slice::Iter<'a, u8>>>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl PartialEq<[u8]> for PayloadSlice<'_> {
    fn eq(&self, other: &[u8]) -> bool {
        self.eq_bytes(other)
    }
}

impl PartialEq<&[u8]> for PayloadSlice<'_> {
    fn eq(&self, other: &&[u8]) -> bool {
        self.eq_bytes(other)
    }
}

impl<const N: usize> PartialEq<&[u8; N]> for PayloadSlice<'_> {
    fn eq(&self, other: &&[u8; N]) -> bool {
        self.eq_bytes(other.as_slice())
    }
}
