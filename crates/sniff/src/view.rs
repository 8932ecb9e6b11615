//! Bounds-checked reads over a buffer's pending region.

use buffer::RingBuffer;

use crate::probe::Probe;
use crate::slice::PayloadSlice;

/// Unwraps a bounds-checked read, returning [`Sniff::Incomplete`](crate::Sniff::Incomplete)
/// from the enclosing function when the bytes are not buffered yet.
macro_rules! need {
    ($read:expr) => {
        match $read {
            Some(value) => value,
            None => return $crate::Sniff::Incomplete,
        }
    };
}

pub(crate) use need;

/// Runs `inspect` over the probed buffer and applies the end-of-stream policy.
///
/// A probe without a buffer is a no-match.
pub(crate) fn run<'a, T>(
    probe: &Probe<'a>,
    inspect: impl FnOnce(&InputView<'a>) -> crate::Sniff<T>,
) -> crate::Sniff<T> {
    let Some(buffer) = probe.buffer() else {
        logging::trace_sniff!("no {} buffer to inspect", probe.direction());
        return crate::Sniff::NoMatch;
    };
    let verdict = inspect(&InputView::new(buffer));
    if probe.is_closed() && verdict.requires_more_data() {
        logging::trace_sniff!("{} closed while incomplete", probe.direction());
    }
    verdict.settle(probe.is_closed())
}

/// Pending bytes of one buffer, addressed from the first pending byte.
///
/// Every accessor returns `None` when the requested bytes are not buffered
/// yet, which callers translate into an incomplete verdict.
#[derive(Clone, Copy, Debug)]
pub(crate) struct InputView<'a> {
    buffer: &'a RingBuffer,
    head: &'a [u8],
    tail: &'a [u8],
}

impl<'a> InputView<'a> {
    pub(crate) fn new(buffer: &'a RingBuffer) -> Self {
        let (head, tail) = buffer.pending_slices();
        Self { buffer, head, tail }
    }

    pub(crate) const fn buffer(&self) -> &'a RingBuffer {
        self.buffer
    }

    pub(crate) const fn len(&self) -> usize {
        self.head.len() + self.tail.len()
    }

    pub(crate) fn byte(&self, index: usize) -> Option<u8> {
        match index.checked_sub(self.head.len()) {
            None => Some(self.head[index]),
            Some(rest) => self.tail.get(rest).copied(),
        }
    }

    /// Reads a big-endian unsigned integer of `width` bytes (at most four).
    pub(crate) fn be(&self, offset: usize, width: usize) -> Option<u32> {
        debug_assert!(width <= 4);
        (0..width).try_fold(0u32, |acc, index| {
            let byte = self.byte(offset.checked_add(index)?)?;
            Some((acc << 8) | u32::from(byte))
        })
    }

    pub(crate) fn be16(&self, offset: usize) -> Option<usize> {
        self.be(offset, 2).map(|value| value as usize)
    }

    pub(crate) fn be24(&self, offset: usize) -> Option<usize> {
        self.be(offset, 3).map(|value| value as usize)
    }

    /// Position of the first byte at or after `from` equal to `needle`.
    pub(crate) fn find(&self, from: usize, needle: u8) -> Option<usize> {
        self.find_with(from, |haystack| memchr::memchr(needle, haystack))
    }

    /// Position of the first byte at or after `from` equal to any of three needles.
    pub(crate) fn find3(&self, from: usize, a: u8, b: u8, c: u8) -> Option<usize> {
        self.find_with(from, |haystack| memchr::memchr3(a, b, c, haystack))
    }

    fn find_with<F>(&self, from: usize, search: F) -> Option<usize>
    where
        F: Fn(&[u8]) -> Option<usize>,
    {
        let split = self.head.len();
        if from < split {
            if let Some(found) = search(&self.head[from..]) {
                return Some(from + found);
            }
            search(self.tail).map(|found| split + found)
        } else {
            let start = from - split;
            let tail = self.tail.get(start..)?;
            search(tail).map(|found| from + found)
        }
    }

    /// Compares `literal` against the bytes at `offset`, ignoring ASCII case.
    /// Returns `None` while those bytes are not all buffered.
    pub(crate) fn eq_ignore_ascii_case_at(&self, offset: usize, literal: &[u8]) -> Option<bool> {
        let end = offset.checked_add(literal.len())?;
        if end > self.len() {
            return None;
        }
        Some(
            literal
                .iter()
                .enumerate()
                .all(|(index, expected)| {
                    self.byte(offset + index)
                        .is_some_and(|byte| byte.eq_ignore_ascii_case(expected))
                }),
        )
    }

    pub(crate) fn slice(&self, offset: usize, len: usize) -> Option<PayloadSlice<'a>> {
        PayloadSlice::new(self.buffer, offset, len)
    }
}
