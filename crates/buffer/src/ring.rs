use core::fmt;

use crate::config::BufferConfig;
use crate::dump::Dump;
use crate::error::{ConfigError, EditError};

/// Fixed-capacity circular byte store shared by every stage that handles a
/// connection direction.
///
/// The live window starts at the read cursor and holds two regions back to
/// back: bytes already forwarded to the peer but still retained ("sent"), then
/// bytes waiting to be analysed or forwarded ("pending"). Everything else is
/// free space. The window wraps past the end of the storage at most once.
///
/// All positions accepted by the public API are *logical*: they count bytes
/// from the start of a region, never physical storage offsets. Physical
/// addresses are only derived at the moment a byte is read or written, through
/// [`wrap`](Self::wrap).
///
/// # Invariants
///
/// - `sent_len() + pending_len() <= capacity()`.
/// - An empty buffer always has its read cursor at offset 0.
///
/// # Examples
///
/// ```
/// use buffer::RingBuffer;
///
/// let mut buf = RingBuffer::new(8);
/// assert_eq!(buf.fill(b"GET /"), 5);
/// buf.forward(4);
/// buf.consume(4);
/// assert_eq!(buf.fill(b"abcdef"), 6);
/// assert!(buf.pending_wraps());
///
/// let (head, tail) = buf.pending_slices();
/// assert_eq!([head, tail].concat(), b"/abcdef");
/// ```
pub struct RingBuffer {
    storage: Box<[u8]>,
    cursor: usize,
    sent: usize,
    pending: usize,
    reserve: usize,
}

impl RingBuffer {
    /// Creates an empty buffer without a rewrite reserve.
    ///
    /// # Panics
    ///
    /// Panics when `capacity` is zero.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        Self::with_reserve(capacity, 0)
    }

    /// Creates an empty buffer that keeps `reserve` bytes back from incoming data.
    ///
    /// # Panics
    ///
    /// Panics when `capacity` is zero or `reserve` is not smaller than `capacity`.
    #[must_use]
    pub fn with_reserve(capacity: usize, reserve: usize) -> Self {
        assert!(capacity > 0, "ring buffer capacity must be non-zero");
        assert!(
            reserve < capacity,
            "ring buffer reserve {reserve} must be smaller than capacity {capacity}"
        );
        Self {
            storage: vec![0; capacity].into_boxed_slice(),
            cursor: 0,
            sent: 0,
            pending: 0,
            reserve,
        }
    }

    /// Creates an empty buffer sized by a validated [`BufferConfig`].
    pub fn from_config(config: &BufferConfig) -> Result<Self, ConfigError> {
        let config = config.validate()?;
        Ok(Self::with_reserve(config.size, config.reserve))
    }

    /// Total storage capacity.
    #[must_use]
    #[inline]
    pub fn capacity(&self) -> usize {
        self.storage.len()
    }

    /// Bytes held back from incoming data for rewrites.
    #[must_use]
    #[inline]
    pub const fn reserve(&self) -> usize {
        self.reserve
    }

    /// Largest amount of data a sniffer may expect this buffer to ever hold.
    #[must_use]
    #[inline]
    pub fn max_len(&self) -> usize {
        self.capacity() - self.reserve
    }

    /// Number of sent bytes still retained in front of the pending data.
    #[must_use]
    #[inline]
    pub const fn sent_len(&self) -> usize {
        self.sent
    }

    /// Number of bytes available for analysis.
    #[must_use]
    #[inline]
    pub const fn pending_len(&self) -> usize {
        self.pending
    }

    /// Number of live bytes (sent plus pending).
    #[must_use]
    #[inline]
    pub const fn len(&self) -> usize {
        self.sent + self.pending
    }

    /// Returns `true` when neither sent nor pending bytes are held.
    #[must_use]
    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of bytes that can still be stored.
    #[must_use]
    #[inline]
    pub fn free_space(&self) -> usize {
        self.capacity() - self.len()
    }

    /// Returns `true` once incoming data has eaten into the rewrite reserve.
    #[must_use]
    pub fn is_full(&self) -> bool {
        self.len() + self.reserve >= self.capacity()
    }

    /// Physical offset of the first live byte.
    #[must_use]
    #[inline]
    pub const fn read_cursor(&self) -> usize {
        self.cursor
    }

    /// Physical offset of the first pending byte.
    #[must_use]
    #[inline]
    pub fn pending_start(&self) -> usize {
        self.wrap(self.cursor + self.sent)
    }

    /// Offset one past the last pending byte, deliberately left unwrapped.
    ///
    /// The value exceeds [`capacity`](Self::capacity) whenever the live window
    /// wraps. It is meant for placement arithmetic only; use
    /// [`wrap`](Self::wrap) before touching storage.
    #[must_use]
    #[inline]
    pub const fn end_of_pending(&self) -> usize {
        self.cursor + self.sent + self.pending
    }

    /// Normalizes an unwrapped offset into the storage range.
    #[must_use]
    #[inline]
    pub fn wrap(&self, offset: usize) -> usize {
        offset % self.capacity()
    }

    /// Returns `true` when the live window crosses the end of the storage.
    #[must_use]
    pub fn window_wraps(&self) -> bool {
        self.end_of_pending() > self.capacity()
    }

    /// Returns `true` when the pending region crosses the end of the storage.
    #[must_use]
    pub fn pending_wraps(&self) -> bool {
        self.pending_start() + self.pending > self.capacity()
    }

    /// Number of free bytes directly after the pending end before the storage
    /// end or the read cursor interrupts them.
    #[must_use]
    pub fn contiguous_free(&self) -> usize {
        let end = self.end_of_pending();
        let capacity = self.capacity();
        if end < capacity {
            capacity - end
        } else {
            self.cursor - (end - capacity)
        }
    }

    /// Borrows the pending bytes as at most two storage segments, in order.
    #[must_use]
    pub fn pending_slices(&self) -> (&[u8], &[u8]) {
        self.segments(self.sent, self.pending)
    }

    /// Borrows the sent bytes as at most two storage segments, in order.
    #[must_use]
    pub fn sent_slices(&self) -> (&[u8], &[u8]) {
        self.segments(0, self.sent)
    }

    /// Borrows `len` pending bytes starting `offset` bytes into the pending region.
    ///
    /// Returns `None` when the requested window is not entirely pending.
    #[must_use]
    pub fn pending_range(&self, offset: usize, len: usize) -> Option<(&[u8], &[u8])> {
        let end = offset.checked_add(len)?;
        if end > self.pending {
            return None;
        }
        Some(self.segments(self.sent + offset, len))
    }

    /// Returns the pending byte at `index`, if present.
    #[must_use]
    #[inline]
    pub fn pending_byte(&self, index: usize) -> Option<u8> {
        (index < self.pending).then(|| self.storage[self.physical(self.sent + index)])
    }

    /// Copies pending bytes starting at `offset` into `target` and returns the
    /// number of bytes copied.
    pub fn copy_pending_into(&self, offset: usize, target: &mut [u8]) -> usize {
        let available = self.pending.saturating_sub(offset);
        let count = available.min(target.len());
        if count == 0 {
            return 0;
        }
        let (head, tail) = self.segments(self.sent + offset, count);
        target[..head.len()].copy_from_slice(head);
        target[head.len()..count].copy_from_slice(tail);
        count
    }

    /// Appends as much of `data` as fits to the pending region and returns the
    /// number of bytes stored.
    pub fn fill(&mut self, data: &[u8]) -> usize {
        let count = data.len().min(self.free_space());
        self.write_logical(self.len(), &data[..count]);
        self.pending += count;
        count
    }

    /// Appends `data` to the pending region only if all of it fits.
    pub fn put_block(&mut self, data: &[u8]) -> Result<(), EditError> {
        let available = self.free_space();
        if data.len() > available {
            logging::trace_buffer!(
                "put_block refused: {} bytes requested, {} free",
                data.len(),
                available
            );
            return Err(EditError::NoSpace {
                requested: data.len(),
                available,
            });
        }
        self.write_logical(self.len(), data);
        self.pending += data.len();
        Ok(())
    }

    /// Moves up to `count` bytes from the pending region into the sent region
    /// and returns the number moved.
    pub fn forward(&mut self, count: usize) -> usize {
        let count = count.min(self.pending);
        self.pending -= count;
        self.sent += count;
        count
    }

    /// Moves up to `count` bytes from the end of the sent region back into the
    /// pending region and returns the number moved.
    pub fn rewind(&mut self, count: usize) -> usize {
        let count = count.min(self.sent);
        self.sent -= count;
        self.pending += count;
        count
    }

    /// Drops up to `count` sent bytes from the front of the window and returns
    /// the number dropped.
    pub fn consume(&mut self, count: usize) -> usize {
        let count = count.min(self.sent);
        self.cursor = self.wrap(self.cursor + count);
        self.sent -= count;
        self.normalize();
        count
    }

    /// Forgets every live byte and resets the cursor.
    pub fn clear(&mut self) {
        self.cursor = 0;
        self.sent = 0;
        self.pending = 0;
    }

    /// Resets the read cursor to offset 0 when the buffer is empty.
    ///
    /// This is the trivial realignment: with no live bytes there is nothing
    /// to move, and a zero cursor keeps "distance to the storage end" checks
    /// meaningful.
    pub fn normalize(&mut self) {
        if self.is_empty() {
            self.cursor = 0;
        }
    }

    /// Renders the live window as a hex dump for diagnostics.
    #[must_use]
    pub fn dump(&self) -> Dump<'_> {
        Dump::new(self)
    }

    /// Physical offset of the byte `logical` bytes past the read cursor.
    #[inline]
    pub(crate) fn physical(&self, logical: usize) -> usize {
        self.wrap(self.cursor + logical)
    }

    pub(crate) fn segments(&self, logical: usize, len: usize) -> (&[u8], &[u8]) {
        if len == 0 {
            return (&[], &[]);
        }
        let start = self.physical(logical);
        let first = len.min(self.capacity() - start);
        (
            &self.storage[start..start + first],
            &self.storage[..len - first],
        )
    }

    /// Copies `data` into the window at logical offset `at`, wrapping as needed.
    pub(crate) fn write_logical(&mut self, at: usize, data: &[u8]) {
        if data.is_empty() {
            return;
        }
        let start = self.physical(at);
        let first = data.len().min(self.capacity() - start);
        self.storage[start..start + first].copy_from_slice(&data[..first]);
        self.storage[..data.len() - first].copy_from_slice(&data[first..]);
    }

    /// Moves `len` bytes from logical offset `from` to logical offset `to`.
    ///
    /// Overlapping ranges are handled like `memmove`. Ranges that cross the
    /// storage end fall back to a byte walk in the direction that never reads
    /// an already overwritten byte.
    pub(crate) fn move_logical(&mut self, from: usize, to: usize, len: usize) {
        if len == 0 || from == to {
            return;
        }
        let capacity = self.capacity();
        let src = self.physical(from);
        let dst = self.physical(to);
        if src + len <= capacity && dst + len <= capacity {
            self.storage.copy_within(src..src + len, dst);
            return;
        }
        if to > from {
            for index in (0..len).rev() {
                let byte = self.storage[self.physical(from + index)];
                let target = self.physical(to + index);
                self.storage[target] = byte;
            }
        } else {
            for index in 0..len {
                let byte = self.storage[self.physical(from + index)];
                let target = self.physical(to + index);
                self.storage[target] = byte;
            }
        }
    }

    pub(crate) fn set_pending(&mut self, pending: usize) {
        debug_assert!(self.sent + pending <= self.capacity());
        self.pending = pending;
    }

    pub(crate) fn set_cursor(&mut self, cursor: usize) {
        debug_assert!(cursor < self.capacity());
        self.cursor = cursor;
    }

    pub(crate) fn storage_mut(&mut self) -> &mut [u8] {
        &mut self.storage
    }
}

impl fmt::Debug for RingBuffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RingBuffer")
            .field("capacity", &self.capacity())
            .field("cursor", &self.cursor)
            .field("sent", &self.sent)
            .field("pending", &self.pending)
            .field("reserve", &self.reserve)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pending(buf: &RingBuffer) -> Vec<u8> {
        let (head, tail) = buf.pending_slices();
        [head, tail].concat()
    }

    /// Builds an empty buffer whose next byte lands `cursor` bytes into the storage.
    fn shifted(capacity: usize, cursor: usize) -> RingBuffer {
        let mut buf = RingBuffer::new(capacity);
        buf.set_cursor(cursor);
        buf
    }

    #[test]
    fn new_buffer_is_empty_and_aligned() {
        let buf = RingBuffer::new(16);
        assert!(buf.is_empty());
        assert_eq!(buf.read_cursor(), 0);
        assert_eq!(buf.free_space(), 16);
        assert_eq!(buf.contiguous_free(), 16);
        assert_eq!(buf.pending_slices(), (&[][..], &[][..]));
    }

    #[test]
    #[should_panic(expected = "capacity must be non-zero")]
    fn zero_capacity_is_rejected() {
        let _ = RingBuffer::new(0);
    }

    #[test]
    fn from_config_applies_reserve() {
        let buf = RingBuffer::from_config(&BufferConfig::new(64, 16)).unwrap();
        assert_eq!(buf.capacity(), 64);
        assert_eq!(buf.reserve(), 16);
        assert_eq!(buf.max_len(), 48);
        assert!(RingBuffer::from_config(&BufferConfig::new(8, 8)).is_err());
    }

    #[test]
    fn fill_stops_at_capacity() {
        let mut buf = RingBuffer::new(4);
        assert_eq!(buf.fill(b"abcdef"), 4);
        assert_eq!(pending(&buf), b"abcd");
        assert_eq!(buf.free_space(), 0);
        assert_eq!(buf.fill(b"x"), 0);
    }

    #[test]
    fn put_block_is_all_or_nothing() {
        let mut buf = RingBuffer::new(4);
        buf.put_block(b"ab").unwrap();
        let err = buf.put_block(b"cde").unwrap_err();
        assert_eq!(
            err,
            EditError::NoSpace {
                requested: 3,
                available: 2
            }
        );
        assert_eq!(pending(&buf), b"ab");
    }

    #[test]
    fn forward_rewind_and_consume_move_region_boundaries() {
        let mut buf = RingBuffer::new(8);
        buf.fill(b"hello");
        assert_eq!(buf.forward(3), 3);
        assert_eq!(buf.sent_len(), 3);
        assert_eq!(pending(&buf), b"lo");
        assert_eq!(buf.rewind(1), 1);
        assert_eq!(pending(&buf), b"llo");
        assert_eq!(buf.consume(5), 2);
        assert_eq!(buf.read_cursor(), 2);
        assert_eq!(buf.sent_len(), 0);
        assert_eq!(pending(&buf), b"llo");
    }

    #[test]
    fn consuming_everything_resets_cursor() {
        let mut buf = RingBuffer::new(8);
        buf.fill(b"abc");
        buf.forward(3);
        buf.consume(3);
        assert!(buf.is_empty());
        assert_eq!(buf.read_cursor(), 0);
    }

    #[test]
    fn window_wraps_across_storage_end() {
        let mut buf = shifted(8, 6);
        buf.fill(b"abcde");
        assert!(buf.window_wraps());
        assert!(buf.pending_wraps());
        assert_eq!(buf.end_of_pending(), 11);
        assert_eq!(buf.wrap(buf.end_of_pending()), 3);
        assert_eq!(buf.contiguous_free(), 3);
        assert_eq!(buf.pending_slices(), (&b"ab"[..], &b"cde"[..]));
    }

    #[test]
    fn pending_range_rejects_windows_past_pending_end() {
        let mut buf = shifted(8, 5);
        buf.fill(b"abcdef");
        assert_eq!(buf.pending_range(2, 3), Some((&b"c"[..], &b"de"[..])));
        assert_eq!(buf.pending_range(4, 3), None);
        assert_eq!(buf.pending_range(usize::MAX, 2), None);
        assert_eq!(buf.pending_byte(5), Some(b'f'));
        assert_eq!(buf.pending_byte(6), None);
    }

    #[test]
    fn copy_pending_into_spans_wrap() {
        let mut buf = shifted(8, 6);
        buf.fill(b"abcdef");
        let mut out = [0u8; 4];
        assert_eq!(buf.copy_pending_into(1, &mut out), 4);
        assert_eq!(&out, b"bcde");
        assert_eq!(buf.copy_pending_into(6, &mut out), 0);
    }

    #[test]
    fn move_logical_handles_wrapped_overlap_both_directions() {
        let mut buf = shifted(8, 5);
        buf.fill(b"abcdef");
        buf.move_logical(1, 2, 4);
        assert_eq!(pending(&buf), b"abbcde");

        let mut buf = shifted(8, 5);
        buf.fill(b"abcdef");
        buf.move_logical(2, 1, 4);
        assert_eq!(pending(&buf), b"acdeff");
    }

    #[test]
    fn is_full_accounts_for_reserve() {
        let mut buf = RingBuffer::with_reserve(8, 2);
        buf.fill(b"abcde");
        assert!(!buf.is_full());
        buf.fill(b"f");
        assert!(buf.is_full());
    }

    #[test]
    fn debug_output_omits_storage() {
        let buf = RingBuffer::new(4);
        assert_eq!(
            format!("{buf:?}"),
            "RingBuffer { capacity: 4, cursor: 0, sent: 0, pending: 0, reserve: 0 }"
        );
    }
}
