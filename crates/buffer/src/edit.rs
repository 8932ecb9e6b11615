//! In-place structural edits of the pending region.
//!
//! Edits address the pending region with offsets relative to its first byte.
//! Every edit validates its span and its growth before touching storage, so a
//! refused edit leaves the buffer bit-for-bit unchanged.

use crate::error::EditError;
use crate::ring::RingBuffer;

/// Line terminator appended by [`RingBuffer::insert_line`].
pub const LINE_TERMINATOR: &[u8; 2] = b"\r\n";

/// How close to the capacity a growing edit may bring the live window.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
enum Headroom {
    /// The window may grow until it fills the storage.
    UpToCapacity,
    /// One trailing byte must stay free after the edit.
    KeepTrailingByte,
}

impl RingBuffer {
    /// Replaces the pending bytes in `pos..end` with `content`.
    ///
    /// Bytes after `end` shift by the difference in length so the rest of the
    /// pending data stays intact; an empty `content` is a pure deletion.
    /// Returns the signed change in pending length.
    ///
    /// # Examples
    ///
    /// ```
    /// use buffer::RingBuffer;
    ///
    /// let mut buf = RingBuffer::new(32);
    /// buf.fill(b"Host: a\r\n");
    /// assert_eq!(buf.replace(6, 7, b"example.com"), Ok(10));
    ///
    /// let (head, tail) = buf.pending_slices();
    /// assert_eq!([head, tail].concat(), b"Host: example.com\r\n");
    /// ```
    pub fn replace(&mut self, pos: usize, end: usize, content: &[u8]) -> Result<isize, EditError> {
        self.check_span(pos, end)?;

        let removed = end - pos;
        if content.len() > removed {
            self.check_growth(content.len() - removed, Headroom::UpToCapacity)?;
        }

        let sent = self.sent_len();
        let pending = self.pending_len();
        self.move_logical(sent + end, sent + pos + content.len(), pending - end);
        self.write_logical(sent + pos, content);
        self.set_pending(pending - removed + content.len());
        self.normalize();

        let delta = content.len() as isize - removed as isize;
        logging::trace_edit!("replaced {pos}..{end} with {} bytes (delta {delta})", content.len());
        Ok(delta)
    }

    /// Removes the pending bytes in `pos..end`.
    pub fn delete(&mut self, pos: usize, end: usize) -> Result<isize, EditError> {
        self.replace(pos, end, &[])
    }

    /// Inserts `line` followed by CRLF at pending offset `pos`.
    ///
    /// Returns the number of bytes inserted (`line.len() + 2`). The edit is
    /// refused unless at least one byte remains free afterwards.
    pub fn insert_line(&mut self, pos: usize, line: &[u8]) -> Result<usize, EditError> {
        self.insert_line_inner(pos, line.len(), Some(line))
    }

    /// Opens a gap of `len + 2` bytes at pending offset `pos` for a line the
    /// caller writes later.
    ///
    /// The gap keeps whatever bytes previously occupied that storage; no
    /// terminator is written. Space rules match [`insert_line`](Self::insert_line).
    pub fn reserve_line(&mut self, pos: usize, len: usize) -> Result<usize, EditError> {
        self.insert_line_inner(pos, len, None)
    }

    /// Overwrites pending bytes starting at `pos` without changing any length.
    ///
    /// Meant for filling a gap opened by [`reserve_line`](Self::reserve_line).
    pub fn overwrite(&mut self, pos: usize, content: &[u8]) -> Result<(), EditError> {
        let end = pos.checked_add(content.len()).ok_or(EditError::OutOfRange {
            pos,
            end: usize::MAX,
            pending: self.pending_len(),
        })?;
        self.check_span(pos, end)?;
        self.write_logical(self.sent_len() + pos, content);
        Ok(())
    }

    fn insert_line_inner(
        &mut self,
        pos: usize,
        len: usize,
        line: Option<&[u8]>,
    ) -> Result<usize, EditError> {
        self.check_span(pos, pos)?;

        let Some(growth) = len.checked_add(LINE_TERMINATOR.len()) else {
            let available = self.free_space().saturating_sub(1);
            logging::trace_edit!("edit refused: line of {len} bytes cannot be represented");
            return Err(EditError::NoSpace {
                requested: usize::MAX,
                available,
            });
        };
        self.check_growth(growth, Headroom::KeepTrailingByte)?;

        let sent = self.sent_len();
        let pending = self.pending_len();
        self.move_logical(sent + pos, sent + pos + growth, pending - pos);
        if let Some(line) = line {
            self.write_logical(sent + pos, line);
            self.write_logical(sent + pos + len, LINE_TERMINATOR);
        }
        self.set_pending(pending + growth);

        logging::trace_edit!("inserted {growth} byte line at {pos}");
        Ok(growth)
    }

    fn check_span(&self, pos: usize, end: usize) -> Result<(), EditError> {
        let pending = self.pending_len();
        if pos > end || end > pending {
            return Err(EditError::OutOfRange { pos, end, pending });
        }
        Ok(())
    }

    /// Verifies that the live window can grow by `growth` bytes.
    ///
    /// Two conditions must hold: the grown window fits the storage, and when
    /// the window already wraps, the wrapped pending end does not run into the
    /// sent data sitting ahead of it.
    fn check_growth(&self, growth: usize, headroom: Headroom) -> Result<(), EditError> {
        let free = self.free_space();
        let available = match headroom {
            Headroom::UpToCapacity => free,
            Headroom::KeepTrailingByte => free.saturating_sub(1),
        };

        if growth > available || !self.clear_of_sent(growth) {
            logging::trace_edit!(
                "edit refused: {growth} bytes requested, {available} available\n{}",
                self.dump()
            );
            return Err(EditError::NoSpace {
                requested: growth,
                available,
            });
        }
        Ok(())
    }

    fn clear_of_sent(&self, growth: usize) -> bool {
        if self.is_empty() || !self.window_wraps() {
            return true;
        }
        let wrapped_end = self.end_of_pending() - self.capacity();
        wrapped_end + growth <= self.read_cursor()
    }
}
