//! Contiguous-ification of a wrapped buffer.
//!
//! Two strategies exist. The bounce rotation works in place for any layout,
//! sent data included, by walking the cycles of the storage rotation. The
//! scratch copy is cheaper but only applies when nothing has been sent: it
//! parks the wrapped tail in a per-worker [`RealignScratch`] while the head
//! segment slides to offset 0.

use crate::ring::RingBuffer;

/// Worker-owned staging area for [`RingBuffer::slow_realign`].
///
/// Each worker thread keeps exactly one and lends it to one realignment at a
/// time; the `&mut` borrow taken by the realignment makes re-entrant use
/// impossible. The area grows to the largest buffer capacity it is used with.
#[derive(Debug, Default)]
pub struct RealignScratch {
    area: Vec<u8>,
}

impl RealignScratch {
    /// Creates a scratch area able to realign buffers of `capacity` bytes.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        Self {
            area: vec![0; capacity],
        }
    }

    /// Creates a scratch area sized for `buffer`.
    #[must_use]
    pub fn for_buffer(buffer: &RingBuffer) -> Self {
        Self::new(buffer.capacity())
    }

    /// Current size of the staging area.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.area.len()
    }

    fn prepare(&mut self, len: usize) -> &mut [u8] {
        if self.area.len() < len {
            self.area.resize(len, 0);
        }
        &mut self.area[..len]
    }
}

impl RingBuffer {
    /// Makes the live window contiguous from offset 0, choosing the cheapest
    /// strategy the current layout allows.
    pub fn realign(&mut self, scratch: &mut RealignScratch) {
        if self.is_empty() {
            self.normalize();
        } else if self.sent_len() == 0 {
            logging::trace_realign!("realign via scratch copy ({} pending)", self.pending_len());
            self.slow_realign(scratch);
        } else {
            logging::trace_realign!(
                "realign via bounce rotation ({} sent, {} pending)",
                self.sent_len(),
                self.pending_len()
            );
            self.bounce_realign();
        }
    }

    /// Rotates the whole storage in place so the read cursor lands on offset 0.
    ///
    /// Sent and pending regions are both preserved. The rotation moves every
    /// storage slot exactly once without any auxiliary buffer.
    pub fn bounce_realign(&mut self) {
        if self.is_empty() {
            self.normalize();
            return;
        }
        let cursor = self.read_cursor();
        if cursor == 0 {
            return;
        }

        let advance = self.capacity() - cursor;
        let moved = rotate_forward(self.storage_mut(), advance);
        debug_assert_eq!(moved, self.capacity());
        self.set_cursor(0);
    }

    /// Moves the pending region to offset 0 through `scratch`.
    ///
    /// # Panics
    ///
    /// Panics when sent bytes are present: they would be lost, and that is a
    /// caller bug rather than a recoverable condition.
    pub fn slow_realign(&mut self, scratch: &mut RealignScratch) {
        assert_eq!(
            self.sent_len(),
            0,
            "scratch-copy realignment requires an empty sent region"
        );

        let pending = self.pending_len();
        if pending > 0 {
            let capacity = self.capacity();
            let start = self.pending_start();
            let (block1, block2) = if start + pending > capacity {
                (capacity - start, start + pending - capacity)
            } else {
                (pending, 0)
            };

            let parked = scratch.prepare(block2);
            let storage = self.storage_mut();
            parked.copy_from_slice(&storage[..block2]);
            storage.copy_within(start..start + block1, 0);
            storage[block1..block1 + block2].copy_from_slice(parked);
        }
        self.set_cursor(0);
    }
}

/// Moves the byte at each index `i` to `(i + advance) % len`, in place.
///
/// The permutation splits into `gcd(len, advance)` cycles. Each cycle is
/// walked from its lowest index, carrying one byte forward per step until the
/// walk returns to where it started. Cycle leaders are exactly the indices
/// below the gcd, so scanning leaders upward until every slot has been written
/// visits each slot once. Returns the number of slots written.
pub(crate) fn rotate_forward(storage: &mut [u8], advance: usize) -> usize {
    let len = storage.len();
    if len == 0 || advance % len == 0 {
        return 0;
    }

    let mut written = 0;
    let mut leader = 0;
    while written < len {
        let mut carried = storage[leader];
        let mut to = (leader + advance) % len;
        loop {
            core::mem::swap(&mut storage[to], &mut carried);
            written += 1;
            if to == leader {
                break;
            }
            to = (to + advance) % len;
        }
        leader += 1;
    }
    written
}
