use std::cell::UnsafeCell;
use std::io;
use std::mem::MaybeUninit;
use std::sync::atomic::AtomicU64;
use std::sync::atomic::Ordering::{AcqRel, Acquire, Relaxed, Release};

use super::Ring::{RingBuffer, Slot};
use crossbeam_utils::{Backoff, CachePadded};

impl<T> RingBuffer<T> {
    /// Create a ring with `capacity` slots.
    /// Capacity must be a power of two and greater than zero.
    pub fn with_capacity(capacity: usize) -> io::Result<Self> {
        if capacity == 0 || (capacity & (capacity - 1)) != 0 {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("Capacity must be a power of two and greater than zero, got {capacity}"),
            ));
        }
        Ok(Self::build(capacity))
    }

    /// Create a ring with at least `min_capacity` slots (rounded up to a power of two).
    pub fn with_min_capacity(min_capacity: usize) -> Self {
        Self::build(min_capacity.max(1).next_power_of_two())
    }

    fn build(capacity: usize) -> Self {
        // Initialize per-slot sequence numbers to k for k in 0..capacity
        let slots = (0..capacity)
            .map(|k| Slot {
                sequence: AtomicU64::new(k as u64),
                value: UnsafeCell::new(MaybeUninit::uninit()),
            })
            .collect::<Vec<_>>()
            .into_boxed_slice();

        Self {
            slots,
            capacity,
            mask: capacity - 1,
            head: CachePadded::new(AtomicU64::new(0)),
            tail: CachePadded::new(AtomicU64::new(0)),
        }
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Number of queued values. Only a snapshot under concurrent use.
    pub fn len(&self) -> usize {
        let tail = self.tail.load(Acquire);
        let head = self.head.load(Acquire);
        tail.saturating_sub(head) as usize
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Enqueue reserves a slot and publishes the value.
    /// Returns the slot index on success, or the value back if the ring is full.
    pub fn enqueue(&self, value: T) -> Result<usize, T> {
        let backoff = Backoff::new();
        loop {
            let tail = self.tail.load(Relaxed);
            let idx = (tail as usize) & self.mask;
            let slot = &self.slots[idx];
            let seq = slot.sequence.load(Acquire);
            let dif = seq as i64 - tail as i64;

            if dif == 0 {
                if self
                    .tail
                    .compare_exchange_weak(tail, tail + 1, AcqRel, Relaxed)
                    .is_ok()
                {
                    // We own this slot now
                    unsafe {
                        (*slot.value.get()).write(value);
                    }
                    // Publish
                    slot.sequence.store(tail + 1, Release);
                    return Ok(idx);
                }
                continue;
            } else if dif < 0 {
                // full
                return Err(value);
            } else {
                // someone else is producing; backoff and retry
                backoff.spin();
                continue;
            }
        }
    }

    /// Dequeue acquires a ready slot and moves its value out.
    /// Returns None if the ring appears empty.
    pub fn dequeue(&self) -> Option<T> {
        let backoff = Backoff::new();
        loop {
            let head = self.head.load(Relaxed);
            let idx = (head as usize) & self.mask;
            let slot = &self.slots[idx];
            let seq = slot.sequence.load(Acquire);
            let dif = seq as i64 - (head as i64 + 1);

            if dif == 0 {
                if self
                    .head
                    .compare_exchange_weak(head, head + 1, AcqRel, Relaxed)
                    .is_ok()
                {
                    let value = unsafe { (*slot.value.get()).assume_init_read() };

                    // free slot for future producers
                    slot.sequence.store(head + self.capacity as u64, Release);
                    return Some(value);
                }
                continue;
            } else if dif < 0 {
                // empty, or the producer of this slot has not published yet
                return None;
            } else {
                // another consumer took this slot; reload head
                backoff.spin();
                continue;
            }
        }
    }
}

impl<T> Drop for RingBuffer<T> {
    fn drop(&mut self) {
        // Queued values are owned by the ring
        while self.dequeue().is_some() {}
    }
}
