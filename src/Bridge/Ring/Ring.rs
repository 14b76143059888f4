// Bounded MPMC ring used as an in-process event queue.

use crossbeam_utils::CachePadded;
use std::cell::UnsafeCell;
use std::mem::MaybeUninit;
use std::sync::atomic::AtomicU64;

/// A single slot in the ring buffer.
pub struct Slot<T> {
    /// The sequence number of the slot. This is the core of the synchronization.
    /// - A producer claims a `tail` sequence and waits for the `sequence` in
    ///   the target slot to equal `tail`.
    /// - After writing, it sets the `sequence` to `tail + 1`, signaling completion.
    /// - A consumer waits for the `sequence` in its `head` slot to equal
    ///   `head + 1`.
    pub(crate) sequence: AtomicU64,

    /// The queued value; initialised only between publish and consume.
    pub(crate) value: UnsafeCell<MaybeUninit<T>>,
}

/// A lock-free, multi-producer, multi-consumer (MPMC) ring buffer of owned values.
///
/// ### Concurrency Design:
/// - **Producers (Enqueue)**: Producers claim a slot by atomically incrementing `tail`.
///   They use the `sequence` field in the `Slot` to know when the slot is free to
///   be written.
/// - **Consumers (Dequeue)**: Consumers claim a value by atomically incrementing `head`.
///   They use the `sequence` field to know when a value has been fully written by a producer.
///
/// Values come out in the order their slots were claimed, so a single
/// producer observes strict FIFO.
pub struct RingBuffer<T> {
    pub(crate) slots: Box<[Slot<T>]>,

    /// The capacity of the buffer (number of slots).
    pub(crate) capacity: usize,

    /// A bitmask used to wrap sequence numbers around the buffer.
    /// Calculated as `capacity - 1`.
    pub(crate) mask: usize,

    /// Consumer cursor. Padded to prevent false sharing with `tail`.
    pub(crate) head: CachePadded<AtomicU64>,

    /// Producer cursor.
    pub(crate) tail: CachePadded<AtomicU64>,
}

// Slots are handed between threads under the sequence protocol.
unsafe impl<T: Send> Send for RingBuffer<T> {}
unsafe impl<T: Send> Sync for RingBuffer<T> {}
