use faisca_bridge::Bridge::RingBuffer;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;

#[test]
fn capacity_must_be_a_power_of_two() {
    assert!(RingBuffer::<u32>::with_capacity(0).is_err());
    assert!(RingBuffer::<u32>::with_capacity(12).is_err());
    assert_eq!(RingBuffer::<u32>::with_capacity(16).unwrap().capacity(), 16);
    assert_eq!(RingBuffer::<u32>::with_min_capacity(100).capacity(), 128);
}

#[test]
fn simple_enqueue_dequeue() {
    let rb = RingBuffer::with_capacity(16).unwrap();
    assert!(rb.is_empty());
    rb.enqueue(7u64).unwrap();
    assert_eq!(rb.len(), 1);
    assert_eq!(rb.dequeue(), Some(7));
    assert_eq!(rb.dequeue(), None);
}

#[test]
fn random_sequence_comes_out_in_order() {
    let rb = RingBuffer::with_capacity(64).unwrap();
    let mut rng = fastrand::Rng::with_seed(0x5eed);
    let mut expected = std::collections::VecDeque::new();

    for _ in 0..10_000 {
        if rng.bool() && expected.len() < rb.capacity() {
            let value = rng.u32(..);
            rb.enqueue(value).unwrap();
            expected.push_back(value);
        } else {
            assert_eq!(rb.dequeue(), expected.pop_front());
        }
    }
    while let Some(value) = expected.pop_front() {
        assert_eq!(rb.dequeue(), Some(value));
    }
}

#[test]
fn full_ring_hands_the_value_back() {
    let rb = RingBuffer::with_capacity(4).unwrap();
    for i in 0..4 {
        rb.enqueue(i).unwrap();
    }
    assert_eq!(rb.enqueue(99), Err(99));
    assert_eq!(rb.dequeue(), Some(0));
    assert!(rb.enqueue(4).is_ok());
}

#[test]
fn concurrent_producers_single_consumer() {
    const PRODUCERS: usize = 4;
    const PER_PRODUCER: usize = 5_000;

    let rb = Arc::new(RingBuffer::with_capacity(256).unwrap());
    let mut handles = Vec::new();
    for p in 0..PRODUCERS {
        let rb = rb.clone();
        handles.push(thread::spawn(move || {
            for i in 0..PER_PRODUCER {
                let mut value = (p, i);
                while let Err(back) = rb.enqueue(value) {
                    value = back;
                    thread::yield_now();
                }
            }
        }));
    }

    // Per-producer order must hold even with interleaving
    let mut last = [None; PRODUCERS];
    let mut received = 0;
    while received < PRODUCERS * PER_PRODUCER {
        if let Some((p, i)) = rb.dequeue() {
            if let Some(prev) = last[p] {
                assert!(i > prev, "producer {p} reordered: {i} after {prev}");
            }
            last[p] = Some(i);
            received += 1;
        } else {
            thread::yield_now();
        }
    }

    for handle in handles {
        handle.join().unwrap();
    }
    assert!(rb.is_empty());
}

struct Counted(Arc<AtomicUsize>);

impl Drop for Counted {
    fn drop(&mut self) {
        self.0.fetch_add(1, Ordering::SeqCst);
    }
}

#[test]
fn dropping_the_ring_drops_queued_values() {
    let drops = Arc::new(AtomicUsize::new(0));
    let rb = RingBuffer::with_capacity(8).unwrap();
    for _ in 0..5 {
        assert!(rb.enqueue(Counted(drops.clone())).is_ok());
    }
    drop(rb.dequeue());
    assert_eq!(drops.load(Ordering::SeqCst), 1);
    drop(rb);
    assert_eq!(drops.load(Ordering::SeqCst), 5);
}
