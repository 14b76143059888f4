// Two-phase request/response over a binding on the requester's stack.

use faisca_bridge::Protocol::{exchange, Barrier, BindingPtr, Extent2D};
use std::sync::mpsc;
use std::thread;
use std::time::{Duration, Instant};

/// Answer one request on another thread after `delay`.
fn responder(delay: Duration, value: Extent2D) -> (mpsc::Sender<BindingPtr>, thread::JoinHandle<()>) {
    let (tx, rx) = mpsc::channel::<BindingPtr>();
    let handle = thread::spawn(move || {
        let binding = rx.recv().unwrap();
        thread::sleep(delay);
        unsafe {
            binding.fulfil(value);
            binding.signal();
        }
    });
    (tx, handle)
}

#[test]
fn result_is_visible_once_the_barrier_opens() {
    let (tx, handle) = responder(Duration::from_millis(5), Extent2D::new(800, 450));
    let got = exchange::<Extent2D>(Duration::from_secs(5), |binding| {
        tx.send(BindingPtr::from_binding(binding)).is_ok()
    });
    assert_eq!(got, Some(Extent2D::new(800, 450)));
    handle.join().unwrap();
}

#[test]
fn failed_send_leaves_nothing_pending() {
    let start = Instant::now();
    let got = exchange::<Extent2D>(Duration::from_secs(5), |_| false);
    assert_eq!(got, None);
    assert!(start.elapsed() < Duration::from_secs(1));
}

#[test]
fn waiting_continues_past_patience() {
    let (tx, handle) = responder(Duration::from_millis(60), Extent2D::new(3, 4));
    let got = exchange::<Extent2D>(Duration::from_millis(5), |binding| {
        tx.send(BindingPtr::from_binding(binding)).is_ok()
    });
    assert_eq!(got, Some(Extent2D::new(3, 4)));
    handle.join().unwrap();
}

#[test]
fn many_requests_in_a_row() {
    for i in 1..=50u32 {
        let (tx, handle) = responder(Duration::ZERO, Extent2D::new(i, i * 2));
        let got = exchange::<Extent2D>(Duration::from_secs(5), |binding| {
            tx.send(BindingPtr::from_binding(binding)).is_ok()
        });
        assert_eq!(got, Some(Extent2D::new(i, i * 2)));
        handle.join().unwrap();
    }
}

#[test]
fn barrier_times_out_closed_and_opens_once() {
    let barrier = Barrier::new();
    assert!(!barrier.wait_for(Duration::from_millis(5)));
    assert!(!barrier.is_open());
    barrier.open();
    assert!(barrier.wait_for(Duration::ZERO));
    barrier.wait();
    assert!(barrier.is_open());
}
