// Event queue bridge over the headless pump.

use faisca_bridge::Bridge::{Delivery, EventBridge, EventPump, NativeEvent, UserEvent};
use faisca_bridge::Core::OwnedHostMessage;
use faisca_bridge::Host::{HeadlessPump, HostError};
use faisca_bridge::Protocol::{Extent2D, HostMessage, WindowInstance};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

fn size_message(width: u32) -> OwnedHostMessage {
    OwnedHostMessage::from_message(&HostMessage::SetWindowSize(Extent2D::new(width, 1)))
}

fn expect_message(delivery: Option<Delivery>) -> (WindowInstance, u32) {
    match delivery {
        Some(Delivery::Message { window, message }) => match message.view() {
            Ok(HostMessage::SetWindowSize(extent)) => (window, extent.width),
            other => panic!("unexpected message {other:?}"),
        },
        Some(Delivery::Platform(event)) => panic!("unexpected platform event {event:?}"),
        None => panic!("queue empty"),
    }
}

#[test]
fn drain_order_equals_post_order() {
    let bridge = EventBridge::new(Arc::new(HeadlessPump::new(1024).unwrap())).unwrap();
    for i in 0..500 {
        assert!(bridge.post(WindowInstance(1 + i as usize % 3), size_message(i)).is_ok());
    }
    for i in 0..500 {
        assert_eq!(expect_message(bridge.poll()), (WindowInstance(1 + i as usize % 3), i));
    }
    assert!(bridge.poll().is_none());
}

#[test]
fn platform_events_keep_their_place_and_foreign_kinds_are_skipped() {
    let pump = Arc::new(HeadlessPump::new(16).unwrap());
    let bridge = EventBridge::new(pump.clone()).unwrap();
    let foreign = pump.register_events(1).unwrap();
    assert_ne!(foreign, bridge.kind());

    bridge.post(WindowInstance(1), size_message(10)).unwrap();
    pump.push(NativeEvent::User(UserEvent {
        kind: foreign,
        code: 0,
        data1: std::ptr::null_mut(),
        data2: std::ptr::null_mut(),
    }))
    .unwrap();
    pump.push(NativeEvent::Quit).unwrap();
    bridge.post(WindowInstance(1), size_message(20)).unwrap();

    assert_eq!(expect_message(bridge.poll()).1, 10);
    assert!(matches!(bridge.poll(), Some(Delivery::Platform(NativeEvent::Quit))));
    assert_eq!(expect_message(bridge.poll()).1, 20);
    assert!(bridge.poll().is_none());
}

#[test]
fn failed_post_returns_ownership() {
    let pump = Arc::new(HeadlessPump::new(2).unwrap());
    let bridge = EventBridge::new(pump).unwrap();
    bridge.post(WindowInstance(1), size_message(1)).unwrap();
    bridge.post(WindowInstance(1), size_message(2)).unwrap();

    let epoch = bridge.epoch();
    let unsent = bridge.post(WindowInstance(1), size_message(3)).unwrap_err();
    assert_eq!(unsent.view(), Ok(HostMessage::SetWindowSize(Extent2D::new(3, 1))));
    // A rejected post does not wake anybody
    assert_eq!(bridge.epoch(), epoch);
}

#[test]
fn post_wakes_an_idle_waiter() {
    let bridge = Arc::new(EventBridge::new(Arc::new(HeadlessPump::new(16).unwrap())).unwrap());
    let seen = bridge.epoch();

    let poster = {
        let bridge = bridge.clone();
        thread::spawn(move || {
            thread::sleep(Duration::from_millis(20));
            bridge.post(WindowInstance(1), size_message(5)).unwrap();
        })
    };

    let start = Instant::now();
    assert!(bridge.wait_for_post(seen, Duration::from_secs(2)));
    assert!(start.elapsed() < Duration::from_secs(1));
    assert_eq!(expect_message(bridge.poll()).1, 5);
    poster.join().unwrap();
}

#[test]
fn idle_wait_is_bounded_without_posts() {
    let bridge = EventBridge::new(Arc::new(HeadlessPump::new(16).unwrap())).unwrap();
    let start = Instant::now();
    assert!(!bridge.wait_for_post(bridge.epoch(), Duration::from_millis(8)));
    assert!(start.elapsed() >= Duration::from_millis(8));
}

struct ExhaustedPump;

impl EventPump for ExhaustedPump {
    fn register_events(&self, _count: u32) -> Option<u32> {
        None
    }

    fn push(&self, event: NativeEvent) -> Result<(), NativeEvent> {
        Err(event)
    }

    fn poll(&self) -> Option<NativeEvent> {
        None
    }
}

#[test]
fn registration_failure_is_reported() {
    let err = EventBridge::new(Arc::new(ExhaustedPump)).unwrap_err();
    assert!(matches!(err, HostError::EventRegistration));
}

#[test]
fn headless_pump_runs_out_of_event_kinds() {
    let pump = HeadlessPump::new(2).unwrap();
    assert_eq!(pump.register_events(0x7fff), Some(0x8000));
    assert_eq!(pump.register_events(1), Some(0xffff));
    assert_eq!(pump.register_events(1), None);
}
