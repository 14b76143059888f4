// Dispatcher against the headless platform, one message at a time.
//
// Notifications land in the process-wide app inbox, so these tests run
// serially and drain it before they start.

use faisca_bridge::App::{self, WindowMessenger};
use faisca_bridge::Bridge::{EventBridge, NativeEvent};
use faisca_bridge::Core::OwnedHostMessage;
use faisca_bridge::ffi::EntryTable;
use faisca_bridge::Host::{Dispatched, Dispatcher, HeadlessPlatform, HeadlessPump, LoopState, Platform};
use faisca_bridge::Protocol::{
    Backchannel, Barrier, BindingPtr, Extent2D, Fullscreen, HostMessage, RawHostMessage, ResponseBinding,
    SurfaceHandle, WindowEvent, WindowInstance,
};
use serial_test::serial;
use std::mem::MaybeUninit;
use std::sync::Arc;
use std::time::Duration;

fn unused_app(_messenger: WindowMessenger) {}

faisca_bridge::app_entry!(unused_app);

fn setup() -> (Dispatcher<HeadlessPump, HeadlessPlatform>, HeadlessPlatform, WindowInstance) {
    while App::inbox().try_recv().is_some() {}

    let mut platform = HeadlessPlatform::new();
    let window = platform.create_window("Faisca Window", Extent2D::new(800, 450)).unwrap();
    let bridge = Arc::new(EventBridge::new(Arc::new(HeadlessPump::new(64).unwrap())).unwrap());
    let dispatcher = Dispatcher::new(
        bridge,
        platform.clone(),
        EntryTable::new(faisca_run_app, faisca_message_app),
        vec![window],
        Duration::from_millis(8),
    );
    (dispatcher, platform, window)
}

fn owned(message: HostMessage<'_>) -> OwnedHostMessage {
    OwnedHostMessage::from_message(&message)
}

#[test]
#[serial]
fn direct_actions_apply_immediately() {
    let (mut dispatcher, platform, window) = setup();

    let title = c"Level 1 \u{2014} Boss";
    assert_eq!(dispatcher.dispatch(window, owned(HostMessage::SetWindowTitle(title))), Dispatched::Applied);
    assert_eq!(
        dispatcher.dispatch(window, owned(HostMessage::SetWindowSize(Extent2D::new(1280, 720)))),
        Dispatched::Applied
    );
    assert_eq!(
        dispatcher.dispatch(window, owned(HostMessage::SetFullscreen(Fullscreen::Desktop))),
        Dispatched::Applied
    );
    assert_eq!(dispatcher.dispatch(window, owned(HostMessage::SetBorderless(true))), Dispatched::Applied);

    let state = platform.window(window).unwrap();
    assert_eq!(state.title, "Level 1 \u{2014} Boss");
    assert_eq!(state.size, Extent2D::new(1280, 720));
    assert_eq!(state.fullscreen, Fullscreen::Desktop);
    assert!(!state.bordered);
    assert!(App::inbox().is_empty());
}

#[test]
#[serial]
fn unknown_tag_is_dropped() {
    let (mut dispatcher, _platform, window) = setup();
    let message = unsafe { OwnedHostMessage::transfer(&RawHostMessage::with_tag(9999)) };
    assert_eq!(dispatcher.dispatch(window, message), Dispatched::Dropped);
    assert_eq!(dispatcher.state(), LoopState::Idle);
}

#[test]
#[serial]
fn action_on_unknown_window_is_not_fatal() {
    let (mut dispatcher, platform, window) = setup();
    let stray = WindowInstance(0xdead);
    assert_eq!(dispatcher.dispatch(stray, owned(HostMessage::SetBorderless(true))), Dispatched::Applied);
    assert!(platform.window(window).unwrap().bordered);
}

#[test]
#[serial]
fn extent_query_writes_the_slot_then_opens_the_barrier() {
    let (mut dispatcher, _platform, window) = setup();

    let mut slot = MaybeUninit::<Extent2D>::uninit();
    let barrier = Barrier::new();
    let binding = ResponseBinding {
        out: slot.as_mut_ptr().cast(),
        barrier: &barrier,
    };
    let request = owned(HostMessage::QueryViewportExtent(BindingPtr::from_binding(&binding)));

    assert_eq!(dispatcher.dispatch(window, request), Dispatched::Replied);
    assert!(barrier.is_open());
    assert_eq!(unsafe { slot.assume_init() }, Extent2D::new(800, 450));
}

#[test]
#[serial]
fn surface_request_reports_null_on_failure() {
    let (mut dispatcher, platform, window) = setup();

    for (instance, expect_null) in [(7u64, false), (0u64, true)] {
        let mut slot = MaybeUninit::<SurfaceHandle>::uninit();
        let barrier = Barrier::new();
        let binding = ResponseBinding {
            out: slot.as_mut_ptr().cast(),
            barrier: &barrier,
        };
        let request = owned(HostMessage::CreateSurface {
            instance,
            binding: BindingPtr::from_binding(&binding),
        });
        assert_eq!(dispatcher.dispatch(window, request), Dispatched::Replied);
        assert!(barrier.is_open());
        assert_eq!(unsafe { slot.assume_init() }.is_null(), expect_null);
    }
    assert_eq!(platform.window(window).unwrap().surfaces.len(), 1);
}

#[test]
#[serial]
fn correlated_request_without_binding_is_dropped() {
    let (mut dispatcher, _platform, window) = setup();
    let request = owned(HostMessage::QueryViewportExtent(BindingPtr::NULL));
    assert_eq!(dispatcher.dispatch(window, request), Dispatched::Dropped);
}

#[test]
#[serial]
fn resize_before_registration_carries_a_null_handle() {
    let (mut dispatcher, _platform, window) = setup();
    let handle = Backchannel::from_addr(0xfa15ca);

    dispatcher.handle_platform(NativeEvent::Resized {
        window,
        extent: Extent2D::new(1024, 576),
    });
    let first = App::inbox().try_recv().unwrap();
    assert!(first.backchannel.is_null());
    assert_eq!(first.event, WindowEvent::Resize(Extent2D::new(1024, 576)));

    assert_eq!(dispatcher.dispatch(window, owned(HostMessage::SetBackchannel(handle))), Dispatched::Stored);
    // A later, different handle does not replace the first one
    dispatcher.dispatch(window, owned(HostMessage::SetBackchannel(Backchannel::from_addr(1))));
    assert_eq!(dispatcher.backchannels().lookup(window), handle);

    dispatcher.handle_platform(NativeEvent::Resized {
        window,
        extent: Extent2D::new(640, 360),
    });
    let second = App::inbox().try_recv().unwrap();
    assert_eq!(second.backchannel, handle);
    assert_eq!(second.window, window);
}

#[test]
#[serial]
fn second_quit_is_ignored() {
    let (mut dispatcher, _platform, window) = setup();

    dispatcher.handle_platform(NativeEvent::Quit);
    assert_eq!(dispatcher.state(), LoopState::Shutdown);
    dispatcher.handle_platform(NativeEvent::Quit);
    assert_eq!(dispatcher.state(), LoopState::Shutdown);

    let quit = App::inbox().try_recv().unwrap();
    assert_eq!(quit.event, WindowEvent::Quit);
    assert_eq!(quit.window, window);
    assert!(App::inbox().try_recv().is_none());
}

#[test]
#[serial]
fn messages_are_still_served_during_shutdown() {
    let (mut dispatcher, platform, window) = setup();
    dispatcher.handle_platform(NativeEvent::Quit);
    while App::inbox().try_recv().is_some() {}

    let title = c"closing";
    assert_eq!(dispatcher.dispatch(window, owned(HostMessage::SetWindowTitle(title))), Dispatched::Applied);
    assert_eq!(platform.window(window).unwrap().title, "closing");
    assert_eq!(dispatcher.state(), LoopState::Shutdown);
}

fn flood_resizes(dispatcher: &mut Dispatcher<HeadlessPump, HeadlessPlatform>, window: WindowInstance) {
    let count = App::inbox().capacity() + 44;
    for i in 0..count as u32 {
        dispatcher.handle_platform(NativeEvent::Resized {
            window,
            extent: Extent2D::new(640 + i, 360),
        });
    }
}

fn drain_inbox() -> (usize, usize) {
    let (mut resizes, mut quits) = (0, 0);
    while let Some(notification) = App::inbox().try_recv() {
        match notification.event {
            WindowEvent::Quit => quits += 1,
            WindowEvent::Resize(_) => resizes += 1,
        }
    }
    (resizes, quits)
}

#[test]
#[serial]
fn quit_rejected_by_a_full_inbox_is_retried_on_the_next_pass() {
    let (mut dispatcher, _platform, window) = setup();

    flood_resizes(&mut dispatcher, window);
    dispatcher.handle_platform(NativeEvent::Quit);
    assert_eq!(dispatcher.state(), LoopState::Shutdown);
    assert_eq!(dispatcher.pending_quits(), 1);

    let (resizes, quits) = drain_inbox();
    assert_eq!(resizes, App::inbox().capacity());
    assert_eq!(quits, 0);

    // Nothing queued on the bridge; the loop pass alone retries the quit
    dispatcher.drain();
    assert_eq!(dispatcher.pending_quits(), 0);
    let quit = App::inbox().try_recv().unwrap();
    assert_eq!(quit.event, WindowEvent::Quit);
    assert_eq!(quit.window, window);
    assert!(App::inbox().try_recv().is_none());
}

#[test]
#[serial]
fn repeated_quit_delivers_a_pending_quit_once() {
    let (mut dispatcher, _platform, window) = setup();

    flood_resizes(&mut dispatcher, window);
    dispatcher.handle_platform(NativeEvent::Quit);
    drain_inbox();

    dispatcher.handle_platform(NativeEvent::Quit);
    dispatcher.handle_platform(NativeEvent::Quit);
    dispatcher.drain();
    assert_eq!(drain_inbox(), (0, 1));
    assert_eq!(dispatcher.pending_quits(), 0);
}
