// Interface of the platform's native event queue.

use crate::Protocol::{Extent2D, WindowInstance};
use std::ffi::c_void;

/// Generic user-event slot: one kind, one code, two opaque pointers.
#[derive(Copy, Clone)]
pub struct UserEvent {
    /// Registered custom event kind.
    pub kind: u32,
    /// Free-form code; the bridge stores the message tag here.
    pub code: u32,
    /// Payload pointer.
    pub data1: *mut c_void,
    /// Target pointer.
    pub data2: *mut c_void,
}

// The pump carries the pointers, it never dereferences them.
unsafe impl Send for UserEvent {}

pub enum NativeEvent {
    /// The platform asked the process to quit.
    Quit,
    /// A window changed size (user drag, window manager).
    Resized {
        window: WindowInstance,
        extent: Extent2D,
    },
    User(UserEvent),
}

/// Native event pump as seen by the bridge and the dispatch loop.
///
/// Pushing must be safe from any thread; polling happens on the host thread
/// only.
pub trait EventPump: Send + Sync {
    /// Reserve `count` consecutive custom event kinds.
    /// Returns the first one, or `None` when the pump has none left.
    fn register_events(&self, count: u32) -> Option<u32>;

    /// Enqueue an event. A full (or closed) queue hands the event back.
    fn push(&self, event: NativeEvent) -> Result<(), NativeEvent>;

    /// Dequeue the oldest event without blocking.
    fn poll(&self) -> Option<NativeEvent>;
}
