use std::fmt;
use crate::Bridge::{EventBridge, EventPump, NativeEvent, RingBuffer, UserEvent};
use crate::Core::{AppModule, OwnedHostMessage, WakeFence};
use crate::ffi::EntryTable;
use crate::Protocol::{
    Backchannel, Barrier, BindingPtr, RawAppMessage, RawHostMessage, RawWindowEvent, ResponseBinding,
    WindowEvent,
};

/// Debug function for Backchannel
///
/// The handle is opaque, only its address is shown
pub fn debug_backchannel(handle: &Backchannel, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    if handle.is_null() {
        f.write_str("Backchannel(null)")
    } else {
        write!(f, "Backchannel(0x{:x})", handle.addr())
    }
}

/// Debug function for BindingPtr
///
/// Never reads through the pointer: the binding may belong to another thread's frame
pub fn debug_binding_ptr(binding: &BindingPtr, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "BindingPtr({:p})", binding.0)
}

pub fn debug_response_binding(binding: &ResponseBinding, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("ResponseBinding")
        .field("out", &format_args!("{:p}", binding.out))
        .field("barrier", &format_args!("{:p}", binding.barrier))
        .finish()
}

pub fn debug_barrier(barrier: &Barrier, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("Barrier").field("open", &barrier.is_open()).finish()
}

/// Debug function for RawHostMessage
///
/// Only the tag: the payload arm may hold a pointer into app memory
pub fn debug_raw_host_message(message: &RawHostMessage, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("RawHostMessage")
        .field("tag", &format_args!("{:#06x}", message.tag))
        .finish_non_exhaustive()
}

pub fn debug_raw_app_message(message: &RawAppMessage, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("RawAppMessage")
        .field("tag", &format_args!("{:#06x}", message.tag))
        .finish_non_exhaustive()
}

pub fn debug_raw_window_event(event: &RawWindowEvent, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match WindowEvent::decode(event) {
        Ok(decoded) => f.debug_tuple("RawWindowEvent").field(&decoded).finish(),
        Err(unknown) => f.debug_tuple("RawWindowEvent").field(&unknown).finish(),
    }
}

/// Debug function for OwnedHostMessage
///
/// Shows:
/// - Allocation address
/// - Decoded message, or the unknown tag
pub fn debug_owned_host_message(message: &OwnedHostMessage, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let mut out = f.debug_struct("OwnedHostMessage");
    out.field("at", &format_args!("{:p}", message.raw() as *const RawHostMessage));
    match message.view() {
        Ok(view) => out.field("message", &view),
        Err(unknown) => out.field("message", &unknown),
    };
    out.finish()
}

pub fn debug_wake_fence(fence: &WakeFence, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("WakeFence").field("epoch", &fence.epoch()).finish()
}

/// Debug function for RingBuffer
///
/// Safely displays occupancy without touching the slots
pub fn debug_ring_buffer<T>(ring: &RingBuffer<T>, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("RingBuffer")
        .field("capacity", &ring.capacity())
        .field("len", &ring.len())
        .finish_non_exhaustive()
}

pub fn debug_event_bridge<P: EventPump>(bridge: &EventBridge<P>, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("EventBridge")
        .field("kind", &format_args!("{:#06x}", bridge.kind()))
        .field("epoch", &bridge.epoch())
        .finish_non_exhaustive()
}

pub fn debug_user_event(event: &UserEvent, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("UserEvent")
        .field("kind", &format_args!("{:#06x}", event.kind))
        .field("code", &format_args!("{:#06x}", event.code))
        .field("data1", &format_args!("{:p}", event.data1))
        .field("data2", &format_args!("{:p}", event.data2))
        .finish()
}

pub fn debug_native_event(event: &NativeEvent, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match event {
        NativeEvent::Quit => f.write_str("Quit"),
        NativeEvent::Resized { window, extent } => f
            .debug_struct("Resized")
            .field("window", window)
            .field("extent", extent)
            .finish(),
        NativeEvent::User(user) => f.debug_tuple("User").field(user).finish(),
    }
}

/// Debug function for EntryTable
///
/// Function addresses only
pub fn debug_entry_table(table: &EntryTable, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let (run_app, message_app) = table.addresses();
    f.debug_struct("EntryTable")
        .field("run_app", &format_args!("0x{:x}", run_app))
        .field("message_app", &format_args!("0x{:x}", message_app))
        .finish()
}

pub fn debug_app_module(module: &AppModule, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("AppModule")
        .field("path", &module.path())
        .field("entries", &module.entries())
        .finish_non_exhaustive()
}
