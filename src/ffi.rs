// C ABI between the host executable and the app module.
//
// Only the types in `Protocol` and the function pointers below ever cross
// the boundary. The module exports two entry points; the host passes the app
// a third function (`message_window`) to talk back.

use crate::Bridge::MessageSink;
use crate::Core::OwnedHostMessage;
use crate::Host::HostError;
use crate::Protocol::{AppMessage, RawAppMessage, RawHostMessage, WindowInstance};
use lazy_static::lazy_static;
use parking_lot::RwLock;
use std::ffi::CStr;
use std::sync::Arc;

// Return codes
pub const FAISCA_SUCCESS: u32 = 1;
pub const FAISCA_FAILURE: u32 = 0;

/// Exported by the module: start the app's run loop. Returns when the app
/// is done; the host calls it on the dedicated app thread.
pub const RUN_APP_SYMBOL: &CStr = c"faisca_run_app";
/// Exported by the module: accept a host -> app message. Called on the host
/// thread and must not block.
pub const MESSAGE_APP_SYMBOL: &CStr = c"faisca_message_app";

/// Host function handed to the app for app -> host messages.
pub type MessageWindowFn = unsafe extern "C" fn(WindowInstance, *const RawHostMessage) -> u32;
pub type RunAppFn = unsafe extern "C" fn(WindowInstance, MessageWindowFn);
pub type MessageAppFn = unsafe extern "C" fn(WindowInstance, *const RawAppMessage) -> u32;

/// The module's entry points, resolved once and only called through here.
#[derive(Copy, Clone)]
pub struct EntryTable {
    run_app: RunAppFn,
    message_app: MessageAppFn,
}

impl EntryTable {
    pub fn new(run_app: RunAppFn, message_app: MessageAppFn) -> Self {
        Self {
            run_app,
            message_app,
        }
    }

    /// Entry point addresses, `(run_app, message_app)`.
    pub fn addresses(&self) -> (usize, usize) {
        (self.run_app as usize, self.message_app as usize)
    }

    /// Run the app loop on the current thread.
    ///
    /// # Safety
    /// The module behind the table must still be loaded.
    pub unsafe fn run_app(&self, window: WindowInstance, message_window: MessageWindowFn) {
        (self.run_app)(window, message_window)
    }

    /// Deliver a host -> app message. The wire form, and anything it points
    /// to, only lives for the duration of the call.
    pub fn message_app(&self, window: WindowInstance, message: &AppMessage<'_>) -> bool {
        let status = message.with_raw(|raw| unsafe { (self.message_app)(window, raw) });
        status == FAISCA_SUCCESS
    }
}

impl std::fmt::Debug for EntryTable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        crate::Debug::StructDebug::debug_entry_table(self, f)
    }
}

lazy_static! {
    /// Where `message_window` posts to. Installed by the running host.
    static ref HOST_SINK: RwLock<Option<Arc<dyn MessageSink>>> = RwLock::new(None);
}

/// Keeps a host sink installed for `message_window`; uninstalls on drop.
pub struct SinkGuard {
    _private: (),
}

impl SinkGuard {
    /// Only one host can receive app messages per process.
    pub fn install(sink: Arc<dyn MessageSink>) -> Result<Self, HostError> {
        let mut slot = HOST_SINK.write();
        if slot.is_some() {
            return Err(HostError::SinkInUse);
        }
        *slot = Some(sink);
        Ok(Self { _private: () })
    }
}

impl Drop for SinkGuard {
    fn drop(&mut self) {
        HOST_SINK.write().take();
    }
}

/// App -> host entry: copy the message into host-owned memory and post it
/// for the host thread. Returns `FAISCA_SUCCESS` once the message is queued.
/// On failure the copy is released here and the app's original is untouched.
///
/// # Safety
/// `message` must be null or point to a valid `RawHostMessage` for the
/// duration of the call.
pub unsafe extern "C" fn message_window(window: WindowInstance, message: *const RawHostMessage) -> u32 {
    if message.is_null() {
        return FAISCA_FAILURE;
    }

    // Clone the Arc so the lock is not held across the post
    let sink = HOST_SINK.read().clone();
    let Some(sink) = sink else {
        log::warn!("no host is accepting messages, dropping {:#06x}", (*message).tag);
        return FAISCA_FAILURE;
    };

    let owned = OwnedHostMessage::transfer(&*message);
    match sink.post(window, owned) {
        Ok(()) => FAISCA_SUCCESS,
        Err(unsent) => {
            log::warn!("failed to post host message {:#06x}", unsent.tag());
            FAISCA_FAILURE
        }
    }
}
