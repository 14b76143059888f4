// App-facing inbound path. Runs on the host thread inside
// `faisca_message_app`, so nothing here may block.

use crate::Bridge::RingBuffer;
use crate::Core::WakeFence;
use crate::ffi::{FAISCA_FAILURE, FAISCA_SUCCESS};
use crate::Protocol::{AppMessage, Backchannel, RawAppMessage, UnknownTag, WindowEvent, WindowInstance};
use lazy_static::lazy_static;
use parking_lot::RwLock;
use std::ffi::CString;
use std::time::{Duration, Instant};

/// A host notification as seen by the app thread.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Notification {
    pub window: WindowInstance,
    /// The handle the app registered for `window`, or null before that.
    pub backchannel: Backchannel,
    pub event: WindowEvent,
}

/// Queue of notifications waiting for the app thread.
pub struct Inbox {
    queue: RingBuffer<Notification>,
    fence: WakeFence,
}

impl Inbox {
    pub fn with_capacity(min_capacity: usize) -> Self {
        Self {
            queue: RingBuffer::with_min_capacity(min_capacity),
            fence: WakeFence::new(),
        }
    }

    pub fn push(&self, notification: Notification) -> bool {
        match self.queue.enqueue(notification) {
            Ok(_) => {
                self.fence.signal();
                true
            }
            Err(lost) => {
                log::warn!("app inbox full, dropping {:?}", lost.event);
                false
            }
        }
    }

    pub fn try_recv(&self) -> Option<Notification> {
        self.queue.dequeue()
    }

    /// Wait up to `timeout` for the next notification.
    pub fn recv_timeout(&self, timeout: Duration) -> Option<Notification> {
        let deadline = Instant::now() + timeout;
        loop {
            let seen = self.fence.epoch();
            if let Some(notification) = self.queue.dequeue() {
                return Some(notification);
            }
            let remaining = deadline.saturating_duration_since(Instant::now());
            if remaining.is_zero() {
                return None;
            }
            self.fence.wait(seen, remaining);
        }
    }

    pub fn capacity(&self) -> usize {
        self.queue.capacity()
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }
}

lazy_static! {
    static ref INBOX: Inbox = Inbox::with_capacity(256);
    static ref REQUIRED_EXTENSIONS: RwLock<Vec<CString>> = RwLock::new(Vec::new());
}

/// The process inbox `handle_app_message` delivers into.
pub fn inbox() -> &'static Inbox {
    &INBOX
}

/// Extension names the host sent before starting the app thread.
pub fn required_instance_extensions() -> Vec<CString> {
    REQUIRED_EXTENSIONS.read().clone()
}

/// Body of the module's `faisca_message_app` export.
///
/// # Safety
/// `message` must be null or point to a valid `RawAppMessage` whose payload
/// pointers are valid for the duration of the call.
pub unsafe fn handle_app_message(window: WindowInstance, message: *const RawAppMessage) -> u32 {
    if message.is_null() {
        return FAISCA_FAILURE;
    }

    match AppMessage::decode(&*message) {
        Ok(AppMessage::RequiredInstanceExtensions(names)) => {
            // The list is borrowed for this call only
            let owned = names.to_owned_names();
            log::debug!("host requires {} instance extensions", owned.len());
            *REQUIRED_EXTENSIONS.write() = owned;
            FAISCA_SUCCESS
        }
        Ok(AppMessage::ResponseReady(binding)) => {
            if binding.is_null() {
                log::warn!("response ready without a binding");
                return FAISCA_FAILURE;
            }
            binding.signal();
            FAISCA_SUCCESS
        }
        Ok(AppMessage::WindowEvent { backchannel, event }) => {
            let delivered = INBOX.push(Notification {
                window,
                backchannel,
                event,
            });
            if delivered {
                FAISCA_SUCCESS
            } else {
                FAISCA_FAILURE
            }
        }
        Err(UnknownTag(tag)) => {
            log::warn!("app dropping message with unknown tag {tag:#06x}");
            FAISCA_FAILURE
        }
    }
}
