// Event queue bridge: carries host-owned messages through the native pump.
//
// A posted message becomes a user event of the bridge's registered kind:
// `data1` holds the heap message, `data2` the window it targets, `code` the
// tag. Ownership moves into the pump on a successful post and back out on
// poll; a failed post hands the message straight back to the caller.

use super::pump::{EventPump, NativeEvent, UserEvent};
use crate::Core::{OwnedHostMessage, WakeFence};
use crate::Host::HostError;
use crate::Protocol::WindowInstance;
use std::ptr::NonNull;
use std::sync::Arc;
use std::time::Duration;

/// Anything app messages can be posted to.
pub trait MessageSink: Send + Sync {
    /// Queue `message` for `window`. On failure the message is returned and
    /// the caller owns it again.
    fn post(&self, window: WindowInstance, message: OwnedHostMessage) -> Result<(), OwnedHostMessage>;
}

/// One drained item.
pub enum Delivery {
    /// An app message, now owned by the drainer.
    Message {
        window: WindowInstance,
        message: OwnedHostMessage,
    },
    /// A platform event that did not come from the app.
    Platform(NativeEvent),
}

pub struct EventBridge<P: EventPump> {
    pub(crate) pump: Arc<P>,
    pub(crate) kind: u32,
    pub(crate) fence: WakeFence,
}

impl<P: EventPump> EventBridge<P> {
    /// Register the bridge's custom event kind on `pump`.
    pub fn new(pump: Arc<P>) -> Result<Self, HostError> {
        let kind = pump.register_events(1).ok_or(HostError::EventRegistration)?;
        log::debug!("event bridge registered user event kind {kind:#06x}");
        Ok(Self {
            pump,
            kind,
            fence: WakeFence::new(),
        })
    }

    pub fn kind(&self) -> u32 {
        self.kind
    }

    pub fn pump(&self) -> &Arc<P> {
        &self.pump
    }

    /// Enqueue `message` for `window` and wake the host thread.
    pub fn post(&self, window: WindowInstance, message: OwnedHostMessage) -> Result<(), OwnedHostMessage> {
        let code = message.tag();
        let raw = message.into_raw();
        let event = NativeEvent::User(UserEvent {
            kind: self.kind,
            code,
            data1: raw.as_ptr().cast(),
            data2: window.as_ptr(),
        });

        match self.pump.push(event) {
            Ok(()) => {
                self.fence.signal();
                Ok(())
            }
            // SAFETY: the pump rejected the event, `raw` was never shared.
            Err(_) => Err(unsafe { OwnedHostMessage::from_raw(raw) }),
        }
    }

    /// Take the next item off the native queue without blocking.
    /// User events of other kinds are not ours to interpret and are skipped.
    pub fn poll(&self) -> Option<Delivery> {
        loop {
            match self.pump.poll()? {
                NativeEvent::User(event) if event.kind == self.kind => {
                    let Some(raw) = NonNull::new(event.data1.cast()) else {
                        log::warn!("bridge event without a message (code {:#06x})", event.code);
                        continue;
                    };
                    return Some(Delivery::Message {
                        window: WindowInstance::from_ptr(event.data2),
                        // SAFETY: only `post` creates events of our kind.
                        message: unsafe { OwnedHostMessage::from_raw(raw) },
                    });
                }
                NativeEvent::User(event) => {
                    log::debug!("skipping user event of foreign kind {:#06x}", event.kind);
                }
                other => return Some(Delivery::Platform(other)),
            }
        }
    }

    /// Wake epoch; read it before draining and pass it to `wait_for_post`.
    pub fn epoch(&self) -> u32 {
        self.fence.epoch()
    }

    /// Idle-wait until a post lands after `seen` or `timeout` elapses.
    pub fn wait_for_post(&self, seen: u32, timeout: Duration) -> bool {
        self.fence.wait(seen, timeout)
    }
}

impl<P: EventPump> MessageSink for EventBridge<P> {
    fn post(&self, window: WindowInstance, message: OwnedHostMessage) -> Result<(), OwnedHostMessage> {
        EventBridge::post(self, window, message)
    }
}

impl<P: EventPump> Drop for EventBridge<P> {
    fn drop(&mut self) {
        // Release messages nobody will dispatch any more
        let mut released = 0usize;
        while let Some(delivery) = self.poll() {
            if let Delivery::Message { .. } = delivery {
                released += 1;
            }
        }
        if released > 0 {
            log::debug!("event bridge released {released} undelivered messages");
        }
    }
}
