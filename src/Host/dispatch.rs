// Host-side dispatch loop.
//
// Idle -> Waiting(timeout) -> Draining -> Idle, with Shutdown as the terminal
// state once the platform asked to quit. Every drained message is consumed by
// exactly one `dispatch` and released before it returns.

use super::backchannel::Backchannels;
use super::platform::Platform;
use crate::Bridge::{Delivery, EventBridge, EventPump, NativeEvent};
use crate::Core::OwnedHostMessage;
use crate::ffi::EntryTable;
use crate::Protocol::{AppMessage, BindingPtr, HostMessage, UnknownTag, WindowEvent, WindowInstance};
use std::io;
use std::sync::Arc;
use std::time::Duration;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum LoopState {
    Idle,
    Waiting,
    Draining,
    Shutdown,
}

/// What `dispatch` did with a message.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Dispatched {
    /// Direct platform action, no response.
    Applied,
    /// Correlated request: result written and completion sent.
    Replied,
    /// Backchannel stored.
    Stored,
    /// Unknown tag or unusable request; logged and released.
    Dropped,
}

pub struct Dispatcher<P: EventPump, W: Platform> {
    bridge: Arc<EventBridge<P>>,
    platform: W,
    entries: EntryTable,
    backchannels: Backchannels,
    windows: Vec<WindowInstance>,
    idle_timeout: Duration,
    state: LoopState,
    /// Windows whose quit notification the app has not accepted yet.
    pending_quit: Vec<WindowInstance>,
}

impl<P: EventPump, W: Platform> Dispatcher<P, W> {
    pub fn new(
        bridge: Arc<EventBridge<P>>,
        platform: W,
        entries: EntryTable,
        windows: Vec<WindowInstance>,
        idle_timeout: Duration,
    ) -> Self {
        Self {
            bridge,
            platform,
            entries,
            backchannels: Backchannels::new(),
            windows,
            idle_timeout,
            state: LoopState::Idle,
            pending_quit: Vec::new(),
        }
    }

    pub fn state(&self) -> LoopState {
        self.state
    }

    pub fn backchannels(&self) -> &Backchannels {
        &self.backchannels
    }

    pub fn platform(&self) -> &W {
        &self.platform
    }

    pub fn into_platform(self) -> W {
        self.platform
    }

    /// Act on one app message and release it.
    pub fn dispatch(&mut self, window: WindowInstance, message: OwnedHostMessage) -> Dispatched {
        log::debug!("dispatch {:#06x} for window {:#x}", message.tag(), window.0);

        let outcome = match message.view() {
            Ok(HostMessage::SetWindowSize(size)) => {
                let result = self.platform.set_window_size(window, size);
                applied(window, "set window size", result)
            }
            Ok(HostMessage::SetFullscreen(mode)) => {
                let result = self.platform.set_fullscreen(window, mode);
                applied(window, "set fullscreen", result)
            }
            Ok(HostMessage::SetBorderless(borderless)) => {
                let result = self.platform.set_bordered(window, !borderless);
                applied(window, "set borderless", result)
            }
            Ok(HostMessage::SetWindowTitle(title)) => {
                let result = self.platform.set_title(window, title);
                applied(window, "set title", result)
            }
            Ok(HostMessage::CreateSurface { instance, binding }) => {
                let surface = self.platform.create_surface(window, instance);
                if surface.is_null() {
                    log::error!("surface creation failed for window {:#x}", window.0);
                }
                self.reply(window, binding, surface)
            }
            Ok(HostMessage::QueryViewportExtent(binding)) => {
                let extent = self.platform.drawable_size(window).unwrap_or_else(|| {
                    log::warn!("extent query for unknown window {:#x}", window.0);
                    Default::default()
                });
                self.reply(window, binding, extent)
            }
            Ok(HostMessage::SetBackchannel(handle)) => {
                self.backchannels.register(window, handle);
                Dispatched::Stored
            }
            Err(UnknownTag(tag)) => {
                log::warn!("dropping message with unknown tag {tag:#06x}");
                Dispatched::Dropped
            }
        };

        drop(message);
        outcome
    }

    /// Second phase of a correlated request: write the result, then tell the
    /// app's inbound path to open the barrier.
    fn reply<T>(&mut self, window: WindowInstance, binding: BindingPtr, value: T) -> Dispatched {
        if binding.is_null() {
            log::warn!("correlated request without a binding, nothing to reply to");
            return Dispatched::Dropped;
        }
        // SAFETY: the requester keeps the binding alive until the response
        // ready message below opens its barrier; the tag fixed `T`.
        unsafe { binding.fulfil(value) };
        if !self.entries.message_app(window, &AppMessage::ResponseReady(binding)) {
            log::error!("app rejected response ready for window {:#x}", window.0);
        }
        Dispatched::Replied
    }

    /// Translate a platform event into notifications for the app.
    pub fn handle_platform(&mut self, event: NativeEvent) {
        match event {
            NativeEvent::Quit => {
                if self.state == LoopState::Shutdown {
                    log::debug!("quit already in progress");
                    self.deliver_pending_quits();
                    return;
                }
                log::info!("platform quit, shutting down");
                self.state = LoopState::Shutdown;
                self.pending_quit = self.windows.clone();
                self.deliver_pending_quits();
            }
            NativeEvent::Resized { window, extent } => {
                self.notify(window, WindowEvent::Resize(extent));
            }
            NativeEvent::User(event) => {
                log::debug!("ignoring user event of kind {:#06x}", event.kind);
            }
        }
    }

    fn notify(&mut self, window: WindowInstance, event: WindowEvent) -> bool {
        let backchannel = self.backchannels.lookup(window);
        let message = AppMessage::WindowEvent { backchannel, event };
        let accepted = self.entries.message_app(window, &message);
        if !accepted {
            log::warn!("app rejected {event:?} for window {:#x}", window.0);
        }
        accepted
    }

    /// Quit must reach the app or its thread never returns, so a rejected
    /// quit stays pending and is offered again on every loop pass.
    fn deliver_pending_quits(&mut self) {
        if self.pending_quit.is_empty() {
            return;
        }
        let windows = std::mem::take(&mut self.pending_quit);
        for window in windows {
            if !self.notify(window, WindowEvent::Quit) {
                self.pending_quit.push(window);
            }
        }
    }

    /// Number of windows still owed a quit notification.
    pub fn pending_quits(&self) -> usize {
        self.pending_quit.len()
    }

    /// Dispatch everything currently queued. Returns the number of items.
    pub fn drain(&mut self) -> usize {
        if self.state != LoopState::Shutdown {
            self.state = LoopState::Draining;
        }
        self.deliver_pending_quits();
        let mut drained = 0;
        while let Some(delivery) = self.bridge.poll() {
            match delivery {
                Delivery::Message { window, message } => {
                    self.dispatch(window, message);
                }
                Delivery::Platform(event) => self.handle_platform(event),
            }
            drained += 1;
        }
        if self.state == LoopState::Draining {
            self.state = LoopState::Idle;
        }
        drained
    }

    /// Idle-wait for the next post, bounded by the idle timeout.
    pub fn wait(&mut self, seen: u32) -> bool {
        if self.state != LoopState::Shutdown {
            self.state = LoopState::Waiting;
        }
        let woken = self.bridge.wait_for_post(seen, self.idle_timeout);
        if self.state == LoopState::Waiting {
            self.state = LoopState::Idle;
        }
        woken
    }

    /// Run until shutdown has been requested and `app_finished` reports the
    /// app thread is done. Messages keep being served during shutdown so a
    /// request in flight when quit arrived still completes.
    pub fn run_until(&mut self, app_finished: impl Fn() -> bool) {
        loop {
            let seen = self.bridge.epoch();
            self.drain();

            if app_finished() {
                if self.state != LoopState::Shutdown {
                    log::info!("app thread returned, shutting down");
                    self.state = LoopState::Shutdown;
                }
                break;
            }
            self.wait(seen);
        }
        self.drain();
    }
}

fn applied(window: WindowInstance, action: &str, result: io::Result<()>) -> Dispatched {
    if let Err(err) = result {
        log::error!("{action} failed for window {:#x}: {err}", window.0);
    }
    Dispatched::Applied
}
