use crate::Protocol::{Backchannel, WindowInstance};
use std::collections::HashMap;

/// Window -> backchannel table kept by the host thread.
///
/// Created empty with the dispatcher; every window maps to
/// `Backchannel::NULL` until the app registers a handle for it. A handle is
/// set once and then stays stable for the window's lifetime.
#[derive(Debug, Default)]
pub struct Backchannels {
    table: HashMap<WindowInstance, Backchannel>,
}

impl Backchannels {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store the app's handle for `window`. A second, different handle is
    /// ignored and `false` is returned.
    pub fn register(&mut self, window: WindowInstance, handle: Backchannel) -> bool {
        match self.table.get(&window) {
            Some(existing) if *existing == handle => true,
            Some(existing) => {
                log::warn!(
                    "window {:#x} already has backchannel {:#x}, ignoring {:#x}",
                    window.0,
                    existing.addr(),
                    handle.addr()
                );
                false
            }
            None => {
                log::debug!("window {:#x} backchannel set to {:#x}", window.0, handle.addr());
                self.table.insert(window, handle);
                true
            }
        }
    }

    pub fn lookup(&self, window: WindowInstance) -> Backchannel {
        self.table.get(&window).copied().unwrap_or(Backchannel::NULL)
    }
}
