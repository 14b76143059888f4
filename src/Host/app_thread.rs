use super::error::HostError;
use crate::ffi::{self, EntryTable};
use crate::Protocol::WindowInstance;
use std::thread::{self, JoinHandle};

/// The dedicated thread running the app's `run_app` entry point.
pub struct AppThread {
    handle: Option<JoinHandle<()>>,
}

impl AppThread {
    pub fn spawn(entries: EntryTable, window: WindowInstance) -> Result<Self, HostError> {
        let handle = thread::Builder::new()
            .name("faisca-app".into())
            .spawn(move || {
                log::debug!("app thread started for window {:#x}", window.0);
                // SAFETY: the host keeps the module loaded until after join.
                unsafe { entries.run_app(window, ffi::message_window) };
                log::debug!("app thread returned");
            })
            .map_err(HostError::AppThreadSpawn)?;
        Ok(Self {
            handle: Some(handle),
        })
    }

    pub fn is_finished(&self) -> bool {
        self.handle.as_ref().map_or(true, |handle| handle.is_finished())
    }

    /// Wait for the app to return. Only the first call joins.
    pub fn join(&mut self) -> Result<(), HostError> {
        match self.handle.take() {
            Some(handle) => handle.join().map_err(|_| HostError::AppThreadPanicked),
            None => {
                log::debug!("app thread already joined");
                Ok(())
            }
        }
    }

    pub fn is_joined(&self) -> bool {
        self.handle.is_none()
    }
}

impl Drop for AppThread {
    fn drop(&mut self) {
        if self.handle.is_some() {
            if let Err(err) = self.join() {
                log::error!("{err}");
            }
        }
    }
}
