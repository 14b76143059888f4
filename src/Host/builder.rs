use super::error::HostError;
use super::headless::{HeadlessPlatform, HeadlessPump};
use super::host::Host;
use super::platform::Platform;
use crate::Bridge::{EventBridge, EventPump};
use crate::Core::AppModule;
use crate::ffi::EntryTable;
use crate::Protocol::Extent2D;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

/// Host settings. Mapped from the command line by `faisca-host`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HostConfig {
    pub title: String,
    pub window_size: Extent2D,
    /// Upper bound on an idle wait; a missed wake is recovered after this.
    pub idle_timeout: Duration,
    /// Native event queue slots (rounded up to a power of two).
    pub queue_capacity: usize,
}

impl Default for HostConfig {
    fn default() -> Self {
        Self {
            title: "Faisca Window".to_string(),
            window_size: Extent2D::new(800, 450),
            idle_timeout: Duration::from_millis(8),
            queue_capacity: 1024,
        }
    }
}

/// Where the app's entry points come from.
#[derive(Clone, Debug)]
pub enum AppSource {
    /// A dynamic module exporting `faisca_run_app` / `faisca_message_app`.
    Module(PathBuf),
    /// Entry points linked into the current process.
    Entries(EntryTable),
}

#[derive(Default)]
pub struct HostBuilder {
    config: HostConfig,
}

impl HostBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_config(config: HostConfig) -> Self {
        Self { config }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.config.title = title.into();
        self
    }

    pub fn with_window_size(mut self, width: u32, height: u32) -> Self {
        self.config.window_size = Extent2D::new(width, height);
        self
    }

    pub fn with_idle_timeout(mut self, timeout: Duration) -> Self {
        self.config.idle_timeout = timeout;
        self
    }

    pub fn with_queue_capacity(mut self, capacity: usize) -> Self {
        self.config.queue_capacity = capacity;
        self
    }

    pub fn config(&self) -> &HostConfig {
        &self.config
    }

    /// Host on the in-process pump and window table.
    pub fn build_headless(self, app: AppSource) -> Result<Host<HeadlessPump, HeadlessPlatform>, HostError> {
        let capacity = self.config.queue_capacity.max(2).next_power_of_two();
        let pump = HeadlessPump::new(capacity).map_err(HostError::PumpInit)?;
        self.build_with(pump, HeadlessPlatform::new(), app)
    }

    /// Startup order: window, event registration, module. A failure after
    /// the window exists destroys it before returning.
    pub fn build_with<P: EventPump + 'static, W: Platform>(
        self,
        pump: P,
        mut platform: W,
        app: AppSource,
    ) -> Result<Host<P, W>, HostError> {
        let config = self.config;
        let window = platform
            .create_window(&config.title, config.window_size)
            .map_err(HostError::WindowCreation)?;

        let bridge = match EventBridge::new(Arc::new(pump)) {
            Ok(bridge) => Arc::new(bridge),
            Err(err) => {
                platform.destroy_window(window);
                return Err(err);
            }
        };

        let (module, entries) = match app {
            AppSource::Module(path) => match AppModule::load(&path) {
                Ok(module) => {
                    let entries = module.entries();
                    (Some(module), entries)
                }
                Err(err) => {
                    platform.destroy_window(window);
                    return Err(err);
                }
            },
            AppSource::Entries(entries) => (None, entries),
        };

        log::info!(
            "host ready: window {:#x} \"{}\" {}x{}",
            window.0,
            config.title,
            config.window_size.width,
            config.window_size.height
        );
        Ok(Host::new(config, bridge, platform, window, entries, module))
    }
}
