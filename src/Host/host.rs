use super::app_thread::AppThread;
use super::builder::HostConfig;
use super::dispatch::Dispatcher;
use super::error::HostError;
use super::platform::Platform;
use crate::Bridge::{EventBridge, EventPump, MessageSink};
use crate::Core::AppModule;
use crate::ffi::{EntryTable, SinkGuard};
use crate::Protocol::{AppMessage, ExtensionNames, WindowInstance};
use std::os::raw::c_char;
use std::sync::Arc;

/// A created window with its bridge and app, ready to run.
pub struct Host<P: EventPump + 'static, W: Platform> {
    config: HostConfig,
    bridge: Arc<EventBridge<P>>,
    platform: W,
    window: WindowInstance,
    entries: EntryTable,
    // Dropped last: the entry table points into it.
    module: Option<AppModule>,
}

impl<P: EventPump + 'static, W: Platform> Host<P, W> {
    pub(crate) fn new(
        config: HostConfig,
        bridge: Arc<EventBridge<P>>,
        platform: W,
        window: WindowInstance,
        entries: EntryTable,
        module: Option<AppModule>,
    ) -> Self {
        Self {
            config,
            bridge,
            platform,
            window,
            entries,
            module,
        }
    }

    pub fn window(&self) -> WindowInstance {
        self.window
    }

    pub fn bridge(&self) -> &Arc<EventBridge<P>> {
        &self.bridge
    }

    pub fn config(&self) -> &HostConfig {
        &self.config
    }

    /// Run the app to completion. Returns the platform once the app thread
    /// has been joined and the window released.
    pub fn run(self) -> Result<W, HostError> {
        let Host {
            config,
            bridge,
            mut platform,
            window,
            entries,
            module,
        } = self;

        let sink: Arc<dyn MessageSink> = bridge.clone();
        let _sink = match SinkGuard::install(sink) {
            Ok(guard) => guard,
            Err(err) => {
                platform.destroy_window(window);
                return Err(err);
            }
        };

        send_required_extensions(&platform, &entries, window);

        let mut app = match AppThread::spawn(entries, window) {
            Ok(app) => app,
            Err(err) => {
                platform.destroy_window(window);
                return Err(err);
            }
        };
        let mut dispatcher = Dispatcher::new(bridge, platform, entries, vec![window], config.idle_timeout);
        dispatcher.run_until(|| app.is_finished());
        let joined = app.join();

        let mut platform = dispatcher.into_platform();
        platform.destroy_window(window);
        log::info!("window {:#x} released", window.0);

        drop(module);
        joined.map(|()| platform)
    }
}

/// Deliver the extension names once, before the app thread exists. The
/// pointer array only lives for this call.
fn send_required_extensions<W: Platform>(platform: &W, entries: &EntryTable, window: WindowInstance) {
    let names = match platform.required_instance_extensions(window) {
        Ok(names) => names,
        Err(err) => {
            log::error!("querying instance extensions failed: {err}");
            Vec::new()
        }
    };
    let pointers: Vec<*const c_char> = names.iter().map(|name| name.as_ptr()).collect();
    // SAFETY: `pointers` and `names` outlive the call below.
    let list = unsafe { ExtensionNames::from_raw_parts(pointers.as_ptr(), pointers.len()) };
    log::debug!("sending {} required instance extensions", list.len());
    if !entries.message_app(window, &AppMessage::RequiredInstanceExtensions(list)) {
        log::warn!("app rejected the required instance extension list");
    }
}
