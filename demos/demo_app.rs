// Example app module. Build with `cargo build --example demo_app` and run
// `faisca-host target/debug/examples/libdemo_app.so`.

use faisca_bridge::App::WindowMessenger;
use faisca_bridge::Protocol::{Backchannel, WindowEvent};
use std::ffi::c_void;
use std::time::Duration;

static DEMO_CHANNEL: u8 = 0;

fn run(messenger: WindowMessenger) {
    let _ = env_logger::try_init();

    let extensions = messenger.required_instance_extensions();
    log::info!("host requires {extensions:?}");

    messenger.set_title("Faisca Demo");
    let channel = Backchannel(&DEMO_CHANNEL as *const u8 as *mut c_void);
    messenger.register_backchannel(channel);

    match messenger.query_viewport_extent() {
        Some(extent) => log::info!("viewport is {}x{}", extent.width, extent.height),
        None => log::warn!("viewport query could not be posted"),
    }
    match messenger.create_surface(1) {
        Some(surface) => log::info!("surface {:#x}", surface.0),
        None => log::warn!("no surface"),
    }

    let mut frames = 0u64;
    loop {
        match messenger.recv_timeout(Duration::from_millis(16)) {
            Some(notification) => match notification.event {
                WindowEvent::Quit => break,
                WindowEvent::Resize(extent) => {
                    if notification.backchannel != channel {
                        log::warn!("resize routed without our backchannel");
                    }
                    log::info!("resized to {}x{}", extent.width, extent.height);
                }
            },
            None => frames += 1,
        }
    }
    log::info!("quit after {frames} idle frames");
}

faisca_bridge::app_entry!(run);
