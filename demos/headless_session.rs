// Runs a host and an app linked into the same process on the headless
// platform, then drives it with a resize and a quit.

use faisca_bridge::App::WindowMessenger;
use faisca_bridge::Bridge::{EventPump, NativeEvent};
use faisca_bridge::ffi::EntryTable;
use faisca_bridge::Host::{AppSource, HeadlessPlatform, HeadlessPump, HostBuilder};
use faisca_bridge::Protocol::{Backchannel, Extent2D, Fullscreen, WindowEvent};
use std::thread;
use std::time::Duration;

fn run(messenger: WindowMessenger) {
    messenger.set_title("Level 1 \u{2014} Boss");
    messenger.set_fullscreen(Fullscreen::Desktop);
    messenger.register_backchannel(Backchannel::from_addr(0xfa15ca));

    if let Some(extent) = messenger.query_viewport_extent() {
        log::info!("app sees a {}x{} viewport", extent.width, extent.height);
    }

    while let Some(notification) = messenger.recv_timeout(Duration::from_secs(5)) {
        log::info!("app got {:?} via {:?}", notification.event, notification.backchannel);
        if notification.event == WindowEvent::Quit {
            return;
        }
    }
    log::warn!("no quit within 5s, returning anyway");
}

faisca_bridge::app_entry!(run);

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let platform = HeadlessPlatform::new().with_pixel_scale(2);
    let host = HostBuilder::new().with_window_size(640, 360).build_with(
        HeadlessPump::new(256)?,
        platform.clone(),
        AppSource::Entries(EntryTable::new(faisca_run_app, faisca_message_app)),
    )?;

    let window = host.window();
    let pump = host.bridge().pump().clone();
    let observer = platform.clone();
    let driver = thread::spawn(move || {
        thread::sleep(Duration::from_millis(50));
        if let Some(event) = observer.user_resize(window, Extent2D::new(1024, 576)) {
            let _ = pump.push(event);
        }
        thread::sleep(Duration::from_millis(50));
        if let Some(state) = observer.window(window) {
            log::info!("window state before quit: {state:?}");
        }
        let _ = pump.push(NativeEvent::Quit);
    });

    let platform = host.run()?;
    let _ = driver.join();
    println!(
        "session over: {} windows left, window destroyed {} time(s)",
        platform.window_count(),
        platform.destroy_count(window)
    );
    Ok(())
}
