// Host executable: loads an app module and runs it against a headless window.
//
//     faisca-host path/to/libapp.so --width 1280 --height 720

use clap::Parser;
use faisca_bridge::Bridge::{EventPump, NativeEvent};
use faisca_bridge::Host::{AppSource, HostBuilder, HostConfig, HostError};
use faisca_bridge::Protocol::Extent2D;
use std::path::PathBuf;
use std::process;
use std::time::Duration;

#[derive(Parser, Debug)]
#[command(name = "faisca-host", version, about = "Run a faisca app module")]
struct Args {
    /// Path to the app module (shared library)
    module: PathBuf,

    #[arg(long, default_value_t = 800)]
    width: u32,

    #[arg(long, default_value_t = 450)]
    height: u32,

    #[arg(long, default_value = "Faisca Window")]
    title: String,

    /// Longest idle wait of the dispatch loop
    #[arg(long, default_value_t = 8)]
    idle_timeout_ms: u64,
}

fn run(args: Args) -> Result<(), HostError> {
    let config = HostConfig {
        title: args.title,
        window_size: Extent2D::new(args.width, args.height),
        idle_timeout: Duration::from_millis(args.idle_timeout_ms),
        ..HostConfig::default()
    };
    let host = HostBuilder::from_config(config).build_headless(AppSource::Module(args.module))?;

    let pump = host.bridge().pump().clone();
    if let Err(err) = ctrlc::set_handler(move || {
        if pump.push(NativeEvent::Quit).is_err() {
            log::warn!("event queue full, quit request lost");
        }
    }) {
        log::warn!("could not install the interrupt handler: {err}");
    }

    host.run()?;
    Ok(())
}

fn main() {
    env_logger::init();
    let args = Args::parse();

    if let Err(err) = run(args) {
        eprintln!("faisca-host: {err}");
        process::exit(1);
    }
}
