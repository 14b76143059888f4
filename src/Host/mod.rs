mod app_thread;
mod backchannel;
mod builder;
mod dispatch;
mod error;
pub mod headless;
mod host;
mod platform;

pub use app_thread::AppThread;
pub use backchannel::Backchannels;
pub use builder::{AppSource, HostBuilder, HostConfig};
pub use dispatch::{Dispatched, Dispatcher, LoopState};
pub use error::HostError;
pub use headless::{HeadlessPlatform, HeadlessPump, HeadlessWindow};
pub use host::Host;
pub use platform::Platform;
