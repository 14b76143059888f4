use std::io;
use std::path::PathBuf;

/// Fatal host conditions. Each one ends the process with a diagnostic.
#[derive(thiserror::Error, Debug)]
pub enum HostError {
    #[error("Failed to initialize the event pump: {0}")]
    PumpInit(#[source] io::Error),
    #[error("Failed to create window: {0}")]
    WindowCreation(#[source] io::Error),
    #[error("Failed to register user event")]
    EventRegistration,
    #[error("Failed to load app module {}: {reason}", .path.display())]
    ModuleLoad { path: PathBuf, reason: String },
    #[error("Failed to load '{symbol}' from app module {}", .path.display())]
    MissingSymbol { symbol: String, path: PathBuf },
    #[error("Another host is already receiving app messages in this process")]
    SinkInUse,
    #[error("Failed to spawn the app thread: {0}")]
    AppThreadSpawn(#[source] io::Error),
    #[error("The app thread panicked")]
    AppThreadPanicked,
}
