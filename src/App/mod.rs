// Module-side runtime: what an app cdylib links to talk to the host.

mod entry;
mod inbox;
mod messenger;

pub use inbox::{handle_app_message, inbox, required_instance_extensions, Inbox, Notification};
pub use messenger::{WindowMessenger, DEFAULT_REQUEST_PATIENCE};
