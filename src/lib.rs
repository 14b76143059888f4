// Module naming follows project convention (capitalised subsystem directories)
#[allow(non_snake_case)]
pub mod Protocol {
    pub mod binding;
    mod debug;
    pub mod event;
    pub mod message;
    pub mod types;
    pub use binding::{exchange, Barrier, BindingPtr, ResponseBinding};
    pub use event::{RawWindowEvent, WindowEvent};
    pub use message::{AppMessage, ExtensionNames, HostMessage, RawAppMessage, RawHostMessage, UnknownTag};
    pub use types::{Backchannel, Extent2D, Fullscreen, SurfaceHandle, WindowInstance};
}
#[allow(non_snake_case)]
pub mod Core {
    mod debug;
    pub mod futex;
    pub mod module;
    pub mod transfer;
    pub use futex::WakeFence;
    pub use module::AppModule;
    pub use transfer::{OwnedHostMessage, MAX_TITLE_LEN};
}
#[allow(non_snake_case)]
pub mod Bridge {
    pub mod bridge;
    mod debug;
    pub mod pump;
    pub mod Ring {
        pub mod Ring;
        pub mod Ring_impl;
        pub use Ring::RingBuffer; // re-export for stable path
    }
    pub use bridge::{Delivery, EventBridge, MessageSink};
    pub use pump::{EventPump, NativeEvent, UserEvent};
    pub use Ring::RingBuffer;
}
#[allow(non_snake_case)]
pub mod Host;
#[allow(non_snake_case)]
pub mod App;
#[allow(non_snake_case)]
pub mod Debug {
    pub mod StructDebug;
}

pub mod ffi;
