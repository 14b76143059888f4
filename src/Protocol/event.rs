// Window events the host forwards to the app (host-initiated notifications).

use super::message::UnknownTag;
use super::types::Extent2D;

pub const WINEVT_QUIT: u32 = 0x0301;
pub const WINEVT_RESIZE: u32 = 0x0302;

#[repr(C)]
#[derive(Copy, Clone)]
pub union WindowEventPayload {
    pub resize: Extent2D,
    pub none: (),
}

/// Wire form of a window event. Only valid while the delivering call runs.
#[repr(C)]
#[derive(Copy, Clone)]
pub struct RawWindowEvent {
    pub tag: u32,
    pub payload: WindowEventPayload,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum WindowEvent {
    /// The platform asked the process to quit (window close, signal).
    Quit,
    /// The window was resized to the given size.
    Resize(Extent2D),
}

impl WindowEvent {
    pub fn tag(&self) -> u32 {
        match self {
            WindowEvent::Quit => WINEVT_QUIT,
            WindowEvent::Resize(_) => WINEVT_RESIZE,
        }
    }

    pub fn to_raw(&self) -> RawWindowEvent {
        let payload = match *self {
            WindowEvent::Quit => WindowEventPayload { none: () },
            WindowEvent::Resize(extent) => WindowEventPayload { resize: extent },
        };
        RawWindowEvent {
            tag: self.tag(),
            payload,
        }
    }

    pub fn decode(raw: &RawWindowEvent) -> Result<Self, UnknownTag> {
        match raw.tag {
            WINEVT_QUIT => Ok(WindowEvent::Quit),
            // SAFETY: the tag selects the `resize` arm.
            WINEVT_RESIZE => Ok(WindowEvent::Resize(unsafe { raw.payload.resize })),
            other => Err(UnknownTag(other)),
        }
    }
}
