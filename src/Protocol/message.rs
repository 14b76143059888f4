// Message envelopes crossing the host/module boundary.
//
// `RawHostMessage` (app -> host) and `RawAppMessage` (host -> app) are the
// only layouts that cross the ABI: a `u32` tag plus a union payload. Code on
// either side works with the safe views `HostMessage` / `AppMessage`, which
// are produced by `decode` after the tag has been checked.

use super::binding::BindingPtr;
use super::event::{RawWindowEvent, WindowEvent};
use super::types::{Backchannel, Extent2D, Fullscreen};
use std::ffi::{c_char, CStr, CString};
use std::marker::PhantomData;

// Host-facing tags (app -> host).
pub const HOSTMSG_SET_WINDOW_SIZE: u32 = 0x0101;
pub const HOSTMSG_SET_FULLSCREEN: u32 = 0x0102;
pub const HOSTMSG_SET_BORDERLESS: u32 = 0x0103;
pub const HOSTMSG_SET_WINDOW_TITLE: u32 = 0x0104;
pub const HOSTMSG_CREATE_SURFACE: u32 = 0x0105;
pub const HOSTMSG_QUERY_VIEWPORT_EXTENT: u32 = 0x0106;
pub const HOSTMSG_SET_BACKCHANNEL: u32 = 0x0107;

// App-facing tags (host -> app).
pub const APPMSG_REQUIRED_INSTANCE_EXTENSIONS: u32 = 0x0201;
pub const APPMSG_RESPONSE_READY: u32 = 0x0202;
pub const APPMSG_WINDOW_EVENT: u32 = 0x0203;

/// A tag that this build of the protocol does not know.
#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("unknown message tag {0:#06x}")]
pub struct UnknownTag(pub u32);

#[repr(C)]
#[derive(Copy, Clone)]
pub struct SurfaceRequest {
    /// Raw graphics instance handle the surface is created for.
    pub instance: u64,
    /// Receives a `SurfaceHandle`.
    pub binding: BindingPtr,
}

#[repr(C)]
#[derive(Copy, Clone)]
pub union HostPayload {
    pub window_size: Extent2D,
    pub fullscreen: u8,
    pub borderless: u8,
    pub window_title: *const c_char,
    pub surface: SurfaceRequest,
    /// Receives an `Extent2D`.
    pub query: BindingPtr,
    pub backchannel: Backchannel,
}

#[repr(C)]
#[derive(Copy, Clone)]
pub struct RawHostMessage {
    pub tag: u32,
    pub payload: HostPayload,
}

impl RawHostMessage {
    /// Build a message with an arbitrary tag and an empty payload, e.g. a
    /// tag from a newer protocol revision than the receiving host knows.
    pub fn with_tag(tag: u32) -> Self {
        RawHostMessage {
            tag,
            payload: HostPayload {
                window_size: Extent2D::default(),
            },
        }
    }
}

/// App -> host message.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum HostMessage<'a> {
    SetWindowSize(Extent2D),
    SetFullscreen(Fullscreen),
    SetBorderless(bool),
    SetWindowTitle(&'a CStr),
    CreateSurface { instance: u64, binding: BindingPtr },
    QueryViewportExtent(BindingPtr),
    SetBackchannel(Backchannel),
}

impl<'a> HostMessage<'a> {
    pub fn tag(&self) -> u32 {
        match self {
            HostMessage::SetWindowSize(_) => HOSTMSG_SET_WINDOW_SIZE,
            HostMessage::SetFullscreen(_) => HOSTMSG_SET_FULLSCREEN,
            HostMessage::SetBorderless(_) => HOSTMSG_SET_BORDERLESS,
            HostMessage::SetWindowTitle(_) => HOSTMSG_SET_WINDOW_TITLE,
            HostMessage::CreateSurface { .. } => HOSTMSG_CREATE_SURFACE,
            HostMessage::QueryViewportExtent(_) => HOSTMSG_QUERY_VIEWPORT_EXTENT,
            HostMessage::SetBackchannel(_) => HOSTMSG_SET_BACKCHANNEL,
        }
    }

    /// Lower to the wire form. The title pointer (if any) borrows from
    /// `self`, so the result must not outlive the borrow.
    pub fn to_raw(&self) -> RawHostMessage {
        let payload = match *self {
            HostMessage::SetWindowSize(extent) => HostPayload {
                window_size: extent,
            },
            HostMessage::SetFullscreen(mode) => HostPayload {
                fullscreen: mode as u8,
            },
            HostMessage::SetBorderless(flag) => HostPayload {
                borderless: flag as u8,
            },
            HostMessage::SetWindowTitle(title) => HostPayload {
                window_title: title.as_ptr(),
            },
            HostMessage::CreateSurface { instance, binding } => HostPayload {
                surface: SurfaceRequest { instance, binding },
            },
            HostMessage::QueryViewportExtent(binding) => HostPayload { query: binding },
            HostMessage::SetBackchannel(handle) => HostPayload {
                backchannel: handle,
            },
        };
        RawHostMessage {
            tag: self.tag(),
            payload,
        }
    }

    /// Run `f` with the wire form on this frame.
    pub fn with_raw<R>(&self, f: impl FnOnce(&RawHostMessage) -> R) -> R {
        let raw = self.to_raw();
        f(&raw)
    }

    /// Checked view of a wire message.
    ///
    /// # Safety
    /// If the tag is `HOSTMSG_SET_WINDOW_TITLE` the title pointer must be
    /// null or point to a nul-terminated string that outlives `'a`.
    pub unsafe fn decode(raw: &'a RawHostMessage) -> Result<HostMessage<'a>, UnknownTag> {
        let message = match raw.tag {
            HOSTMSG_SET_WINDOW_SIZE => HostMessage::SetWindowSize(raw.payload.window_size),
            HOSTMSG_SET_FULLSCREEN => {
                HostMessage::SetFullscreen(Fullscreen::from_byte(raw.payload.fullscreen))
            }
            HOSTMSG_SET_BORDERLESS => HostMessage::SetBorderless(raw.payload.borderless == 1),
            HOSTMSG_SET_WINDOW_TITLE => {
                let title = raw.payload.window_title;
                if title.is_null() {
                    HostMessage::SetWindowTitle(c"")
                } else {
                    HostMessage::SetWindowTitle(CStr::from_ptr(title))
                }
            }
            HOSTMSG_CREATE_SURFACE => HostMessage::CreateSurface {
                instance: raw.payload.surface.instance,
                binding: raw.payload.surface.binding,
            },
            HOSTMSG_QUERY_VIEWPORT_EXTENT => HostMessage::QueryViewportExtent(raw.payload.query),
            HOSTMSG_SET_BACKCHANNEL => HostMessage::SetBackchannel(raw.payload.backchannel),
            other => return Err(UnknownTag(other)),
        };
        Ok(message)
    }
}

/// Borrowed list of nul-terminated extension names.
/// Valid only for the duration of the call that delivers it.
#[derive(Copy, Clone)]
pub struct ExtensionNames<'a> {
    names: *const *const c_char,
    count: usize,
    _marker: PhantomData<&'a CStr>,
}

impl<'a> ExtensionNames<'a> {
    /// # Safety
    /// `names` must point to `count` pointers, each null or a nul-terminated
    /// string, all valid for `'a`.
    pub unsafe fn from_raw_parts(names: *const *const c_char, count: usize) -> Self {
        Self {
            names,
            count,
            _marker: PhantomData,
        }
    }

    pub fn as_ptr(&self) -> *const *const c_char {
        self.names
    }

    pub fn len(&self) -> usize {
        if self.names.is_null() {
            0
        } else {
            self.count
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn iter(&self) -> impl Iterator<Item = &'a CStr> + 'a {
        let names = self.names;
        (0..self.len()).filter_map(move |i| {
            // SAFETY: guaranteed by `from_raw_parts`.
            unsafe {
                let name = *names.add(i);
                (!name.is_null()).then(|| CStr::from_ptr(name))
            }
        })
    }

    /// Copy the names out; the list itself must not be retained.
    pub fn to_owned_names(&self) -> Vec<CString> {
        self.iter().map(CStr::to_owned).collect()
    }
}

impl std::fmt::Debug for ExtensionNames<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

impl PartialEq for ExtensionNames<'_> {
    fn eq(&self, other: &Self) -> bool {
        self.iter().eq(other.iter())
    }
}

#[repr(C)]
#[derive(Copy, Clone)]
pub struct RawExtensionList {
    pub names: *const *const c_char,
    pub count: usize,
}

#[repr(C)]
#[derive(Copy, Clone)]
pub struct RawWindowEventRef {
    pub backchannel: Backchannel,
    pub event: *const RawWindowEvent,
}

#[repr(C)]
#[derive(Copy, Clone)]
pub union AppPayload {
    pub extensions: RawExtensionList,
    pub response: BindingPtr,
    pub window_event: RawWindowEventRef,
}

#[repr(C)]
#[derive(Copy, Clone)]
pub struct RawAppMessage {
    pub tag: u32,
    pub payload: AppPayload,
}

/// Host -> app message.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum AppMessage<'a> {
    /// Sent once before the app thread starts.
    RequiredInstanceExtensions(ExtensionNames<'a>),
    /// Second phase of a correlated request: the output slot is written.
    ResponseReady(BindingPtr),
    /// Host-initiated notification for the window the message is addressed to.
    WindowEvent {
        backchannel: Backchannel,
        event: WindowEvent,
    },
}

impl<'a> AppMessage<'a> {
    pub fn tag(&self) -> u32 {
        match self {
            AppMessage::RequiredInstanceExtensions(_) => APPMSG_REQUIRED_INSTANCE_EXTENSIONS,
            AppMessage::ResponseReady(_) => APPMSG_RESPONSE_READY,
            AppMessage::WindowEvent { .. } => APPMSG_WINDOW_EVENT,
        }
    }

    /// Run `f` with the wire form on this frame. Nested payloads (the window
    /// event) are only valid inside `f`.
    pub fn with_raw<R>(&self, f: impl FnOnce(&RawAppMessage) -> R) -> R {
        match *self {
            AppMessage::RequiredInstanceExtensions(names) => f(&RawAppMessage {
                tag: self.tag(),
                payload: AppPayload {
                    extensions: RawExtensionList {
                        names: names.as_ptr(),
                        count: names.len(),
                    },
                },
            }),
            AppMessage::ResponseReady(binding) => f(&RawAppMessage {
                tag: self.tag(),
                payload: AppPayload { response: binding },
            }),
            AppMessage::WindowEvent { backchannel, event } => {
                let raw_event = event.to_raw();
                f(&RawAppMessage {
                    tag: self.tag(),
                    payload: AppPayload {
                        window_event: RawWindowEventRef {
                            backchannel,
                            event: &raw_event,
                        },
                    },
                })
            }
        }
    }

    /// Checked view of a wire message. A window event with a null or
    /// unknown event reports the event's tag (`0` for null).
    ///
    /// # Safety
    /// Pointers in the payload selected by the tag must be valid for `'a`.
    pub unsafe fn decode(raw: &'a RawAppMessage) -> Result<AppMessage<'a>, UnknownTag> {
        let message = match raw.tag {
            APPMSG_REQUIRED_INSTANCE_EXTENSIONS => {
                let list = raw.payload.extensions;
                AppMessage::RequiredInstanceExtensions(ExtensionNames::from_raw_parts(
                    list.names, list.count,
                ))
            }
            APPMSG_RESPONSE_READY => AppMessage::ResponseReady(raw.payload.response),
            APPMSG_WINDOW_EVENT => {
                let event_ref = raw.payload.window_event;
                if event_ref.event.is_null() {
                    return Err(UnknownTag(0));
                }
                AppMessage::WindowEvent {
                    backchannel: event_ref.backchannel,
                    event: WindowEvent::decode(&*event_ref.event)?,
                }
            }
            other => return Err(UnknownTag(other)),
        };
        Ok(message)
    }
}
