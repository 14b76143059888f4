use super::inbox::{self, Notification};
use crate::ffi::{MessageWindowFn, FAISCA_SUCCESS};
use crate::Protocol::{
    exchange, Backchannel, BindingPtr, Extent2D, Fullscreen, HostMessage, RawHostMessage, SurfaceHandle,
    WindowInstance,
};
use std::ffi::CString;
use std::time::Duration;

/// How long a correlated request waits before it starts complaining.
pub const DEFAULT_REQUEST_PATIENCE: Duration = Duration::from_secs(5);

/// App-thread handle for talking to the host about one window.
#[derive(Copy, Clone)]
pub struct WindowMessenger {
    window: WindowInstance,
    message_window: MessageWindowFn,
    patience: Duration,
}

impl WindowMessenger {
    pub fn new(window: WindowInstance, message_window: MessageWindowFn) -> Self {
        Self {
            window,
            message_window,
            patience: DEFAULT_REQUEST_PATIENCE,
        }
    }

    pub fn with_patience(mut self, patience: Duration) -> Self {
        self.patience = patience;
        self
    }

    pub fn window(&self) -> WindowInstance {
        self.window
    }

    /// Post one message; `true` once the host has queued its copy.
    pub fn send(&self, message: &HostMessage<'_>) -> bool {
        // SAFETY: the raw form is built from a checked view.
        message.with_raw(|raw| unsafe { self.send_raw(raw) })
    }

    /// Post a wire message as-is (tags the host may not know included).
    ///
    /// # Safety
    /// Any pointer in the payload selected by `message.tag` must be valid for
    /// the duration of the call.
    pub unsafe fn send_raw(&self, message: &RawHostMessage) -> bool {
        (self.message_window)(self.window, message) == FAISCA_SUCCESS
    }

    pub fn set_window_size(&self, width: u32, height: u32) -> bool {
        self.send(&HostMessage::SetWindowSize(Extent2D::new(width, height)))
    }

    pub fn set_fullscreen(&self, mode: Fullscreen) -> bool {
        self.send(&HostMessage::SetFullscreen(mode))
    }

    pub fn set_borderless(&self, borderless: bool) -> bool {
        self.send(&HostMessage::SetBorderless(borderless))
    }

    /// Set the window title. The title ends at the first nul, and the host
    /// keeps at most `MAX_TITLE_LEN` bytes of it.
    pub fn set_title(&self, title: &str) -> bool {
        let visible = title.split('\0').next().unwrap_or_default();
        let title = CString::new(visible).unwrap_or_default();
        self.send(&HostMessage::SetWindowTitle(title.as_c_str()))
    }

    pub fn register_backchannel(&self, handle: Backchannel) -> bool {
        self.send(&HostMessage::SetBackchannel(handle))
    }

    /// Drawable size in pixels. Blocks until the host answers; `None` if the
    /// request could not be posted.
    pub fn query_viewport_extent(&self) -> Option<Extent2D> {
        exchange::<Extent2D>(self.patience, |binding| {
            self.send(&HostMessage::QueryViewportExtent(BindingPtr::from_binding(binding)))
        })
    }

    /// Surface for the graphics `instance`. `None` if the request could not
    /// be posted or the host failed to create the surface.
    pub fn create_surface(&self, instance: u64) -> Option<SurfaceHandle> {
        exchange::<SurfaceHandle>(self.patience, |binding| {
            self.send(&HostMessage::CreateSurface {
                instance,
                binding: BindingPtr::from_binding(binding),
            })
        })
        .filter(|surface| !surface.is_null())
    }

    pub fn try_recv(&self) -> Option<Notification> {
        inbox::inbox().try_recv()
    }

    pub fn recv_timeout(&self, timeout: Duration) -> Option<Notification> {
        inbox::inbox().recv_timeout(timeout)
    }

    pub fn required_instance_extensions(&self) -> Vec<CString> {
        inbox::required_instance_extensions()
    }
}
