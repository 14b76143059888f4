// Scalar payload types shared by both sides of the module boundary.
// Every type here is `#[repr(C)]` (or transparent) so the host and the app
// agree on layout without sharing anything but this crate's definitions.

use std::ffi::c_void;

/// Pixel or window size.
#[repr(C)]
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct Extent2D {
    pub width: u32,
    pub height: u32,
}

impl Extent2D {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }
}

/// Fullscreen mode requested by the app.
#[repr(u8)]
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum Fullscreen {
    #[default]
    None = 0,
    /// Exclusive fullscreen (video mode change).
    Real = 1,
    /// Borderless window covering the desktop.
    Desktop = 2,
}

impl Fullscreen {
    /// Decode the wire byte. Unknown values fall back to windowed mode.
    pub fn from_byte(byte: u8) -> Self {
        match byte {
            0 => Fullscreen::None,
            1 => Fullscreen::Real,
            2 => Fullscreen::Desktop,
            other => {
                log::warn!("unknown fullscreen mode {other}, using windowed mode");
                Fullscreen::None
            }
        }
    }
}

/// Handle of a renderable surface created by the host for the app.
/// A null handle means the platform failed to create it.
#[repr(transparent)]
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct SurfaceHandle(pub u64);

impl SurfaceHandle {
    pub const NULL: SurfaceHandle = SurfaceHandle(0);

    pub fn is_null(&self) -> bool {
        self.0 == 0
    }
}

/// Opaque address registered by the app so the host can route unsolicited
/// notifications back to it. The host stores it and hands it back verbatim;
/// it is never dereferenced on the host side.
#[repr(transparent)]
#[derive(Copy, Clone, PartialEq, Eq, Hash)]
pub struct Backchannel(pub *mut c_void);

impl Backchannel {
    /// Value carried by notifications sent before the app registered one.
    pub const NULL: Backchannel = Backchannel(std::ptr::null_mut());

    pub fn from_addr(addr: usize) -> Self {
        Backchannel(addr as *mut c_void)
    }

    pub fn addr(&self) -> usize {
        self.0 as usize
    }

    pub fn is_null(&self) -> bool {
        self.0.is_null()
    }
}

impl Default for Backchannel {
    fn default() -> Self {
        Backchannel::NULL
    }
}

// The handle is an opaque token: nothing reads through the pointer.
unsafe impl Send for Backchannel {}
unsafe impl Sync for Backchannel {}

/// Identifier of a host window as seen across the ABI.
#[repr(transparent)]
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct WindowInstance(pub usize);

impl WindowInstance {
    pub fn as_ptr(&self) -> *mut c_void {
        self.0 as *mut c_void
    }

    pub fn from_ptr(ptr: *mut c_void) -> Self {
        WindowInstance(ptr as usize)
    }
}
