use crate::Protocol::{Extent2D, Fullscreen, SurfaceHandle, WindowInstance};
use std::ffi::{CStr, CString};
use std::io;

/// Windowing layer the dispatch loop drives. Lives on the host thread.
pub trait Platform {
    fn create_window(&mut self, title: &str, size: Extent2D) -> io::Result<WindowInstance>;

    fn destroy_window(&mut self, window: WindowInstance);

    fn set_window_size(&mut self, window: WindowInstance, size: Extent2D) -> io::Result<()>;

    fn set_fullscreen(&mut self, window: WindowInstance, mode: Fullscreen) -> io::Result<()>;

    fn set_bordered(&mut self, window: WindowInstance, bordered: bool) -> io::Result<()>;

    fn set_title(&mut self, window: WindowInstance, title: &CStr) -> io::Result<()>;

    /// Create a renderable surface for `instance`. `SurfaceHandle::NULL` on failure.
    fn create_surface(&mut self, window: WindowInstance, instance: u64) -> SurfaceHandle;

    /// Current drawable size in pixels, `None` for an unknown window.
    fn drawable_size(&self, window: WindowInstance) -> Option<Extent2D>;

    /// Graphics instance extensions the platform needs to present to `window`.
    fn required_instance_extensions(&self, window: WindowInstance) -> io::Result<Vec<CString>>;
}
