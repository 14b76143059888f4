// In-process platform: a native event queue on the MPMC ring and a table of
// windows that only exist as state. Used by `faisca-host` and the tests.

use super::platform::Platform;
use crate::Bridge::{EventPump, NativeEvent, RingBuffer};
use crate::Protocol::{Extent2D, Fullscreen, SurfaceHandle, WindowInstance};
use parking_lot::Mutex;
use std::collections::HashMap;
use std::ffi::{CStr, CString};
use std::io;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;

/// First custom event kind handed out (user event range start).
pub const FIRST_USER_EVENT: u32 = 0x8000;
/// Last valid event kind.
pub const LAST_EVENT: u32 = 0xFFFF;

pub struct HeadlessPump {
    queue: RingBuffer<NativeEvent>,
    next_kind: AtomicU32,
}

impl HeadlessPump {
    /// `capacity` must be a power of two.
    pub fn new(capacity: usize) -> io::Result<Self> {
        Ok(Self {
            queue: RingBuffer::with_capacity(capacity)?,
            next_kind: AtomicU32::new(FIRST_USER_EVENT),
        })
    }

    pub fn pending(&self) -> usize {
        self.queue.len()
    }
}

impl EventPump for HeadlessPump {
    fn register_events(&self, count: u32) -> Option<u32> {
        if count == 0 {
            return None;
        }
        self.next_kind
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |next| {
                let last = next.checked_add(count - 1)?;
                (last <= LAST_EVENT).then_some(last + 1)
            })
            .ok()
    }

    fn push(&self, event: NativeEvent) -> Result<(), NativeEvent> {
        self.queue.enqueue(event).map(|_| ())
    }

    fn poll(&self) -> Option<NativeEvent> {
        self.queue.dequeue()
    }
}

/// State of one headless window.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HeadlessWindow {
    pub title: String,
    pub size: Extent2D,
    pub fullscreen: Fullscreen,
    pub bordered: bool,
    pub surfaces: Vec<SurfaceHandle>,
}

#[derive(Default)]
struct HeadlessState {
    windows: HashMap<WindowInstance, HeadlessWindow>,
    destroyed: HashMap<WindowInstance, usize>,
    next_window: usize,
    next_surface: u64,
}

/// Window table. Clones share the same state so a caller can keep a handle
/// for inspection after handing one to the host.
#[derive(Clone)]
pub struct HeadlessPlatform {
    state: Arc<Mutex<HeadlessState>>,
    pixel_scale: u32,
    extensions: Vec<CString>,
}

impl Default for HeadlessPlatform {
    fn default() -> Self {
        Self::new()
    }
}

impl HeadlessPlatform {
    pub fn new() -> Self {
        Self {
            state: Arc::new(Mutex::new(HeadlessState {
                next_window: 1,
                next_surface: 1,
                ..Default::default()
            })),
            pixel_scale: 1,
            extensions: vec![
                c"VK_KHR_surface".to_owned(),
                c"VK_EXT_headless_surface".to_owned(),
            ],
        }
    }

    /// Drawable pixels per window unit (high-DPI emulation).
    pub fn with_pixel_scale(mut self, scale: u32) -> Self {
        self.pixel_scale = scale.max(1);
        self
    }

    pub fn window(&self, window: WindowInstance) -> Option<HeadlessWindow> {
        self.state.lock().windows.get(&window).cloned()
    }

    pub fn window_count(&self) -> usize {
        self.state.lock().windows.len()
    }

    /// How many times `destroy_window` ran for `window`.
    pub fn destroy_count(&self, window: WindowInstance) -> usize {
        self.state.lock().destroyed.get(&window).copied().unwrap_or(0)
    }

    /// Resize as if the user dragged the window; returns the matching event.
    pub fn user_resize(&self, window: WindowInstance, size: Extent2D) -> Option<NativeEvent> {
        let mut state = self.state.lock();
        let entry = state.windows.get_mut(&window)?;
        entry.size = size;
        Some(NativeEvent::Resized {
            window,
            extent: size,
        })
    }

    fn with_window<R>(
        &self,
        window: WindowInstance,
        f: impl FnOnce(&mut HeadlessWindow) -> R,
    ) -> io::Result<R> {
        let mut state = self.state.lock();
        state.windows.get_mut(&window).map(f).ok_or_else(|| unknown_window(window))
    }
}

fn unknown_window(window: WindowInstance) -> io::Error {
    io::Error::new(
        io::ErrorKind::NotFound,
        format!("no window {:#x}", window.0),
    )
}

impl Platform for HeadlessPlatform {
    fn create_window(&mut self, title: &str, size: Extent2D) -> io::Result<WindowInstance> {
        if size.is_empty() {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("window size {}x{} is empty", size.width, size.height),
            ));
        }
        let mut state = self.state.lock();
        let id = WindowInstance(state.next_window);
        state.next_window += 1;
        state.windows.insert(
            id,
            HeadlessWindow {
                title: title.to_string(),
                size,
                fullscreen: Fullscreen::None,
                bordered: true,
                surfaces: Vec::new(),
            },
        );
        log::debug!("created headless window {:#x} ({}x{})", id.0, size.width, size.height);
        Ok(id)
    }

    fn destroy_window(&mut self, window: WindowInstance) {
        let mut state = self.state.lock();
        *state.destroyed.entry(window).or_insert(0) += 1;
        if state.windows.remove(&window).is_none() {
            log::warn!("destroy of unknown window {:#x}", window.0);
        }
    }

    fn set_window_size(&mut self, window: WindowInstance, size: Extent2D) -> io::Result<()> {
        self.with_window(window, |w| w.size = size)
    }

    fn set_fullscreen(&mut self, window: WindowInstance, mode: Fullscreen) -> io::Result<()> {
        self.with_window(window, |w| w.fullscreen = mode)
    }

    fn set_bordered(&mut self, window: WindowInstance, bordered: bool) -> io::Result<()> {
        self.with_window(window, |w| w.bordered = bordered)
    }

    fn set_title(&mut self, window: WindowInstance, title: &CStr) -> io::Result<()> {
        let title = title.to_string_lossy().into_owned();
        self.with_window(window, |w| w.title = title)
    }

    fn create_surface(&mut self, window: WindowInstance, instance: u64) -> SurfaceHandle {
        if instance == 0 {
            return SurfaceHandle::NULL;
        }
        let mut guard = self.state.lock();
        let state = &mut *guard;
        let handle = SurfaceHandle(state.next_surface);
        match state.windows.get_mut(&window) {
            Some(w) => {
                w.surfaces.push(handle);
                state.next_surface += 1;
                handle
            }
            None => SurfaceHandle::NULL,
        }
    }

    fn drawable_size(&self, window: WindowInstance) -> Option<Extent2D> {
        let scale = self.pixel_scale;
        self.state.lock().windows.get(&window).map(|w| Extent2D {
            width: w.size.width.saturating_mul(scale),
            height: w.size.height.saturating_mul(scale),
        })
    }

    fn required_instance_extensions(&self, window: WindowInstance) -> io::Result<Vec<CString>> {
        if !self.state.lock().windows.contains_key(&window) {
            return Err(unknown_window(window));
        }
        Ok(self.extensions.clone())
    }
}
