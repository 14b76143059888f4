// Ownership transfer for app -> host messages.
//
// The app hands the host a pointer to a message on its own stack. Before the
// call returns, the host copies it into an allocation it owns (deep-copying
// the title, which would otherwise point into app memory) and from then on
// exactly one `OwnedHostMessage` value refers to that allocation. Dropping it
// is the release routine.

use crate::Protocol::message::{HostMessage, RawHostMessage, UnknownTag, HOSTMSG_SET_WINDOW_TITLE};
use std::ffi::{c_char, CString};
use std::ptr::NonNull;

/// Longest title, in bytes, the host copies. Longer titles are truncated.
pub const MAX_TITLE_LEN: usize = 255;

/// Heap copy of a host-facing message; sole owner of its allocation.
pub struct OwnedHostMessage {
    raw: NonNull<RawHostMessage>,
}

// The allocation is reachable only through this value.
unsafe impl Send for OwnedHostMessage {}

impl OwnedHostMessage {
    /// Copy a message that is about to go out of scope.
    ///
    /// Unknown tags are copied as-is so the dispatcher can log and drop them.
    /// Allocation failure aborts the process through the global allocator's
    /// error handler.
    ///
    /// # Safety
    /// For a title message the title pointer must be null or readable up to
    /// its terminator or `MAX_TITLE_LEN` bytes, whichever comes first.
    pub unsafe fn transfer(message: &RawHostMessage) -> Self {
        let mut copy = *message;
        if copy.tag == HOSTMSG_SET_WINDOW_TITLE {
            copy.payload.window_title = copy_title_bounded(message.payload.window_title).into_raw();
        }
        let raw = NonNull::from(Box::leak(Box::new(copy)));
        log::trace!("transferred host message {:#06x}", message.tag);
        Self { raw }
    }

    /// Copy from a safe view.
    pub fn from_message(message: &HostMessage<'_>) -> Self {
        // SAFETY: a `HostMessage` title is a `&CStr`, always terminated.
        message.with_raw(|raw| unsafe { Self::transfer(raw) })
    }

    pub fn tag(&self) -> u32 {
        self.raw().tag
    }

    pub fn raw(&self) -> &RawHostMessage {
        // SAFETY: owned, live allocation.
        unsafe { self.raw.as_ref() }
    }

    /// Checked view of the owned copy.
    pub fn view(&self) -> Result<HostMessage<'_>, UnknownTag> {
        // SAFETY: a title, if present, is the terminated copy made by `transfer`.
        unsafe { HostMessage::decode(self.raw()) }
    }

    /// Give up ownership, e.g. to park the allocation in a native event.
    pub fn into_raw(self) -> NonNull<RawHostMessage> {
        let raw = self.raw;
        std::mem::forget(self);
        raw
    }

    /// Take ownership back.
    ///
    /// # Safety
    /// `raw` must come from `into_raw` and must not be reclaimed twice.
    pub unsafe fn from_raw(raw: NonNull<RawHostMessage>) -> Self {
        Self { raw }
    }
}

impl Drop for OwnedHostMessage {
    fn drop(&mut self) {
        // SAFETY: `raw` came from `Box::leak` and this is the only owner.
        let boxed = unsafe { Box::from_raw(self.raw.as_ptr()) };
        if boxed.tag == HOSTMSG_SET_WINDOW_TITLE {
            let title = unsafe { boxed.payload.window_title };
            if !title.is_null() {
                // SAFETY: produced by `CString::into_raw` in `transfer`.
                drop(unsafe { CString::from_raw(title as *mut c_char) });
            }
        }
        log::trace!("released host message {:#06x}", boxed.tag);
    }
}

/// strnlen + copy: never reads past `MAX_TITLE_LEN` bytes.
unsafe fn copy_title_bounded(src: *const c_char) -> CString {
    if src.is_null() {
        return CString::default();
    }
    let mut len = 0;
    while len < MAX_TITLE_LEN && *src.add(len) != 0 {
        len += 1;
    }
    let bytes = std::slice::from_raw_parts(src as *const u8, len).to_vec();
    // SAFETY: the scan stopped before the first nul byte.
    CString::from_vec_unchecked(bytes)
}
