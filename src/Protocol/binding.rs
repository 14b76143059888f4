// Response correlation: a requester-owned {output slot, completion signal}
// pair used to emulate a blocking call over the two asynchronous queues.
//
// Phase 1: the app posts a request that carries a `BindingPtr`.
// Phase 2: the host writes the result through it and sends a separate
//          "response ready" message back; the app's inbound path opens the
//          barrier. There is no cancellation of an in-flight request.

use parking_lot::{Condvar, Mutex};
use std::ffi::c_void;
use std::mem::MaybeUninit;
use std::time::{Duration, Instant};

/// One-shot completion signal.
pub struct Barrier {
    ready: Mutex<bool>,
    cond: Condvar,
}

impl Barrier {
    pub const fn new() -> Self {
        Self {
            ready: Mutex::new(false),
            cond: Condvar::new(),
        }
    }

    /// Open the barrier. The notification is issued while the lock is held
    /// so a waiter cannot return (and release the barrier's frame) before
    /// this call is done with it.
    pub fn open(&self) {
        let mut ready = self.ready.lock();
        *ready = true;
        self.cond.notify_all();
    }

    pub fn is_open(&self) -> bool {
        *self.ready.lock()
    }

    /// Block until the barrier opens.
    pub fn wait(&self) {
        let mut ready = self.ready.lock();
        while !*ready {
            self.cond.wait(&mut ready);
        }
    }

    /// Block until the barrier opens or `timeout` elapses.
    /// Returns whether the barrier is open.
    pub fn wait_for(&self, timeout: Duration) -> bool {
        let deadline = Instant::now() + timeout;
        let mut ready = self.ready.lock();
        while !*ready {
            if self.cond.wait_until(&mut ready, deadline).timed_out() {
                break;
            }
        }
        *ready
    }
}

impl Default for Barrier {
    fn default() -> Self {
        Self::new()
    }
}

/// Wire form of a pending request. Lives on the requester's stack.
///
/// `out` points at storage owned by the requester; the responder writes it
/// exactly once and never reads it. `barrier` is what the requester waits on.
#[repr(C)]
pub struct ResponseBinding {
    pub out: *mut c_void,
    pub barrier: *const Barrier,
}

/// Reference to a `ResponseBinding` as carried inside messages.
#[repr(transparent)]
#[derive(Copy, Clone, PartialEq, Eq)]
pub struct BindingPtr(pub *const ResponseBinding);

impl BindingPtr {
    pub const NULL: BindingPtr = BindingPtr(std::ptr::null());

    pub fn from_binding(binding: &ResponseBinding) -> Self {
        BindingPtr(binding as *const ResponseBinding)
    }

    pub fn is_null(&self) -> bool {
        self.0.is_null()
    }

    /// Write the result into the requester's output slot.
    ///
    /// # Safety
    /// The binding must still be pending (its frame alive), `T` must be the
    /// type the request tag promises, and this must be the only write.
    pub unsafe fn fulfil<T>(self, value: T) {
        let binding = &*self.0;
        std::ptr::write(binding.out as *mut T, value);
    }

    /// Open the requester's barrier. After this returns the binding may be
    /// gone; callers must not touch it again.
    ///
    /// # Safety
    /// The binding must still be pending and the output slot, if the request
    /// has one, must already be written.
    pub unsafe fn signal(self) {
        let binding = &*self.0;
        (*binding.barrier).open();
    }
}

// The pointer is only dereferenced under the protocol's single-owner rules.
unsafe impl Send for BindingPtr {}

/// Run one correlated request.
///
/// The output slot, the barrier and the binding all live in this call's
/// frame. `send` posts the request carrying the binding and reports whether
/// the post succeeded; on failure nothing is pending and `None` is returned.
/// Otherwise the call blocks until completion. Once `patience` elapses a
/// warning is logged and the wait continues: returning early would leave the
/// host a dangling slot to write into.
pub fn exchange<T>(patience: Duration, send: impl FnOnce(&ResponseBinding) -> bool) -> Option<T> {
    let mut slot = MaybeUninit::<T>::uninit();
    let barrier = Barrier::new();
    let binding = ResponseBinding {
        out: slot.as_mut_ptr().cast(),
        barrier: &barrier,
    };

    if !send(&binding) {
        return None;
    }

    if !barrier.wait_for(patience) {
        log::warn!(
            "correlated request still pending after {:?}, waiting for the host",
            patience
        );
        barrier.wait();
    }

    // SAFETY: the host writes the slot before it sends the completion that
    // opened the barrier.
    Some(unsafe { slot.assume_init() })
}
