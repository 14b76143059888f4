use crossbeam_utils::CachePadded;
use std::sync::atomic::{AtomicU32, Ordering};
use std::time::{Duration, Instant};

/// Sleep while `atomic == expected`, for at most `timeout` when given.
#[cfg(target_os = "linux")]
pub fn futex_wait(atomic: &AtomicU32, expected: u32, timeout: Option<Duration>) {
    use std::ptr;

    // Check condition first to avoid syscall if possible
    if atomic.load(Ordering::Relaxed) != expected {
        return;
    }

    let timespec = timeout.map(|t| libc::timespec {
        tv_sec: t.as_secs() as libc::time_t,
        tv_nsec: t.subsec_nanos() as libc::c_long,
    });
    let timespec_ptr = timespec
        .as_ref()
        .map_or(ptr::null(), |t| t as *const libc::timespec);

    unsafe {
        libc::syscall(
            libc::SYS_futex,
            atomic as *const AtomicU32 as *const u32,
            libc::FUTEX_WAIT | libc::FUTEX_PRIVATE_FLAG,
            expected,
            timespec_ptr,
            ptr::null::<u32>(),
            0u32,
        );
    }
}

#[cfg(target_os = "linux")]
pub fn futex_wake(atomic: &AtomicU32) {
    unsafe {
        libc::syscall(
            libc::SYS_futex,
            atomic as *const AtomicU32 as *const u32,
            libc::FUTEX_WAKE | libc::FUTEX_PRIVATE_FLAG,
            i32::MAX, // every waiter
            std::ptr::null::<libc::timespec>(),
            std::ptr::null::<u32>(),
            0u32,
        );
    }
}

#[cfg(not(target_os = "linux"))]
pub fn futex_wait(atomic: &AtomicU32, expected: u32, timeout: Option<Duration>) {
    // Fallback for non-Linux: short sleep, the caller re-checks the word
    if atomic.load(Ordering::Relaxed) == expected {
        let nap = Duration::from_millis(1);
        std::thread::sleep(timeout.map_or(nap, |t| t.min(nap)));
    }
}

#[cfg(not(target_os = "linux"))]
pub fn futex_wake(_atomic: &AtomicU32) {
    // No-op on non-Linux
}

/// Wake signal raised by producers and waited on with a bounded timeout.
///
/// The word is an epoch counter. A consumer reads the epoch *before* it
/// drains, then waits for the epoch to move; a post that lands between the
/// drain and the wait is therefore never missed. A wake that is missed for
/// any other reason costs at most one timeout.
pub struct WakeFence {
    word: CachePadded<AtomicU32>,
}

impl WakeFence {
    pub const fn new() -> Self {
        Self {
            word: CachePadded::new(AtomicU32::new(0)),
        }
    }

    pub fn epoch(&self) -> u32 {
        self.word.load(Ordering::Acquire)
    }

    pub fn signal(&self) {
        self.word.fetch_add(1, Ordering::Release);
        futex_wake(&self.word);
    }

    /// Wait until the epoch differs from `seen` or `timeout` elapses.
    /// Returns `true` if the epoch moved.
    pub fn wait(&self, seen: u32, timeout: Duration) -> bool {
        let deadline = Instant::now() + timeout;
        loop {
            if self.epoch() != seen {
                return true;
            }
            let now = Instant::now();
            if now >= deadline {
                return false;
            }
            futex_wait(&self.word, seen, Some(deadline - now));
        }
    }
}

impl Default for WakeFence {
    fn default() -> Self {
        Self::new()
    }
}
