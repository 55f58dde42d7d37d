use crate::sync::{AtomicBool, Contender, Ordering};

#[cfg(not(loom))]
use lock_api::{GuardSend, RawMutex};

/// Spinning single-holder lock. Trades the thread parking of
/// [`DefaultLock`](super::DefaultLock) for busy waiting with backoff, which
/// keeps it free of OS dependencies and checkable under loom.
pub struct RawSpinLock {
    held: AtomicBool,
}

impl RawSpinLock {
    #[cfg(not(loom))]
    pub const fn new() -> Self {
        Self {
            held: AtomicBool::new(false),
        }
    }

    // loom atomics have no const constructor
    #[cfg(loom)]
    pub fn new() -> Self {
        Self {
            held: AtomicBool::new(false),
        }
    }

    pub fn acquire(&self) {
        let mut backoff: Option<Contender> = None;
        loop {
            if self
                .held
                .compare_exchange(false, true, Ordering::Acquire, Ordering::Relaxed)
                .is_ok()
            {
                break;
            }

            let waiter = backoff.get_or_insert_with(Contender::new);
            while self.held.load(Ordering::Relaxed) {
                waiter.snooze();
            }
        }
    }

    pub fn try_acquire(&self) -> bool {
        self.held
            .compare_exchange(false, true, Ordering::Acquire, Ordering::Relaxed)
            .is_ok()
    }

    /// Caller must be the current holder.
    pub fn release(&self) {
        self.held.store(false, Ordering::Release);
    }

    pub fn is_held(&self) -> bool {
        self.held.load(Ordering::Relaxed)
    }
}

impl Default for RawSpinLock {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(not(loom))]
unsafe impl RawMutex for RawSpinLock {
    const INIT: RawSpinLock = RawSpinLock::new();

    type GuardMarker = GuardSend;

    fn lock(&self) {
        self.acquire();
    }

    fn try_lock(&self) -> bool {
        self.try_acquire()
    }

    unsafe fn unlock(&self) {
        self.release();
    }

    fn is_locked(&self) -> bool {
        self.is_held()
    }
}
