use std::cell::UnsafeCell;
use std::fmt::{self, Debug};
use std::mem;

use crate::exclusion::{DefaultLock, RawMutex, RawMutexTimed};
#[cfg(not(loom))]
use crate::exclusion::RawSpinLock;
use crate::guard::AccessGuard;

/// Couples one value of `T` with a mutual-exclusion lock so that at most one
/// thread can reach the value at a time.
///
/// All access runs through [`AccessGuard`] tokens handed out by the acquire
/// operations; the lock itself is never exposed. Which primitive backs the
/// lock is a type parameter, any [`RawMutex`] will do.
pub struct GuardedValue<T, R: RawMutex = DefaultLock> {
    lock: R,
    value: UnsafeCell<T>,
}

unsafe impl<T: Send, R: RawMutex + Send> Send for GuardedValue<T, R> {}
// `T: Send` suffices for Sync: the container only ever hands out exclusive
// access, so the value itself is never shared between threads.
unsafe impl<T: Send, R: RawMutex + Sync> Sync for GuardedValue<T, R> {}

impl<T> GuardedValue<T> {
    /// New container over the default parking primitive, lock free.
    pub const fn new(value: T) -> Self {
        Self::with_lock(DefaultLock::INIT, value)
    }
}

#[cfg(not(loom))]
impl<T> GuardedValue<T, RawSpinLock> {
    /// New container over the spinning primitive.
    pub const fn new_spin(value: T) -> Self {
        Self::with_lock(RawSpinLock::new(), value)
    }
}

impl<T, R: RawMutex> GuardedValue<T, R> {
    /// New container over a caller-supplied primitive instance.
    pub const fn with_lock(lock: R, value: T) -> Self {
        Self {
            lock,
            value: UnsafeCell::new(value),
        }
    }

    /// Blocks until the lock is free, then returns the unique live guard for
    /// this container.
    ///
    /// Blocking is unbounded. Acquiring again on the same thread while the
    /// first guard is alive deadlocks; the primitive is not reentrant.
    pub fn acquire(&self) -> AccessGuard<'_, T, R> {
        self.lock.lock();
        unsafe { AccessGuard::bound(&self.lock, self.value.get()) }
    }

    /// Non-blocking acquire. `None` if another guard is currently alive.
    pub fn try_acquire(&self) -> Option<AccessGuard<'_, T, R>> {
        if self.lock.try_lock() {
            Some(unsafe { AccessGuard::bound(&self.lock, self.value.get()) })
        } else {
            None
        }
    }

    /// Acquires, runs `f` on the protected value, releases, and forwards the
    /// result. The release happens on every exit path: a panic in `f`
    /// propagates only after the guard has dropped.
    pub fn with_access<U>(&self, f: impl FnOnce(&mut T) -> U) -> U {
        let mut guard = self.acquire();
        f(&mut guard)
    }

    /// Overwrites the protected value under the lock.
    pub fn set(&self, value: T) {
        *self.acquire() = value;
    }

    /// Overwrites the protected value under the lock and returns the previous
    /// one.
    pub fn replace(&self, value: T) -> T {
        mem::replace(&mut *self.acquire(), value)
    }

    /// Copies `source`'s payload into `self`. Only the payload moves, never
    /// lock state, and the two locks are never held at the same time: the
    /// snapshot is taken under `source`'s lock, released, and only then is
    /// `self` locked. Opposite-direction assignments from two threads
    /// therefore cannot deadlock.
    pub fn assign_from<R2: RawMutex>(&self, source: &GuardedValue<T, R2>)
    where
        T: Clone,
    {
        let snapshot = source.with_access(|value| value.clone());
        self.set(snapshot);
    }

    pub fn is_locked(&self) -> bool {
        self.lock.is_locked()
    }

    /// Direct access through exclusive ownership; no locking involved.
    pub fn get_mut(&mut self) -> &mut T {
        self.value.get_mut()
    }

    pub fn into_inner(self) -> T {
        self.value.into_inner()
    }
}

impl<T, R: RawMutexTimed> GuardedValue<T, R> {
    /// Bounded-wait acquire. Gives up and returns `None` once `timeout`
    /// elapses without the lock becoming free.
    pub fn try_acquire_for(&self, timeout: R::Duration) -> Option<AccessGuard<'_, T, R>> {
        if self.lock.try_lock_for(timeout) {
            Some(unsafe { AccessGuard::bound(&self.lock, self.value.get()) })
        } else {
            None
        }
    }
}

impl<T: Default, R: RawMutex> Default for GuardedValue<T, R> {
    fn default() -> Self {
        Self::with_lock(R::INIT, T::default())
    }
}

impl<T, R: RawMutex> From<T> for GuardedValue<T, R> {
    fn from(value: T) -> Self {
        Self::with_lock(R::INIT, value)
    }
}

impl<T: Clone, R: RawMutex> Clone for GuardedValue<T, R> {
    /// Clones the payload under `self`'s lock into a fresh container whose
    /// lock starts free.
    fn clone(&self) -> Self {
        Self::with_lock(R::INIT, self.with_access(|value| value.clone()))
    }
}

impl<T: Debug, R: RawMutex> Debug for GuardedValue<T, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut out = f.debug_struct("GuardedValue");
        match self.try_acquire() {
            Some(guard) => out.field("value", &*guard),
            None => out.field("value", &"<locked>"),
        };
        out.finish()
    }
}
