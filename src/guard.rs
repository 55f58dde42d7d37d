use std::fmt::{self, Debug};
use std::marker::PhantomData;
use std::ops::{Deref, DerefMut};
use std::ptr;

use crate::exclusion::{DefaultLock, RawMutex};

/// Scoped token granting exclusive access to the value inside a
/// [`GuardedValue`](crate::guarded::GuardedValue).
///
/// While a bound guard is alive it is the only route to the value; dropping it
/// releases the lock exactly once. Guards move but never copy, and a move
/// leaves nothing behind for the source to release. The detached form built by
/// [`AccessGuard::empty`] holds no lock and no value.
pub struct AccessGuard<'a, T, R: RawMutex = DefaultLock> {
    // `None` once released or never bound; the paired value pointer is null
    // only for the detached form.
    lock: Option<&'a R>,
    value: *mut T,
    _marker: PhantomData<&'a mut T>,
}

// The value pointer keeps guards !Send, which the default primitive requires:
// it must be released on the thread that acquired it.
unsafe impl<T: Sync, R: RawMutex + Sync> Sync for AccessGuard<'_, T, R> {}

impl<'a, T, R: RawMutex> AccessGuard<'a, T, R> {
    /// # Safety
    ///
    /// `lock` must currently be held on behalf of this guard and `value` must
    /// point at the storage that lock protects. Only
    /// [`GuardedValue`](crate::guarded::GuardedValue) upholds this, which is
    /// why bound guards cannot be constructed outside the crate.
    pub(crate) unsafe fn bound(lock: &'a R, value: *mut T) -> Self {
        Self {
            lock: Some(lock),
            value,
            _marker: PhantomData,
        }
    }

    /// Guard that holds nothing. Dropping it releases nothing and its
    /// optional view reports absent.
    pub const fn empty() -> Self {
        Self {
            lock: None,
            value: ptr::null_mut(),
            _marker: PhantomData,
        }
    }

    pub fn holds_value(&self) -> bool {
        !self.value.is_null()
    }

    /// Optional view of the protected value: `Some` for a guard produced by
    /// an acquire, `None` for the detached form.
    pub fn as_option(&self) -> Option<&T> {
        if self.value.is_null() {
            None
        } else {
            Some(unsafe { &*self.value })
        }
    }

    pub fn as_option_mut(&mut self) -> Option<&mut T> {
        if self.value.is_null() {
            None
        } else {
            Some(unsafe { &mut *self.value })
        }
    }
}

impl<T, R: RawMutex> Deref for AccessGuard<'_, T, R> {
    type Target = T;

    fn deref(&self) -> &T {
        self.as_option().expect("empty AccessGuard dereferenced")
    }
}

impl<T, R: RawMutex> DerefMut for AccessGuard<'_, T, R> {
    fn deref_mut(&mut self) -> &mut T {
        self.as_option_mut()
            .expect("empty AccessGuard dereferenced")
    }
}

impl<T, R: RawMutex> Drop for AccessGuard<'_, T, R> {
    fn drop(&mut self) {
        if let Some(lock) = self.lock.take() {
            unsafe { lock.unlock() };
        }
    }
}

impl<T, R: RawMutex> Default for AccessGuard<'_, T, R> {
    fn default() -> Self {
        Self::empty()
    }
}

impl<T: Debug, R: RawMutex> Debug for AccessGuard<'_, T, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.as_option().fmt(f)
    }
}
