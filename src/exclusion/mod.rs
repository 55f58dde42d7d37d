pub mod spin;

pub use lock_api::{RawMutex, RawMutexTimed};
pub use spin::RawSpinLock;

/// Primitive backing [`GuardedValue`](crate::guarded::GuardedValue) unless the
/// caller supplies another implementor of [`RawMutex`].
pub type DefaultLock = parking_lot::RawMutex;
