//! Lock and wait-channel abstractions.
//!
//! The console guards all of its state with a single lock and blocks
//! readers on a wait channel until the interrupt handler commits a
//! line. In a kernel those map to a spinlock and the scheduler's
//! `sleep`/`wakeup` pair; on a host they map to `std::sync::Mutex`
//! and a condition variable, which the `std` feature provides.
#![cfg_attr(any(not(feature = "std"), target_os = "none"), no_std)]

use core::ops::DerefMut;

/// A mutual-exclusion lock.
pub trait Mutex {
    /// The type of the data that the lock protects.
    type Data;

    /// The type of the guard that the `lock` method returns.
    type Guard<'a>: DerefMut<Target = Self::Data>
    where
        Self: 'a;

    /// Creates a new lock.
    fn new(data: Self::Data) -> Self;

    /// Acquires the lock.
    fn lock(&self) -> Self::Guard<'_>;
}

/// A channel that sleepers block on until another context wakes them.
///
/// `sleep` atomically releases the guard and blocks the caller;
/// `wakeup` makes every current sleeper reacquire its lock and
/// return. A sleeper must re-check its wait condition after waking:
/// wakeups go to all sleepers on the channel, and an implementation
/// is free to wake spuriously.
pub trait WaitChannel<M: Mutex> {
    /// Creates a new channel with no sleepers.
    fn new() -> Self;

    /// Releases `guard`, blocks until a wakeup, and reacquires the lock.
    fn sleep<'a>(&self, guard: M::Guard<'a>) -> M::Guard<'a>
    where
        M: 'a;

    /// Wakes all sleepers on this channel.
    fn wakeup(&self);
}

#[cfg(all(feature = "std", not(target_os = "none")))]
impl<T> Mutex for std::sync::Mutex<T> {
    type Data = T;
    type Guard<'a>
        = std::sync::MutexGuard<'a, T>
    where
        T: 'a;

    fn new(data: Self::Data) -> Self {
        Self::new(data)
    }

    fn lock(&self) -> Self::Guard<'_> {
        self.lock().unwrap()
    }
}

/// A wait channel backed by a condition variable.
#[cfg(all(feature = "std", not(target_os = "none")))]
#[derive(Default)]
pub struct CondvarChannel {
    condvar: std::sync::Condvar,
}

#[cfg(all(feature = "std", not(target_os = "none")))]
impl<T> WaitChannel<std::sync::Mutex<T>> for CondvarChannel {
    fn new() -> Self {
        Self {
            condvar: std::sync::Condvar::new(),
        }
    }

    fn sleep<'a>(&self, guard: std::sync::MutexGuard<'a, T>) -> std::sync::MutexGuard<'a, T>
    where
        std::sync::Mutex<T>: 'a,
    {
        self.condvar.wait(guard).unwrap()
    }

    fn wakeup(&self) {
        self.condvar.notify_all();
    }
}
