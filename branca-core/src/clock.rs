//! Time sources.

use std::sync::Arc;

/// A source of the current UNIX time in whole seconds.
pub trait Clock: Send + Sync {
    fn now(&self) -> i64;
}

/// Reads the system wall clock.
#[derive(Clone, Copy, Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> i64 {
        jiff::Timestamp::now().as_second()
    }
}

/// Always reports the same instant.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FixedClock(pub i64);

impl Clock for FixedClock {
    fn now(&self) -> i64 {
        self.0
    }
}

impl<C: Clock + ?Sized> Clock for &C {
    fn now(&self) -> i64 {
        C::now(self)
    }
}

impl<C: Clock + ?Sized> Clock for Box<C> {
    fn now(&self) -> i64 {
        C::now(self)
    }
}

impl<C: Clock + ?Sized> Clock for Arc<C> {
    fn now(&self) -> i64 {
        C::now(self)
    }
}
