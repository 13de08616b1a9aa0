//! Frame timestamps
//!
//! Milliseconds on the host's monotonic clock (`performance.now()` and the
//! rAF callback argument in the browser). Every per-frame call receives one
//! `Timestamp`; effects never read a clock themselves.

use std::ops::{Add, Sub};

#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default)]
pub struct Timestamp(f64);

impl Timestamp {
    pub const ZERO: Self = Self(0.0);

    pub const fn from_millis(ms: f64) -> Self {
        Self(ms)
    }

    pub const fn as_millis(self) -> f64 {
        self.0
    }

    /// Milliseconds elapsed since `earlier`, clamped at zero
    pub fn since(self, earlier: Self) -> f64 {
        (self.0 - earlier.0).max(0.0)
    }
}

impl Add<f64> for Timestamp {
    type Output = Self;

    fn add(self, ms: f64) -> Self {
        Self(self.0 + ms)
    }
}

impl Sub for Timestamp {
    type Output = f64;

    fn sub(self, rhs: Self) -> f64 {
        self.0 - rhs.0
    }
}
