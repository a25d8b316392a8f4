//! Seed-driven selectors and the animation seed clock.
//!
//! A selector is `frac(seed * a + index * b)` for fixed constants. The formula is pure
//! IEEE arithmetic, so a given `(seed, index)` maps to the same value on every call.

use std::time::Duration;
use tokio::time::{interval, Interval, MissedTickBehavior};

/// Constants for one selector pair: `(a, b)` for the first value, `(c, d)` for the second.
#[derive(Debug, Clone, Copy)]
pub struct Salt {
    pub a: f64,
    pub b: f64,
    pub c: f64,
    pub d: f64,
}

/// Per-character selectors used by [`scramble`](super::scramble).
pub const SCRAMBLE_SALT: Salt = Salt {
    a: 0.618_033_988_749_895,
    b: 0.754_877_666_246_693,
    c: 0.414_213_562_373_095,
    d: 0.569_840_290_998_053,
};

/// Per-token selectors used by [`to_mixed`](super::to_mixed).
pub const MIXED_SALT: Salt = Salt {
    a: 0.324_717_957_244_746,
    b: 0.866_025_403_784_439,
    c: 0.236_067_977_499_790,
    d: 0.645_751_311_064_591,
};

/// Fractional part of `x`, always in `[0,1)`. Non-finite input yields `0.0`.
pub fn frac(x: f64) -> f64 {
    let f = x - x.floor();
    // tiny negatives round up to exactly 1.0
    if f.is_finite() && f < 1.0 {
        f
    } else {
        0.0
    }
}

/// Derive the two position-local selectors for `index` under `seed`.
pub fn selectors(seed: f64, index: usize, salt: Salt) -> (f64, f64) {
    let i = index as f64;
    (
        frac(seed * salt.a + i * salt.b),
        frac(seed * salt.c + i * salt.d),
    )
}

/// Monotonic seed source for animated renderings.
///
/// Yields `0, 1, 2, ...`, one value per tick. The first value is returned immediately.
pub struct SeedClock {
    ticker: Interval,
    next: u64,
}

impl SeedClock {
    pub fn new(period: Duration) -> Self {
        let mut ticker = interval(period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        Self { ticker, next: 0 }
    }

    /// Wait for the next tick and return its seed.
    pub async fn tick(&mut self) -> f64 {
        self.ticker.tick().await;
        let seed = self.next;
        self.next += 1;
        seed as f64
    }
}
