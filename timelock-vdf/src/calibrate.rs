#![forbid(unsafe_code)]

//! Runtime calibration of the delay parameter.
//!
//! Choosing a fixed `T` is awkward because squaring speed varies widely between machines and
//! modulus sizes. [`calibrate_delay`] times a short run of squarings under the given modulus
//! and picks the largest power of two whose estimated evaluation time stays within the target.
//!
//! Algorithm:
//! 1. Time [`SAMPLE_SQUARINGS`] squarings of a fixed base.
//! 2. Derive the cost per squaring in nanoseconds.
//! 3. `t_est = target_ns / ns_per_square`, clamped into `[MIN_DELAY, MAX_DELAY]`.
//! 4. Round down to a power of two.

use std::time::Instant;

use num_bigint::BigUint;
use tracing::debug;

use crate::puzzle::DelayParameter;
use crate::setup::Modulus;
use crate::square::square;

/// Minimum / maximum calibrated delay.
pub const MIN_DELAY: u64 = 1 << 10;
pub const MAX_DELAY: u64 = 1 << 30;

/// Squarings timed per calibration.
pub const SAMPLE_SQUARINGS: u64 = 1_000;

/// Calibrate `T` so that solving takes roughly `target_ms` on this machine.
#[must_use]
pub fn calibrate_delay(modulus: &Modulus, target_ms: u64) -> DelayParameter {
    let x = BigUint::from(5u8) % modulus.value();

    let start = Instant::now();
    let _y = square(&x, modulus.value(), SAMPLE_SQUARINGS);
    let elapsed = start.elapsed();

    let ns_per_square = (elapsed.as_nanos() as u64 / SAMPLE_SQUARINGS).max(1);
    let target_ns = target_ms.saturating_mul(1_000_000);
    let t_est = (target_ns / ns_per_square).clamp(MIN_DELAY, MAX_DELAY);
    let delay = DelayParameter::floor(t_est);
    debug!(ns_per_square, target_ms, t = delay.get(), "delay calibrated");
    delay
}
