#![forbid(unsafe_code)]

//! Repeated squaring engine.
//!
//! `x^{2^k} mod n` is evaluated as `k` sequential modular squarings. In a group of unknown
//! order there is no way to reduce the exponent `2^k`, and the squarings cannot be
//! parallelised, so this loop is the delay the whole protocol certifies. It is also the only
//! long-running operation in the crate and is not interruptible.

use num_bigint::BigUint;

/// Compute `base^{2^k} mod modulus` by `k` sequential squarings.
///
/// `k = 0` returns `base` unchanged (not reduced).
#[must_use]
pub fn square(base: &BigUint, modulus: &BigUint, k: u64) -> BigUint {
    let mut y = base.clone();
    for _ in 0..k {
        y = (&y * &y) % modulus;
    }
    y
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn zero_squarings_is_identity() {
        let n = BigUint::from(1019u32 * 1187u32);
        let x = BigUint::from(5u8);
        assert_eq!(square(&x, &n, 0), x);
    }

    #[test]
    fn matches_modpow_with_explicit_exponent() {
        let n = BigUint::from(1019u32 * 1187u32);
        let x = BigUint::from(12345u32);
        // 2^10 = 1024
        assert_eq!(square(&x, &n, 10), x.modpow(&BigUint::from(1024u32), &n));
    }

    proptest! {
        #[test]
        fn halves_compose(base in 2u64..u64::MAX, modulus in 3u64..u64::MAX, half in 0u64..200) {
            let b = BigUint::from(base);
            let m = BigUint::from(modulus | 1);
            let k = half * 2;
            let direct = square(&b, &m, k);
            let split = square(&square(&b, &m, half), &m, half);
            prop_assert_eq!(direct, split);
        }
    }
}
