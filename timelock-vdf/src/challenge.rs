#![forbid(unsafe_code)]

//! Fiat-Shamir challenge derivation and the folding step shared by prover and verifier.
//!
//! `H(x, y, mu, t) = SHA-512(tag || x || y || mu || le64(t)) mod N`, with every group element
//! encoded big-endian and left-padded to the byte length of `N`. When `N` is not at least
//! [`WIDTH_MARGIN_BYTES`] narrower than the 64-byte digest, the digest seeds a counter-mode
//! expansion until the hash output exceeds `N` by that margin, keeping the reduction close to
//! uniform for large moduli.

use num_bigint::BigUint;
use sha2::{Digest, Sha512};

use crate::setup::Modulus;

const CHALLENGE_DOMAIN: &[u8] = b"timelock-pietrzak-challenge";
const EXPAND_DOMAIN: &[u8] = b"timelock-pietrzak-expand";

/// Extra hash bytes beyond the width of `N` before reducing.
pub const WIDTH_MARGIN_BYTES: usize = 16;

/// Derive the round challenge `r = H(x, y, mu, t)`.
#[must_use]
pub fn challenge(modulus: &Modulus, x: &BigUint, y: &BigUint, mu: &BigUint, t: u64) -> BigUint {
    let width = modulus.byte_len();
    let mut hasher = Sha512::new();
    hasher.update(CHALLENGE_DOMAIN);
    hasher.update(padded(x, width));
    hasher.update(padded(y, width));
    hasher.update(padded(mu, width));
    hasher.update(t.to_le_bytes());
    let seed = hasher.finalize();

    let mut wide = seed.to_vec();
    let mut counter = 1u32;
    while wide.len() < width + WIDTH_MARGIN_BYTES {
        let mut expander = Sha512::new();
        expander.update(EXPAND_DOMAIN);
        expander.update(&seed);
        expander.update(counter.to_le_bytes());
        wide.extend_from_slice(&expander.finalize());
        counter += 1;
    }
    BigUint::from_bytes_be(&wide) % modulus.value()
}

/// One halving step: `x' = x^r * mu`, `y' = mu^r * y` with `r = H(x, y, mu, remaining)`. Both
/// results are returned in canonical signed form.
pub(crate) fn fold(
    modulus: &Modulus,
    x: &BigUint,
    y: &BigUint,
    mu: &BigUint,
    remaining: u64,
) -> (BigUint, BigUint) {
    let n = modulus.value();
    let r = challenge(modulus, x, y, mu, remaining);
    let next_x = (x.modpow(&r, n) * mu) % n;
    let next_y = (mu.modpow(&r, n) * y) % n;
    (modulus.canonical(next_x), modulus.canonical(next_y))
}

fn padded(value: &BigUint, width: usize) -> Vec<u8> {
    let bytes = value.to_bytes_be();
    if bytes.len() >= width {
        return bytes;
    }
    let mut out = vec![0u8; width - bytes.len()];
    out.extend_from_slice(&bytes);
    out
}
