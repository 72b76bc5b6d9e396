#![forbid(unsafe_code)]

//! Number-theoretic helpers: uniform sampling below a bound, Miller-Rabin primality, random
//! and safe prime generation, and the Jacobi symbol.
//!
//! Primality uses trial division by the primes below 256 followed by Miller-Rabin with base 2
//! and [`MILLER_RABIN_ROUNDS`] further bases. Those bases are derived from the candidate with
//! SHA-512, so the test is deterministic for a given input and needs no entropy, while still
//! giving a false-positive bound of `4^-MILLER_RABIN_ROUNDS` for candidates not built against
//! the derivation.

use num_bigint::BigUint;
use num_integer::Integer;
use num_traits::{One, ToPrimitive, Zero};
use rand::RngCore;
use sha2::{Digest, Sha512};

use crate::error::VdfResult;

/// Number of hash-derived Miller-Rabin bases, in addition to base 2.
pub const MILLER_RABIN_ROUNDS: u32 = 20;

const BASE_DOMAIN: &[u8] = b"timelock-miller-rabin-base";

const SMALL_PRIMES: [u32; 53] = [
    3, 5, 7, 11, 13, 17, 19, 23, 29, 31, 37, 41, 43, 47, 53, 59, 61, 67, 71, 73, 79, 83, 89, 97,
    101, 103, 107, 109, 113, 127, 131, 137, 139, 149, 151, 157, 163, 167, 173, 179, 181, 191, 193,
    197, 199, 211, 223, 227, 229, 233, 239, 241, 251,
];

/// Anything below 257^2 that survives trial division is prime.
const TRIAL_DIVISION_BOUND: u32 = 257 * 257;

/// Draw a uniform integer in `[0, bound)` by rejection sampling over `bits(bound)` random bits.
///
/// # Panics
/// * If `bound` is zero.
pub fn random_below<R: RngCore + ?Sized>(bound: &BigUint, rng: &mut R) -> VdfResult<BigUint> {
    assert!(!bound.is_zero(), "bound must be non-zero");
    let bits = bound.bits();
    let byte_len = ((bits + 7) / 8) as usize;
    let excess = (byte_len as u64 * 8 - bits) as u32;
    let mut bytes = vec![0u8; byte_len];
    loop {
        rng.try_fill_bytes(&mut bytes)?;
        bytes[0] &= 0xffu8 >> excess;
        let candidate = BigUint::from_bytes_be(&bytes);
        if &candidate < bound {
            return Ok(candidate);
        }
    }
}

/// Generate a random prime of exactly `bits` bits with the top two bits set, so that the
/// product of two such primes has exactly `2 * bits` bits.
///
/// # Panics
/// * If `bits < 2`.
pub fn random_prime<R: RngCore + ?Sized>(bits: u64, rng: &mut R) -> VdfResult<BigUint> {
    assert!(bits >= 2, "prime needs at least two bits");
    let byte_len = ((bits + 7) / 8) as usize;
    let excess = (byte_len as u64 * 8 - bits) as u32;
    let mut bytes = vec![0u8; byte_len];
    loop {
        rng.try_fill_bytes(&mut bytes)?;
        bytes[0] &= 0xffu8 >> excess;
        let mut candidate = BigUint::from_bytes_be(&bytes);
        candidate.set_bit(bits - 1, true);
        candidate.set_bit(bits - 2, true);
        candidate.set_bit(0, true);
        if is_probable_prime(&candidate) {
            return Ok(candidate);
        }
    }
}

/// Probabilistic primality test (trial division, then Miller-Rabin).
#[must_use]
pub fn is_probable_prime(n: &BigUint) -> bool {
    let Some(small) = n.to_u32().filter(|v| *v < TRIAL_DIVISION_BOUND) else {
        return !has_small_factor(n) && miller_rabin_rounds(n);
    };
    match small {
        0 | 1 => false,
        2 => true,
        v if v % 2 == 0 => false,
        v => SMALL_PRIMES.iter().take_while(|p| **p * **p <= v).all(|p| v % p != 0),
    }
}

/// A prime `p` is safe iff `(p - 1) / 2` is also prime.
#[must_use]
pub fn is_safe_prime(p: &BigUint) -> bool {
    if p.is_zero() {
        return false;
    }
    let sophie_germain: BigUint = (p - 1u32) >> 1;
    is_probable_prime(p) && is_probable_prime(&sophie_germain)
}

/// Jacobi symbol `(a / n)` for odd positive `n`. Returns `-1`, `0` or `1`.
///
/// # Panics
/// * If `n` is even.
#[must_use]
pub fn jacobi(a: &BigUint, n: &BigUint) -> i8 {
    assert!(n.is_odd(), "Jacobi symbol needs an odd modulus");
    let mut a = a % n;
    let mut n = n.clone();
    let mut result = 1i8;
    while !a.is_zero() {
        let twos = a.trailing_zeros().unwrap_or(0);
        a >>= twos;
        let n_mod_8 = low_bits(&n, 8);
        if twos % 2 == 1 && (n_mod_8 == 3 || n_mod_8 == 5) {
            result = -result;
        }
        std::mem::swap(&mut a, &mut n);
        if low_bits(&a, 4) == 3 && low_bits(&n, 4) == 3 {
            result = -result;
        }
        a %= &n;
    }
    if n.is_one() {
        result
    } else {
        0
    }
}

/// `n mod m` for a small power-of-two `m`.
fn low_bits(n: &BigUint, m: u32) -> u32 {
    (n % m).to_u32().unwrap_or(0)
}

fn has_small_factor(n: &BigUint) -> bool {
    if n.is_even() {
        return true;
    }
    SMALL_PRIMES.iter().any(|p| (n % *p).is_zero())
}

fn miller_rabin_rounds(n: &BigUint) -> bool {
    if !miller_rabin(n, &BigUint::from(2u8)) {
        return false;
    }
    // bases land in [2, n - 2]
    let span = n - 3u32;
    let encoded = n.to_bytes_be();
    (0..MILLER_RABIN_ROUNDS).all(|round| {
        let mut hasher = Sha512::new();
        hasher.update(BASE_DOMAIN);
        hasher.update(&encoded);
        hasher.update(round.to_le_bytes());
        let base = BigUint::from_bytes_be(&hasher.finalize()) % &span + 2u32;
        miller_rabin(n, &base)
    })
}

fn miller_rabin(n: &BigUint, a: &BigUint) -> bool {
    let one = BigUint::one();
    let nm1 = n - &one;
    // write n-1 = d * 2^s with d odd
    let s = nm1.trailing_zeros().unwrap_or(0);
    let d = &nm1 >> s;

    let mut x = a.modpow(&d, n);
    if x == one || x == nm1 {
        return true;
    }
    for _ in 1..s {
        x = (&x * &x) % n;
        if x == nm1 {
            return true;
        }
    }
    false
}

/// Randomness source whose every draw fails, counting the attempts.
#[cfg(test)]
pub(crate) struct FailingRng {
    pub(crate) draws: u32,
}

#[cfg(test)]
impl RngCore for FailingRng {
    fn next_u32(&mut self) -> u32 {
        panic!("infallible draw on a failing source")
    }

    fn next_u64(&mut self) -> u64 {
        panic!("infallible draw on a failing source")
    }

    fn fill_bytes(&mut self, _dest: &mut [u8]) {
        panic!("infallible draw on a failing source")
    }

    fn try_fill_bytes(&mut self, _dest: &mut [u8]) -> Result<(), rand::Error> {
        self.draws += 1;
        Err(rand::Error::new(std::io::Error::new(std::io::ErrorKind::Other, "entropy exhausted")))
    }
}

#[cfg(test)]
impl rand::CryptoRng for FailingRng {}
