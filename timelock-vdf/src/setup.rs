#![forbid(unsafe_code)]

//! Trusted setup of the RSA group of unknown order.
//!
//! [`setup`] searches two safe primes `p`, `q` of `security_bits / 2` bits in parallel, multiplies
//! them and drops them. Only `N = p*q` leaves this module, wrapped in [`Modulus`], whose public
//! surface never exposes a factorization. A single-party ceremony is only as trustworthy as the
//! machine running it; moduli produced elsewhere (for instance by a multi-party computation) can
//! be adopted with [`Modulus::from_public`].

use std::{fmt, sync::Arc, time::Instant};

use num_bigint::BigUint;
use num_integer::Integer;
use rand::rngs::OsRng;
use rand::RngCore;
use serde::{Deserialize, Serialize};
use timelock_core::config::MIN_SECURITY_BITS;
use tracing::{debug, info};

use crate::error::{VdfError, VdfResult};
use crate::prime::{is_probable_prime, random_prime};

/// Public RSA modulus `N`. Immutable and cheap to clone; every puzzle derived from it shares the
/// same allocation.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "BigUint", into = "BigUint")]
pub struct Modulus(Arc<BigUint>);

impl Modulus {
    /// Adopt a modulus produced elsewhere. `n` must be odd and at least 3.
    pub fn from_public(n: BigUint) -> VdfResult<Self> {
        if n.is_even() || n < BigUint::from(3u8) {
            return Err(VdfError::InvalidModulus);
        }
        Ok(Self(Arc::new(n)))
    }

    /// The modulus as an integer.
    #[must_use]
    pub fn value(&self) -> &BigUint {
        &self.0
    }

    /// Bit length of `N`.
    #[must_use]
    pub fn bits(&self) -> u64 {
        self.0.bits()
    }

    /// Byte length of the big-endian encoding of `N`.
    #[must_use]
    pub fn byte_len(&self) -> usize {
        ((self.bits() + 7) / 8) as usize
    }

    /// Representative of `{v, N - v}` in `[0, (N-1)/2]`. `v` must be reduced.
    ///
    /// Proof values travel in this signed encoding so that the order-two element `-1` cannot
    /// be used to flip the sign of a claimed output.
    #[must_use]
    pub fn canonical(&self, v: BigUint) -> BigUint {
        let negated = self.value() - &v;
        if negated < v {
            negated
        } else {
            v
        }
    }

    /// Returns true iff `v` lies in `[0, (N-1)/2]`.
    #[must_use]
    pub fn is_canonical(&self, v: &BigUint) -> bool {
        *v <= (self.value() >> 1u32)
    }
}

impl fmt::Debug for Modulus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Modulus({} bits)", self.bits())
    }
}

impl fmt::Display for Modulus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:x}", self.0.as_ref())
    }
}

impl TryFrom<BigUint> for Modulus {
    type Error = VdfError;

    fn try_from(n: BigUint) -> VdfResult<Self> {
        Self::from_public(n)
    }
}

impl From<Modulus> for BigUint {
    fn from(m: Modulus) -> Self {
        Arc::try_unwrap(m.0).unwrap_or_else(|shared| (*shared).clone())
    }
}

/// A safe prime factor. Not `Debug`, `Clone` or serializable.
struct SafePrime(BigUint);

/// Generate `N = p*q` from two independently sampled safe primes of `security_bits / 2` bits.
///
/// The searches run on the rayon pool and join before the product is formed. Each is unbounded:
/// it terminates almost surely, and capping it could spuriously fail a legitimate setup. The
/// only error besides a too-small `security_bits` is an OS randomness failure.
pub fn setup(security_bits: u64) -> VdfResult<Modulus> {
    if security_bits < MIN_SECURITY_BITS {
        return Err(VdfError::SecurityTooSmall { got: security_bits, min: MIN_SECURITY_BITS });
    }
    let prime_bits = security_bits / 2;
    let start = Instant::now();

    let (p, q) = rayon::join(
        || search_safe_prime(prime_bits, &mut OsRng),
        || search_safe_prime(prime_bits, &mut OsRng),
    );
    let p = p?;
    let mut q = q?;
    while q.0 == p.0 {
        debug!("both searches returned the same prime, resampling q");
        q = search_safe_prime(prime_bits, &mut OsRng)?;
    }

    let n = &p.0 * &q.0;
    drop(p);
    drop(q);

    let modulus = Modulus(Arc::new(n));
    info!(
        bits = modulus.bits(),
        elapsed_ms = start.elapsed().as_millis() as u64,
        "modulus generated"
    );
    Ok(modulus)
}

/// Draw random primes until one is safe.
fn search_safe_prime<R: RngCore + ?Sized>(bits: u64, rng: &mut R) -> VdfResult<SafePrime> {
    let mut attempts = 0u64;
    loop {
        attempts += 1;
        let candidate = random_prime(bits, rng)?;
        let half: BigUint = (&candidate - 1u32) >> 1;
        if is_probable_prime(&half) {
            debug!(bits, attempts, "safe prime found");
            return Ok(SafePrime(candidate));
        }
    }
}
