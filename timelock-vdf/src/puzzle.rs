#![forbid(unsafe_code)]

//! Puzzle instances: a challenge element in the quadratic residues of `N`, a power-of-two delay
//! and, once solved, the proof.

use num_bigint::BigUint;
use rand::rngs::OsRng;
use rand::{CryptoRng, RngCore};
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::error::{VdfError, VdfResult};
use crate::prime::{jacobi, random_below};
use crate::setup::Modulus;

/// Returns true iff exactly one bit of `n` is set.
#[must_use]
pub fn is_power_of_two(n: u64) -> bool {
    n.count_ones() == 1
}

/// Number of sequential squarings `T`. Always a power of two.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u64", into = "u64")]
pub struct DelayParameter(u64);

impl DelayParameter {
    pub fn new(t: u64) -> VdfResult<Self> {
        if !is_power_of_two(t) {
            return Err(VdfError::DelayNotPowerOfTwo(t));
        }
        Ok(Self(t))
    }

    /// Largest delay whose power of two does not exceed `t`. `t = 0` maps to 1.
    #[must_use]
    pub fn floor(t: u64) -> Self {
        Self(1u64 << (63 - t.max(1).leading_zeros()))
    }

    #[must_use]
    pub fn get(self) -> u64 {
        self.0
    }

    /// Number of halving rounds, `log2(T)`. Equals the checkpoint count of a proof.
    #[must_use]
    pub fn rounds(self) -> u32 {
        self.0.trailing_zeros()
    }
}

impl TryFrom<u64> for DelayParameter {
    type Error = VdfError;

    fn try_from(t: u64) -> VdfResult<Self> {
        Self::new(t)
    }
}

impl From<DelayParameter> for u64 {
    fn from(t: DelayParameter) -> Self {
        t.0
    }
}

/// Claimed output `y = x^{2^T} mod N` together with the halving checkpoints
/// `mu_0 .. mu_{log2 T - 1}` in generation order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Proof {
    pub output: BigUint,
    pub checkpoints: Vec<BigUint>,
}

/// A puzzle derived from a modulus, solved in place by [`PuzzleInstance::solve`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PuzzleInstance {
    pub(crate) modulus: Modulus,
    pub(crate) challenge: BigUint,
    pub(crate) delay: DelayParameter,
    pub(crate) security_bits: u64,
    pub(crate) proof: Option<Proof>,
}

/// Derive a puzzle from `modulus` using the operating system RNG.
pub fn generate(modulus: &Modulus, t: u64, security_bits: u64) -> VdfResult<PuzzleInstance> {
    PuzzleInstance::generate_with_rng(modulus, t, security_bits, &mut OsRng)
}

impl PuzzleInstance {
    /// Derive a puzzle with a caller-supplied RNG.
    ///
    /// The challenge is drawn uniformly from `[0, N)`, redrawn while it shares a factor with `N`
    /// (Jacobi symbol zero), then squared so that it lies in `QR(N)`. The delay is validated
    /// before any randomness is consumed.
    pub fn generate_with_rng<R: RngCore + CryptoRng + ?Sized>(
        modulus: &Modulus,
        t: u64,
        security_bits: u64,
        rng: &mut R,
    ) -> VdfResult<Self> {
        let delay = DelayParameter::new(t)?;
        let n = modulus.value();
        let mut x = random_below(n, rng)?;
        while jacobi(&x, n) == 0 {
            trace!("challenge not coprime to modulus, resampling");
            x = random_below(n, rng)?;
        }
        let challenge = (&x * &x) % n;
        debug!(t, modulus_bits = modulus.bits(), "puzzle generated");
        Ok(Self { modulus: modulus.clone(), challenge, delay, security_bits, proof: None })
    }

    /// Assemble an instance from values received over some transport.
    ///
    /// Nothing here is checked against `N`; [`PuzzleInstance::check`] rejects values that are not
    /// reduced.
    #[must_use]
    pub fn from_parts(
        modulus: Modulus,
        challenge: BigUint,
        delay: DelayParameter,
        security_bits: u64,
        proof: Option<Proof>,
    ) -> Self {
        Self { modulus, challenge, delay, security_bits, proof }
    }

    #[must_use]
    pub fn modulus(&self) -> &Modulus {
        &self.modulus
    }

    #[must_use]
    pub fn challenge(&self) -> &BigUint {
        &self.challenge
    }

    #[must_use]
    pub fn delay(&self) -> DelayParameter {
        self.delay
    }

    #[must_use]
    pub fn security_bits(&self) -> u64 {
        self.security_bits
    }

    #[must_use]
    pub fn proof(&self) -> Option<&Proof> {
        self.proof.as_ref()
    }

    /// Mutable access to the attached proof, for transports that patch it in place.
    pub fn proof_mut(&mut self) -> Option<&mut Proof> {
        self.proof.as_mut()
    }

    /// Attach a proof received separately from the puzzle.
    pub fn set_proof(&mut self, proof: Proof) {
        self.proof = Some(proof);
    }

    #[must_use]
    pub fn is_solved(&self) -> bool {
        self.proof.is_some()
    }
}
