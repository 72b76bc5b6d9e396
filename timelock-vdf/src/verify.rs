#![forbid(unsafe_code)]

//! Proof verification.
//!
//! The verifier replays the folding with the checkpoints it is given, recomputing each challenge
//! with the remaining-delay schedule `T, T/2, T/4, ...`. After `log2(T)` folds the claim has
//! delay 1 and is checked with a single squaring. Cost is `O(log T)` exponentiations.
//!
//! Output and checkpoints must be canonical signed residues: at most `(N-1)/2` and with Jacobi
//! symbol `+1`. Everything else in `Z_N*` differs from a signed residue by a square root of
//! unity, which a forger could otherwise cancel out with a lucky odd challenge.

use num_bigint::BigUint;
use tracing::debug;

use crate::challenge::fold;
use crate::error::VerifyError;
use crate::prime::jacobi;
use crate::puzzle::{DelayParameter, Proof, PuzzleInstance};
use crate::setup::Modulus;
use crate::square::square;

/// Check `proof` for the puzzle `(modulus, challenge, delay)`.
pub fn verify_proof(
    modulus: &Modulus,
    challenge: &BigUint,
    delay: DelayParameter,
    proof: &Proof,
) -> Result<(), VerifyError> {
    let expected = delay.rounds() as usize;
    if proof.checkpoints.len() != expected {
        return Err(VerifyError::CheckpointCount { expected, actual: proof.checkpoints.len() });
    }
    let n = modulus.value();
    let published = || std::iter::once(&proof.output).chain(&proof.checkpoints);
    if challenge >= n || !published().all(|v| modulus.is_canonical(v)) {
        return Err(VerifyError::OutOfRange);
    }
    if !published().all(|v| jacobi(v, n) == 1) {
        return Err(VerifyError::NotSignedResidue);
    }

    let mut x = challenge.clone();
    let mut y = proof.output.clone();
    let mut remaining = delay.get();
    for mu in &proof.checkpoints {
        (x, y) = fold(modulus, &x, &y, mu, remaining);
        remaining /= 2;
    }

    if modulus.canonical(square(&x, n, 1)) == y {
        Ok(())
    } else {
        Err(VerifyError::Mismatch)
    }
}

impl PuzzleInstance {
    /// Detailed verification, reporting why a proof was rejected.
    pub fn check(&self) -> Result<(), VerifyError> {
        let proof = self.proof.as_ref().ok_or(VerifyError::Unsolved)?;
        verify_proof(&self.modulus, &self.challenge, self.delay, proof)
    }

    /// Returns true iff the attached proof is valid. Never panics on malformed proofs.
    #[must_use]
    pub fn verify(&self) -> bool {
        match self.check() {
            Ok(()) => true,
            Err(reason) => {
                debug!(%reason, t = self.delay.get(), "proof rejected");
                false
            }
        }
    }
}
