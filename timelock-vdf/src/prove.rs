#![forbid(unsafe_code)]

//! Proof construction by recursive halving.
//!
//! Round 0 computes the midpoint `mu_0 = x^{2^{T/2}}` and the output `y = mu_0^{2^{T/2}}`, which
//! costs all `T` sequential squarings. Every later round folds the claim `y_i = x_i^{2^{T/2^i}}`
//! into a claim of half the delay using the Fiat-Shamir challenge `H(x_i, y_i, mu_i, T/2^i)`, so
//! it only needs `T/2^{i+1}` squarings plus two exponentiations. The loop ends once the remaining
//! delay is 1, after `log2(T)` rounds.
//!
//! The output and every checkpoint are published as [`Modulus::canonical`] representatives, so
//! each claim only holds up to sign. Squaring erases the sign, which keeps honest proofs valid.

use std::time::Instant;

use num_bigint::BigUint;
use tracing::{debug, info};

use crate::challenge::fold;
use crate::puzzle::{DelayParameter, Proof, PuzzleInstance};
use crate::setup::Modulus;
use crate::square::square;

/// Evaluate the VDF on `challenge` and build the halving proof.
#[must_use]
pub fn prove(modulus: &Modulus, challenge: &BigUint, delay: DelayParameter) -> Proof {
    let n = modulus.value();
    let t = delay.get();
    if t == 1 {
        let output = modulus.canonical(square(challenge, n, 1));
        return Proof { output, checkpoints: Vec::new() };
    }

    let start = Instant::now();
    let mu = square(challenge, n, t / 2);
    let output = modulus.canonical(square(&mu, n, t / 2));
    let mu = modulus.canonical(mu);
    debug!(t, elapsed_ms = start.elapsed().as_millis() as u64, "sequential squaring done");

    let mut checkpoints = Vec::with_capacity(delay.rounds() as usize);
    let (mut x, mut y) = fold(modulus, challenge, &output, &mu, t);
    checkpoints.push(mu);

    // d = 2^{i+1} for round i; the remaining delay entering round i is t / (d / 2)
    let mut d = 4u64;
    while d <= t {
        let mu = modulus.canonical(square(&x, n, t / d));
        (x, y) = fold(modulus, &x, &y, &mu, t / (d / 2));
        checkpoints.push(mu);
        d = match d.checked_mul(2) {
            Some(next) => next,
            None => break,
        };
    }

    Proof { output, checkpoints }
}

impl PuzzleInstance {
    /// Solve the puzzle in place, attaching the output and checkpoints.
    ///
    /// Blocks for the full delay. Solving an already solved instance recomputes and replaces the
    /// proof.
    pub fn solve(&mut self) {
        let start = Instant::now();
        let proof = prove(&self.modulus, &self.challenge, self.delay);
        info!(
            t = self.delay.get(),
            checkpoints = proof.checkpoints.len(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "puzzle solved"
        );
        self.proof = Some(proof);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::StdRng, SeedableRng};

    fn small_modulus() -> Modulus {
        Modulus::from_public(BigUint::from(1019u32 * 1187u32)).unwrap()
    }

    #[test]
    fn output_is_full_exponentiation() {
        let m = small_modulus();
        let x = BigUint::from(16u8);
        for t in [1u64, 2, 4, 32, 1024] {
            let proof = prove(&m, &x, DelayParameter::new(t).unwrap());
            assert_eq!(proof.output, m.canonical(square(&x, m.value(), t)), "t = {t}");
        }
    }

    #[test]
    fn one_checkpoint_per_round() {
        let m = small_modulus();
        let x = BigUint::from(16u8);
        for exp in 0..12 {
            let delay = DelayParameter::new(1 << exp).unwrap();
            let proof = prove(&m, &x, delay);
            assert_eq!(proof.checkpoints.len(), exp as usize);
        }
    }

    #[test]
    fn first_checkpoint_is_midpoint() {
        let m = small_modulus();
        let x = BigUint::from(25u8);
        let proof = prove(&m, &x, DelayParameter::new(64).unwrap());
        assert_eq!(proof.checkpoints[0], m.canonical(square(&x, m.value(), 32)));
    }

    #[test]
    fn published_values_are_canonical() {
        let m = small_modulus();
        let x = BigUint::from(49u8);
        let proof = prove(&m, &x, DelayParameter::new(1024).unwrap());
        assert!(m.is_canonical(&proof.output));
        assert!(proof.checkpoints.iter().all(|mu| m.is_canonical(mu)));
    }

    #[test]
    fn solve_is_repeatable() {
        let m = small_modulus();
        let mut rng = StdRng::seed_from_u64(5);
        let mut puzzle = PuzzleInstance::generate_with_rng(&m, 128, 21, &mut rng).unwrap();
        puzzle.solve();
        let first = puzzle.proof().cloned().unwrap();
        puzzle.solve();
        assert_eq!(puzzle.proof(), Some(&first));
    }
}
