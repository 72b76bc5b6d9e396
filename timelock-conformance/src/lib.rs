#![forbid(unsafe_code)]

//! Shared fixtures for the conformance suite: small moduli built from known safe primes and a
//! bit-flip harness that corrupts one proof value at a time.

use num_bigint::BigUint;
use timelock_vdf::{generate, Modulus, PuzzleInstance};

/// Safe primes small enough for exhaustive checks.
pub const SMALL_SAFE_PRIMES: (u32, u32) = (1019, 1187);

/// `N = 1019 * 1187`.
#[must_use]
pub fn small_modulus() -> Modulus {
    let (p, q) = SMALL_SAFE_PRIMES;
    Modulus::from_public(BigUint::from(p) * BigUint::from(q)).expect("odd modulus")
}

/// Generate and solve a puzzle of delay `t` over `modulus`.
#[must_use]
pub fn solved(modulus: &Modulus, t: u64) -> PuzzleInstance {
    let mut puzzle = generate(modulus, t, modulus.bits()).expect("valid delay");
    puzzle.solve();
    puzzle
}

/// Which proof value a tampering step targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Target {
    Output,
    Checkpoint(usize),
}

/// Every target a proof of `instance` exposes, output first.
#[must_use]
pub fn targets(instance: &PuzzleInstance) -> Vec<Target> {
    let n = instance.proof().map_or(0, |p| p.checkpoints.len());
    std::iter::once(Target::Output).chain((0..n).map(Target::Checkpoint)).collect()
}

/// Flip `bit` of the targeted value in place. Applying the same flip twice restores the proof.
///
/// # Panics
/// If the instance is unsolved or the checkpoint index is out of range.
pub fn flip_bit(instance: &mut PuzzleInstance, target: Target, bit: u64) {
    let proof = instance.proof_mut().expect("solved instance");
    let value = match target {
        Target::Output => &mut proof.output,
        Target::Checkpoint(i) => &mut proof.checkpoints[i],
    };
    let set = value.bit(bit);
    value.set_bit(bit, !set);
}

/// Flip each of the low `bits` bits of every target and collect the flips the verifier accepted.
/// An empty result means no single-bit corruption got through.
#[must_use]
pub fn accepted_flips(instance: &PuzzleInstance, bits: u64) -> Vec<(Target, u64)> {
    let mut accepted = Vec::new();
    for target in targets(instance) {
        for bit in 0..bits {
            let mut tampered = instance.clone();
            flip_bit(&mut tampered, target, bit);
            if tampered.verify() {
                accepted.push((target, bit));
            }
        }
    }
    accepted
}
