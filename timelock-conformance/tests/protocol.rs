use std::sync::OnceLock;

use timelock_conformance::{accepted_flips, flip_bit, small_modulus, solved, targets, Target};
use timelock_vdf::{setup, verify_proof, Modulus, PuzzleInstance, VerifyError};

/// 512-bit modulus shared by every test in this file; setup at this size takes a while.
fn modulus_512() -> &'static Modulus {
    static MODULUS: OnceLock<Modulus> = OnceLock::new();
    MODULUS.get_or_init(|| setup(512).expect("setup"))
}

fn scenario() -> &'static PuzzleInstance {
    static PUZZLE: OnceLock<PuzzleInstance> = OnceLock::new();
    PUZZLE.get_or_init(|| solved(modulus_512(), 256))
}

#[test]
fn concrete_512_bit_scenario() {
    let puzzle = scenario();
    assert_eq!(puzzle.modulus().bits(), 512);
    assert_eq!(puzzle.proof().unwrap().checkpoints.len(), 8);
    assert!(puzzle.verify());

    let mut tampered = puzzle.clone();
    let mu = &mut tampered.proof_mut().unwrap().checkpoints[3];
    for bit in 0..8 {
        let set = mu.bit(bit);
        mu.set_bit(bit, !set);
    }
    assert!(!tampered.verify());
}

#[test]
fn every_checkpoint_detects_single_bit_flips() {
    let puzzle = scenario();
    let bits = puzzle.modulus().bits();
    assert!(accepted_flips(puzzle, bits).is_empty());
}

#[test]
fn restoring_a_flipped_bit_restores_acceptance() {
    let puzzle = scenario();
    let bits = puzzle.modulus().bits();
    for target in targets(puzzle) {
        for bit in [0, 17, bits / 2, bits - 1] {
            let mut p = puzzle.clone();
            flip_bit(&mut p, target, bit);
            assert!(!p.verify(), "{target:?} bit {bit} flip accepted");
            flip_bit(&mut p, target, bit);
            assert!(p.verify(), "{target:?} bit {bit} not restored");
        }
    }
}

#[test]
fn high_bit_flip_is_out_of_range() {
    let puzzle = scenario();
    let mut p = puzzle.clone();
    flip_bit(&mut p, Target::Output, 600);
    assert_eq!(p.check(), Err(VerifyError::OutOfRange));
}

#[test]
fn concurrent_readers_agree() {
    let puzzle = scenario();
    let mut bad = puzzle.clone();
    flip_bit(&mut bad, Target::Checkpoint(5), 0);

    std::thread::scope(|s| {
        let handles: Vec<_> = (0..4)
            .map(|_| s.spawn(|| (puzzle.verify(), bad.verify())))
            .collect();
        for h in handles {
            assert_eq!(h.join().unwrap(), (true, false));
        }
    });
}

#[test]
fn completeness_across_sizes_and_delays() {
    for bits in [64, 128, 256] {
        let modulus = setup(bits).unwrap();
        assert_eq!(modulus.bits(), bits);
        for t in [1, 2, 32, 1024] {
            let puzzle = solved(&modulus, t);
            assert_eq!(puzzle.proof().unwrap().checkpoints.len(), t.trailing_zeros() as usize);
            assert!(puzzle.verify(), "bits={bits} t={t}");
        }
    }
}

#[test]
fn proof_is_bound_to_its_modulus() {
    let puzzle = scenario();
    let other = small_modulus();
    let proof = puzzle.proof().unwrap();
    assert!(verify_proof(&other, puzzle.challenge(), puzzle.delay(), proof).is_err());
}

#[test]
fn delay_one_has_no_checkpoints() {
    let puzzle = solved(modulus_512(), 1);
    let proof = puzzle.proof().unwrap();
    assert!(proof.checkpoints.is_empty());
    let n = puzzle.modulus().value();
    let squared = (puzzle.challenge() * puzzle.challenge()) % n;
    assert_eq!(proof.output, puzzle.modulus().canonical(squared));
    assert!(puzzle.verify());
}
