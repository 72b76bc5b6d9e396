#![no_main]
use libfuzzer_sys::fuzz_target;
use num_bigint::BigUint;
use timelock_vdf::{DelayParameter, Modulus, Proof, PuzzleInstance};

fuzz_target!(|input: (u8, u32, u32, Vec<u32>)| {
    let (log_t, challenge, output, checkpoints) = input;
    // Small fixed modulus from safe primes 1019 and 1187
    let Ok(n) = Modulus::from_public(BigUint::from(1019u32 * 1187u32)) else {
        return;
    };
    let delay = DelayParameter::floor(1u64 << (log_t % 32));
    let proof = Proof {
        output: BigUint::from(output),
        checkpoints: checkpoints.into_iter().map(BigUint::from).collect(),
    };
    let puzzle = PuzzleInstance::from_parts(n, BigUint::from(challenge), delay, 21, Some(proof));
    let _ = puzzle.verify();
});
