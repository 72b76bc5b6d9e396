#![no_main]
use libfuzzer_sys::fuzz_target;
use timelock_vdf::PuzzleInstance;

fuzz_target!(|data: &[u8]| {
    if let Ok(puzzle) = PuzzleInstance::from_cbor(data) {
        let _ = puzzle.verify();
    }
});
