#![forbid(unsafe_code)]

//! Compact CBOR encoding of puzzle instances for transport. Checkpoints are encoded as a CBOR
//! array and keep their generation order.

use crate::puzzle::PuzzleInstance;

impl PuzzleInstance {
    pub fn to_cbor(&self) -> Result<Vec<u8>, serde_cbor::Error> {
        serde_cbor::to_vec(self)
    }

    /// Decode an instance. The modulus and delay are re-validated during decoding.
    pub fn from_cbor(bytes: &[u8]) -> Result<Self, serde_cbor::Error> {
        serde_cbor::from_slice(bytes)
    }
}
