#![forbid(unsafe_code)]

//! Error types for the VDF layer.
//!
//! [`VdfError`] covers conditions that abort an operation (entropy failure, caller-contract
//! violations). [`VerifyError`] describes why a proof was rejected; it is a protocol outcome,
//! not a failure, and does not convert into [`VdfError`].

use thiserror::Error;

#[derive(Debug, Error)]
pub enum VdfError {
    /// The operating system randomness source failed. Never retried.
    #[error("randomness source failure: {0}")]
    Entropy(#[from] rand::Error),

    /// Delay parameters drive a halving schedule and must be exact powers of two.
    #[error("delay parameter must be a power of two, got {0}")]
    DelayNotPowerOfTwo(u64),

    /// Security parameter cannot hold two distinct safe primes.
    #[error("security parameter of {got} bits is below the minimum of {min}")]
    SecurityTooSmall { got: u64, min: u64 },

    /// Externally supplied modulus is even or smaller than 3.
    #[error("modulus must be odd and at least 3")]
    InvalidModulus,
}

/// Reason a proof failed verification.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum VerifyError {
    /// No proof is attached to the instance.
    #[error("instance has not been solved")]
    Unsolved,

    /// One checkpoint per halving round is required.
    #[error("expected {expected} checkpoints, found {actual}")]
    CheckpointCount { expected: usize, actual: usize },

    /// Challenge is not reduced modulo N, or output or a checkpoint exceeds `(N-1)/2`.
    #[error("proof value out of range for modulus")]
    OutOfRange,

    /// Output or a checkpoint has Jacobi symbol other than `+1`.
    #[error("proof value is not a signed quadratic residue")]
    NotSignedResidue,

    /// The folded claim did not close with a single squaring.
    #[error("folded output mismatch")]
    Mismatch,
}

/// Convenient alias for fallible VDF operations.
pub type VdfResult<T> = Result<T, VdfError>;
