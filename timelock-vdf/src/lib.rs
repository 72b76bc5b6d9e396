#![forbid(unsafe_code)]

//! Pietrzak verifiable delay function over an RSA group of unknown order.
//!
//! A puzzle asks for `y = x^{2^T} mod N`, which takes `T` strictly sequential squarings when the
//! factorization of `N` is unknown. Alongside `y` the solver publishes `log2(T)` checkpoints that
//! let anyone check the result with `O(log T)` exponentiations.
//!
//! The protocol runs in four steps:
//! 1. [`setup`] samples two safe primes in parallel and publishes only `N = p*q`.
//! 2. [`generate`] draws a challenge in the quadratic residues of `N` for a power-of-two `T`.
//! 3. [`PuzzleInstance::solve`] evaluates the delay and builds the halving proof.
//! 4. [`PuzzleInstance::verify`] replays the folding with the Fiat-Shamir challenges.
//!
//! ```no_run
//! let modulus = timelock_vdf::setup(2048)?;
//! let mut puzzle = timelock_vdf::generate(&modulus, 1 << 20, 2048)?;
//! puzzle.solve();
//! assert!(puzzle.verify());
//! # Ok::<(), timelock_vdf::VdfError>(())
//! ```
//!
//! Security notes:
//! * Arithmetic is not constant-time. The only secrets, `p` and `q`, exist only inside
//!   [`setup`].
//! * Whoever runs [`setup`] could keep the factorization. Moduli from an external ceremony
//!   are adopted with [`Modulus::from_public`].

pub mod calibrate;
pub mod challenge;
mod codec;
pub mod error;
pub mod prime;
pub mod prove;
pub mod puzzle;
pub mod setup;
pub mod square;
pub mod verify;

pub use calibrate::calibrate_delay;
pub use challenge::challenge;
pub use error::{VdfError, VdfResult, VerifyError};
pub use prime::{is_probable_prime, is_safe_prime, jacobi};
pub use prove::prove;
pub use puzzle::{generate, is_power_of_two, DelayParameter, Proof, PuzzleInstance};
pub use setup::{setup, Modulus};
pub use square::square;
pub use verify::verify_proof;
