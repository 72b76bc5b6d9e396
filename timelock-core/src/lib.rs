#![forbid(unsafe_code)]

pub mod config;
pub mod error;
pub mod persist;

pub use config::TimelockConfig;
pub use error::{TimelockError, TimelockResult};
