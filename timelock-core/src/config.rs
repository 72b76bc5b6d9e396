#![forbid(unsafe_code)]

//! Timelock configuration handling. Parses a TOML file into a strongly-typed structure holding
//! the defaults used by the command line tool when setting up moduli and generating puzzles.

use serde::Deserialize;
use std::{fs, path::Path};

use crate::TimelockError;

/// Smallest modulus size the protocol accepts. Below 16-bit factors there are too few safe
/// primes with the top two bits set to draw two distinct ones.
pub const MIN_SECURITY_BITS: u64 = 32;

/// Primary configuration structure shared across Timelock components.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct TimelockConfig {
    /// Bit length of the RSA modulus produced by setup.
    #[serde(default = "default_security_bits")]
    pub security_bits: u64,

    /// Number of sequential squarings a puzzle demands. Must be a power of two.
    #[serde(default = "default_delay")]
    pub delay: u64,

    /// Logging verbosity (`error`, `warn`, `info`, `debug`, `trace`).
    pub log_level: Option<String>,

    /// When set, `delay` is replaced by a calibrated value targeting this many milliseconds.
    pub calibration_target_ms: Option<u64>,
}

impl Default for TimelockConfig {
    fn default() -> Self {
        Self {
            security_bits: default_security_bits(),
            delay: default_delay(),
            log_level: Some("info".to_string()),
            calibration_target_ms: None,
        }
    }
}

fn default_security_bits() -> u64 {
    2048
}

fn default_delay() -> u64 {
    1 << 20
}

impl TimelockConfig {
    /// Load a configuration file from the given path.
    pub fn from_file<P: AsRef<Path>>(path: P) -> crate::TimelockResult<Self> {
        let data = fs::read_to_string(&path).map_err(TimelockError::from)?;
        let cfg = toml::from_str::<TimelockConfig>(&data).map_err(TimelockError::ConfigParse)?;
        cfg.validate()?;
        tracing::debug!(path = %path.as_ref().display(), "loaded timelock config");
        Ok(cfg)
    }

    /// Check the values the protocol layer would otherwise reject later.
    pub fn validate(&self) -> crate::TimelockResult<()> {
        if self.security_bits < MIN_SECURITY_BITS {
            return Err(TimelockError::ConfigInvalid(format!(
                "security_bits must be at least {MIN_SECURITY_BITS}, got {}",
                self.security_bits
            )));
        }
        if self.delay.count_ones() != 1 {
            return Err(TimelockError::ConfigInvalid(format!(
                "delay must be a power of two, got {}",
                self.delay
            )));
        }
        if self.calibration_target_ms == Some(0) {
            return Err(TimelockError::ConfigInvalid(
                "calibration_target_ms must be positive".to_string(),
            ));
        }
        Ok(())
    }

    /// Log level, falling back to `info`.
    #[must_use]
    pub fn log_level(&self) -> &str {
        self.log_level.as_deref().unwrap_or("info")
    }
}
