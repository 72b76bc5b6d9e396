#![forbid(unsafe_code)]

//! Timelock command line tool.
//!
//! Drives the four protocol steps over JSON files: `setup` writes a modulus, `generate` derives a
//! puzzle from it, `solve` attaches the proof and `verify` checks it. `calibrate` suggests a
//! delay for a wall-clock target on the current machine. Defaults come from an optional TOML
//! config.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::info;
use tracing_subscriber::EnvFilter;

use timelock_core::persist::{read_json, write_json};
use timelock_core::TimelockConfig;
use timelock_vdf::{calibrate_delay, generate, setup, Modulus, PuzzleInstance};

/// Exit status for a proof that was checked and rejected.
const EXIT_REJECTED: u8 = 2;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// TOML config supplying default security and delay parameters
    #[arg(short, long, env = "TIMELOCK_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate an RSA modulus from two safe primes
    Setup {
        /// Modulus size in bits
        #[arg(short, long)]
        bits: Option<u64>,
        /// Output file for the modulus
        #[arg(short, long, default_value = "modulus.json")]
        out: PathBuf,
    },
    /// Derive a puzzle from a modulus
    Generate {
        /// Modulus file written by `setup`
        #[arg(short, long, default_value = "modulus.json")]
        modulus: PathBuf,
        /// Number of sequential squarings (power of two)
        #[arg(short = 't', long)]
        delay: Option<u64>,
        /// Output file for the puzzle
        #[arg(short, long, default_value = "puzzle.json")]
        out: PathBuf,
    },
    /// Solve a puzzle and attach the proof
    Solve {
        /// Puzzle file written by `generate`
        #[arg(short, long, default_value = "puzzle.json")]
        puzzle: PathBuf,
        /// Output file for the solved puzzle; defaults to overwriting the input
        #[arg(short, long)]
        out: Option<PathBuf>,
    },
    /// Verify a solved puzzle
    Verify {
        /// Solved puzzle file
        #[arg(short, long, default_value = "puzzle.json")]
        puzzle: PathBuf,
    },
    /// Suggest a delay for a target solving time
    Calibrate {
        /// Modulus file written by `setup`
        #[arg(short, long, default_value = "modulus.json")]
        modulus: PathBuf,
        /// Target solving time in milliseconds
        #[arg(long)]
        target_ms: Option<u64>,
    },
}

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    let cfg = load_config(cli.config.as_deref())?;

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(cfg.log_level()));
    tracing_subscriber::fmt().with_env_filter(filter).with_writer(std::io::stderr).init();

    run(cli.command, &cfg)
}

fn load_config(path: Option<&Path>) -> Result<TimelockConfig> {
    match path {
        Some(path) => TimelockConfig::from_file(path)
            .with_context(|| format!("loading config {}", path.display())),
        None => Ok(TimelockConfig::default()),
    }
}

fn run(command: Commands, cfg: &TimelockConfig) -> Result<ExitCode> {
    match command {
        Commands::Setup { bits, out } => {
            let bits = bits.unwrap_or(cfg.security_bits);
            let modulus = setup(bits).context("modulus setup failed")?;
            write_json(&out, &modulus)?;
            println!("modulus: {} bits -> {}", modulus.bits(), out.display());
        }
        Commands::Generate { modulus, delay, out } => {
            let modulus: Modulus = read_json(&modulus)
                .with_context(|| format!("reading modulus {}", modulus.display()))?;
            let t = match (delay, cfg.calibration_target_ms) {
                (Some(t), _) => t,
                (None, Some(target_ms)) => calibrate_delay(&modulus, target_ms).get(),
                (None, None) => cfg.delay,
            };
            let puzzle = generate(&modulus, t, modulus.bits()).context("puzzle generation failed")?;
            write_json(&out, &puzzle)?;
            println!("puzzle: T = {t} -> {}", out.display());
        }
        Commands::Solve { puzzle, out } => {
            let mut instance: PuzzleInstance = read_json(&puzzle)
                .with_context(|| format!("reading puzzle {}", puzzle.display()))?;
            instance.solve();
            let out = out.unwrap_or(puzzle);
            write_json(&out, &instance)?;
            let checkpoints = instance.proof().map_or(0, |p| p.checkpoints.len());
            println!("solved: {checkpoints} checkpoints -> {}", out.display());
        }
        Commands::Verify { puzzle } => {
            let instance: PuzzleInstance = read_json(&puzzle)
                .with_context(|| format!("reading puzzle {}", puzzle.display()))?;
            if let Err(reason) = instance.check() {
                println!("rejected: {reason}");
                return Ok(ExitCode::from(EXIT_REJECTED));
            }
            println!("valid");
        }
        Commands::Calibrate { modulus, target_ms } => {
            let modulus: Modulus = read_json(&modulus)
                .with_context(|| format!("reading modulus {}", modulus.display()))?;
            let target_ms = target_ms.or(cfg.calibration_target_ms).unwrap_or(1_000);
            let delay = calibrate_delay(&modulus, target_ms);
            info!(target_ms, t = delay.get(), "calibration finished");
            println!("{}", delay.get());
        }
    }
    Ok(ExitCode::SUCCESS)
}
