use std::time::Duration;

use clap::Parser;

use crate::grid::GridSize;
use crate::rules::Neighborhood;

/// Fraction of the board brought to life by a randomize.
pub const DEFAULT_DENSITY: f64 = 0.08;

/// Time between two ticks while running, in milliseconds.
pub const DEFAULT_INTERVAL_MS: u64 = 200;

/// Cellular automaton on a wrapping board, in the terminal.
///
/// Keys: space starts or stops, `r` randomizes, `c` clears, digits followed by enter resize
/// the board, `q` quits.
#[derive(Debug, Clone, Parser)]
#[command(name = "torus-life", version)]
pub struct Config {
    /// Side length of the board, between 30 and 100.
    #[arg(long, short, default_value_t = GridSize::default())]
    pub size: GridSize,

    /// Fraction of the board a randomize brings to life, between 0 and 1.
    #[arg(long, short, default_value_t = DEFAULT_DENSITY, value_parser = parse_density)]
    pub density: f64,

    /// Milliseconds between ticks while running.
    #[arg(
        long = "interval-ms",
        default_value_t = DEFAULT_INTERVAL_MS,
        value_parser = clap::value_parser!(u64).range(1..=60_000)
    )]
    pub interval_ms: u64,

    /// Seed for the random source. Runs with the same seed randomize identically.
    #[arg(long)]
    pub seed: Option<u64>,

    /// Count only the 8 surrounding cells (births on 3, survival on 2) instead of the whole
    /// 3x3 window.
    #[arg(long)]
    pub classic: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            size: GridSize::default(),
            density: DEFAULT_DENSITY,
            interval_ms: DEFAULT_INTERVAL_MS,
            seed: None,
            classic: false,
        }
    }
}

impl Config {
    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms)
    }

    pub fn neighborhood(&self) -> Neighborhood {
        if self.classic {
            Neighborhood::Moore
        } else {
            Neighborhood::Window
        }
    }
}

fn parse_density(s: &str) -> Result<f64, String> {
    let density: f64 = s.parse().map_err(|_| format!("\"{s}\" is not a number"))?;

    if (0.0..=1.0).contains(&density) {
        Ok(density)
    } else {
        Err(format!("density {density} is outside [0, 1]"))
    }
}
