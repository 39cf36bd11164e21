//! Synthetic cell reading generator.
//!
//! Every call draws fresh uniform values; nothing is carried between calls,
//! so a cell's voltage does not integrate current and capacity does not fade.
//! That memorylessness is a known limitation of the bench, not a model.
//!
//! Draws per reading:
//! 1. voltage     = nominal + U(-0.1, 0.1), 3 decimals
//! 2. current     = U(-5, 5) A, 2 decimals (positive = charging)
//! 3. temperature = 25 + |current| * 0.5 + U(-2, 8) °C, 1 decimal
//! 4. capacity    = U(2.8, 3.2) Ah, 2 decimals
//!
//! Power, health and status are then derived by
//! [`CellReading::from_measurements`].

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::chemistry::Chemistry;
use crate::reading::{CellReading, Measurements, round_to};

/// Maximum deviation from nominal voltage (V).
pub const VOLTAGE_SWING: f64 = 0.1;
/// Current magnitude bound (A).
pub const CURRENT_LIMIT: f64 = 5.0;
/// Ambient temperature the thermal heuristic starts from (°C).
pub const AMBIENT_TEMP_C: f64 = 25.0;
/// Temperature rise per amp of current magnitude (°C/A).
pub const TEMP_PER_AMP: f64 = 0.5;
/// Random temperature offset range (°C).
pub const TEMP_JITTER: (f64, f64) = (-2.0, 8.0);
/// Sampled capacity range (Ah).
pub const CAPACITY_RANGE: (f64, f64) = (2.8, 3.2);

/// Draw raw measurements for one cell of the given chemistry.
pub fn draw_measurements<R: Rng>(rng: &mut R, chemistry: Chemistry) -> Measurements {
    let nominal = chemistry.profile().nominal_voltage;

    let voltage = round_to(nominal + rng.random_range(-VOLTAGE_SWING..=VOLTAGE_SWING), 3);
    let current = round_to(rng.random_range(-CURRENT_LIMIT..=CURRENT_LIMIT), 2);
    // Heuristic: larger current magnitude biases the cell warmer.
    let jitter = rng.random_range(TEMP_JITTER.0..=TEMP_JITTER.1);
    let temperature = round_to(AMBIENT_TEMP_C + current.abs() * TEMP_PER_AMP + jitter, 1);
    let capacity = round_to(rng.random_range(CAPACITY_RANGE.0..=CAPACITY_RANGE.1), 2);

    Measurements {
        voltage,
        current,
        temperature,
        capacity,
    }
}

/// Generate a reading with the caller's RNG.
pub fn generate_with<R: Rng>(
    rng: &mut R,
    chemistry: Chemistry,
    cell_id: &str,
    timestamp_ms: u64,
) -> CellReading {
    let m = draw_measurements(rng, chemistry);
    CellReading::from_measurements(chemistry, cell_id, m, timestamp_ms)
}

/// Generate a reading from the thread-local RNG. Not reproducible.
pub fn generate(chemistry: Chemistry, cell_id: &str, timestamp_ms: u64) -> CellReading {
    generate_with(&mut rand::rng(), chemistry, cell_id, timestamp_ms)
}

/// Generate a reading for a chemistry given by name.
///
/// Unknown names fail with [`CellbenchError::InvalidChemistry`](crate::CellbenchError)
/// instead of falling back to a default profile.
pub fn generate_named(name: &str, cell_id: &str, timestamp_ms: u64) -> crate::Result<CellReading> {
    let chemistry: Chemistry = name.parse()?;
    Ok(generate(chemistry, cell_id, timestamp_ms))
}

// ---------------------------------------------------------------------------
// ReadingSource
// ---------------------------------------------------------------------------

/// Anything that can produce a reading for a cell on demand.
pub trait ReadingSource: Send {
    /// Produce one reading for `cell_id`.
    fn read(&mut self, chemistry: Chemistry, cell_id: &str, timestamp_ms: u64) -> CellReading;

    /// Short label for logs and the dashboard header.
    fn label(&self) -> String;
}

/// Non-reproducible simulator backed by the thread-local RNG.
#[derive(Debug, Clone, Copy, Default)]
pub struct Simulator;

impl ReadingSource for Simulator {
    fn read(&mut self, chemistry: Chemistry, cell_id: &str, timestamp_ms: u64) -> CellReading {
        generate(chemistry, cell_id, timestamp_ms)
    }

    fn label(&self) -> String {
        "random".to_string()
    }
}

/// Reproducible simulator: the same seed yields the same sequence of readings.
#[derive(Debug, Clone)]
pub struct SeededSimulator {
    seed: u64,
    rng: StdRng,
}

impl SeededSimulator {
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }
}

impl ReadingSource for SeededSimulator {
    fn read(&mut self, chemistry: Chemistry, cell_id: &str, timestamp_ms: u64) -> CellReading {
        generate_with(&mut self.rng, chemistry, cell_id, timestamp_ms)
    }

    fn label(&self) -> String {
        format!("seed {}", self.seed)
    }
}

/// Build a source: seeded when a seed is given, random otherwise.
pub fn make_source(seed: Option<u64>) -> Box<dyn ReadingSource> {
    match seed {
        Some(seed) => Box::new(SeededSimulator::new(seed)),
        None => Box::new(Simulator),
    }
}
