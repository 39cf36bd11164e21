//! Cell readings and the health/status classification derived from them.
//!
//! A [`CellReading`] is one sample for one cell. Its derived fields (power,
//! health, status) are pure functions of the reading's own measurements and
//! its chemistry's bounds; nothing here looks at earlier readings.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::chemistry::{Chemistry, ChemistryProfile};

/// Temperature above which the temperature health score starts to drop (°C).
pub const THERMAL_DERATE_START_C: f64 = 35.0;
/// Width of the temperature derating ramp (°C). Health hits zero at 55 °C.
pub const THERMAL_DERATE_SPAN_C: f64 = 20.0;
/// Temperature above which a cell is Warning (°C).
pub const WARNING_TEMP_C: f64 = 40.0;
/// Temperature above which a cell is Critical (°C).
pub const CRITICAL_TEMP_C: f64 = 45.0;
/// Health below which a cell is Warning.
pub const WARNING_HEALTH: f64 = 80.0;

// ---------------------------------------------------------------------------
// CellStatus
// ---------------------------------------------------------------------------

/// Operating status of a cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum CellStatus {
    Good,
    Warning,
    Critical,
}

impl CellStatus {
    pub const ALL: [CellStatus; 3] = [Self::Good, Self::Warning, Self::Critical];

    pub fn label(self) -> &'static str {
        match self {
            Self::Good => "Good",
            Self::Warning => "Warning",
            Self::Critical => "Critical",
        }
    }
}

impl fmt::Display for CellStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

// ---------------------------------------------------------------------------
// Health and classification
// ---------------------------------------------------------------------------

/// Round `value` to `decimals` places. Exact ties go to the even neighbour,
/// so `1.625` rounds to `1.62` at two places.
pub fn round_to(value: f64, decimals: i32) -> f64 {
    let scale = 10f64.powi(decimals);
    (value * scale).round_ties_even() / scale
}

/// Voltage health: 100 at nominal, falling linearly with relative deviation.
///
/// Not clamped: a deviation larger than the nominal voltage goes negative.
pub fn voltage_health(profile: &ChemistryProfile, voltage: f64) -> f64 {
    100.0 * (1.0 - (voltage - profile.nominal_voltage).abs() / profile.nominal_voltage)
}

/// Temperature health: 100 up to 35 °C, then a linear ramp to 0 at 55 °C.
pub fn temperature_health(temperature: f64) -> f64 {
    let overheat = (temperature - THERMAL_DERATE_START_C).max(0.0);
    100.0 * (1.0 - overheat / THERMAL_DERATE_SPAN_C).max(0.0)
}

/// Mean of voltage and temperature health, rounded to one decimal.
pub fn combined_health(profile: &ChemistryProfile, voltage: f64, temperature: f64) -> f64 {
    round_to(
        (voltage_health(profile, voltage) + temperature_health(temperature)) / 2.0,
        1,
    )
}

/// Classify a cell. Critical conditions are checked before Warning ones.
pub fn classify(
    profile: &ChemistryProfile,
    voltage: f64,
    temperature: f64,
    health: f64,
) -> CellStatus {
    if !profile.contains(voltage) || temperature > CRITICAL_TEMP_C {
        CellStatus::Critical
    } else if temperature > WARNING_TEMP_C || health < WARNING_HEALTH {
        CellStatus::Warning
    } else {
        CellStatus::Good
    }
}

// ---------------------------------------------------------------------------
// CellReading
// ---------------------------------------------------------------------------

/// Raw measured values before any derivation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Measurements {
    /// Terminal voltage (V).
    pub voltage: f64,
    /// Current (A), positive while charging.
    pub current: f64,
    /// Cell temperature (°C).
    pub temperature: f64,
    /// Capacity (Ah).
    pub capacity: f64,
}

/// One simulated sample for a single cell.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CellReading {
    pub cell_id: String,
    pub chemistry: Chemistry,
    pub voltage: f64,
    pub current: f64,
    pub temperature: f64,
    /// `voltage * |current|`, rounded to 2 decimals (W).
    pub power: f64,
    pub capacity: f64,
    pub health: f64,
    pub status: CellStatus,
    /// Milliseconds since the Unix epoch.
    pub timestamp_ms: u64,
    /// Copied from the chemistry profile.
    pub min_voltage: f64,
    /// Copied from the chemistry profile.
    pub max_voltage: f64,
}

impl CellReading {
    /// Build a reading from measured values, deriving power, health and status.
    pub fn from_measurements(
        chemistry: Chemistry,
        cell_id: impl Into<String>,
        m: Measurements,
        timestamp_ms: u64,
    ) -> Self {
        let profile = chemistry.profile();
        let power = round_to(m.voltage * m.current.abs(), 2);
        let health = combined_health(profile, m.voltage, m.temperature);
        let status = classify(profile, m.voltage, m.temperature, health);

        Self {
            cell_id: cell_id.into(),
            chemistry,
            voltage: m.voltage,
            current: m.current,
            temperature: m.temperature,
            power,
            capacity: m.capacity,
            health,
            status,
            timestamp_ms,
            min_voltage: profile.min_voltage,
            max_voltage: profile.max_voltage,
        }
    }

    pub fn profile(&self) -> &'static ChemistryProfile {
        self.chemistry.profile()
    }

    /// Voltage outside the chemistry's safe band.
    pub fn is_out_of_band(&self) -> bool {
        self.voltage < self.min_voltage || self.voltage > self.max_voltage
    }

    pub fn is_charging(&self) -> bool {
        self.current > 0.0
    }
}
