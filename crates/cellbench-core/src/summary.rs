//! Bank-level aggregation and chart data derived from the current readings.
//!
//! Everything here is a reduction over a slice of [`CellReading`]s. An empty
//! slice never divides by zero: [`summarize`] returns `None`, which renderers
//! show as a "no data" placeholder.

use serde::{Deserialize, Serialize};

use crate::chemistry::Chemistry;
use crate::reading::{CellReading, CellStatus};

/// Number of cells in each status.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusCounts {
    pub good: usize,
    pub warning: usize,
    pub critical: usize,
}

impl StatusCounts {
    pub fn from_readings(readings: &[CellReading]) -> Self {
        let mut counts = Self::default();
        for r in readings {
            counts.add(r.status);
        }
        counts
    }

    pub fn add(&mut self, status: CellStatus) {
        match status {
            CellStatus::Good => self.good += 1,
            CellStatus::Warning => self.warning += 1,
            CellStatus::Critical => self.critical += 1,
        }
    }

    pub fn get(&self, status: CellStatus) -> usize {
        match status {
            CellStatus::Good => self.good,
            CellStatus::Warning => self.warning,
            CellStatus::Critical => self.critical,
        }
    }

    pub fn total(&self) -> usize {
        self.good + self.warning + self.critical
    }
}

/// Summary metrics for the whole bank at one moment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BankSummary {
    pub total_cells: usize,
    pub good: usize,
    pub warning: usize,
    pub critical: usize,
    /// Mean health across cells (%).
    pub mean_health: f64,
    /// Sum of cell power (W).
    pub total_power: f64,
}

/// Summarize a set of readings. `None` when there are no readings.
pub fn summarize(readings: &[CellReading]) -> Option<BankSummary> {
    if readings.is_empty() {
        return None;
    }
    let counts = StatusCounts::from_readings(readings);
    let n = readings.len() as f64;
    let mean_health = readings.iter().map(|r| r.health).sum::<f64>() / n;
    let total_power = readings.iter().map(|r| r.power).sum::<f64>();

    Some(BankSummary {
        total_cells: readings.len(),
        good: counts.good,
        warning: counts.warning,
        critical: counts.critical,
        mean_health,
        total_power,
    })
}

// ---------------------------------------------------------------------------
// Chart data
// ---------------------------------------------------------------------------

/// One equal-width health bin with a per-status breakdown.
#[derive(Debug, Clone, PartialEq)]
pub struct HealthBin {
    pub lo: f64,
    pub hi: f64,
    pub counts: StatusCounts,
}

/// Histogram of health over `[0, 100]` in `bins` equal-width bins.
///
/// Health is unclamped, so values below 0 land in the first bin and values
/// above 100 in the last.
pub fn health_histogram(readings: &[CellReading], bins: usize) -> Vec<HealthBin> {
    if bins == 0 {
        return Vec::new();
    }
    let width = 100.0 / bins as f64;
    let mut out: Vec<HealthBin> = (0..bins)
        .map(|i| HealthBin {
            lo: i as f64 * width,
            hi: (i + 1) as f64 * width,
            counts: StatusCounts::default(),
        })
        .collect();

    for r in readings {
        let idx = ((r.health.clamp(0.0, 100.0) / width).floor() as usize).min(bins - 1);
        out[idx].counts.add(r.status);
    }
    out
}

/// Temperature laid out as chemistry rows by cell columns.
#[derive(Debug, Clone, PartialEq)]
pub struct TemperatureGrid {
    /// Chemistries present, in [`Chemistry::ALL`] order.
    pub rows: Vec<Chemistry>,
    /// Cell ids in reading order.
    pub columns: Vec<String>,
    /// `values[row][col]`, `None` where the cell is not of that chemistry.
    pub values: Vec<Vec<Option<f64>>>,
}

impl TemperatureGrid {
    /// Lowest and highest temperature present.
    pub fn range(&self) -> Option<(f64, f64)> {
        self.values
            .iter()
            .flatten()
            .flatten()
            .fold(None, |acc, &t| match acc {
                None => Some((t, t)),
                Some((lo, hi)) => Some((lo.min(t), hi.max(t))),
            })
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }
}

/// Pivot readings into a chemistry x cell temperature grid.
pub fn temperature_grid(readings: &[CellReading]) -> TemperatureGrid {
    let rows: Vec<Chemistry> = Chemistry::ALL
        .into_iter()
        .filter(|c| readings.iter().any(|r| r.chemistry == *c))
        .collect();
    let columns: Vec<String> = readings.iter().map(|r| r.cell_id.clone()).collect();
    let values = rows
        .iter()
        .map(|chem| {
            readings
                .iter()
                .map(|r| (r.chemistry == *chem).then_some(r.temperature))
                .collect()
        })
        .collect();

    TemperatureGrid {
        rows,
        columns,
        values,
    }
}

/// Safe-band lines for the voltage bar chart, taken from the first reading.
///
/// A mixed-chemistry bank still gets a single band, as the dashboard draws
/// one pair of reference lines.
pub fn voltage_band(readings: &[CellReading]) -> Option<(f64, f64)> {
    readings.first().map(|r| (r.min_voltage, r.max_voltage))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reading::Measurements;

    fn reading(id: &str, chem: Chemistry, voltage: f64, current: f64, temp: f64) -> CellReading {
        CellReading::from_measurements(
            chem,
            id,
            Measurements {
                voltage,
                current,
                temperature: temp,
                capacity: 3.0,
            },
            0,
        )
    }

    fn bank() -> Vec<CellReading> {
        vec![
            reading("Cell_1_LFP", Chemistry::Lfp, 3.2, 2.0, 30.0), // Good
            reading("Cell_2_NMC", Chemistry::Nmc, 3.6, -1.0, 42.0), // Warning (temp)
            reading("Cell_3_LFP", Chemistry::Lfp, 3.65, 0.5, 30.0), // Critical (voltage)
        ]
    }

    #[test]
    fn summarize_empty_is_none() {
        assert!(summarize(&[]).is_none());
    }

    #[test]
    fn summarize_counts_statuses() {
        let s = summarize(&bank()).unwrap();
        assert_eq!(s.total_cells, 3);
        assert_eq!((s.good, s.warning, s.critical), (1, 1, 1));
    }

    #[test]
    fn summarize_mean_health_and_power() {
        let b = bank();
        let s = summarize(&b).unwrap();
        let mean = b.iter().map(|r| r.health).sum::<f64>() / 3.0;
        assert!((s.mean_health - mean).abs() < 1e-9);
        // 6.4 + 3.6 + 1.83 (3.65 * 0.5 = 1.825 -> 1.83)
        assert!((s.total_power - 11.83).abs() < 1e-9, "got {}", s.total_power);
    }

    #[test]
    fn status_counts_total() {
        let c = StatusCounts::from_readings(&bank());
        assert_eq!(c.total(), 3);
        assert_eq!(c.get(CellStatus::Critical), 1);
        assert_eq!(StatusCounts::default().total(), 0);
    }

    #[test]
    fn histogram_bins_cover_range() {
        let h = health_histogram(&bank(), 10);
        assert_eq!(h.len(), 10);
        assert_eq!(h[0].lo, 0.0);
        assert_eq!(h[9].hi, 100.0);
        let total: usize = h.iter().map(|b| b.counts.total()).sum();
        assert_eq!(total, 3);
    }

    #[test]
    fn histogram_puts_100_in_last_bin() {
        let r = reading("c", Chemistry::Lfp, 3.2, 0.0, 25.0);
        assert_eq!(r.health, 100.0);
        let h = health_histogram(&[r], 10);
        assert_eq!(h[9].counts.good, 1);
    }

    #[test]
    fn histogram_clamps_negative_health() {
        let mut r = reading("c", Chemistry::Lfp, 3.2, 0.0, 25.0);
        r.health = -12.0;
        let h = health_histogram(&[r], 4);
        assert_eq!(h[0].counts.total(), 1);
    }

    #[test]
    fn histogram_zero_bins_is_empty() {
        assert!(health_histogram(&bank(), 0).is_empty());
    }

    #[test]
    fn temperature_grid_pivots_by_chemistry() {
        let g = temperature_grid(&bank());
        assert_eq!(g.rows, vec![Chemistry::Lfp, Chemistry::Nmc]);
        assert_eq!(g.columns.len(), 3);
        assert_eq!(g.values[0], vec![Some(30.0), None, Some(30.0)]);
        assert_eq!(g.values[1], vec![None, Some(42.0), None]);
        assert_eq!(g.range(), Some((30.0, 42.0)));
    }

    #[test]
    fn temperature_grid_empty() {
        let g = temperature_grid(&[]);
        assert!(g.is_empty());
        assert!(g.rows.is_empty());
        assert_eq!(g.range(), None);
    }

    #[test]
    fn voltage_band_from_first_reading() {
        assert_eq!(voltage_band(&bank()), Some((2.8, 3.6)));
        assert_eq!(voltage_band(&[]), None);
    }
}
