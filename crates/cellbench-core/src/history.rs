//! Bounded snapshot history and the per-cell trend series built from it.
//!
//! The buffer keeps the last [`HISTORY_CAPACITY`] snapshots in memory only.
//! Appending past capacity evicts the oldest snapshot first.
//!
//! ```
//! use cellbench_core::history::{HistoryBuffer, HistorySnapshot};
//!
//! let mut history = HistoryBuffer::new();
//! for t in 0..150 {
//!     history.append(HistorySnapshot::new(t, Vec::new()));
//! }
//! assert_eq!(history.len(), 100);
//! assert_eq!(history.query(1)[0].timestamp_ms, 149);
//! ```

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use crate::reading::CellReading;

/// Maximum snapshots retained.
pub const HISTORY_CAPACITY: usize = 100;

/// Snapshots used for trend charts.
pub const TREND_WINDOW: usize = 50;

/// All cell readings captured at one monitoring tick.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistorySnapshot {
    pub timestamp_ms: u64,
    pub readings: Vec<CellReading>,
}

impl HistorySnapshot {
    pub fn new(timestamp_ms: u64, readings: Vec<CellReading>) -> Self {
        Self {
            timestamp_ms,
            readings,
        }
    }
}

/// FIFO ring of snapshots, oldest first.
#[derive(Debug, Clone)]
pub struct HistoryBuffer {
    snapshots: VecDeque<HistorySnapshot>,
    capacity: usize,
}

impl Default for HistoryBuffer {
    fn default() -> Self {
        Self::new()
    }
}

impl HistoryBuffer {
    /// Buffer with the standard capacity of 100.
    pub fn new() -> Self {
        Self::with_capacity(HISTORY_CAPACITY)
    }

    /// # Panics
    ///
    /// Panics if `capacity` is 0.
    pub fn with_capacity(capacity: usize) -> Self {
        assert!(capacity > 0, "history capacity must be greater than 0");
        Self {
            snapshots: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Append a snapshot, evicting the oldest when over capacity.
    pub fn append(&mut self, snapshot: HistorySnapshot) {
        if self.snapshots.len() >= self.capacity {
            self.snapshots.pop_front();
        }
        self.snapshots.push_back(snapshot);
    }

    /// The `last_n` most recent snapshots, oldest of the window first.
    pub fn query(&self, last_n: usize) -> Vec<&HistorySnapshot> {
        let skip = self.snapshots.len().saturating_sub(last_n);
        self.snapshots.iter().skip(skip).collect()
    }

    pub fn latest(&self) -> Option<&HistorySnapshot> {
        self.snapshots.back()
    }

    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn clear(&mut self) {
        self.snapshots.clear();
    }

    /// Oldest to newest.
    pub fn iter(&self) -> impl Iterator<Item = &HistorySnapshot> {
        self.snapshots.iter()
    }
}

// ---------------------------------------------------------------------------
// Trends
// ---------------------------------------------------------------------------

/// Quantity plotted on a trend chart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TrendMetric {
    Voltage,
    Current,
    Temperature,
    Health,
}

impl TrendMetric {
    pub const ALL: [TrendMetric; 4] = [
        Self::Voltage,
        Self::Current,
        Self::Temperature,
        Self::Health,
    ];

    pub fn value_from(self, r: &CellReading) -> f64 {
        match self {
            Self::Voltage => r.voltage,
            Self::Current => r.current,
            Self::Temperature => r.temperature,
            Self::Health => r.health,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Voltage => "Voltage",
            Self::Current => "Current",
            Self::Temperature => "Temperature",
            Self::Health => "Health",
        }
    }

    pub fn unit(self) -> &'static str {
        match self {
            Self::Voltage => "V",
            Self::Current => "A",
            Self::Temperature => "°C",
            Self::Health => "%",
        }
    }

    /// Series-name suffix (`Cell_1_LFP_V`).
    pub fn suffix(self) -> &'static str {
        match self {
            Self::Voltage => "V",
            Self::Current => "I",
            Self::Temperature => "T",
            Self::Health => "H",
        }
    }
}

/// One cell's values over time.
#[derive(Debug, Clone, PartialEq)]
pub struct TrendSeries {
    pub cell_id: String,
    /// `(timestamp_ms, value)`, oldest first.
    pub points: Vec<(u64, f64)>,
}

impl TrendSeries {
    /// Lowest and highest value in the series.
    pub fn bounds(&self) -> Option<(f64, f64)> {
        self.points.iter().fold(None, |acc, &(_, v)| match acc {
            None => Some((v, v)),
            Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
        })
    }
}

/// Per-cell series of `metric` over the last `window` snapshots.
///
/// Series appear in the order cells are first seen. A cell that drops out of
/// later snapshots (after a reconfigure) simply has fewer points.
pub fn trend_series(history: &HistoryBuffer, metric: TrendMetric, window: usize) -> Vec<TrendSeries> {
    let mut series: Vec<TrendSeries> = Vec::new();
    for snapshot in history.query(window) {
        for r in &snapshot.readings {
            let point = (snapshot.timestamp_ms, metric.value_from(r));
            match series.iter_mut().find(|s| s.cell_id == r.cell_id) {
                Some(s) => s.points.push(point),
                None => series.push(TrendSeries {
                    cell_id: r.cell_id.clone(),
                    points: vec![point],
                }),
            }
        }
    }
    series
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chemistry::Chemistry;
    use crate::reading::Measurements;

    fn reading(id: &str, voltage: f64, ts: u64) -> CellReading {
        CellReading::from_measurements(
            Chemistry::Lfp,
            id,
            Measurements {
                voltage,
                current: 1.0,
                temperature: 30.0,
                capacity: 3.0,
            },
            ts,
        )
    }

    fn snap(ts: u64) -> HistorySnapshot {
        HistorySnapshot::new(ts, vec![reading("Cell_1_LFP", 3.2, ts)])
    }

    #[test]
    fn append_150_keeps_last_100_in_order() {
        let mut h = HistoryBuffer::new();
        for ts in 0..150 {
            h.append(snap(ts));
        }
        assert_eq!(h.len(), HISTORY_CAPACITY);
        let stamps: Vec<u64> = h.iter().map(|s| s.timestamp_ms).collect();
        let expected: Vec<u64> = (50..150).collect();
        assert_eq!(stamps, expected);
    }

    #[test]
    fn query_returns_window_oldest_first() {
        let mut h = HistoryBuffer::new();
        for ts in 0..10 {
            h.append(snap(ts));
        }
        let last3: Vec<u64> = h.query(3).iter().map(|s| s.timestamp_ms).collect();
        assert_eq!(last3, vec![7, 8, 9]);
    }

    #[test]
    fn query_larger_than_len_returns_all() {
        let mut h = HistoryBuffer::new();
        for ts in 0..5 {
            h.append(snap(ts));
        }
        assert_eq!(h.query(50).len(), 5);
        assert!(h.query(0).is_empty());
    }

    #[test]
    fn empty_buffer() {
        let h = HistoryBuffer::default();
        assert!(h.is_empty());
        assert!(h.latest().is_none());
        assert!(h.query(10).is_empty());
        assert_eq!(h.capacity(), 100);
    }

    #[test]
    fn latest_and_clear() {
        let mut h = HistoryBuffer::with_capacity(3);
        for ts in 0..5 {
            h.append(snap(ts));
        }
        assert_eq!(h.len(), 3);
        assert_eq!(h.latest().unwrap().timestamp_ms, 4);
        h.clear();
        assert!(h.is_empty());
    }

    #[test]
    #[should_panic(expected = "capacity must be greater than 0")]
    fn zero_capacity_panics() {
        let _ = HistoryBuffer::with_capacity(0);
    }

    #[test]
    fn trend_series_per_cell() {
        let mut h = HistoryBuffer::new();
        for ts in 0..60u64 {
            let v = 3.1 + (ts % 2) as f64 * 0.1;
            h.append(HistorySnapshot::new(
                ts,
                vec![reading("A", v, ts), reading("B", 3.2, ts)],
            ));
        }
        let series = trend_series(&h, TrendMetric::Voltage, TREND_WINDOW);
        assert_eq!(series.len(), 2);
        assert_eq!(series[0].cell_id, "A");
        assert_eq!(series[1].cell_id, "B");
        assert_eq!(series[0].points.len(), TREND_WINDOW);
        assert_eq!(series[0].points[0].0, 10, "window starts 50 from the end");
        assert_eq!(series[1].bounds(), Some((3.2, 3.2)));
    }

    #[test]
    fn trend_metric_extracts_field() {
        let r = reading("A", 3.25, 0);
        assert_eq!(TrendMetric::Voltage.value_from(&r), 3.25);
        assert_eq!(TrendMetric::Current.value_from(&r), 1.0);
        assert_eq!(TrendMetric::Temperature.value_from(&r), 30.0);
        assert_eq!(TrendMetric::Health.value_from(&r), r.health);
    }

    #[test]
    fn trend_series_empty_history() {
        let h = HistoryBuffer::new();
        assert!(trend_series(&h, TrendMetric::Health, TREND_WINDOW).is_empty());
    }
}
