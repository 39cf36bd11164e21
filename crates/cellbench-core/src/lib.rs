//! # cellbench-core
//!
//! **Synthetic telemetry for a bench of rechargeable cells.**
//!
//! `cellbench-core` simulates per-cell voltage, current, temperature and
//! capacity for four chemistries, derives health and an operating status for
//! each reading, and keeps a bounded history for trend charts.
//!
//! ## Quick Start
//!
//! ```
//! use cellbench_core::{BenchConfig, Chemistry, MonitorSession, SeededSimulator};
//!
//! let config = BenchConfig::with_cells(vec![Chemistry::Lfp, Chemistry::Nmc]);
//! let mut session = MonitorSession::new(config, Box::new(SeededSimulator::new(42))).unwrap();
//!
//! session.initialize(0);
//! let summary = session.summary().unwrap();
//! println!("{} cells, mean health {:.1}%", summary.total_cells, summary.mean_health);
//! ```
//!
//! ## Architecture
//!
//! ReadingSource → MonitorSession (current readings) → HistoryBuffer → charts
//!
//! Readings are memoryless: every tick draws fresh values around each
//! chemistry's nominal voltage. A [`Ticker`] only signals when a tick is due;
//! the owner of the [`MonitorSession`] runs it.

pub mod bench;
pub mod chemistry;
pub mod clock;
pub mod error;
pub mod export;
pub mod history;
pub mod reading;
pub mod scheduler;
pub mod session;
pub mod simulator;
pub mod summary;

pub use bench::BenchConfig;
pub use chemistry::{Chemistry, ChemistryProfile, parse_chemistry_list};
pub use error::{CellbenchError, Result};
pub use export::{SnapshotExport, default_export_path, export_json, load_export};
pub use history::{
    HISTORY_CAPACITY, HistoryBuffer, HistorySnapshot, TREND_WINDOW, TrendMetric, TrendSeries,
    trend_series,
};
pub use reading::{CellReading, CellStatus, Measurements};
pub use scheduler::{DEFAULT_REFRESH, Ticker};
pub use session::{MonitorSession, TickOutcome};
pub use simulator::{ReadingSource, SeededSimulator, Simulator, make_source};
pub use summary::{BankSummary, StatusCounts, summarize};

/// Library version (from Cargo.toml).
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
