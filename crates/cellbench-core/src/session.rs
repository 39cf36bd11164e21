//! Monitoring session: the dashboard's application state.
//!
//! A [`MonitorSession`] owns the bench configuration, the reading source, the
//! current readings and the snapshot history. Every state change goes through
//! one of its methods, and each call runs to completion on the caller's
//! thread, so a tick never observes a half-updated bank.
//!
//! ```
//! use cellbench_core::bench::BenchConfig;
//! use cellbench_core::chemistry::Chemistry;
//! use cellbench_core::session::{MonitorSession, TickOutcome};
//! use cellbench_core::simulator::SeededSimulator;
//!
//! let config = BenchConfig::with_cells(vec![Chemistry::Lfp, Chemistry::Nmc]);
//! let mut session = MonitorSession::new(config, Box::new(SeededSimulator::new(1))).unwrap();
//! assert_eq!(session.tick(0), TickOutcome::NotInitialized);
//!
//! session.initialize(1_000);
//! session.start();
//! assert_eq!(session.tick(2_000), TickOutcome::Updated { tick: 1 });
//! assert_eq!(session.history().len(), 1);
//! ```

use crate::bench::BenchConfig;
use crate::error::Result;
use crate::history::{HistoryBuffer, HistorySnapshot};
use crate::reading::{CellReading, CellStatus};
use crate::simulator::ReadingSource;
use crate::summary::{BankSummary, summarize};

/// Result of a [`MonitorSession::tick`] call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// No cells yet; nothing to refresh.
    NotInitialized,
    /// Monitoring is stopped.
    Idle,
    /// Every cell was re-read and a snapshot appended.
    Updated { tick: u64 },
}

pub struct MonitorSession {
    config: BenchConfig,
    source: Box<dyn ReadingSource>,
    readings: Vec<CellReading>,
    history: HistoryBuffer,
    monitoring: bool,
    auto_refresh: bool,
    ticks: u64,
}

impl MonitorSession {
    /// Create an idle session. Fails if the configuration is invalid.
    pub fn new(config: BenchConfig, source: Box<dyn ReadingSource>) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            source,
            readings: Vec::new(),
            history: HistoryBuffer::new(),
            monitoring: false,
            auto_refresh: true,
            ticks: 0,
        })
    }

    /// Replace current readings with one fresh reading per configured cell.
    ///
    /// History is left untouched.
    pub fn initialize(&mut self, now_ms: u64) {
        self.readings.clear();
        for (cell_id, chemistry) in self.config.slots() {
            let reading = self.source.read(chemistry, &cell_id, now_ms);
            self.readings.push(reading);
        }
        log::info!(
            "initialized {} cells on {} group {} ({})",
            self.readings.len(),
            self.config.bench_name,
            self.config.group,
            self.source.label()
        );
        self.warn_critical();
    }

    pub fn start(&mut self) {
        if !self.monitoring {
            log::info!("monitoring started");
        }
        self.monitoring = true;
    }

    pub fn stop(&mut self) {
        if self.monitoring {
            log::info!("monitoring stopped after {} ticks", self.ticks);
        }
        self.monitoring = false;
    }

    pub fn toggle_monitoring(&mut self) {
        if self.monitoring {
            self.stop();
        } else {
            self.start();
        }
    }

    pub fn set_auto_refresh(&mut self, enabled: bool) {
        self.auto_refresh = enabled;
    }

    /// Regenerate every cell and record a snapshot, if monitoring.
    pub fn tick(&mut self, now_ms: u64) -> TickOutcome {
        if self.readings.is_empty() {
            return TickOutcome::NotInitialized;
        }
        if !self.monitoring {
            return TickOutcome::Idle;
        }

        let fresh: Vec<CellReading> = self
            .readings
            .iter()
            .map(|r| self.source.read(r.chemistry, &r.cell_id, now_ms))
            .collect();
        self.readings = fresh;
        self.history
            .append(HistorySnapshot::new(now_ms, self.readings.clone()));
        self.ticks += 1;

        log::debug!(
            "tick {}: {} cells, {} snapshots",
            self.ticks,
            self.readings.len(),
            self.history.len()
        );
        self.warn_critical();
        TickOutcome::Updated { tick: self.ticks }
    }

    /// Validate and swap the configuration. Takes effect on the next
    /// [`initialize`](Self::initialize).
    pub fn reconfigure(&mut self, config: BenchConfig) -> Result<()> {
        config.validate()?;
        log::info!(
            "bench reconfigured: {} group {}, {} cells",
            config.bench_name,
            config.group,
            config.cell_count()
        );
        self.config = config;
        Ok(())
    }

    /// Summary of the current readings; `None` before the first initialize.
    pub fn summary(&self) -> Option<BankSummary> {
        summarize(&self.readings)
    }

    pub fn readings(&self) -> &[CellReading] {
        &self.readings
    }

    pub fn history(&self) -> &HistoryBuffer {
        &self.history
    }

    pub fn config(&self) -> &BenchConfig {
        &self.config
    }

    pub fn is_initialized(&self) -> bool {
        !self.readings.is_empty()
    }

    pub fn is_monitoring(&self) -> bool {
        self.monitoring
    }

    pub fn auto_refresh(&self) -> bool {
        self.auto_refresh
    }

    pub fn tick_count(&self) -> u64 {
        self.ticks
    }

    pub fn source_label(&self) -> String {
        self.source.label()
    }

    fn warn_critical(&self) {
        for r in self.readings.iter().filter(|r| r.status == CellStatus::Critical) {
            log::warn!(
                "{} critical: {:.3} V, {:.1} C, health {:.1}%",
                r.cell_id,
                r.voltage,
                r.temperature,
                r.health
            );
        }
    }
}
