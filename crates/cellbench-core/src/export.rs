//! JSON snapshot export of a monitoring session.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::clock::{epoch_secs, format_iso8601};
use crate::error::Result;
use crate::history::HistorySnapshot;
use crate::reading::CellReading;
use crate::session::MonitorSession;
use crate::summary::BankSummary;

/// Everything the dashboard shows, frozen at one moment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SnapshotExport {
    /// Crate version that wrote the file.
    pub version: String,
    /// UUID v4, unique per export.
    pub id: String,
    /// ISO-8601 UTC.
    pub exported_at: String,
    pub bench: String,
    pub group: u32,
    pub source: String,
    pub ticks: u64,
    pub summary: Option<BankSummary>,
    pub readings: Vec<CellReading>,
    /// Oldest first.
    pub history: Vec<HistorySnapshot>,
}

impl SnapshotExport {
    pub fn capture(session: &MonitorSession, now_ms: u64) -> Self {
        let config = session.config();
        Self {
            version: crate::VERSION.to_string(),
            id: uuid::Uuid::new_v4().to_string(),
            exported_at: format_iso8601(now_ms),
            bench: config.bench_name.clone(),
            group: config.group,
            source: session.source_label(),
            ticks: session.tick_count(),
            summary: session.summary(),
            readings: session.readings().to_vec(),
            history: session.history().iter().cloned().collect(),
        }
    }
}

/// `cellbench-snapshot-{epoch}.json` in the working directory.
pub fn default_export_path(now_ms: u64) -> PathBuf {
    PathBuf::from(format!("cellbench-snapshot-{}.json", epoch_secs(now_ms)))
}

/// Write the session as pretty JSON to `path`.
pub fn export_json(session: &MonitorSession, path: impl AsRef<Path>, now_ms: u64) -> Result<SnapshotExport> {
    let snapshot = SnapshotExport::capture(session, now_ms);
    let contents = serde_json::to_string_pretty(&snapshot)?;
    fs::write(path.as_ref(), contents)?;
    log::info!(
        "exported {} readings and {} snapshots to {}",
        snapshot.readings.len(),
        snapshot.history.len(),
        path.as_ref().display()
    );
    Ok(snapshot)
}

/// Read a previously exported snapshot.
pub fn load_export(path: impl AsRef<Path>) -> Result<SnapshotExport> {
    let contents = fs::read_to_string(path.as_ref())?;
    Ok(serde_json::from_str(&contents)?)
}
