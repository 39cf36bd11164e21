pub mod chemistries;
pub mod monitor;
pub mod run;
pub mod sample;

use std::time::Duration;

use clap::Args;

use cellbench_core::bench::BenchConfig;
use cellbench_core::{
    CellReading, CellbenchError, MonitorSession, Result, make_source, parse_chemistry_list,
};

/// Bench selection shared by every command that runs a session.
///
/// Flags override the `--config` file, which overrides the defaults.
#[derive(Args, Debug, Clone, Default)]
pub struct BenchArgs {
    /// JSON bench file (`bench_name`, `group`, `cells`)
    #[arg(long)]
    pub config: Option<String>,

    /// Bench name
    #[arg(long)]
    pub bench: Option<String>,

    /// Group number (1-100)
    #[arg(long)]
    pub group: Option<u32>,

    /// Comma-separated chemistry per slot, e.g. LFP,NMC,LTO
    #[arg(long)]
    pub cells: Option<String>,

    /// Number of cells (1-16); new slots repeat the last chemistry
    #[arg(long)]
    pub cell_count: Option<usize>,

    /// Seed for reproducible readings
    #[arg(long)]
    pub seed: Option<u64>,
}

impl BenchArgs {
    pub fn to_config(&self) -> Result<BenchConfig> {
        let mut config = match &self.config {
            Some(path) => BenchConfig::load(path)?,
            None => BenchConfig::default(),
        };

        if let Some(name) = &self.bench {
            config.bench_name = name.clone();
        }
        if let Some(group) = self.group {
            config.group = group;
        }
        if let Some(list) = &self.cells {
            config.cells = parse_chemistry_list(list)?;
        }
        if let Some(count) = self.cell_count {
            let fill = config.cells.last().copied().unwrap_or_default();
            config.resize(count, fill);
        }

        config.validate()?;
        Ok(config)
    }

    pub fn to_session(&self) -> Result<MonitorSession> {
        MonitorSession::new(self.to_config()?, make_source(self.seed))
    }
}

/// Refresh interval from a seconds flag.
pub fn refresh_duration(secs: f64) -> Result<Duration> {
    if !secs.is_finite() || secs <= 0.0 {
        return Err(CellbenchError::InvalidConfig {
            key: "refresh",
            message: format!("must be a positive number of seconds, got {secs}"),
        });
    }
    Duration::try_from_secs_f64(secs).map_err(|e| CellbenchError::InvalidConfig {
        key: "refresh",
        message: format!("{secs} seconds: {e}"),
    })
}

pub fn print_readings_table(readings: &[CellReading]) {
    println!(
        "{:<16} {:<7} {:>8} {:>8} {:>7} {:>8} {:>8} {:>7}  Status",
        "Cell", "Chem", "Volt(V)", "Curr(A)", "Temp", "Power(W)", "Cap(Ah)", "Health"
    );
    println!("{}", "-".repeat(90));
    for r in readings {
        println!(
            "{:<16} {:<7} {:>8.3} {:>8.2} {:>7.1} {:>8.2} {:>8.2} {:>6.1}%  {}",
            r.cell_id,
            r.chemistry.name(),
            r.voltage,
            r.current,
            r.temperature,
            r.power,
            r.capacity,
            r.health,
            r.status
        );
    }
}
