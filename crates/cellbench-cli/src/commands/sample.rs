use cellbench_core::Result;
use cellbench_core::clock::{format_iso8601, now_ms};

use super::BenchArgs;

pub fn run(bench: &BenchArgs, json: bool) -> Result<()> {
    let mut session = bench.to_session()?;
    let now = now_ms();
    session.initialize(now);

    if json {
        let out = serde_json::json!({
            "bench": session.config().bench_name,
            "group": session.config().group,
            "timestamp": format_iso8601(now),
            "summary": session.summary(),
            "readings": session.readings(),
        });
        println!("{}", serde_json::to_string_pretty(&out)?);
        return Ok(());
    }

    let config = session.config();
    println!(
        "{}  group {}  {} cells  ({})",
        config.bench_name,
        config.group,
        config.cell_count(),
        session.source_label()
    );
    println!();
    super::print_readings_table(session.readings());

    if let Some(s) = session.summary() {
        println!();
        println!(
            "Good {}  Warning {}  Critical {}  Avg health {:.1}%  Total power {:.2} W",
            s.good, s.warning, s.critical, s.mean_health, s.total_power
        );
    }
    Ok(())
}
