use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use cellbench_core::clock::{format_clock, now_ms};
use cellbench_core::{Result, TickOutcome, Ticker, export_json};

use super::BenchArgs;

/// How long to wait on the ticker before re-checking for Ctrl+C.
const WAIT_SLICE: Duration = Duration::from_millis(100);

pub fn run(bench: &BenchArgs, ticks: Option<u64>, refresh: f64, output: Option<&str>) -> Result<()> {
    let interval = super::refresh_duration(refresh)?;
    let mut session = bench.to_session()?;

    let running = Arc::new(AtomicBool::new(true));
    let r = running.clone();
    if let Err(e) = ctrlc::set_handler(move || {
        r.store(false, Ordering::SeqCst);
    }) {
        log::warn!("could not install Ctrl+C handler: {e}");
    }

    let config = session.config();
    println!("Monitoring {} group {}", config.bench_name, config.group);
    println!("  Cells:     {}", config.cell_count());
    println!("  Source:    {}", session.source_label());
    println!("  Interval:  {:.1}s", interval.as_secs_f64());
    match ticks {
        Some(n) => println!("  Ticks:     {n}"),
        None => println!("  Ticks:     until Ctrl+C"),
    }
    println!();

    session.initialize(now_ms());
    session.start();
    let mut ticker = Ticker::spawn(interval);

    while running.load(Ordering::SeqCst) {
        if ticks.is_some_and(|n| session.tick_count() >= n) {
            break;
        }
        if !ticker.recv_timeout(WAIT_SLICE) {
            continue;
        }
        let now = now_ms();
        if let TickOutcome::Updated { tick } = session.tick(now)
            && let Some(s) = session.summary()
        {
            println!(
                "#{tick:<4} {}  good {:>2}  warn {:>2}  crit {:>2}  health {:>5.1}%  power {:>7.2} W",
                format_clock(now),
                s.good,
                s.warning,
                s.critical,
                s.mean_health,
                s.total_power
            );
        }
    }

    ticker.stop();
    session.stop();

    if let Some(path) = output {
        export_json(&session, path, now_ms())?;
        println!();
        println!("Snapshot written to {path}");
    }
    Ok(())
}
