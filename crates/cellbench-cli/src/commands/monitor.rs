use cellbench_core::Result;

use super::BenchArgs;

pub fn run(bench: &BenchArgs, refresh: f64) -> Result<()> {
    let session = bench.to_session()?;
    let interval = super::refresh_duration(refresh)?;
    let mut app = crate::tui::app::App::new(session, interval);
    app.run()?;
    Ok(())
}
