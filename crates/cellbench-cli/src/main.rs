//! CLI for cellbench: simulate a battery bank and watch it tick.

mod commands;
mod tui;

use clap::{Parser, Subcommand};

use commands::BenchArgs;

#[derive(Parser)]
#[command(name = "cellbench")]
#[command(about = "cellbench: synthetic battery-cell telemetry and a terminal dashboard")]
#[command(version = cellbench_core::VERSION)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the supported cell chemistries and their voltage bands
    Chemistries,

    /// Initialize the bench once and print every cell's reading
    Sample {
        #[command(flatten)]
        bench: BenchArgs,

        /// Print readings and summary as JSON
        #[arg(long)]
        json: bool,
    },

    /// Headless monitoring: tick on a timer and print one summary line per tick
    Run {
        #[command(flatten)]
        bench: BenchArgs,

        /// Number of ticks to run (default: until Ctrl+C)
        #[arg(long)]
        ticks: Option<u64>,

        /// Seconds between ticks
        #[arg(long, default_value = "5.0")]
        refresh: f64,

        /// Write a JSON snapshot of the session here when done
        #[arg(long)]
        output: Option<String>,
    },

    /// Live interactive bench dashboard (TUI)
    Monitor {
        #[command(flatten)]
        bench: BenchArgs,

        /// Seconds between auto-refresh ticks
        #[arg(long, default_value = "5.0")]
        refresh: f64,
    },
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Chemistries => {
            commands::chemistries::run();
            Ok(())
        }
        Commands::Sample { bench, json } => commands::sample::run(&bench, json),
        Commands::Run {
            bench,
            ticks,
            refresh,
            output,
        } => commands::run::run(&bench, ticks, refresh, output.as_deref()),
        Commands::Monitor { bench, refresh } => commands::monitor::run(&bench, refresh),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
