//! Command line front end for the grid simulator.
//!
//! Loads a saved layout, then either simulates it, tabulates every input
//! assignment, or lists the ports and connections the engine derived.
mod report;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use gridsim_engine::{persistence::read_layout_file, LoadReport, SimConfig, Workspace};
use log::{info, LevelFilter};

#[derive(Parser)]
#[command(name = "gridsim")]
#[command(version)]
#[command(about = "Grid based logic circuit simulator", long_about = None)]
struct Cli {
    /// JSON file overriding the default simulator settings
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Verbose output
    ///
    /// When specified, sets the log level to `info` and ignores the `RUST_LOG`
    /// environment variable. When not specified, uses `RUST_LOG`
    #[arg(short, long, global = true, default_value_t = false)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Simulate a layout and print the value of every component
    Simulate { layout: PathBuf },
    /// Print the truth table over all constant inputs of a layout
    TruthTable { layout: PathBuf },
    /// List port positions and the connections between components
    Connections { layout: PathBuf },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    if cli.verbose {
        env_logger::builder().filter_level(LevelFilter::Info).init();
    } else {
        env_logger::init();
    }

    let config = match &cli.config {
        Some(path) => SimConfig::from_json_file(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => SimConfig::default(),
    };

    match cli.command {
        Command::Simulate { layout } => {
            let mut ws = open(&layout, config)?;
            let sim = ws.simulate();
            print!("{}", report::values_table(&ws, &sim));
            if !sim.settled {
                eprintln!(
                    "note: no stable state after {} passes, values are from the last pass",
                    sim.passes
                );
            } else {
                info!("settled after {} passes", sim.passes);
            }
        }
        Command::TruthTable { layout } => {
            let ws = open(&layout, config)?;
            let table = ws
                .truth_table()
                .with_context(|| format!("tabulating {}", layout.display()))?;
            print!("{}", table);
        }
        Command::Connections { layout } => {
            let ws = open(&layout, config)?;
            print!("{}", report::ports_listing(&ws));
            print!("{}", report::edge_listing(&ws.connections()));
        }
    }
    Ok(())
}

fn open(path: &Path, config: SimConfig) -> Result<Workspace> {
    let entries =
        read_layout_file(path).with_context(|| format!("reading layout {}", path.display()))?;
    let mut ws = Workspace::new(config);
    let loaded = ws.load_entries(entries);
    print_skipped(&loaded);
    Ok(ws)
}

fn print_skipped(report: &LoadReport) {
    for skip in &report.skipped {
        eprintln!("skipped record {}: {}", skip.index, skip.reason);
    }
}
