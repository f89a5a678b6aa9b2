mod color;
mod config;
mod data;
mod render;
mod report;
mod stats;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

use config::{ReportConfig, DEFAULT_CTD_PATH, DEFAULT_METOCEAN_PATH};

/// Plot a CTD cast and the cruise metocean record, then summarise
/// sea surface temperature and salinity.
#[derive(Parser, Debug)]
#[command(name = "ocean-panda", version, about)]
struct Cli {
    /// Whitespace-delimited CTD profile
    #[arg(long, default_value = DEFAULT_CTD_PATH)]
    ctd: PathBuf,

    /// Comma-delimited 10-minute metocean averages
    #[arg(long, default_value = DEFAULT_METOCEAN_PATH)]
    metocean: PathBuf,

    /// Directory the PNG figures are written to
    #[arg(short, long, default_value = ".")]
    output_dir: PathBuf,
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let config = ReportConfig::new(cli.ctd, cli.metocean, cli.output_dir)
        .context("parsing cruise window")?;
    let report = report::run(&config)?;

    println!("\nSummary Statistics for Temperature and Salinity:\n");
    println!("{}", render::table::to_console(&report.summary));
    Ok(())
}
