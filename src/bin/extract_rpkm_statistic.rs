//! Collect a chosen statistic from BBMap `*.rpkm.out` files into a single
//! table with one column per sample.

use anyhow::{bail, Result};
use log::info;
use mgpipe::sample::{extract_statistic, find_rpkm_files, Statistic};
use mgpipe::table::display_name;
use std::path::PathBuf;
use structopt::StructOpt;

/// Configuration parameters specified as command-line options.
#[derive(StructOpt)]
#[structopt(
    about = "Collect a statistic (Bases, Coverage, RPKM or FPKM) from *.rpkm.out files into a single table."
)]
struct Config {
    /// The statistic to collect: Bases, Coverage, RPKM or FPKM.
    statistic: String,

    /// Directory containing the *.rpkm.out files.
    #[structopt(short, long, parse(from_os_str), default_value = ".")]
    directory: PathBuf,

    /// Output file (defaults to <statistic>.txt).
    #[structopt(short, long, parse(from_os_str))]
    output_file: Option<PathBuf>,
}

fn main() -> Result<()> {
    env_logger::init();

    let config = Config::from_args();

    let statistic: Statistic = config.statistic.parse()?;

    let rpkm_files = find_rpkm_files(&config.directory)?;
    if rpkm_files.is_empty() {
        bail!(
            "No *.rpkm.out files found in {}",
            display_name(&config.directory)
        );
    }
    info!("{} *.rpkm.out files found", rpkm_files.len());

    let output_file = match config.output_file {
        Some(output_file) => output_file,
        None => PathBuf::from(format!("{}.txt", statistic)),
    };

    let table = extract_statistic(&rpkm_files, statistic)?;
    table.write(&Some(output_file))?;

    Ok(())
}
