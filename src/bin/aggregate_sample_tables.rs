//! Join sample tables on gene name, keeping genes found in any of the tables.

use anyhow::{ensure, Result};
use mgpipe::aggregate::aggregate_files;
use std::path::PathBuf;
use structopt::StructOpt;

/// Configuration parameters specified as command-line options.
#[derive(StructOpt)]
#[structopt(about = "Join sample tables on gene name, keeping genes found in any of the tables.")]
struct Config {
    /// Tab-delimited sample tables with a gene_name column followed by one
    /// column per sample.
    #[structopt(parse(from_os_str))]
    table_files: Vec<PathBuf>,

    /// The joined table.
    #[structopt(short, long, parse(from_os_str), default_value = "RPKM.txt")]
    output_file: PathBuf,
}

fn main() -> Result<()> {
    env_logger::init();

    let config = Config::from_args();

    ensure!(
        !config.table_files.is_empty(),
        "No input sample tables specified"
    );

    aggregate_files(&config.table_files, &Some(config.output_file))?;

    Ok(())
}
