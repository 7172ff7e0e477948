//! Clean up a gene abundance table merged with eggNOG annotations and label
//! the annotation columns.

use anyhow::Result;
use mgpipe::normalize::{normalize_file, ColumnLayout};
use std::path::PathBuf;
use structopt::StructOpt;

/// Configuration parameters specified as command-line options.
#[derive(StructOpt)]
#[structopt(
    about = "Clean up a gene abundance table merged with eggNOG annotations and label the annotation columns."
)]
struct Config {
    /// Merged abundance and annotation table.
    #[structopt(short, long, parse(from_os_str), default_value = "merged_RPKM.txt")]
    input_file: PathBuf,

    /// The cleaned table.
    #[structopt(
        short,
        long,
        parse(from_os_str),
        default_value = "merged_RPKM_eggnog.txt"
    )]
    output_file: PathBuf,

    /// Locate the annotation columns as the last four columns of the header
    /// rather than at the fixed positions 290 and 293.
    #[structopt(long)]
    layout_from_header: bool,
}

fn main() -> Result<()> {
    env_logger::init();

    let config = Config::from_args();

    let layout = if config.layout_from_header {
        None
    } else {
        Some(ColumnLayout::default())
    };

    normalize_file(&config.input_file, &Some(config.output_file), layout)?;

    Ok(())
}
