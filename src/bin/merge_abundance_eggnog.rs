//! Merge a gene abundance table with eggNOG-mapper functional annotations.

use anyhow::Result;
use log::info;
use mgpipe::merge::{merge_files, write_summary};
use mgpipe::table::display_name;
use std::path::PathBuf;
use structopt::StructOpt;

/// Configuration parameters specified as command-line options.
#[derive(StructOpt)]
#[structopt(
    about = "Append COG category, description, preferred name and KEGG orthology from eggNOG-mapper annotations to a gene abundance table."
)]
struct Config {
    /// eggNOG-mapper annotations file.
    #[structopt(
        short,
        long,
        parse(from_os_str),
        default_value = "protein.emapper.annotations"
    )]
    annotations_file: PathBuf,

    /// Gene abundance table with the gene identifier in the first column.
    #[structopt(short, long, parse(from_os_str), default_value = "RPKM.txt")]
    input_file: PathBuf,

    /// The merged table.
    #[structopt(short, long, parse(from_os_str), default_value = "merged_RPKM.txt")]
    output_file: PathBuf,

    /// Summary of the numbers of rows with and without annotations.
    #[structopt(short, long, parse(from_os_str))]
    summary_file: Option<PathBuf>,
}

fn main() -> Result<()> {
    env_logger::init();

    let config = Config::from_args();

    let output_file = Some(config.output_file);

    let summary = merge_files(&config.annotations_file, &config.input_file, &output_file)?;

    if let Some(summary_file) = config.summary_file {
        write_summary(&summary, &summary_file)?;
    }

    if let Some(output_file) = output_file {
        info!(
            "Merge complete, results saved in {}",
            display_name(&output_file)
        );
    }

    Ok(())
}
