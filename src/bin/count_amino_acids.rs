//! Count temperature-associated amino acids in protein FASTA files, one file
//! per metagenome-assembled genome.

use anyhow::{bail, ensure, Result};
use log::info;
use mgpipe::amino_acid::{
    count_amino_acids_in_files, find_fasta_files, write_counts_file, DEFAULT_AMINO_ACIDS,
};
use mgpipe::table::display_name;
use std::collections::HashSet;
use std::path::PathBuf;
use structopt::StructOpt;

/// Configuration parameters specified as command-line options.
#[derive(StructOpt)]
#[structopt(
    about = "Count amino acids and their frequencies in protein FASTA files, one file per MAG."
)]
struct Config {
    /// Directory containing the FASTA files.
    #[structopt(short, long, parse(from_os_str), default_value = ".")]
    directory: PathBuf,

    /// Extension of the FASTA files to read.
    #[structopt(short, long, default_value = "fasta")]
    extension: String,

    /// The amino acids to count, given as one-letter codes
    /// (defaults to the temperature-associated IYEKAG).
    #[structopt(short, long)]
    amino_acids: Option<String>,

    /// CSV file to which counts and frequencies will be written.
    #[structopt(
        short,
        long,
        parse(from_os_str),
        default_value = "temp_adapt_aa_counts.csv"
    )]
    output_file: PathBuf,
}

fn main() -> Result<()> {
    env_logger::init();

    let config = Config::from_args();

    let amino_acids = config
        .amino_acids
        .as_deref()
        .unwrap_or(DEFAULT_AMINO_ACIDS);

    ensure!(!amino_acids.is_empty(), "No amino acids specified");
    ensure!(
        amino_acids.is_ascii(),
        "Amino acids must be given as one-letter codes"
    );

    let amino_acids = amino_acids.as_bytes();
    let mut distinct = HashSet::new();
    for amino_acid in amino_acids {
        if !distinct.insert(amino_acid) {
            bail!("Amino acid {} specified more than once", *amino_acid as char);
        }
    }

    let fasta_files = find_fasta_files(&config.directory, &config.extension)?;
    info!(
        "{} .{} files found in {}",
        fasta_files.len(),
        config.extension,
        display_name(&config.directory)
    );

    let results = count_amino_acids_in_files(&fasta_files, amino_acids)?;
    write_counts_file(&results, amino_acids, &config.output_file)?;

    Ok(())
}
