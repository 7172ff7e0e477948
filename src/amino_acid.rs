//! Amino acid composition of protein FASTA files.
//!
//! Counts the occurrences of selected amino acids, by default the
//! temperature-associated residues I, Y, E, K, A and G, across all sequences
//! in each FASTA file, along with the total number of residues. Each file is
//! assumed to hold the proteins of a single metagenome-assembled genome.

use crate::table::{display_name, open_input};
use anyhow::{ensure, Context, Result};
use bio::io::fasta;
use log::{info, warn};
use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};

/// Temperature-associated amino acids.
pub const DEFAULT_AMINO_ACIDS: &str = "IYEKAG";

/// Amino acid counts for a single FASTA file.
#[derive(Clone, Debug, PartialEq)]
pub struct AminoAcidCounts {
    pub mag: String,
    pub total: u64,
    pub counts: Vec<u64>,
}

impl AminoAcidCounts {
    /// Frequency of each counted amino acid relative to the total number of
    /// residues, or zero if there are no residues.
    pub fn frequencies(&self) -> Vec<f64> {
        self.counts
            .iter()
            .map(|&count| {
                if self.total == 0 {
                    0.0
                } else {
                    count as f64 / self.total as f64
                }
            })
            .collect()
    }
}

/// Count the given amino acids over all records from a FASTA source.
pub fn count_amino_acids<R: Read>(
    reader: R,
    mag: &str,
    amino_acids: &[u8],
) -> Result<AminoAcidCounts> {
    let mut lookup = [None; 256];
    for (i, &amino_acid) in amino_acids.iter().enumerate() {
        lookup[amino_acid as usize] = Some(i);
    }

    let mut counts = AminoAcidCounts {
        mag: mag.to_string(),
        total: 0,
        counts: vec![0; amino_acids.len()],
    };

    for result in fasta::Reader::new(reader).records() {
        let record = result.with_context(|| format!("Error reading FASTA record from {}", mag))?;
        for &residue in record.seq() {
            if let Some(i) = lookup[residue as usize] {
                counts.counts[i] += 1;
            }
            counts.total += 1;
        }
    }

    if counts.total == 0 {
        warn!("No amino acids found in {}", mag);
    }

    Ok(counts)
}

/// Find the files in a directory with the given extension, sorted by name.
pub fn find_fasta_files(dir: &Path, extension: &str) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    let entries = fs::read_dir(dir)
        .with_context(|| format!("Error listing directory {}", display_name(dir)))?;
    for entry in entries {
        let path = entry?.path();
        if path.is_file() && path.extension().map_or(false, |ext| ext == extension) {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

/// Count amino acids in each FASTA file.
pub fn count_amino_acids_in_files(
    fasta_files: &[PathBuf],
    amino_acids: &[u8],
) -> Result<Vec<AminoAcidCounts>> {
    let mut results = Vec::with_capacity(fasta_files.len());
    for fasta_file in fasta_files {
        let mag = match fasta_file.file_name() {
            Some(name) => name.to_string_lossy().into_owned(),
            None => display_name(fasta_file),
        };
        info!("Reading {}", display_name(fasta_file));
        let counts = count_amino_acids(open_input(fasta_file)?, &mag, amino_acids)?;
        info!("{} amino acids in {}", counts.total, mag);
        results.push(counts);
    }
    Ok(results)
}

/// Column names for the counts CSV file.
pub fn header(amino_acids: &[u8]) -> Vec<String> {
    let mut header = vec!["MAG".to_string(), "Total_AA".to_string()];
    header.extend(amino_acids.iter().map(|&aa| format!("{}_Count", aa as char)));
    header.extend(amino_acids.iter().map(|&aa| format!("{}_Frequency", aa as char)));
    header
}

/// Write amino acid counts and frequencies in CSV format.
pub fn write_counts<W: std::io::Write>(
    writer: &mut csv::Writer<W>,
    results: &[AminoAcidCounts],
    amino_acids: &[u8],
) -> Result<()> {
    writer.write_record(header(amino_acids))?;
    for counts in results {
        ensure!(
            counts.counts.len() == amino_acids.len(),
            "Counts for {} do not match the amino acids counted",
            counts.mag
        );
        let mut record = vec![counts.mag.clone(), counts.total.to_string()];
        record.extend(counts.counts.iter().map(|count| count.to_string()));
        record.extend(counts.frequencies().iter().map(|frequency| frequency.to_string()));
        writer
            .write_record(&record)
            .with_context(|| format!("Error writing counts for {}", counts.mag))?;
    }
    writer.flush()?;
    Ok(())
}

/// Count amino acids in the FASTA files and write the results to a CSV file.
pub fn write_counts_file(
    results: &[AminoAcidCounts],
    amino_acids: &[u8],
    output_file: &Path,
) -> Result<()> {
    let output_filename = display_name(output_file);
    let mut writer = csv::Writer::from_path(output_file)
        .with_context(|| format!("Error creating file {}", output_filename))?;
    write_counts(&mut writer, results, amino_acids)
        .with_context(|| format!("Error writing {}", output_filename))?;
    info!("Results have been saved to {}", output_filename);
    Ok(())
}
