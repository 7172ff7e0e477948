//! Outer join of sample tables on gene name.
//!
//! The joined table contains every gene present in any of the input tables,
//! sorted by name, and the sample columns of each table in turn. A gene
//! missing from one of the tables has empty values for that table's samples.

use crate::sample::SampleTable;
use anyhow::{bail, Result};
use log::info;
use std::collections::HashMap;
use std::path::PathBuf;

/// Join sample tables into a single table.
pub fn aggregate(tables: &[SampleTable]) -> Result<SampleTable> {
    let mut samples = Vec::new();
    let mut seen: HashMap<&str, usize> = HashMap::new();
    for (number, table) in tables.iter().enumerate() {
        for sample in table.samples() {
            match seen.insert(sample.as_str(), number) {
                Some(other) if other == number => {
                    bail!("Sample {} appears more than once in table {}", sample, number + 1)
                }
                Some(other) => bail!(
                    "Sample {} found in both table {} and table {}",
                    sample,
                    other + 1,
                    number + 1
                ),
                None => samples.push(sample.clone()),
            }
        }
    }

    let mut aggregated = SampleTable::new(samples);

    let mut offset = 0;
    for table in tables {
        for gene in table.genes() {
            aggregated.add_gene(gene);
            if let Some(values) = table.get(gene) {
                for (sample, value) in values.iter().enumerate() {
                    aggregated.insert(gene, offset + sample, value)?;
                }
            }
        }
        offset += table.samples().len();
    }

    aggregated.sort_genes();

    Ok(aggregated)
}

/// Join the sample tables in the given files, writing the result to the
/// given output file or stdout.
pub fn aggregate_files(table_files: &[PathBuf], output_file: &Option<PathBuf>) -> Result<()> {
    let tables = table_files
        .iter()
        .map(|file| SampleTable::from_file(file))
        .collect::<Result<Vec<SampleTable>>>()?;

    let aggregated = aggregate(&tables)?;
    info!(
        "{} genes and {} samples in joined table",
        aggregated.len(),
        aggregated.samples().len()
    );

    aggregated.write(output_file)
}
