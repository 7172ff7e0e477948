//! Merging of gene abundance tables with functional annotations.
//!
//! Each row of the abundance table is extended with the four annotation
//! fields for the gene named in its first column, or with four empty fields
//! if the gene has no annotation. Rows are never dropped or reordered. The
//! header row is treated like any other row; its key is not expected to
//! match an annotation.
//!
//! Blank lines in the abundance table are not rows: they are skipped when the
//! table is read, so the merged file has one line per non-blank input line.

use crate::annotation::{AnnotationStore, ANNOTATION_COLUMNS};
use crate::table::{display_name, read_table, write_table, Row};
use anyhow::{Context, Result};
use log::info;
use serde::Serialize;
use std::path::{Path, PathBuf};

/// Counts of rows matched and not matched to an annotation.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct MergeSummary {
    pub rows: usize,
    pub matched: usize,
    pub unmatched: usize,
}

/// Append annotation fields to each row.
pub fn merge(rows: Vec<Row>, store: &AnnotationStore) -> (Vec<Row>, MergeSummary) {
    let mut summary = MergeSummary::default();
    let mut merged = Vec::with_capacity(rows.len());

    for mut row in rows {
        summary.rows += 1;
        let annotation = row.first().and_then(|key| store.get(key));
        match annotation {
            Some(annotation) => {
                summary.matched += 1;
                row.extend(annotation.fields().iter().map(|field| field.to_string()));
            }
            None => {
                summary.unmatched += 1;
                row.extend(ANNOTATION_COLUMNS.iter().map(|_| String::new()));
            }
        }
        merged.push(row);
    }

    (merged, summary)
}

/// Merge an abundance table file with an annotations file, writing the
/// merged table to the given output file or stdout.
pub fn merge_files(
    annotations_file: &Path,
    abundance_file: &Path,
    output_file: &Option<PathBuf>,
) -> Result<MergeSummary> {
    let store = AnnotationStore::from_file(annotations_file)?;

    info!("Reading abundances from {}", display_name(abundance_file));
    let rows = read_table(abundance_file)?;

    let (merged, summary) = merge(rows, &store);
    info!(
        "{} rows merged, {} annotated, {} without annotation",
        summary.rows, summary.matched, summary.unmatched
    );

    write_table(&merged, output_file)?;

    Ok(summary)
}

/// Write the merge summary to a CSV file.
pub fn write_summary(summary: &MergeSummary, summary_file: &Path) -> Result<()> {
    let summary_filename = display_name(summary_file);
    info!("Writing summary to {}", summary_filename);
    let mut summary_writer = csv::Writer::from_path(summary_file)
        .with_context(|| format!("Error creating summary file {}", summary_filename))?;
    summary_writer
        .serialize(summary)
        .with_context(|| format!("Error writing summary to {}", summary_filename))?;
    summary_writer.flush().with_context(|| {
        format!(
            "Error writing summary file {} to completion",
            summary_filename
        )
    })?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    const ANNOTATIONS: &[u8] = b"g1\t.\t.\t.\t.\t.\tCOG1\tDescA\tPrefA\t.\t.\tko:K001\n";

    fn to_row(fields: &[&str]) -> Row {
        fields.iter().map(|field| field.to_string()).collect()
    }

    fn store() -> AnnotationStore {
        AnnotationStore::from_reader(ANNOTATIONS, "test").expect("Error loading annotations")
    }

    #[test]
    fn matched_and_unmatched_rows() {
        let rows = vec![
            to_row(&["gene_name", "S1"]),
            to_row(&["g1", "10.5"]),
            to_row(&["g2", "3.0"]),
        ];
        let (merged, summary) = merge(rows, &store());
        assert_eq!(merged[0], to_row(&["gene_name", "S1", "", "", "", ""]));
        assert_eq!(
            merged[1],
            to_row(&["g1", "10.5", "COG1", "DescA", "PrefA", "ko:K001"])
        );
        assert_eq!(merged[2], to_row(&["g2", "3.0", "", "", "", ""]));
        assert_eq!(
            summary,
            MergeSummary {
                rows: 3,
                matched: 1,
                unmatched: 2
            }
        );
    }

    #[test]
    fn preserves_row_count_order_and_width() {
        let rows = vec![
            to_row(&["g3", "1", "2", "3"]),
            to_row(&["g1", "4"]),
            to_row(&["g1"]),
            to_row(&["g2", "5", "6"]),
        ];
        let (merged, _) = merge(rows.clone(), &store());
        assert_eq!(merged.len(), rows.len());
        for (original, merged) in rows.iter().zip(merged.iter()) {
            assert_eq!(merged[0], original[0], "Row order changed");
            assert_eq!(merged.len(), original.len() + 4);
            assert_eq!(&merged[..original.len()], &original[..]);
        }
    }

    #[test]
    fn empty_store() {
        let (merged, summary) = merge(vec![to_row(&["g1", "2"])], &AnnotationStore::new());
        assert_eq!(merged[0], to_row(&["g1", "2", "", "", "", ""]));
        assert_eq!(summary.unmatched, 1);
    }

    #[test]
    fn blank_lines_not_merged() -> Result<()> {
        let dir = tempdir()?;
        let annotations_file = dir.path().join("protein.emapper.annotations");
        let abundance_file = dir.path().join("RPKM.txt");
        let output_file = dir.path().join("merged_RPKM.txt");
        fs::write(&annotations_file, ANNOTATIONS)?;
        fs::write(&abundance_file, "gene_name\tS1\n\ng1\t1\n")?;

        let summary = merge_files(&annotations_file, &abundance_file, &Some(output_file.clone()))?;

        assert_eq!(summary.rows, 2);
        assert_eq!(
            fs::read_to_string(&output_file)?,
            "gene_name\tS1\t\t\t\t\ng1\t1\tCOG1\tDescA\tPrefA\tko:K001\n"
        );
        Ok(())
    }

    #[test]
    fn merge_and_summarise_files() -> Result<()> {
        let dir = tempdir()?;
        let annotations_file = dir.path().join("protein.emapper.annotations");
        let abundance_file = dir.path().join("RPKM.txt");
        let output_file = dir.path().join("merged_RPKM.txt");
        let summary_file = dir.path().join("summary.csv");
        fs::write(&annotations_file, ANNOTATIONS)?;
        fs::write(&abundance_file, "gene_name\tS1\ng1\t10.5\ng2\t3.0\n")?;

        let summary = merge_files(&annotations_file, &abundance_file, &Some(output_file.clone()))?;
        write_summary(&summary, &summary_file)?;

        assert_eq!(
            fs::read_to_string(&output_file)?,
            "gene_name\tS1\t\t\t\t\ng1\t10.5\tCOG1\tDescA\tPrefA\tko:K001\ng2\t3.0\t\t\t\t\n"
        );
        assert_eq!(
            fs::read_to_string(&summary_file)?,
            "rows,matched,unmatched\n3,1,2\n"
        );
        Ok(())
    }
}
