//! Clean-up of merged abundance and annotation tables.
//!
//! Three rules are applied to every row, the header included:
//!
//! * a field consisting only of `-` (eggNOG's placeholder for no value) is
//!   replaced with an empty field
//! * the COG category is reduced to its first character
//! * the `ko:` prefix is removed from the KEGG orthology assignment
//!
//! The COG category and KEGG columns are located by fixed position, given by
//! a [`ColumnLayout`](struct.ColumnLayout.html). Rows too short to contain
//! one of these columns are left alone for that rule. Finally the trailing
//! empty fields of the header are removed and the annotation column labels
//! appended.

use crate::annotation::ANNOTATION_COLUMNS;
use crate::table::{display_name, read_table, write_table, Row};
use anyhow::{bail, Result};
use log::info;
use std::path::{Path, PathBuf};

const MISSING_VALUE: &str = "-";
const KEGG_KO_PREFIX: &str = "ko:";

/// Positions (0-based) of the annotation columns that need cleaning.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ColumnLayout {
    pub cog_category: usize,
    pub kegg_ko: usize,
}

impl Default for ColumnLayout {
    /// The layout of the merged table for the full set of samples in the
    /// abundance table the pipeline was written for: 289 leading columns
    /// followed by the annotation columns.
    fn default() -> Self {
        ColumnLayout {
            cog_category: 289,
            kegg_ko: 292,
        }
    }
}

impl ColumnLayout {
    /// Layout for a merged table of the given width, i.e. with the
    /// annotation columns as the last four columns.
    pub fn for_width(width: usize) -> Option<ColumnLayout> {
        if width < ANNOTATION_COLUMNS.len() {
            return None;
        }
        Some(ColumnLayout {
            cog_category: width - ANNOTATION_COLUMNS.len(),
            kegg_ko: width - 1,
        })
    }
}

/// Apply the clean-up rules to a single row.
pub fn normalize_row(row: &mut Row, layout: &ColumnLayout) {
    for field in row.iter_mut() {
        if *field == MISSING_VALUE {
            field.clear();
        }
    }

    if let Some(cog_category) = row.get_mut(layout.cog_category) {
        if let Some(first) = cog_category.chars().next() {
            if cog_category.chars().count() >= 2 {
                *cog_category = first.to_string();
            }
        }
    }

    if let Some(kegg_ko) = row.get_mut(layout.kegg_ko) {
        if kegg_ko.starts_with(KEGG_KO_PREFIX) {
            kegg_ko.replace_range(..KEGG_KO_PREFIX.len(), "");
        }
    }
}

/// Replace the trailing empty fields of a header row with the annotation
/// column labels.
pub fn extend_header(header: &mut Row) {
    while header.last().map_or(false, |field| field.is_empty()) {
        header.pop();
    }
    header.extend(ANNOTATION_COLUMNS.iter().map(|label| label.to_string()));
}

/// Clean up all rows of a merged table, the first row being the header.
pub fn normalize(mut rows: Vec<Row>, layout: &ColumnLayout) -> Vec<Row> {
    for row in rows.iter_mut() {
        normalize_row(row, layout);
    }
    if let Some(header) = rows.first_mut() {
        extend_header(header);
    }
    rows
}

/// Clean up a merged table file. If no layout is given, it is worked out
/// from the width of the header.
pub fn normalize_file(
    input_file: &Path,
    output_file: &Option<PathBuf>,
    layout: Option<ColumnLayout>,
) -> Result<()> {
    let input_filename = display_name(input_file);
    info!("Reading merged table from {}", input_filename);
    let rows = read_table(input_file)?;

    let header_width = match rows.first() {
        Some(header) => header.len(),
        None => bail!("No header found in {}", input_filename),
    };

    let layout = match layout {
        Some(layout) => layout,
        None => match ColumnLayout::for_width(header_width) {
            Some(layout) => layout,
            None => bail!(
                "Header in {} has {} columns, too few to contain annotations",
                input_filename,
                header_width
            ),
        },
    };
    info!(
        "Cleaning COG category in column {} and KEGG orthology in column {}",
        layout.cog_category + 1,
        layout.kegg_ko + 1
    );

    let rows = normalize(rows, &layout);
    info!("{} rows cleaned", rows.len());

    write_table(&rows, output_file)?;

    Ok(())
}
