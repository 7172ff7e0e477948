//! Loading of eggNOG functional annotations keyed by gene identifier.
//!
//! Only four attributes are kept from each annotation line: the COG
//! category, the description, the preferred name and the KEGG orthology
//! assignment, taken from the 7th, 8th, 9th and 12th columns. Lines with
//! fewer than 12 columns are skipped without error. When a gene appears on
//! more than one line the last line wins.

use crate::table::{display_name, open_input, table_reader};
use anyhow::{Context, Result};
use log::{debug, info, warn};
use std::collections::HashMap;
use std::io::Read;
use std::path::Path;

/// Labels for the annotation columns appended to merged tables.
pub const ANNOTATION_COLUMNS: [&str; 4] = ["COG_category", "Description", "Preferred_name", "KEGG_ko"];

/// Minimum number of columns for an annotation line to be accepted.
pub const MIN_ANNOTATION_FIELDS: usize = 12;

const COG_CATEGORY_COLUMN: usize = 6;
const DESCRIPTION_COLUMN: usize = 7;
const PREFERRED_NAME_COLUMN: usize = 8;
const KEGG_KO_COLUMN: usize = 11;

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Annotation {
    pub cog_category: String,
    pub description: String,
    pub preferred_name: String,
    pub kegg_ko: String,
}

impl Annotation {
    /// Extract the annotation from the fields of a single line, returning the
    /// gene identifier along with it, or `None` if the line is too short.
    pub fn from_fields<T: AsRef<str>>(fields: &[T]) -> Option<(String, Annotation)> {
        if fields.len() < MIN_ANNOTATION_FIELDS {
            return None;
        }
        let field = |index: usize| fields[index].as_ref().to_string();
        let annotation = Annotation {
            cog_category: field(COG_CATEGORY_COLUMN),
            description: field(DESCRIPTION_COLUMN),
            preferred_name: field(PREFERRED_NAME_COLUMN),
            kegg_ko: field(KEGG_KO_COLUMN),
        };
        Some((field(0), annotation))
    }

    /// The annotation fields in the order they are appended to a table row.
    pub fn fields(&self) -> [&str; 4] {
        [
            self.cog_category.as_str(),
            self.description.as_str(),
            self.preferred_name.as_str(),
            self.kegg_ko.as_str(),
        ]
    }
}

/// Annotations for a set of genes.
#[derive(Debug, Default)]
pub struct AnnotationStore {
    annotations: HashMap<String, Annotation>,
    skipped: usize,
}

impl AnnotationStore {
    pub fn new() -> AnnotationStore {
        AnnotationStore::default()
    }

    /// Load annotations from an eggNOG-mapper annotations file.
    pub fn from_file(path: &Path) -> Result<AnnotationStore> {
        let name = display_name(path);
        info!("Reading annotations from {}", name);
        let store = AnnotationStore::from_reader(open_input(path)?, &name)?;
        info!(
            "{} annotated genes read from {}, {} short lines skipped",
            store.len(),
            name,
            store.skipped()
        );
        Ok(store)
    }

    pub fn from_reader<R: Read>(reader: R, name: &str) -> Result<AnnotationStore> {
        let mut reader = table_reader(reader, None);
        let mut store = AnnotationStore::new();
        for result in reader.records() {
            let record = result.with_context(|| format!("Error reading annotations from {}", name))?;
            let fields: Vec<&str> = record.iter().collect();
            if !store.add_line(&fields) {
                debug!(
                    "Skipping annotation line {} in {} with {} fields",
                    record.position().map_or(0, |position| position.line()),
                    name,
                    fields.len()
                );
            }
        }
        Ok(store)
    }

    /// Add the annotation from a single line split into fields, replacing any
    /// earlier annotation for the same gene. Returns false if the line was
    /// skipped for having too few fields.
    pub fn add_line<T: AsRef<str>>(&mut self, fields: &[T]) -> bool {
        match Annotation::from_fields(fields) {
            Some((key, annotation)) => {
                if self.annotations.contains_key(&key) {
                    warn!("Replacing earlier annotation for {}", key);
                }
                self.annotations.insert(key, annotation);
                true
            }
            None => {
                self.skipped += 1;
                false
            }
        }
    }

    pub fn get(&self, key: &str) -> Option<&Annotation> {
        self.annotations.get(key)
    }

    pub fn len(&self) -> usize {
        self.annotations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.annotations.is_empty()
    }

    /// The number of lines skipped for having too few fields.
    pub fn skipped(&self) -> usize {
        self.skipped
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ANNOTATIONS: &[u8] = b"#query\tseed\tevalue
g1\t.\t.\t.\t.\t.\tCOG1\tDescA\tPrefA\t.\t.\tko:K001
g2\tseed\t1e-10\t50\tx\ty\tS\t-\t-\t-\t-\t-\textra\tcolumns
g3\ttoo\tshort
";

    #[test]
    fn load_annotations() {
        let store = AnnotationStore::from_reader(ANNOTATIONS, "test").expect("Error loading annotations");
        assert_eq!(store.len(), 2);
        assert_eq!(store.skipped(), 2);
        let annotation = store.get("g1").expect("Missing annotation for g1");
        assert_eq!(annotation.fields(), ["COG1", "DescA", "PrefA", "ko:K001"]);
        let annotation = store.get("g2").expect("Missing annotation for g2");
        assert_eq!(annotation.fields(), ["S", "-", "-", "-"]);
        assert!(store.get("g3").is_none(), "Short line should be skipped");
        assert!(store.get("#query").is_none(), "Short header should be skipped");
    }

    #[test]
    fn last_duplicate_wins() {
        let annotations = b"g1\t.\t.\t.\t.\t.\tA\tfirst\tP1\t.\t.\tko:K1
g2\t.\t.\t.\t.\t.\tB\tother\tP2\t.\t.\tko:K2
g1\t.\t.\t.\t.\t.\tC\tsecond\tP3\t.\t.\tko:K3
";
        let store = AnnotationStore::from_reader(&annotations[..], "test").expect("Error loading annotations");
        assert_eq!(store.len(), 2);
        let annotation = store.get("g1").expect("Missing annotation for g1");
        assert_eq!(annotation.fields(), ["C", "second", "P3", "ko:K3"]);
    }

    #[test]
    fn keys_are_exact() {
        let mut store = AnnotationStore::new();
        assert!(store.add_line(&["Gene1", "", "", "", "", "", "A", "B", "C", "", "", "D"]));
        assert!(store.get("gene1").is_none());
        assert!(store.get("Gene1 ").is_none());
        assert!(store.get("Gene1").is_some());
    }

    #[test]
    fn eleven_fields_is_too_short() {
        let mut store = AnnotationStore::new();
        assert!(!store.add_line(&["g1", "", "", "", "", "", "A", "B", "C", "", ""]));
        assert!(store.is_empty());
        assert_eq!(store.skipped(), 1);
    }
}
