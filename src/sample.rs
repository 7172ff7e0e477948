//! Per-sample gene statistics tables.
//!
//! A [`SampleTable`](struct.SampleTable.html) holds one value per gene for
//! each of a number of samples (columns). Tables are built either by
//! extracting a chosen statistic from BBMap `*.rpkm.out` files, one file per
//! sample, or by reading a previously written table. Values are kept as the
//! strings they were read as and a gene without a value for a sample is
//! written as an empty field.

use crate::table::{create_table_writer, display_name, open_input, read_table, table_reader, Row};
use anyhow::{bail, ensure, Context, Result};
use log::{info, warn};
use std::collections::HashMap;
use std::fmt;
use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Label of the gene column in sample tables.
pub const GENE_COLUMN: &str = "gene_name";

/// Suffix of BBMap per-sample statistics files.
pub const RPKM_FILE_SUFFIX: &str = "rpkm.out";

/// Statistics reported for each gene in BBMap `*.rpkm.out` files.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Statistic {
    Bases,
    Coverage,
    Rpkm,
    Fpkm,
}

impl Statistic {
    /// Column (0-based) holding this statistic in a `*.rpkm.out` file.
    pub fn column(&self) -> usize {
        match self {
            Statistic::Bases => 2,
            Statistic::Coverage => 3,
            Statistic::Rpkm => 5,
            Statistic::Fpkm => 7,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Statistic::Bases => "Bases",
            Statistic::Coverage => "Coverage",
            Statistic::Rpkm => "RPKM",
            Statistic::Fpkm => "FPKM",
        }
    }
}

impl fmt::Display for Statistic {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Statistic {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "Bases" => Ok(Statistic::Bases),
            "Coverage" => Ok(Statistic::Coverage),
            "RPKM" => Ok(Statistic::Rpkm),
            "FPKM" => Ok(Statistic::Fpkm),
            _ => bail!("no such type"),
        }
    }
}

/// Gene values for a set of samples.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SampleTable {
    samples: Vec<String>,
    genes: Vec<String>,
    index: HashMap<String, usize>,
    values: Vec<Vec<String>>,
}

impl SampleTable {
    pub fn new(samples: Vec<String>) -> SampleTable {
        SampleTable {
            samples,
            ..SampleTable::default()
        }
    }

    pub fn samples(&self) -> &[String] {
        &self.samples
    }

    /// Genes in the order in which they were first added.
    pub fn genes(&self) -> &[String] {
        &self.genes
    }

    pub fn len(&self) -> usize {
        self.genes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.genes.is_empty()
    }

    /// Set the value for a gene in the given sample column, replacing any
    /// existing value.
    pub fn insert(&mut self, gene: &str, sample: usize, value: &str) -> Result<()> {
        ensure!(
            sample < self.samples.len(),
            "No sample column {} for {}, table has {} samples",
            sample,
            gene,
            self.samples.len()
        );
        let row = self.add_gene(gene);
        self.values[row][sample] = value.to_string();
        Ok(())
    }

    /// Add a gene with no values if not already present, returning its row.
    pub fn add_gene(&mut self, gene: &str) -> usize {
        match self.index.get(gene) {
            Some(&row) => row,
            None => {
                self.genes.push(gene.to_string());
                self.values.push(vec![String::new(); self.samples.len()]);
                self.index.insert(gene.to_string(), self.genes.len() - 1);
                self.genes.len() - 1
            }
        }
    }

    /// Values for a gene, one per sample, or `None` if the gene is absent.
    pub fn get(&self, gene: &str) -> Option<&[String]> {
        self.index.get(gene).map(|&row| self.values[row].as_slice())
    }

    /// Reorder genes by name.
    pub fn sort_genes(&mut self) {
        let mut order: Vec<usize> = (0..self.genes.len()).collect();
        order.sort_by(|&a, &b| self.genes[a].cmp(&self.genes[b]));
        self.genes = order.iter().map(|&row| self.genes[row].clone()).collect();
        self.values = order.iter().map(|&row| self.values[row].clone()).collect();
        self.index = self
            .genes
            .iter()
            .enumerate()
            .map(|(row, gene)| (gene.clone(), row))
            .collect();
    }

    /// The header row followed by one row per gene.
    pub fn rows(&self) -> impl Iterator<Item = Row> + '_ {
        let header: Row = std::iter::once(GENE_COLUMN.to_string())
            .chain(self.samples.iter().cloned())
            .collect();
        let rows = self.genes.iter().zip(self.values.iter()).map(|(gene, values)| {
            std::iter::once(gene.clone())
                .chain(values.iter().cloned())
                .collect::<Row>()
        });
        std::iter::once(header).chain(rows)
    }

    /// Build a table from rows read from a file, the first being the header
    /// giving the sample names. Rows shorter than the header are padded with
    /// empty values.
    pub fn from_rows(rows: Vec<Row>, name: &str) -> Result<SampleTable> {
        let mut rows = rows.into_iter();
        let header = match rows.next() {
            Some(header) => header,
            None => bail!("No header found in {}", name),
        };
        match header.first() {
            Some(label) if label == GENE_COLUMN => {}
            Some(label) => bail!(
                "Expected {} as first column in {} but found {}",
                GENE_COLUMN,
                name,
                label
            ),
            None => bail!("Empty header in {}", name),
        }

        let mut table = SampleTable::new(header[1..].to_vec());
        for (line, row) in rows.enumerate() {
            let gene = match row.first() {
                Some(gene) => gene,
                None => continue,
            };
            if row.len() > header.len() {
                bail!(
                    "Row {} for {} in {} has more fields than the header",
                    line + 2,
                    gene,
                    name
                );
            }
            if table.get(gene).is_some() {
                warn!("Replacing earlier values for {} in {}", gene, name);
            }
            table.add_gene(gene);
            for sample in 0..table.samples().len() {
                let value = row.get(sample + 1).map_or("", String::as_str);
                table.insert(gene, sample, value)?;
            }
        }
        Ok(table)
    }

    pub fn from_file(path: &Path) -> Result<SampleTable> {
        let name = display_name(path);
        info!("Reading {}", name);
        let table = SampleTable::from_rows(read_table(path)?, &name)?;
        info!(
            "{} genes and {} samples read from {}",
            table.len(),
            table.samples().len(),
            name
        );
        Ok(table)
    }

    /// Write the table with a header row to the given file or stdout. Any
    /// row that cannot be written ends the run.
    pub fn write(&self, output_file: &Option<PathBuf>) -> Result<()> {
        match output_file {
            Some(file) => info!("Writing {} genes to {}", self.len(), display_name(file)),
            None => info!("Writing {} genes to stdout", self.len()),
        }
        let mut writer = create_table_writer(output_file)?;
        for row in self.rows() {
            writer.write_row(&row)?;
        }
        writer.flush()?;
        Ok(())
    }
}

/// Sample name for a `*.rpkm.out` file, i.e. the file name up to `.rpkm`.
pub fn sample_name(path: &Path) -> Result<String> {
    let file_name = match path.file_name().and_then(|name| name.to_str()) {
        Some(name) => name,
        None => bail!("invalid file name for {:?}", path),
    };
    Ok(file_name
        .split(".rpkm")
        .next()
        .unwrap_or(file_name)
        .to_string())
}

/// Find the `*.rpkm.out` files in a directory, sorted by name.
pub fn find_rpkm_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    let entries = fs::read_dir(dir)
        .with_context(|| format!("Error listing directory {}", display_name(dir)))?;
    for entry in entries {
        let path = entry?.path();
        let is_rpkm_file = path
            .file_name()
            .and_then(|name| name.to_str())
            .map_or(false, |name| name.ends_with(RPKM_FILE_SUFFIX));
        if is_rpkm_file && path.is_file() {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

/// Add the values of a statistic for one sample from a `*.rpkm.out` source.
/// Comment lines and genes whose name contains `#` are skipped.
pub fn read_rpkm_statistic<R: Read>(
    table: &mut SampleTable,
    sample: usize,
    reader: R,
    statistic: Statistic,
    name: &str,
) -> Result<usize> {
    let mut reader = table_reader(reader, Some(b'#'));
    let mut count = 0;
    for result in reader.records() {
        let record = result.with_context(|| format!("Error reading {}", name))?;
        let gene = &record[0];
        if gene.contains('#') {
            continue;
        }
        let value = match record.get(statistic.column()) {
            Some(value) => value,
            None => bail!(
                "No {} column for {} at line {} in {}",
                statistic,
                gene,
                record.position().map_or(0, |position| position.line()),
                name
            ),
        };
        table.insert(gene, sample, value)?;
        count += 1;
    }
    Ok(count)
}

/// Build a table of the given statistic with one column per `*.rpkm.out`
/// file.
pub fn extract_statistic(rpkm_files: &[PathBuf], statistic: Statistic) -> Result<SampleTable> {
    let mut samples = Vec::with_capacity(rpkm_files.len());
    let mut sample_files: HashMap<String, &PathBuf> = HashMap::new();
    for rpkm_file in rpkm_files {
        let sample = sample_name(rpkm_file)?;
        if let Some(other_file) = sample_files.insert(sample.clone(), rpkm_file) {
            bail!(
                "Sample name {} given by both {} and {}",
                sample,
                display_name(other_file),
                display_name(rpkm_file)
            );
        }
        samples.push(sample);
    }

    let mut table = SampleTable::new(samples);

    for (sample, rpkm_file) in rpkm_files.iter().enumerate() {
        let name = display_name(rpkm_file);
        info!("Reading {}", name);
        let count = read_rpkm_statistic(&mut table, sample, open_input(rpkm_file)?, statistic, &name)?;
        info!("{} genes read from {}", count, name);
    }

    info!(
        "{} values for {} genes across {} samples",
        statistic,
        table.len(),
        table.samples().len()
    );

    Ok(table)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    const SAMPLE1: &[u8] = b"#File\tsample1.bam
#Reads\t1000
#Name\tLength\tBases\tCoverage\tReads\tRPKM\tFrags\tFPKM
g1\t900\t2700\t3.0\t30\t12.5\t15\t6.25
g2\t600\t0\t0.0\t0\t0.0\t0\t0.0
bad#gene\t600\t10\t1.0\t1\t1.0\t1\t1.0
";

    const SAMPLE2: &[u8] = b"#Name\tLength\tBases\tCoverage\tReads\tRPKM\tFrags\tFPKM
g3\t300\t90\t0.3\t1\t2.5\t1\t1.5
g1\t900\t1800\t2.0\t20\t8.0\t10\t4.0
";

    fn to_row(fields: &[&str]) -> Row {
        fields.iter().map(|field| field.to_string()).collect()
    }

    fn two_sample_table(statistic: Statistic) -> SampleTable {
        let mut table = SampleTable::new(vec!["S1".to_string(), "S2".to_string()]);
        read_rpkm_statistic(&mut table, 0, SAMPLE1, statistic, "S1").expect("Error reading S1");
        read_rpkm_statistic(&mut table, 1, SAMPLE2, statistic, "S2").expect("Error reading S2");
        table
    }

    #[test]
    fn statistic_names() {
        assert_eq!("Bases".parse::<Statistic>().unwrap().column(), 2);
        assert_eq!("Coverage".parse::<Statistic>().unwrap().column(), 3);
        assert_eq!("RPKM".parse::<Statistic>().unwrap().column(), 5);
        assert_eq!("FPKM".parse::<Statistic>().unwrap().column(), 7);
        assert_eq!(Statistic::Rpkm.to_string(), "RPKM");
    }

    #[test]
    fn unknown_statistic() {
        let result = "rpkm".parse::<Statistic>();
        assert!(result.is_err(), "Statistic names are case sensitive");
        assert_eq!(result.unwrap_err().to_string(), "no such type");
        assert!("Reads".parse::<Statistic>().is_err());
    }

    #[test]
    fn extract_rpkm() {
        let table = two_sample_table(Statistic::Rpkm);
        assert_eq!(table.genes(), &["g1", "g2", "g3"]);
        assert_eq!(table.get("g1").unwrap(), &["12.5", "8.0"]);
        assert_eq!(table.get("g2").unwrap(), &["0.0", ""]);
        assert_eq!(table.get("g3").unwrap(), &["", "2.5"]);
        assert!(table.get("bad#gene").is_none(), "Gene containing '#' should be skipped");
    }

    #[test]
    fn extract_bases_rows() {
        let table = two_sample_table(Statistic::Bases);
        let rows: Vec<Row> = table.rows().collect();
        assert_eq!(
            rows,
            vec![
                to_row(&["gene_name", "S1", "S2"]),
                to_row(&["g1", "2700", "1800"]),
                to_row(&["g2", "0", ""]),
                to_row(&["g3", "", "90"]),
            ]
        );
    }

    #[test]
    fn missing_statistic_column() {
        let mut table = SampleTable::new(vec!["S1".to_string()]);
        let result = read_rpkm_statistic(&mut table, 0, &b"g1\t900\t2700\n"[..], Statistic::Fpkm, "S1");
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().starts_with("No FPKM column for g1"));
    }

    #[test]
    fn sample_names() {
        assert_eq!(sample_name(Path::new("/data/HuB1.rpkm.out")).unwrap(), "HuB1");
        assert_eq!(sample_name(Path::new("HuB2.sorted.rpkm.out")).unwrap(), "HuB2.sorted");
        assert_eq!(sample_name(Path::new("HuB3_rpkm.out")).unwrap(), "HuB3_rpkm.out");
    }

    #[test]
    fn find_and_extract_files() -> Result<()> {
        let dir = tempdir()?;
        fs::write(dir.path().join("B.rpkm.out"), SAMPLE2)?;
        fs::write(dir.path().join("A.rpkm.out"), SAMPLE1)?;
        fs::write(dir.path().join("notes.txt"), "g1\t1\n")?;
        fs::create_dir(dir.path().join("C.rpkm.out"))?;

        let files = find_rpkm_files(dir.path())?;
        assert_eq!(files, vec![dir.path().join("A.rpkm.out"), dir.path().join("B.rpkm.out")]);

        let table = extract_statistic(&files, Statistic::Coverage)?;
        assert_eq!(table.samples(), &["A", "B"]);
        assert_eq!(table.get("g1").unwrap(), &["3.0", "2.0"]);

        let output_file = dir.path().join("Coverage.txt");
        table.write(&Some(output_file.clone()))?;
        assert_eq!(
            fs::read_to_string(&output_file)?,
            "gene_name\tA\tB\ng1\t3.0\t2.0\ng2\t0.0\t\ng3\t\t0.3\n"
        );
        Ok(())
    }

    #[test]
    fn table_from_rows() {
        let rows = vec![
            to_row(&["gene_name", "S1", "S2"]),
            to_row(&["g2", "1.0", "2.0"]),
            to_row(&["g1", "3.0"]),
        ];
        let mut table = SampleTable::from_rows(rows, "test").expect("Error building table");
        assert_eq!(table.samples(), &["S1", "S2"]);
        assert_eq!(table.get("g1").unwrap(), &["3.0", ""]);
        table.sort_genes();
        assert_eq!(table.genes(), &["g1", "g2"]);
        assert_eq!(table.get("g2").unwrap(), &["1.0", "2.0"]);
    }

    #[test]
    fn colliding_sample_names() -> Result<()> {
        let dir = tempdir()?;
        fs::write(dir.path().join("A.rpkm.out"), SAMPLE1)?;
        fs::write(dir.path().join("A.rpkm.v2.rpkm.out"), SAMPLE2)?;

        let files = find_rpkm_files(dir.path())?;
        let result = extract_statistic(&files, Statistic::Rpkm);
        assert!(result.is_err(), "Expecting error for two files giving sample A");
        let message = result.unwrap_err().to_string();
        assert!(message.starts_with("Sample name A given by both"));
        assert!(message.contains("A.rpkm.out and"));
        assert!(message.ends_with("A.rpkm.v2.rpkm.out"));
        Ok(())
    }

    #[test]
    fn insert_outside_sample_columns() {
        let mut table = SampleTable::new(vec!["S1".to_string()]);
        assert!(table.insert("g1", 0, "1.0").is_ok());
        let result = table.insert("g1", 1, "2.0");
        assert!(result.is_err(), "Expecting error for missing sample column");
        assert_eq!(table.get("g1").unwrap(), &["1.0"]);

        let result = read_rpkm_statistic(&mut table, 3, SAMPLE2, Statistic::Rpkm, "S4");
        assert!(result.is_err());
        assert!(table.get("g3").is_none());
    }

    #[test]
    fn table_keyed_by_other_column() {
        let rows = vec![to_row(&["contig", "S1"]), to_row(&["c1", "2"])];
        let result = SampleTable::from_rows(rows, "contigs.txt");
        assert!(result.is_err());
        assert_eq!(
            result.unwrap_err().to_string(),
            "Expected gene_name as first column in contigs.txt but found contig"
        );
    }

    #[test]
    fn table_from_rows_too_wide() {
        let rows = vec![to_row(&["gene_name", "S1"]), to_row(&["g1", "1", "2"])];
        assert!(SampleTable::from_rows(rows, "test").is_err());
    }
}
