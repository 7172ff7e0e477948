//! Functions for reading and writing the tab-delimited tables passed between
//! pipeline stages.
//!
//! Tables are plain text with one row per line and fields separated by tab
//! characters. There is no quoting or escaping, rows may differ in width and
//! files ending in `.gz` are transparently decompressed or compressed.
//!
//! ```no_run
//! # use anyhow::Result;
//! use mgpipe::table::{read_table, write_table};
//! use std::path::{Path, PathBuf};
//!
//! # fn main() -> Result<()> {
//! let rows = read_table(Path::new("RPKM.txt"))?;
//! write_table(&rows, &Some(PathBuf::from("RPKM.copy.txt")))?;
//! # Ok(())
//! # }
//! ```

use anyhow::{bail, Context, Result};
use csv::{QuoteStyle, ReaderBuilder, WriterBuilder};
use flate2::bufread::MultiGzDecoder;
use flate2::write::GzEncoder;
use flate2::Compression;
use std::fs::File;
use std::io::{stdout, BufReader, Read, Write};
use std::path::{Path, PathBuf};

/// A single row of a table, split into its tab-separated fields.
pub type Row = Vec<String>;

/// Name used in log and error messages for a path.
pub fn display_name(path: &Path) -> String {
    path.to_string_lossy().into_owned()
}

/// Open a file for reading, decompressing it if the name ends with `.gz`.
pub fn open_input(path: &Path) -> Result<Box<dyn Read>> {
    let file = File::open(path)
        .with_context(|| format!("Error opening file {}", display_name(path)))?;

    let reader: Box<dyn Read> = if display_name(path).ends_with(".gz") {
        Box::new(MultiGzDecoder::new(BufReader::with_capacity(64 * 1024, file)))
    } else {
        Box::new(file)
    };

    Ok(reader)
}

/// Create a tab-delimited reader over any source. Lines starting with the
/// optional comment character are skipped.
pub fn table_reader<R: Read>(reader: R, comment: Option<u8>) -> csv::Reader<R> {
    ReaderBuilder::new()
        .delimiter(b'\t')
        .has_headers(false)
        .flexible(true)
        .quoting(false)
        .comment(comment)
        .from_reader(reader)
}

/// Read all rows from a tab-delimited reader.
pub fn read_rows<R: Read>(reader: &mut csv::Reader<R>, name: &str) -> Result<Vec<Row>> {
    let mut rows = Vec::new();
    for result in reader.records() {
        let record = result.with_context(|| format!("Error reading table {}", name))?;
        rows.push(record.iter().map(String::from).collect());
    }
    Ok(rows)
}

/// Read the whole of a tab-delimited table file into memory.
pub fn read_table(path: &Path) -> Result<Vec<Row>> {
    let mut reader = table_reader(open_input(path)?, None);
    read_rows(&mut reader, &display_name(path))
}

pub struct TableWriter<W: Write> {
    writer: csv::Writer<W>,
    name: String,
}

impl<W: Write> TableWriter<W> {
    pub fn new(writer: W) -> Self {
        TableWriter::with_name(writer, "unnamed")
    }

    pub fn with_name(writer: W, name: &str) -> Self {
        let writer = WriterBuilder::new()
            .delimiter(b'\t')
            .has_headers(false)
            .flexible(true)
            .quote_style(QuoteStyle::Never)
            .from_writer(writer);
        TableWriter {
            writer,
            name: name.to_string(),
        }
    }

    /// Write a single row. A failure here is fatal for the whole run so the
    /// error names the offending row.
    pub fn write_row<T: AsRef<str>>(&mut self, row: &[T]) -> Result<()> {
        if row.is_empty() {
            bail!("Attempt to write a row with no fields");
        }
        self.writer
            .write_record(row.iter().map(|field| field.as_ref()))
            .with_context(|| {
                let fields: Vec<&str> = row.iter().map(|field| field.as_ref()).collect();
                format!("Error writing row {:?}", fields)
            })?;
        Ok(())
    }

    pub fn flush(&mut self) -> Result<()> {
        self.writer
            .flush()
            .with_context(|| format!("Error writing {} to completion", self.name))?;
        Ok(())
    }

    /// Flush and hand back the underlying writer.
    pub fn into_inner(self) -> Result<W> {
        match self.writer.into_inner() {
            Ok(writer) => Ok(writer),
            Err(error) => bail!("Error writing {} to completion: {}", self.name, error.error()),
        }
    }
}

/// Create a table writer for the given file, or stdout if no file is given.
/// Output is compressed if the file name ends with `.gz`.
pub fn create_table_writer(output_file: &Option<PathBuf>) -> Result<TableWriter<Box<dyn Write>>> {
    let writer: Box<dyn Write> = match output_file {
        Some(output_file) => {
            let output_filename = display_name(output_file);
            let file = File::create(output_file)
                .with_context(|| format!("Error creating file {}", output_filename))?;
            if output_filename.ends_with(".gz") {
                Box::new(GzEncoder::new(file, Compression::default()))
            } else {
                Box::new(file)
            }
        }
        None => Box::new(stdout()),
    };

    let name = match output_file {
        Some(output_file) => display_name(output_file),
        None => String::from("stdout"),
    };

    Ok(TableWriter::with_name(writer, &name))
}

/// Write all rows to the given file, or stdout if no file is given.
pub fn write_table(rows: &[Row], output_file: &Option<PathBuf>) -> Result<()> {
    let mut writer = create_table_writer(output_file)?;
    for row in rows {
        writer.write_row(row)?;
    }
    writer.flush()?;
    Ok(())
}
