//! CSV persistence for scraped and enriched tables

use std::collections::HashMap;
use std::fs::File;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{info, warn};

/// Column used to join a previous output back onto the input rows.
const KEY_COLUMN: &str = "title";

/// Reads every row of a CSV file, matching struct fields to header names.
/// Columns the row type does not name are ignored.
pub fn read_rows<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>> {
    let mut reader =
        csv::Reader::from_path(path).with_context(|| format!("opening {}", path.display()))?;

    let rows = reader
        .deserialize()
        .collect::<Result<Vec<T>, _>>()
        .with_context(|| format!("reading rows from {}", path.display()))?;

    Ok(rows)
}

/// Writes rows with a header line derived from the row type.
pub fn write_rows<T: Serialize>(path: &Path, rows: &[T]) -> Result<()> {
    let mut writer =
        csv::Writer::from_path(path).with_context(|| format!("creating {}", path.display()))?;

    for row in rows {
        writer.serialize(row)?;
    }
    writer.flush()?;

    Ok(())
}

/// Cell text for an optional value; absent values are empty cells.
pub fn optional_cell<T: ToString>(value: Option<T>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

/// A previously written output table, indexed by title.
#[derive(Debug, Default)]
pub struct ExistingTable {
    rows: HashMap<String, HashMap<String, String>>,
}

impl ExistingTable {
    /// Loads `path` if it exists. A file that cannot be read is logged and
    /// treated as if there were no previous output.
    pub fn load(path: &Path) -> Self {
        if !path.exists() {
            return Self::default();
        }

        match Self::read(path) {
            Ok(table) => {
                info!("Found existing enriched data with {} movies", table.len());
                table
            }
            Err(e) => {
                warn!("Could not read existing enriched file: {:#}", e);
                Self::default()
            }
        }
    }

    fn read(path: &Path) -> Result<Self> {
        let mut reader = csv::Reader::from_path(path)?;
        let headers = reader.headers()?.clone();

        let mut rows = HashMap::new();
        for record in reader.records() {
            let record = record?;
            let row: HashMap<String, String> = headers
                .iter()
                .zip(record.iter())
                .map(|(h, v)| (h.to_string(), v.to_string()))
                .collect();

            if let Some(key) = row.get(KEY_COLUMN).cloned() {
                // First occurrence wins
                rows.entry(key).or_insert(row);
            }
        }

        Ok(Self { rows })
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// The stored row for `title`, if its `marker` column is filled in.
    pub fn enriched_row(&self, title: &str, marker: &str) -> Option<&HashMap<String, String>> {
        self.rows
            .get(title)
            .filter(|row| row.get(marker).is_some_and(|v| !v.trim().is_empty()))
    }
}

/// Writer for tables whose header is assembled at runtime.
pub struct TableWriter {
    writer: csv::Writer<File>,
    width: usize,
}

impl TableWriter {
    pub fn create(path: &Path, header: &[&str]) -> Result<Self> {
        let mut writer =
            csv::Writer::from_path(path).with_context(|| format!("creating {}", path.display()))?;
        writer.write_record(header)?;

        Ok(Self {
            writer,
            width: header.len(),
        })
    }

    /// Writes one record, padding short rows with empty cells.
    pub fn write(&mut self, mut cells: Vec<String>) -> Result<()> {
        cells.resize(self.width, String::new());
        self.writer.write_record(&cells)?;
        Ok(())
    }

    pub fn finish(mut self) -> Result<()> {
        self.writer.flush()?;
        Ok(())
    }
}
