use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use serde::Serialize;
use tracing::debug;

/// One CSV line: a category label followed by its numeric columns.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TableRow {
    pub category: String,
    pub values: Vec<f64>,
}

pub trait DataTableProvider {
    fn load(&self, name: &str) -> Result<Vec<TableRow>>;
}

/// Serves `.csv` files from a single directory.
#[derive(Debug, Clone)]
pub struct CsvDirectory {
    root: PathBuf,
}

impl CsvDirectory {
    pub fn new(root: PathBuf) -> Self {
        Self { root }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl DataTableProvider for CsvDirectory {
    fn load(&self, name: &str) -> Result<Vec<TableRow>> {
        validate_name(name)?;
        let path = self.root.join(name);
        let raw = fs::read_to_string(&path)
            .with_context(|| format!("failed to read table {}", path.display()))?;
        let rows = parse_rows(&raw).with_context(|| format!("failed to parse table {}", path.display()))?;
        debug!(table = name, rows = rows.len(), "loaded table");
        Ok(rows)
    }
}

fn validate_name(name: &str) -> Result<()> {
    if name.contains("..") || name.contains('/') || name.contains('\\') {
        bail!("table name '{name}' must not contain path separators");
    }
    if !name.ends_with(".csv") || name.len() == ".csv".len() {
        bail!("table name '{name}' must be a .csv file");
    }
    Ok(())
}

/// Reads RFC 4180 CSV: the header record is skipped, quoted fields may hold
/// commas, and cells that do not parse as numbers are dropped from the row.
pub fn parse_rows(raw: &str) -> Result<Vec<TableRow>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(raw.as_bytes());
    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record.context("malformed CSV record")?;
        let mut cells = record.iter();
        let Some(category) = cells.next() else {
            continue;
        };
        let values = cells.filter_map(|cell| cell.parse::<f64>().ok()).collect();
        rows.push(TableRow {
            category: category.to_string(),
            values,
        });
    }
    Ok(rows)
}
