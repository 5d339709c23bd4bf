//! Read access to the CSV files backing the database.

use crate::common::TABLES;
use anyhow::{Context, Result, bail};
use csv::ReaderBuilder;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

/// A SQL table or view: a header row plus data rows.
///
/// Nothing enforces that every row has as many cells as there are columns; a
/// ragged table renders ragged.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Table {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

/// The loaded tables, keyed by name.
pub type Database = HashMap<String, Table>;

/// Load a single CSV file into a [`Table`].
///
/// The first record is the column row, everything after it is data.
pub fn load_table(path: impl AsRef<Path>) -> Result<Table> {
    let path = path.as_ref();
    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_path(path)
        .with_context(|| format!("error opening table file {:?}", path))?;

    let mut columns: Option<Vec<String>> = None;
    let mut rows = Vec::new();
    for record in reader.records() {
        let record =
            record.with_context(|| format!("error reading record from {:?}", path))?;
        let cells = record.iter().map(String::from).collect::<Vec<_>>();
        match &columns {
            None => columns = Some(cells),
            Some(_) => rows.push(cells),
        }
    }

    let Some(columns) = columns else {
        bail!("table file {:?} is empty, expected a header row", path);
    };
    Ok(Table { columns, rows })
}

/// Scan a directory for `*.csv` files and load each as a table named by its
/// file stem.
pub fn load_dir(data_dir: impl AsRef<Path>) -> Result<Database> {
    let data_dir = data_dir.as_ref();
    let entries = std::fs::read_dir(data_dir)
        .with_context(|| format!("error reading data directory {:?}", data_dir))?;

    let mut database = Database::new();
    for entry in entries {
        let entry = entry.context("error reading data directory entry")?;
        let path = entry.path();
        if path.extension().and_then(|ext| ext.to_str()) != Some("csv") {
            continue;
        }
        let Some(name) = path.file_stem().and_then(|stem| stem.to_str()) else {
            continue;
        };
        let table = load_table(&path)?;
        database.insert(name.to_string(), table);
    }

    let mut names = database.keys().cloned().collect::<Vec<_>>();
    names.sort();
    tracing::info!("{} loaded tables: {}", TABLES, names.join(", "));
    Ok(database)
}
