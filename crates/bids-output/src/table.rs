//! Keyed TSV tables shared by every acquisition of a dataset.

use std::path::{Path, PathBuf};

use bids_model::{DatasetRow, NOT_AVAILABLE};
use tracing::debug;

use crate::error::{OutputError, Result, io_error};

/// Whether an upsert added a row or replaced one with the same key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpsertOutcome {
    Inserted,
    Replaced,
}

/// A dataset table held in memory; `None` cells are written as `n/a`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatasetTable {
    path: PathBuf,
    columns: Vec<String>,
    rows: Vec<Vec<Option<String>>>,
}

impl DatasetTable {
    /// An empty table that will be written to `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            columns: Vec::new(),
            rows: Vec::new(),
        }
    }

    /// Read the table at `path`, or start an empty one when it does not exist.
    pub fn open(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::new(path));
        }
        let content = std::fs::read_to_string(path).map_err(io_error(path))?;
        Self::parse(path, &content)
    }

    fn parse(path: &Path, content: &str) -> Result<Self> {
        let content = content.strip_prefix('\u{feff}').unwrap_or(content);
        let table_error = |source| OutputError::Table {
            path: path.to_path_buf(),
            source,
        };
        let mut reader = csv::ReaderBuilder::new()
            .delimiter(b'\t')
            .from_reader(content.as_bytes());
        let columns = reader
            .headers()
            .map_err(table_error)?
            .iter()
            .map(str::to_string)
            .collect();
        let mut rows = Vec::new();
        for record in reader.records() {
            let record = record.map_err(table_error)?;
            rows.push(
                record
                    .iter()
                    .map(|cell| (cell != NOT_AVAILABLE).then(|| cell.to_string()))
                    .collect(),
            );
        }
        Ok(Self {
            path: path.to_path_buf(),
            columns,
            rows,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Cell at `row` in `column`; `None` when absent or `n/a`.
    pub fn cell(&self, row: usize, column: &str) -> Option<&str> {
        let index = self.column_index(column)?;
        self.rows.get(row)?.get(index)?.as_deref()
    }

    fn column_index(&self, column: &str) -> Option<usize> {
        self.columns.iter().position(|name| name == column)
    }

    /// Insert `row`, or replace the row whose `key` column matches.
    ///
    /// Columns the table lacks are appended in the row's order; cells the
    /// row does not name are left `n/a`.
    pub fn upsert(&mut self, key: &str, row: &DatasetRow) -> Result<UpsertOutcome> {
        let key_value = row.get(key).ok_or_else(|| OutputError::MissingKey {
            path: self.path.clone(),
            key: key.to_string(),
        })?;

        for column in row.columns() {
            if self.column_index(column).is_none() {
                self.columns.push(column.to_string());
                for existing in &mut self.rows {
                    existing.push(None);
                }
            }
        }

        let mut cells = vec![None; self.columns.len()];
        for (column, value) in row.cells() {
            if let Some(index) = self.column_index(column) {
                cells[index] = value.clone();
            }
        }

        let key_index = self.column_index(key);
        let existing = self.rows.iter().position(|existing| {
            key_index.and_then(|index| existing.get(index)?.as_deref()) == Some(key_value)
        });
        match existing {
            Some(position) => {
                self.rows[position] = cells;
                Ok(UpsertOutcome::Replaced)
            }
            None => {
                self.rows.push(cells);
                Ok(UpsertOutcome::Inserted)
            }
        }
    }

    pub fn to_tsv_string(&self) -> Result<String> {
        if self.columns.is_empty() {
            return Ok(String::new());
        }
        let table_error = |source| OutputError::Table {
            path: self.path.clone(),
            source,
        };
        let mut writer = csv::WriterBuilder::new()
            .delimiter(b'\t')
            .from_writer(Vec::new());
        writer.write_record(&self.columns).map_err(table_error)?;
        for row in &self.rows {
            writer
                .write_record(row.iter().map(|cell| cell.as_deref().unwrap_or(NOT_AVAILABLE)))
                .map_err(table_error)?;
        }
        let bytes = writer.into_inner().map_err(|e| OutputError::Io {
            path: self.path.clone(),
            source: e.into_error(),
        })?;
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }

    pub fn save(&self) -> Result<()> {
        let content = self.to_tsv_string()?;
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent).map_err(io_error(parent))?;
        }
        std::fs::write(&self.path, content).map_err(io_error(&self.path))?;
        debug!(path = %self.path.display(), rows = self.rows.len(), "wrote dataset table");
        Ok(())
    }
}
