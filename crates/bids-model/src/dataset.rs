//! Rows of the dataset-level `participants.tsv` and `scans.tsv` tables.

use serde::{Deserialize, Serialize};

/// An ordered set of named cells; `None` is written as `n/a`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatasetRow {
    cells: Vec<(String, Option<String>)>,
}

impl DatasetRow {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a cell, keeping the column position when it already exists.
    pub fn set(&mut self, column: &str, value: Option<String>) {
        match self.cells.iter_mut().find(|(name, _)| name == column) {
            Some((_, cell)) => *cell = value,
            None => self.cells.push((column.to_string(), value)),
        }
    }

    #[must_use]
    pub fn with(mut self, column: &str, value: Option<String>) -> Self {
        self.set(column, value);
        self
    }

    pub fn get(&self, column: &str) -> Option<&str> {
        self.cells
            .iter()
            .find(|(name, _)| name == column)
            .and_then(|(_, value)| value.as_deref())
    }

    pub fn columns(&self) -> impl Iterator<Item = &str> {
        self.cells.iter().map(|(name, _)| name.as_str())
    }

    pub fn cells(&self) -> &[(String, Option<String>)] {
        &self.cells
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_keeps_column_order() {
        let mut row = DatasetRow::new()
            .with("participant_id", Some("sub-01".to_string()))
            .with("age", None);
        row.set("participant_id", Some("sub-02".to_string()));
        row.set("sex", Some("F".to_string()));
        assert_eq!(row.columns().collect::<Vec<_>>(), ["participant_id", "age", "sex"]);
        assert_eq!(row.get("participant_id"), Some("sub-02"));
        assert_eq!(row.get("age"), None);
    }
}
