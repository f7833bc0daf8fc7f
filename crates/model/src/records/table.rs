use crate::{
    core::value::Value,
    records::{
        display::{DisplayOptions, render_table},
        error::RecordError,
    },
};
use serde::{Deserialize, Serialize};
use std::{cmp::Ordering, fmt};

/// An in-memory result set: labelled columns and rows of equal arity, kept
/// in the order the server delivered them.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TableData {
    columns: Vec<String>,
    rows: Vec<Vec<Value>>,
}

impl TableData {
    pub fn new(columns: Vec<String>, rows: Vec<Vec<Value>>) -> Result<Self, RecordError> {
        let expected = columns.len();
        if let Some((row, values)) = rows
            .iter()
            .enumerate()
            .find(|(_, values)| values.len() != expected)
        {
            return Err(RecordError::ArityMismatch {
                row,
                expected,
                actual: values.len(),
            });
        }

        Ok(TableData { columns, rows })
    }

    pub fn empty(columns: Vec<String>) -> Self {
        TableData {
            columns,
            rows: Vec::new(),
        }
    }

    /// Flattens batches into a single table in one pass.
    pub fn from_batches<I>(columns: Vec<String>, batches: I) -> Result<Self, RecordError>
    where
        I: IntoIterator<Item = Vec<Vec<Value>>>,
    {
        let rows = batches.into_iter().flatten().collect();
        Self::new(columns, rows)
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Vec<Value>] {
        &self.rows
    }

    pub fn num_rows(&self) -> usize {
        self.rows.len()
    }

    pub fn num_columns(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Exact label match first, then a case-insensitive one.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns
            .iter()
            .position(|c| c == name)
            .or_else(|| self.columns.iter().position(|c| c.eq_ignore_ascii_case(name)))
    }

    pub fn column(&self, name: &str) -> Result<Vec<&Value>, RecordError> {
        let idx = self
            .column_index(name)
            .ok_or_else(|| RecordError::UnknownColumn(name.to_string()))?;
        Ok(self.rows.iter().map(|row| &row[idx]).collect())
    }

    pub fn row(&self, index: usize) -> Option<&[Value]> {
        self.rows.get(index).map(Vec::as_slice)
    }

    pub fn get(&self, row: usize, column: &str) -> Option<&Value> {
        let idx = self.column_index(column)?;
        self.rows.get(row).map(|values| &values[idx])
    }

    /// Stable sort on one column. Values that cannot be compared keep their
    /// relative order.
    pub fn sort_by_column(&mut self, column: &str) -> Result<(), RecordError> {
        let idx = self
            .column_index(column)
            .ok_or_else(|| RecordError::UnknownColumn(column.to_string()))?;
        self.rows
            .sort_by(|a, b| a[idx].compare(&b[idx]).unwrap_or(Ordering::Equal));
        Ok(())
    }

    /// `{"columns": [...], "rows": [[...], ...]}` with untagged cell values.
    pub fn to_json(&self) -> serde_json::Value {
        let rows = self
            .rows
            .iter()
            .map(|row| serde_json::Value::Array(row.iter().map(Value::to_json).collect()))
            .collect();
        serde_json::json!({
            "columns": self.columns,
            "rows": serde_json::Value::Array(rows),
        })
    }

    pub fn render(&self, options: &DisplayOptions) -> String {
        render_table(self, options)
    }
}

impl fmt::Display for TableData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render(&DisplayOptions::default()))
    }
}
