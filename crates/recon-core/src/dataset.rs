//! Core data types for parsed inventory exports

use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};
use std::path::{Path, PathBuf};

/// A parsed export from a single CSV file
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Dataset {
    /// Header strings in file order
    pub columns: Vec<String>,
    /// Records in file order
    pub records: Vec<Record>,
    /// Source file path
    pub source_path: PathBuf,
}

impl Dataset {
    /// Create a new empty dataset
    pub fn new(source_path: PathBuf) -> Self {
        Self {
            columns: Vec::new(),
            records: Vec::new(),
            source_path,
        }
    }

    /// Get the number of records
    pub fn record_count(&self) -> usize {
        self.records.len()
    }

    /// Whether the dataset holds no records
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// The first record, if any
    pub fn first_record(&self) -> Option<&Record> {
        self.records.first()
    }

    /// Column names of the first record; empty for a dataset with no records
    pub fn first_record_columns(&self) -> BTreeSet<&str> {
        self.first_record()
            .map(|r| r.columns().collect())
            .unwrap_or_default()
    }

    /// File name for log lines and listings
    pub fn display_name(&self) -> String {
        file_label(&self.source_path)
    }
}

fn file_label(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

/// One row of an export, keyed by the literal header strings
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    pub fields: HashMap<String, String>,
}

impl Record {
    /// Create a record from an existing field map
    pub fn new(fields: HashMap<String, String>) -> Self {
        Self { fields }
    }

    /// Build a record from `(column, value)` pairs
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            fields: pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    /// Value of a column, if the column exists
    pub fn get(&self, column: &str) -> Option<&str> {
        self.fields.get(column).map(String::as_str)
    }

    /// Value of a column, blank when the column is absent
    pub fn value(&self, column: &str) -> &str {
        self.get(column).unwrap_or("")
    }

    /// Whether the record has the given column
    pub fn contains(&self, column: &str) -> bool {
        self.fields.contains_key(column)
    }

    /// Column names of this record, unordered
    pub fn columns(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }
}
