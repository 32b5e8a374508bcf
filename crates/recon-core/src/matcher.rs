//! Device-name lookup within a dataset
//!
//! Matching is exact string equality on the source's name column: no
//! trimming, no case folding. When a name occurs more than once, the first
//! record in file order wins.

use crate::dataset::{Dataset, Record};
use std::collections::HashMap;

/// Find the first record whose `name_column` equals `target_name`.
///
/// Linear scan in stored order. Returns `None` when the dataset is absent,
/// empty, or has no such record.
pub fn find_by_name<'a>(
    dataset: Option<&'a Dataset>,
    name_column: &str,
    target_name: &str,
) -> Option<&'a Record> {
    dataset?
        .records
        .iter()
        .find(|r| r.get(name_column) == Some(target_name))
}

/// Name to record lookup built once per dataset.
///
/// Resolves to the same record as [`find_by_name`] for every name.
#[derive(Debug)]
pub struct NameIndex<'a> {
    dataset: &'a Dataset,
    by_name: HashMap<&'a str, usize>,
}

impl<'a> NameIndex<'a> {
    /// Index `dataset` by `name_column`
    pub fn build(dataset: &'a Dataset, name_column: &str) -> Self {
        let mut by_name = HashMap::with_capacity(dataset.record_count());
        for (i, record) in dataset.records.iter().enumerate() {
            if let Some(name) = record.get(name_column) {
                by_name.entry(name).or_insert(i);
            }
        }
        Self { dataset, by_name }
    }

    /// First record carrying `name`
    pub fn find(&self, name: &str) -> Option<&'a Record> {
        self.by_name
            .get(name)
            .and_then(|&i| self.dataset.records.get(i))
    }

    /// Number of distinct names indexed
    pub fn len(&self) -> usize {
        self.by_name.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_name.is_empty()
    }
}
