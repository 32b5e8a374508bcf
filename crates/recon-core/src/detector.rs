//! Schema-based detection of which dataset came from which source
//!
//! File names are not trusted. Each [`SourceKind`] is recognised by its
//! fingerprint column appearing in the first record of a dataset.

use crate::dataset::Dataset;
use crate::source::SourceKind;
use tracing::{info, warn};

/// A dataset chosen for a source, with its position in the input list
#[derive(Debug, Clone, Copy)]
pub struct Assigned<'a> {
    pub index: usize,
    pub dataset: &'a Dataset,
}

/// Which dataset (if any) was found for each source kind
#[derive(Debug, Clone, Copy, Default)]
pub struct SourceAssignment<'a> {
    slots: [Option<Assigned<'a>>; 4],
}

impl<'a> SourceAssignment<'a> {
    /// An assignment with no sources
    pub fn new() -> Self {
        Self::default()
    }

    /// Assign `dataset` (at input position `index`) to `kind`
    pub fn with(mut self, kind: SourceKind, index: usize, dataset: &'a Dataset) -> Self {
        self.slots[kind.index()] = Some(Assigned { index, dataset });
        self
    }

    /// Dataset assigned to `kind`
    pub fn get(&self, kind: SourceKind) -> Option<&'a Dataset> {
        self.slots[kind.index()].map(|a| a.dataset)
    }

    /// Input position of the dataset assigned to `kind`
    pub fn index_of(&self, kind: SourceKind) -> Option<usize> {
        self.slots[kind.index()].map(|a| a.index)
    }

    /// Whether a dataset was found for `kind`
    pub fn is_provided(&self, kind: SourceKind) -> bool {
        self.slots[kind.index()].is_some()
    }

    /// Kinds with a dataset, in fixed order
    pub fn provided(&self) -> Vec<SourceKind> {
        SourceKind::ALL
            .into_iter()
            .filter(|k| self.is_provided(*k))
            .collect()
    }

    /// Kinds without a dataset, in fixed order
    pub fn missing(&self) -> Vec<SourceKind> {
        SourceKind::ALL
            .into_iter()
            .filter(|k| !self.is_provided(*k))
            .collect()
    }
}

/// Assign datasets to source kinds by fingerprint column.
///
/// For each kind in fixed order, the first dataset whose first record has
/// the kind's fingerprint column wins. A dataset already assigned to one
/// kind stays eligible for the others.
pub fn detect(datasets: &[Dataset]) -> SourceAssignment<'_> {
    let mut assignment = SourceAssignment::new();
    let column_sets: Vec<_> = datasets.iter().map(Dataset::first_record_columns).collect();

    for kind in SourceKind::ALL {
        let fingerprint = kind.fingerprint_column();
        let found = column_sets
            .iter()
            .position(|columns| columns.contains(fingerprint));

        match found {
            Some(index) => {
                let dataset = &datasets[index];
                if let Some(previous) = SourceKind::ALL[..kind.index()]
                    .iter()
                    .find(|k| assignment.index_of(**k) == Some(index))
                {
                    warn!(
                        file = %dataset.display_name(),
                        first = %previous,
                        second = %kind,
                        "file matches more than one source fingerprint"
                    );
                }
                info!(source = %kind, file = %dataset.display_name(), "found source");
                assignment = assignment.with(kind, index, dataset);
            }
            None => {
                warn!(source = %kind, column = fingerprint, "source not found");
            }
        }
    }

    assignment
}
