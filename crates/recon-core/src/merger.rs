//! Merge engine combining one base source with the other inventories
//!
//! Every record of the base dataset yields exactly one [`DeviceRecord`], in
//! base file order. Each other provided source is searched for the base
//! record's device name; matched fields are merged in, unmatched sources
//! are flagged as not found, and sources that were never provided are left
//! blank with no flag.

use crate::detector::SourceAssignment;
use crate::error::{Error, Result};
use crate::mapper::{map_fields, MappedFields};
use crate::matcher::NameIndex;
use crate::report::{assemble, Report};
use crate::source::SourceKind;
use serde::Serialize;
use tracing::{debug, info};

/// Whether a device was found in a source
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Presence {
    /// A record with the device's name exists in the source
    Matched,
    /// The source was provided but has no record with the device's name
    NotFound,
    /// The source was not among the inputs
    NotProvided,
}

impl Presence {
    /// Boolean flag, `None` when the source was not provided
    pub fn as_bool(self) -> Option<bool> {
        match self {
            Presence::Matched => Some(true),
            Presence::NotFound => Some(false),
            Presence::NotProvided => None,
        }
    }

    /// Flag as written to a CSV cell
    pub fn as_flag(self) -> &'static str {
        match self {
            Presence::Matched => "true",
            Presence::NotFound => "false",
            Presence::NotProvided => "",
        }
    }
}

/// One source's contribution to a device row
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SourceEntry {
    pub kind: SourceKind,
    pub presence: Presence,
    pub fields: MappedFields,
}

impl SourceEntry {
    fn not_provided(kind: SourceKind) -> Self {
        Self {
            kind,
            presence: Presence::NotProvided,
            fields: MappedFields::blank(kind),
        }
    }
}

/// A single output row
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeviceRecord {
    /// Source whose record produced this row
    pub base: SourceKind,
    /// Name the other sources were searched for
    pub device_name: String,
    /// Per-source entries, indexed by [`SourceKind::index`]
    pub entries: [SourceEntry; 4],
}

impl DeviceRecord {
    /// Entry for `kind`
    pub fn entry(&self, kind: SourceKind) -> &SourceEntry {
        &self.entries[kind.index()]
    }

    /// Presence of this device in `kind`
    pub fn presence(&self, kind: SourceKind) -> Presence {
        self.entry(kind).presence
    }

    /// Provided sources the device was not found in
    pub fn missing_from(&self) -> Vec<SourceKind> {
        self.entries
            .iter()
            .filter(|e| e.presence == Presence::NotFound)
            .map(|e| e.kind)
            .collect()
    }

    /// Flatten to report cells: four presence flags, then every source's
    /// canonical fields in kind order
    pub fn to_row(&self) -> Vec<String> {
        let flags = self.entries.iter().map(|e| e.presence.as_flag().to_string());
        let fields = self
            .entries
            .iter()
            .flat_map(|e| e.fields.values().map(str::to_string));
        flags.chain(fields).collect()
    }
}

/// Build the report for `base` from the detected sources.
///
/// Fails with [`Error::MissingBaseSource`] before doing any work if `base`
/// has no dataset.
pub fn build_report(base: SourceKind, assignment: &SourceAssignment<'_>) -> Result<Report> {
    let base_dataset = assignment
        .get(base)
        .ok_or(Error::MissingBaseSource(base))?;

    let indexes: Vec<(SourceKind, NameIndex<'_>)> = base
        .others()
        .filter_map(|kind| {
            assignment
                .get(kind)
                .map(|ds| (kind, NameIndex::build(ds, kind.name_column())))
        })
        .collect();

    info!(
        base = %base,
        records = base_dataset.record_count(),
        compared = indexes.len(),
        "merging sources"
    );

    let mut records = Vec::with_capacity(base_dataset.record_count());
    for record in &base_dataset.records {
        let name = record.value(base.name_column());
        let mut entries = SourceKind::ALL.map(SourceEntry::not_provided);

        entries[base.index()] = SourceEntry {
            kind: base,
            presence: Presence::Matched,
            fields: map_fields(base, record),
        };

        for (kind, index) in &indexes {
            let entry = &mut entries[kind.index()];
            match index.find(name) {
                Some(found) => {
                    entry.presence = Presence::Matched;
                    entry.fields = map_fields(*kind, found);
                }
                None => {
                    debug!(device = name, source = %kind, "device not found");
                    entry.presence = Presence::NotFound;
                }
            }
        }

        records.push(DeviceRecord {
            base,
            device_name: name.to_string(),
            entries,
        });
    }

    Ok(assemble(base, assignment.provided(), records))
}
