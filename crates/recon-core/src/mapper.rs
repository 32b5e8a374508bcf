//! Mapping of native export columns to canonical output fields

use crate::dataset::Record;
use crate::source::SourceKind;
use serde::ser::{Serialize, SerializeMap, Serializer};

/// Canonical fields for one source, in the kind's field-map order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MappedFields {
    fields: Vec<(&'static str, String)>,
}

impl MappedFields {
    /// All of `kind`'s canonical fields, blank
    pub fn blank(kind: SourceKind) -> Self {
        Self {
            fields: kind
                .field_map()
                .iter()
                .map(|(_, canonical)| (*canonical, String::new()))
                .collect(),
        }
    }

    /// Value of a canonical field
    pub fn get(&self, canonical: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(name, _)| *name == canonical)
            .map(|(_, v)| v.as_str())
    }

    /// Canonical names and values, in order
    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &str)> {
        self.fields.iter().map(|(name, v)| (*name, v.as_str()))
    }

    /// Values only, in order
    pub fn values(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(_, v)| v.as_str())
    }

    /// Whether every value is blank
    pub fn is_blank(&self) -> bool {
        self.fields.iter().all(|(_, v)| v.is_empty())
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl Serialize for MappedFields {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.fields.len()))?;
        for (name, value) in &self.fields {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}

/// Map a record of `kind` onto its canonical fields.
///
/// Columns missing from the record map to blank values.
pub fn map_fields(kind: SourceKind, record: &Record) -> MappedFields {
    MappedFields {
        fields: kind
            .field_map()
            .iter()
            .map(|(native, canonical)| (*canonical, record.value(native).to_string()))
            .collect(),
    }
}
