//! Report assembly and export
//!
//! This module provides:
//! - The assembled [`Report`], one row per base record
//! - A per-source summary of matched and missing devices
//! - CSV and JSON export and report file naming

use crate::config::OutputFormat;
use crate::error::{Error, Result};
use crate::merger::{DeviceRecord, Presence};
use crate::source::SourceKind;
use chrono::{DateTime, TimeZone};
use serde::Serialize;
use serde_json::{Map, Value};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// File name prefix of generated reports
pub const REPORT_FILE_PREFIX: &str = "device_report_";

/// All merged rows for one base source, in base file order
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Report {
    pub base: SourceKind,
    /// Sources that had a dataset, in fixed order
    pub provided: Vec<SourceKind>,
    pub records: Vec<DeviceRecord>,
}

/// Collect merged rows into a report
pub fn assemble(base: SourceKind, provided: Vec<SourceKind>, records: Vec<DeviceRecord>) -> Report {
    Report {
        base,
        provided,
        records,
    }
}

impl Report {
    /// Get the number of rows
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether there is nothing to export
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Column headers: presence flags, then canonical fields grouped by source
    pub fn headers() -> Vec<&'static str> {
        let flags = SourceKind::ALL.iter().map(|k| k.presence_column());
        let fields = SourceKind::ALL
            .iter()
            .flat_map(|k| k.field_map().iter().map(|(_, canonical)| *canonical));
        flags.chain(fields).collect()
    }

    /// Flattened rows, aligned with [`Report::headers`]
    pub fn rows(&self) -> impl Iterator<Item = Vec<String>> + '_ {
        self.records.iter().map(DeviceRecord::to_row)
    }

    /// Matched and not-found counts per source
    pub fn summary(&self) -> ReportSummary {
        let mut sources = SourceKind::ALL.map(|kind| SourceSummary {
            kind,
            provided: self.provided.contains(&kind),
            matched: 0,
            not_found: 0,
        });

        for record in &self.records {
            for entry in &record.entries {
                let summary = &mut sources[entry.kind.index()];
                match entry.presence {
                    Presence::Matched => summary.matched += 1,
                    Presence::NotFound => summary.not_found += 1,
                    Presence::NotProvided => {}
                }
            }
        }

        let incomplete = self
            .records
            .iter()
            .filter(|r| !r.missing_from().is_empty())
            .count();

        ReportSummary {
            base: self.base,
            total: self.len(),
            incomplete,
            sources,
        }
    }

    /// Write the report as CSV
    pub fn write_csv<W: Write>(&self, writer: W) -> Result<()> {
        let mut csv_writer = csv::Writer::from_writer(writer);
        csv_writer.write_record(Self::headers()).map_err(std::io::Error::from)?;
        for row in self.rows() {
            csv_writer.write_record(&row).map_err(std::io::Error::from)?;
        }
        csv_writer.flush()?;
        Ok(())
    }

    /// Rows as JSON objects keyed by column header.
    ///
    /// Presence flags are booleans, or `null` for sources not provided.
    pub fn to_json(&self) -> Value {
        let rows = self
            .records
            .iter()
            .map(|record| {
                let mut object = Map::new();
                for entry in &record.entries {
                    let flag = entry.presence.as_bool().map_or(Value::Null, Value::Bool);
                    object.insert(entry.kind.presence_column().to_string(), flag);
                }
                for entry in &record.entries {
                    for (name, value) in entry.fields.iter() {
                        object.insert(name.to_string(), Value::String(value.to_string()));
                    }
                }
                Value::Object(object)
            })
            .collect();
        Value::Array(rows)
    }

    /// Write the report as pretty-printed JSON
    pub fn write_json<W: Write>(&self, mut writer: W) -> Result<()> {
        serde_json::to_writer_pretty(&mut writer, &self.to_json())?;
        writeln!(writer)?;
        Ok(())
    }

    /// Write the report to `path` in the given format
    pub fn write_to_path(&self, path: &Path, format: OutputFormat) -> Result<()> {
        let file = File::create(path).map_err(|e| Error::FileWrite {
            path: path.to_path_buf(),
            source: e,
        })?;
        let mut writer = BufWriter::new(file);
        match format {
            OutputFormat::Csv => self.write_csv(&mut writer)?,
            OutputFormat::Json => self.write_json(&mut writer)?,
        }
        writer.flush()?;
        Ok(())
    }
}

/// Per-source totals for one report
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReportSummary {
    pub base: SourceKind,
    pub total: usize,
    /// Rows missing from at least one provided source
    pub incomplete: usize,
    pub sources: [SourceSummary; 4],
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SourceSummary {
    pub kind: SourceKind,
    pub provided: bool,
    pub matched: usize,
    pub not_found: usize,
}

impl ReportSummary {
    /// Summary for `kind`
    pub fn source(&self, kind: SourceKind) -> &SourceSummary {
        &self.sources[kind.index()]
    }
}

/// File name for a report, e.g. `device_report_identity_20261014_093000.csv`
pub fn output_file_name<Tz: TimeZone>(
    base: SourceKind,
    format: OutputFormat,
    timestamp: &DateTime<Tz>,
) -> String
where
    Tz::Offset: std::fmt::Display,
{
    format!(
        "{}{}_{}.{}",
        REPORT_FILE_PREFIX,
        base.slug(),
        timestamp.format("%Y%m%d_%H%M%S"),
        format.extension()
    )
}
