//! recon-core: Core library for reconciling device inventory exports
//!
//! This library provides functionality to:
//! - Scan a folder for CSV exports and parse them into datasets
//! - Detect which dataset came from which inventory source by schema
//! - Match devices across sources by exact device name
//! - Merge every base-source record with its matches into one report row
//! - Export the report as CSV or JSON

pub mod config;
pub mod dataset;
pub mod detector;
pub mod error;
pub mod mapper;
pub mod matcher;
pub mod merger;
pub mod parser;
pub mod report;
pub mod scanner;
pub mod source;

pub use config::{InputLimits, OutputFormat, ReconConfig};
pub use dataset::{Dataset, Record};
pub use detector::{detect, SourceAssignment};
pub use error::{Error, Result, UnknownSourceKind};
pub use mapper::{map_fields, MappedFields};
pub use matcher::{find_by_name, NameIndex};
pub use merger::{build_report, DeviceRecord, Presence, SourceEntry};
pub use parser::{parse_csv, parse_csv_str};
pub use report::{assemble, output_file_name, Report, ReportSummary, SourceSummary};
pub use scanner::{load_datasets, scan_directory, InputFile, ScanResult};
pub use source::SourceKind;
