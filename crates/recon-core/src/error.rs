//! Error types for recon-core

use crate::source::SourceKind;
use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in recon-core
#[derive(Debug, Error)]
pub enum Error {
    /// Failed to read a file
    #[error("failed to read file '{path}': {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Failed to create or write a file
    #[error("failed to write file '{path}': {source}")]
    FileWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Failed to parse CSV
    #[error("failed to parse CSV '{path}': {message}")]
    CsvParse { path: PathBuf, message: String },

    /// CSV parsing error from the csv crate
    #[error("CSV error in '{path}': {source}")]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    /// Directory traversal error
    #[error("failed to traverse directory: {0}")]
    WalkDir(#[from] walkdir::Error),

    /// Input folder is missing or is not a directory
    #[error("'{0}' is not a directory")]
    NotADirectory(PathBuf),

    /// Input folder contains no candidate CSV files
    #[error("no CSV files found in '{0}'")]
    NoCsvFiles(PathBuf),

    /// Input folder contains more CSV files than allowed
    #[error("found {found} CSV files in '{dir}', at most {limit} allowed")]
    TooManyFiles {
        dir: PathBuf,
        found: usize,
        limit: usize,
    },

    /// A CSV file exceeds the configured size limit
    #[error("file '{path}' is {size} bytes, limit is {limit} bytes")]
    FileTooLarge { path: PathBuf, size: u64, limit: u64 },

    /// The chosen base source was not detected among the inputs
    #[error("base source '{0}' was not found among the input files")]
    MissingBaseSource(SourceKind),

    /// No base source given on the command line or in configuration
    #[error("no base source selected; pass --base or set `base` in the config file")]
    NoBaseSelected,

    /// Configuration could not be loaded
    #[error("configuration error: {0}")]
    Config(#[from] Box<figment::Error>),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// A string did not name any known source kind
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown source '{0}', expected one of: identity, ticketing, endpoint_protection, recovery_tracking")]
pub struct UnknownSourceKind(pub String);
