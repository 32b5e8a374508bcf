//! Configuration for device-recon
//!
//! Uses `figment` for layered configuration: defaults -> config file -> environment.
//! Command-line flags are applied on top by the binary.

use crate::error::{Error, Result};
use crate::source::SourceKind;
use figment::providers::{Env, Format, Serialized, Toml};
use figment::Figment;
use serde::{Deserialize, Serialize};
use std::io;
use std::path::{Path, PathBuf};

/// Config file picked up from the working directory when no path is given
pub const DEFAULT_CONFIG_FILE: &str = "device-recon.toml";

/// Prefix for environment overrides, e.g. `DEVRECON_LIMITS__MAX_FILES=6`
pub const ENV_PREFIX: &str = "DEVRECON_";

/// Top-level configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReconConfig {
    /// Sanity limits applied while scanning the input folder
    pub limits: InputLimits,
    /// Directory reports are written to; defaults to the input folder
    pub output_dir: Option<PathBuf>,
    /// Base source used when none is given on the command line
    pub base: Option<SourceKind>,
    /// Report format
    pub format: OutputFormat,
}

/// Limits on how much input a single run accepts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct InputLimits {
    /// Maximum number of CSV files in the input folder
    pub max_files: usize,
    /// Maximum size of any single CSV file, in bytes
    pub max_file_bytes: u64,
}

impl Default for InputLimits {
    fn default() -> Self {
        Self {
            max_files: 10,
            max_file_bytes: 100 * 1024 * 1024,
        }
    }
}

/// Output format for exported reports
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Csv,
    Json,
}

impl OutputFormat {
    /// File extension for this format
    pub fn extension(self) -> &'static str {
        match self {
            OutputFormat::Csv => "csv",
            OutputFormat::Json => "json",
        }
    }
}

impl ReconConfig {
    /// Load configuration from defaults, a TOML file and the environment.
    ///
    /// With no explicit path, `device-recon.toml` in the working directory is
    /// used if it exists.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut figment = Figment::from(Serialized::defaults(ReconConfig::default()));

        match path {
            Some(path) => {
                if !path.is_file() {
                    return Err(Error::FileRead {
                        path: path.to_path_buf(),
                        source: io::Error::new(io::ErrorKind::NotFound, "config file not found"),
                    });
                }
                figment = figment.merge(Toml::file(path));
            }
            None => {
                let local = Path::new(DEFAULT_CONFIG_FILE);
                if local.exists() {
                    figment = figment.merge(Toml::file(local));
                }
            }
        }

        figment = figment.merge(Env::prefixed(ENV_PREFIX).split("__"));

        Ok(figment.extract().map_err(Box::new)?)
    }

    /// The base source to use: `requested` if given, else the configured one
    pub fn resolve_base(&self, requested: Option<SourceKind>) -> Result<SourceKind> {
        requested.or(self.base).ok_or(Error::NoBaseSelected)
    }
}
