#![allow(dead_code)]

use assert_cmd::cargo::cargo_bin_cmd;
use assert_cmd::Command;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

pub const IDENTITY_CSV: &str = "displayName,operatingSystem,joinType (trustType),userNames,registrationTime,approximateLastSignInDateTime\n\
LAPTOP-1,Windows 11,AzureAd,alice,2024-01-01,2026-10-01\n\
LAPTOP-2,Windows 10,Hybrid,bob,2023-05-05,2026-09-30\n";

pub const TICKETING_CSV: &str = "Display Name,Serial Number,Used By,Last login by,Acquisition Date,Warranty Expiry Date,Asset State,Last Audit Date\n\
LAPTOP-1,SN123,alice,alice,2024-01-01,2027-01-01,In Use,2026-02-01\n";

pub const ENDPOINT_CSV: &str = "Name,Health Status,IP,OS,Protection,Last User,Last Active\n\
LAPTOP-2,Good,10.0.0.2,Windows 10,Protected,bob,2026-10-01\n\
LAPTOP-9,Bad,10.0.0.9,Windows 11,Unprotected,eve,2026-10-03\n";

pub struct TestEnv {
    tmp: TempDir,
    pub inputs: PathBuf,
}

impl TestEnv {
    pub fn new() -> Self {
        let tmp = TempDir::new().expect("create temp dir");
        let inputs = tmp.path().join("inputs");
        fs::create_dir_all(&inputs).expect("create inputs dir");
        Self { tmp, inputs }
    }

    /// Folder with identity, ticketing and endpoint exports under neutral names
    pub fn with_exports() -> Self {
        let env = Self::new();
        env.write_input("export1.csv", ENDPOINT_CSV);
        env.write_input("export2.csv", IDENTITY_CSV);
        env.write_input("export3.csv", TICKETING_CSV);
        env
    }

    pub fn root(&self) -> &Path {
        self.tmp.path()
    }

    pub fn write_input(&self, name: &str, content: &str) -> PathBuf {
        let path = self.inputs.join(name);
        fs::write(&path, content).expect("write input csv");
        path
    }

    pub fn write_root(&self, name: &str, content: &str) -> PathBuf {
        let path = self.root().join(name);
        fs::write(&path, content).expect("write file");
        path
    }

    /// Generated reports in the inputs folder
    pub fn reports(&self) -> Vec<PathBuf> {
        let mut found: Vec<PathBuf> = fs::read_dir(&self.inputs)
            .expect("read inputs dir")
            .map(|e| e.expect("dir entry").path())
            .filter(|p| {
                p.file_name()
                    .and_then(|n| n.to_str())
                    .is_some_and(|n| n.starts_with("device_report_"))
            })
            .collect();
        found.sort();
        found
    }

    pub fn cmd(&self) -> Command {
        let mut cmd = cargo_bin_cmd!("device-recon");
        cmd.current_dir(self.root())
            .env_remove("RUST_LOG")
            .env_remove("DEVRECON_BASE")
            .env_remove("DEVRECON_FORMAT")
            .env_remove("DEVRECON_OUTPUT_DIR")
            .env_remove("DEVRECON_LIMITS__MAX_FILES")
            .env_remove("DEVRECON_LIMITS__MAX_FILE_BYTES");
        cmd
    }

    pub fn inputs_arg(&self) -> &str {
        self.inputs.to_str().expect("inputs path utf8")
    }
}
