//! CSV parser for inventory export files

use crate::dataset::{Dataset, Record};
use crate::error::{Error, Result};
use std::collections::HashMap;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

const BOM: char = '\u{feff}';

/// Parse a CSV file into a Dataset
pub fn parse_csv<P: AsRef<Path>>(path: P) -> Result<Dataset> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|e| Error::FileRead {
        path: path.to_path_buf(),
        source: e,
    })?;

    parse_reader(BufReader::new(file), path.to_path_buf())
}

/// Parse CSV from a string (useful for testing)
pub fn parse_csv_str(content: &str, source_name: &str) -> Result<Dataset> {
    parse_reader(content.as_bytes(), PathBuf::from(source_name))
}

fn parse_reader<R: Read>(reader: R, path: PathBuf) -> Result<Dataset> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true) // Allow varying number of fields
        .from_reader(reader);

    let headers = csv_reader.headers().map_err(|e| Error::Csv {
        path: path.clone(),
        source: e,
    })?;

    let columns: Vec<String> = headers
        .iter()
        .enumerate()
        .map(|(i, name)| {
            if i == 0 {
                name.trim_start_matches(BOM).to_string()
            } else {
                name.to_string()
            }
        })
        .collect();

    if columns.is_empty() || columns.iter().all(String::is_empty) {
        return Err(Error::CsvParse {
            path,
            message: "no columns found in CSV".to_string(),
        });
    }

    let mut records = Vec::new();
    for (row_idx, result) in csv_reader.records().enumerate() {
        let row = result.map_err(|e| Error::Csv {
            path: path.clone(),
            source: e,
        })?;

        if row.len() > columns.len() {
            warn!(
                row = row_idx + 1,
                file = %path.display(),
                "row has more cells than columns, truncating"
            );
        }

        // Short rows leave trailing columns blank
        let mut fields: HashMap<String, String> = HashMap::with_capacity(columns.len());
        for (i, column) in columns.iter().enumerate() {
            let value = row.get(i).unwrap_or("");
            fields.entry(column.clone()).or_insert_with(|| value.to_string());
        }

        records.push(Record::new(fields));
    }

    debug!(
        file = %path.display(),
        columns = columns.len(),
        records = records.len(),
        "parsed CSV"
    );

    Ok(Dataset {
        columns,
        records,
        source_path: path,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_parse_simple_csv() {
        let csv = "Name,Health Status,IP\nPC-1,Good,10.0.0.1\nPC-2,Bad,10.0.0.2\n";
        let dataset = parse_csv_str(csv, "test.csv").unwrap();

        assert_eq!(dataset.columns, vec!["Name", "Health Status", "IP"]);
        assert_eq!(dataset.record_count(), 2);
        assert_eq!(dataset.records[0].value("Name"), "PC-1");
        assert_eq!(dataset.records[1].value("Health Status"), "Bad");
    }

    #[test]
    fn test_parse_keeps_values_untrimmed() {
        let csv = "Name,OS\n\" PC-1 \",Windows 11\n";
        let dataset = parse_csv_str(csv, "test.csv").unwrap();

        assert_eq!(dataset.records[0].value("Name"), " PC-1 ");
    }

    #[test]
    fn test_parse_keeps_header_text_literal() {
        let csv = "displayName,joinType (trustType),Last login by\nA,AzureAd,bob\n";
        let dataset = parse_csv_str(csv, "test.csv").unwrap();

        assert!(dataset.records[0].contains("joinType (trustType)"));
        assert!(dataset.records[0].contains("Last login by"));
        assert!(!dataset.records[0].contains("Last Login By"));
    }

    #[test]
    fn test_parse_strips_bom_from_first_header() {
        let csv = "\u{feff}displayName,operatingSystem\nLAPTOP-1,Windows\n";
        let dataset = parse_csv_str(csv, "test.csv").unwrap();

        assert_eq!(dataset.columns[0], "displayName");
        assert_eq!(dataset.records[0].value("displayName"), "LAPTOP-1");
    }

    #[test]
    fn test_parse_pads_short_rows() {
        let csv = "Name,IP,OS\nPC-1,10.0.0.1\n";
        let dataset = parse_csv_str(csv, "test.csv").unwrap();

        assert!(dataset.records[0].contains("OS"));
        assert_eq!(dataset.records[0].value("OS"), "");
    }

    #[test]
    fn test_parse_truncates_long_rows() {
        let csv = "Name,IP\nPC-1,10.0.0.1,extra\n";
        let dataset = parse_csv_str(csv, "test.csv").unwrap();

        assert_eq!(dataset.records[0].fields.len(), 2);
    }

    #[test]
    fn test_parse_header_only() {
        let dataset = parse_csv_str("Name,IP\n", "test.csv").unwrap();

        assert_eq!(dataset.columns.len(), 2);
        assert!(dataset.is_empty());
    }

    #[test]
    fn test_parse_empty_input_fails() {
        let err = parse_csv_str("", "empty.csv").unwrap_err();
        assert!(matches!(err, Error::CsvParse { .. }));
    }

    #[test]
    fn test_parse_file_from_disk() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "Device name,Encryption status").unwrap();
        writeln!(file, "PC-9,Encrypted").unwrap();

        let dataset = parse_csv(file.path()).unwrap();
        assert_eq!(dataset.records[0].value("Encryption status"), "Encrypted");
        assert_eq!(dataset.source_path, file.path());
    }

    #[test]
    fn test_parse_missing_file() {
        let err = parse_csv("/nonexistent/device-recon/missing.csv").unwrap_err();
        assert!(matches!(err, Error::FileRead { .. }));
    }
}
