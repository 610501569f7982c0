use crate::error::Result;
use crate::types::{NormalizedRecord, Query};
use chrono::Local;
use std::collections::HashMap;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::{info, instrument};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Json,
    Csv,
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "json" => Ok(OutputFormat::Json),
            "csv" => Ok(OutputFormat::Csv),
            other => Err(format!("unknown output format '{}', expected json or csv", other)),
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutputFormat::Json => f.write_str("json"),
            OutputFormat::Csv => f.write_str("csv"),
        }
    }
}

/// Persists one batch of records as a single JSON or CSV file.
#[derive(Debug, Clone)]
pub struct OutputWriter {
    dir: PathBuf,
    format: OutputFormat,
}

impl OutputWriter {
    pub fn new(dir: impl Into<PathBuf>, format: OutputFormat) -> Self {
        Self {
            dir: dir.into(),
            format,
        }
    }

    /// Timestamped file name for this writer's format.
    /// JSON is stamped to the minute, CSV to the second and keyed by the query.
    pub fn default_filename(&self, query: &Query) -> String {
        let now = Local::now();
        match self.format {
            OutputFormat::Json => format!("restaurants_{}.json", now.format("%Y-%m-%d_%H-%M")),
            OutputFormat::Csv => format!(
                "{}_import_{}.csv",
                query.sanitized(),
                now.format("%Y-%m-%d_%H-%M-%S")
            ),
        }
    }

    /// Write `records` under the default file name. An empty batch writes nothing.
    ///
    /// `columns` is the source's declared CSV column set; JSON ignores it.
    #[instrument(skip(self, records, columns), fields(format = %self.format, count = records.len()))]
    pub fn write(
        &self,
        records: &[NormalizedRecord],
        query: &Query,
        columns: &[&'static str],
    ) -> Result<Option<PathBuf>> {
        if records.is_empty() {
            info!("No records to save, skipping {} output", self.format);
            return Ok(None);
        }

        fs::create_dir_all(&self.dir)?;
        let path = self.dir.join(self.default_filename(query));
        match self.format {
            OutputFormat::Json => write_json_to(&path, records)?,
            OutputFormat::Csv => write_csv_to(&path, records, columns)?,
        }
        Ok(Some(path))
    }
}

/// Pretty-printed JSON array. Non-ASCII text is written as-is.
pub fn write_json_to(path: &Path, records: &[NormalizedRecord]) -> Result<()> {
    let json_content = serde_json::to_string_pretty(records)?;
    fs::write(path, json_content)?;
    info!("Saved {} records to {}", records.len(), path.display());
    Ok(())
}

/// CSV whose header is `columns` followed by any other column present in the batch,
/// in first-seen order. Cells a record does not have are left empty.
pub fn write_csv_to(path: &Path, records: &[NormalizedRecord], columns: &[&'static str]) -> Result<()> {
    let rows: Vec<Vec<(&'static str, String)>> = records.iter().map(NormalizedRecord::columns).collect();

    let mut header: Vec<&'static str> = columns.to_vec();
    for row in &rows {
        for (column, _) in row {
            if !header.contains(column) {
                header.push(*column);
            }
        }
    }

    let mut writer = csv::Writer::from_path(path)?;
    writer.write_record(&header)?;
    for row in rows {
        let cells: HashMap<&str, String> = row.into_iter().collect();
        writer.write_record(
            header
                .iter()
                .map(|column| cells.get(column).map(String::as_str).unwrap_or("")),
        )?;
    }
    writer.flush()?;

    info!("Saved {} records to {}", records.len(), path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_parsing() {
        assert_eq!("json".parse::<OutputFormat>().unwrap(), OutputFormat::Json);
        assert_eq!("CSV".parse::<OutputFormat>().unwrap(), OutputFormat::Csv);
        assert!("xml".parse::<OutputFormat>().is_err());
    }

    #[test]
    fn test_default_filenames() {
        let query = Query::new("restauracje w warszawie");
        let json = OutputWriter::new(".", OutputFormat::Json).default_filename(&query);
        assert!(json.starts_with("restaurants_") && json.ends_with(".json"));
        // restaurants_YYYY-mm-dd_HH-MM.json
        assert_eq!(json.len(), "restaurants_".len() + 16 + ".json".len());

        let csv = OutputWriter::new(".", OutputFormat::Csv).default_filename(&query);
        assert!(csv.starts_with("restauracje_w_warszawie_import_"));
        assert!(csv.ends_with(".csv"));
        assert_eq!(csv.len(), "restauracje_w_warszawie_import_".len() + 19 + ".csv".len());
    }

    #[test]
    fn test_declared_columns_lead_the_header() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.csv");
        let record = NormalizedRecord {
            name: Some("Bar".into()),
            address: Some("Main 1".into()),
            phone: Some("123".into()),
            ..Default::default()
        };

        write_csv_to(&path, &[record], &["name", "address", "city", "category"]).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines, vec!["name,address,city,category,phone", "Bar,Main 1,,,123"]);
    }
}
