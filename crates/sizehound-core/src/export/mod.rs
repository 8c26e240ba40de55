/// Results export: writes a finished scan to CSV or JSON.
///
/// CSV carries one row per ranked file followed by one row per ranked
/// folder. JSON is the whole [`ScanResult`], pretty printed.
use crate::analysis::categorize;
use crate::scanner::ScanResult;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::str::FromStr;
use thiserror::Error;
use tracing::info;

/// Column header of the CSV export.
pub const CSV_HEADER: [&str; 7] = ["kind", "name", "path", "size", "items", "category", "modified"];

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("cannot write {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("CSV export failed: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON export failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("unsupported export format '{0}' (expected csv or json)")]
    UnsupportedFormat(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    Csv,
    Json,
}

impl ExportFormat {
    /// Guess the format from a file extension. Anything that is not
    /// `.json` is written as CSV.
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("json") => Self::Json,
            _ => Self::Csv,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Csv => "csv",
            Self::Json => "json",
        }
    }
}

impl FromStr for ExportFormat {
    type Err = ExportError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "csv" => Ok(Self::Csv),
            "json" => Ok(Self::Json),
            other => Err(ExportError::UnsupportedFormat(other.to_string())),
        }
    }
}

/// Write `result` to `path` in the given format, replacing any existing file.
pub fn export_result(
    result: &ScanResult,
    path: &Path,
    format: ExportFormat,
) -> Result<(), ExportError> {
    let io_err = |source| ExportError::Io {
        path: path.to_path_buf(),
        source,
    };
    let file = File::create(path).map_err(io_err)?;
    let mut out = BufWriter::new(file);
    match format {
        ExportFormat::Csv => write_csv(result, &mut out)?,
        ExportFormat::Json => write_json(result, &mut out)?,
    }
    out.flush().map_err(io_err)?;

    info!(
        "Exported {} files and {} folders to {} ({})",
        result.top_files.len(),
        result.top_folders.len(),
        path.display(),
        format.as_str()
    );
    Ok(())
}

/// Write the ranked files and folders as CSV.
pub fn write_csv<W: Write>(result: &ScanResult, out: W) -> Result<(), ExportError> {
    let mut wtr = csv::Writer::from_writer(out);
    wtr.write_record(CSV_HEADER)?;

    for file in &result.top_files {
        let path = file.path.to_string_lossy();
        let size = file.size.to_string();
        let modified = rfc3339(file.modified);
        wtr.write_record([
            "file",
            file.name.as_str(),
            &*path,
            size.as_str(),
            "1",
            categorize(&file.extension),
            modified.as_str(),
        ])?;
    }

    for folder in &result.top_folders {
        let path = folder.path.to_string_lossy();
        let size = folder.size.to_string();
        let items = folder.item_count.to_string();
        let modified = rfc3339(folder.modified);
        wtr.write_record([
            "folder",
            folder.name.as_str(),
            &*path,
            size.as_str(),
            items.as_str(),
            "",
            modified.as_str(),
        ])?;
    }

    wtr.flush().map_err(csv::Error::from)?;
    Ok(())
}

/// Write the whole result as pretty-printed JSON.
pub fn write_json<W: Write>(result: &ScanResult, out: W) -> Result<(), ExportError> {
    serde_json::to_writer_pretty(out, result)?;
    Ok(())
}

fn rfc3339(time: Option<DateTime<Utc>>) -> String {
    time.map(|t| t.to_rfc3339()).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{FileRecord, FolderRecord};
    use crate::scanner::{ScanOutcome, ScanProgress};
    use chrono::TimeZone;
    use compact_str::CompactString;

    fn sample() -> ScanResult {
        let when = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();
        ScanResult {
            root: PathBuf::from("/data"),
            top_files: vec![FileRecord {
                name: CompactString::new("movie.mkv"),
                path: PathBuf::from("/data/media/movie.mkv"),
                size: 4096,
                extension: CompactString::new("mkv"),
                modified: Some(when),
            }],
            top_folders: vec![FolderRecord {
                name: CompactString::new("media"),
                path: PathBuf::from("/data/media"),
                size: 4096,
                item_count: 3,
                modified: None,
            }],
            file_types: Vec::new(),
            progress: ScanProgress::default(),
            outcome: ScanOutcome::Completed,
        }
    }

    #[test]
    fn csv_has_header_then_files_then_folders() {
        let mut buf = Vec::new();
        write_csv(&sample(), &mut buf).unwrap();
        let text = String::from_utf8(buf).unwrap();
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], "kind,name,path,size,items,category,modified");
        assert_eq!(
            lines[1],
            "file,movie.mkv,/data/media/movie.mkv,4096,1,Video,2024-05-01T12:00:00+00:00"
        );
        assert_eq!(lines[2], "folder,media,/data/media,4096,3,,");
    }

    #[test]
    fn csv_quotes_awkward_names() {
        let mut result = sample();
        result.top_files[0].name = CompactString::new("a,b.txt");
        let mut buf = Vec::new();
        write_csv(&result, &mut buf).unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert!(text.contains("\"a,b.txt\""));
    }

    #[test]
    fn json_contains_outcome_and_records() {
        let mut buf = Vec::new();
        write_json(&sample(), &mut buf).unwrap();
        let value: serde_json::Value = serde_json::from_slice(&buf).unwrap();

        assert_eq!(value["outcome"]["status"], "completed");
        assert_eq!(value["top_files"][0]["size"], 4096);
        assert_eq!(value["top_folders"][0]["item_count"], 3);
    }

    #[test]
    fn format_from_path_and_str() {
        assert_eq!(ExportFormat::from_path(Path::new("out.JSON")), ExportFormat::Json);
        assert_eq!(ExportFormat::from_path(Path::new("out.csv")), ExportFormat::Csv);
        assert_eq!(ExportFormat::from_path(Path::new("out")), ExportFormat::Csv);
        assert_eq!("Json".parse::<ExportFormat>().unwrap(), ExportFormat::Json);
        assert!("xml".parse::<ExportFormat>().is_err());
    }

    #[test]
    fn export_result_writes_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("report.json");
        export_result(&sample(), &path, ExportFormat::Json).unwrap();
        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.contains("movie.mkv"));
    }
}
