/// Persisted scan defaults.
///
/// Stored as pretty JSON in the user's config directory. A missing file
/// means "use the built-in defaults"; a corrupt one is logged and ignored.
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use sizehound_core::export::ExportFormat;
use sizehound_core::scanner::options::DEFAULT_MAX_RESULTS;
use sizehound_core::ScanOptions;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Scan settings that survive between runs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScanDefaults {
    pub max_results: usize,
    pub include_hidden: bool,
    pub follow_symlinks: bool,
    pub folders_only: bool,
    pub max_depth: Option<usize>,
    pub min_file_size: u64,
    /// `None` means one worker per available CPU.
    pub workers: Option<usize>,
    pub excluded_names: Vec<String>,
    pub exclude_patterns: Vec<String>,
    pub export_format: Option<ExportFormat>,
}

impl Default for ScanDefaults {
    fn default() -> Self {
        Self {
            max_results: DEFAULT_MAX_RESULTS,
            include_hidden: false,
            follow_symlinks: false,
            folders_only: false,
            max_depth: None,
            min_file_size: 0,
            workers: None,
            excluded_names: Vec::new(),
            exclude_patterns: Vec::new(),
            export_format: None,
        }
    }
}

impl ScanDefaults {
    /// Scan options for `root` with these defaults applied.
    pub fn to_options(&self, root: &Path) -> ScanOptions {
        let mut options = ScanOptions::new(root)
            .with_max_results(self.max_results)
            .with_include_hidden(self.include_hidden)
            .with_follow_symlinks(self.follow_symlinks)
            .with_folders_only(self.folders_only)
            .with_max_depth(self.max_depth)
            .with_min_file_size(self.min_file_size);
        if let Some(workers) = self.workers {
            options = options.with_workers(workers);
        }
        options.excluded_names = self.excluded_names.clone();
        options.exclude_patterns = self.exclude_patterns.clone();
        options
    }
}

/// `<config dir>/sizehound/settings.json`, if the platform has a config dir.
pub fn default_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("sizehound").join("settings.json"))
}

/// Load defaults from `path`, falling back to built-in defaults.
pub fn load(path: &Path) -> ScanDefaults {
    let content = match std::fs::read_to_string(path) {
        Ok(content) => content,
        Err(err) => {
            debug!("no settings at {}: {err}", path.display());
            return ScanDefaults::default();
        }
    };
    match serde_json::from_str(&content) {
        Ok(defaults) => defaults,
        Err(err) => {
            warn!("ignoring corrupt settings file {}: {err}", path.display());
            ScanDefaults::default()
        }
    }
}

/// Write `defaults` to `path`, creating parent directories as needed.
pub fn save(path: &Path, defaults: &ScanDefaults) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("cannot create {}", parent.display()))?;
    }
    let content = serde_json::to_string_pretty(defaults).context("cannot encode settings")?;
    std::fs::write(path, content)
        .with_context(|| format!("cannot write settings to {}", path.display()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn save_then_load_round_trips() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("settings.json");
        let defaults = ScanDefaults {
            max_results: 7,
            include_hidden: true,
            max_depth: Some(3),
            min_file_size: 4096,
            workers: Some(2),
            excluded_names: vec!["target".into()],
            exclude_patterns: vec!["*.tmp".into()],
            export_format: Some(ExportFormat::Json),
            ..ScanDefaults::default()
        };

        save(&path, &defaults).unwrap();
        assert_eq!(load(&path), defaults);
    }

    #[test]
    fn missing_file_gives_defaults() {
        let dir = TempDir::new().unwrap();
        assert_eq!(load(&dir.path().join("absent.json")), ScanDefaults::default());
    }

    #[test]
    fn corrupt_file_gives_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("settings.json");
        std::fs::write(&path, "{ not json").unwrap();
        assert_eq!(load(&path), ScanDefaults::default());
    }

    #[test]
    fn partial_file_fills_in_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("settings.json");
        std::fs::write(&path, r#"{ "max_results": 5, "export_format": "csv" }"#).unwrap();

        let loaded = load(&path);
        assert_eq!(loaded.max_results, 5);
        assert_eq!(loaded.export_format, Some(ExportFormat::Csv));
        assert!(!loaded.include_hidden);
    }

    #[test]
    fn to_options_carries_every_field() {
        let defaults = ScanDefaults {
            folders_only: true,
            follow_symlinks: true,
            workers: Some(3),
            excluded_names: vec!["node_modules".into()],
            ..ScanDefaults::default()
        };
        let options = defaults.to_options(Path::new("/srv"));
        assert_eq!(options.root, PathBuf::from("/srv"));
        assert!(options.folders_only);
        assert!(options.follow_symlinks);
        assert_eq!(options.workers, 3);
        assert_eq!(options.excluded_names, vec!["node_modules".to_string()]);
    }
}
