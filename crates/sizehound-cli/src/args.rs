/// Command-line arguments.
use crate::settings::ScanDefaults;
use clap::Parser;
use sizehound_core::export::ExportFormat;
use sizehound_core::model::parse_size;
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(
    name = "sizehound",
    version,
    about = "Find the largest files and folders under a directory",
    long_about = "sizehound walks a directory tree with a pool of workers and reports \
                  the largest files and the folders with the largest recursive size.\n\n\
                  Arguments override the defaults stored with --save-defaults."
)]
pub struct Cli {
    /// Directory to scan
    #[arg(default_value = ".")]
    pub path: PathBuf,

    /// Number of files and folders to report
    #[arg(short = 'n', long = "top")]
    pub top: Option<usize>,

    /// Include hidden files and directories
    #[arg(long, overrides_with = "no_hidden")]
    pub hidden: bool,

    /// Skip hidden entries even if the stored defaults include them
    #[arg(long, overrides_with = "hidden")]
    pub no_hidden: bool,

    /// Follow symbolic links
    #[arg(long, overrides_with = "no_follow_symlinks")]
    pub follow_symlinks: bool,

    /// Do not follow symbolic links even if the stored defaults do
    #[arg(long, overrides_with = "follow_symlinks")]
    pub no_follow_symlinks: bool,

    /// Only rank folders
    #[arg(long, overrides_with = "no_folders_only")]
    pub folders_only: bool,

    /// Rank files too even if the stored defaults are folders-only
    #[arg(long, overrides_with = "folders_only")]
    pub no_folders_only: bool,

    /// Do not expand directories deeper than this (root is depth 0)
    #[arg(long)]
    pub max_depth: Option<usize>,

    /// Ignore files smaller than this (e.g. "512", "10KB", "1.5GB")
    #[arg(long, value_parser = parse_size_arg)]
    pub min_size: Option<u64>,

    /// Number of worker threads
    #[arg(short = 'w', long)]
    pub workers: Option<usize>,

    /// Skip directories with this name (repeatable)
    #[arg(short = 'x', long = "exclude")]
    pub exclude: Vec<String>,

    /// Skip entries whose name matches a glob, or a regex prefixed "re:" (repeatable)
    #[arg(short = 'p', long = "pattern")]
    pub pattern: Vec<String>,

    /// Write the results to this file
    #[arg(short = 'o', long)]
    pub export: Option<PathBuf>,

    /// Export format (defaults to the export file's extension)
    #[arg(long, value_parser = parse_format_arg)]
    pub format: Option<ExportFormat>,

    /// Settings file to read defaults from
    #[arg(long)]
    pub settings: Option<PathBuf>,

    /// Store the effective settings as the new defaults
    #[arg(long)]
    pub save_defaults: bool,

    /// Do not draw the live status line
    #[arg(long)]
    pub no_progress: bool,

    /// Debug logging
    #[arg(short, long, conflicts_with = "quiet")]
    pub verbose: bool,

    /// Warnings and errors only
    #[arg(short, long)]
    pub quiet: bool,
}

impl Cli {
    pub fn log_level(&self) -> tracing::Level {
        if self.verbose {
            tracing::Level::DEBUG
        } else if self.quiet {
            tracing::Level::WARN
        } else {
            tracing::Level::INFO
        }
    }

    /// Stored defaults with every argument given on the command line applied
    /// on top. A switch left out keeps the stored value.
    pub fn merge(&self, stored: &ScanDefaults) -> ScanDefaults {
        let mut merged = stored.clone();
        if let Some(top) = self.top {
            merged.max_results = top;
        }
        if let Some(on) = switch(self.hidden, self.no_hidden) {
            merged.include_hidden = on;
        }
        if let Some(on) = switch(self.follow_symlinks, self.no_follow_symlinks) {
            merged.follow_symlinks = on;
        }
        if let Some(on) = switch(self.folders_only, self.no_folders_only) {
            merged.folders_only = on;
        }
        if self.max_depth.is_some() {
            merged.max_depth = self.max_depth;
        }
        if let Some(min) = self.min_size {
            merged.min_file_size = min;
        }
        if self.workers.is_some() {
            merged.workers = self.workers;
        }
        if !self.exclude.is_empty() {
            merged.excluded_names = self.exclude.clone();
        }
        if !self.pattern.is_empty() {
            merged.exclude_patterns = self.pattern.clone();
        }
        if self.format.is_some() {
            merged.export_format = self.format;
        }
        merged
    }
}

/// `--flag` / `--no-flag` pair; the parser already kept only the last one.
fn switch(on: bool, off: bool) -> Option<bool> {
    match (on, off) {
        (true, _) => Some(true),
        (_, true) => Some(false),
        _ => None,
    }
}

fn parse_size_arg(s: &str) -> Result<u64, String> {
    parse_size(s).map_err(|e| e.to_string())
}

fn parse_format_arg(s: &str) -> Result<ExportFormat, String> {
    s.parse::<ExportFormat>().map_err(|e| e.to_string())
}
