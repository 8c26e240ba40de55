/// Text rendering for the console: the live status line and the final report.
use sizehound_core::analysis::categorize;
use sizehound_core::model::{format_count, format_size};
use sizehound_core::scanner::{ScanOutcome, ScanProgress, ScanResult};
use std::io::{self, Write};
use std::path::Path;

/// Widest path shown in a table or the status line.
const PATH_WIDTH: usize = 60;
/// Width of the proportional bar in the file-type table.
const BAR_WIDTH: usize = 20;

/// One-line summary of a running scan.
pub fn status_line(progress: &ScanProgress) -> String {
    let mut line = format!(
        "Scanning {} | {} files | {} dirs | {}",
        truncate_path(&progress.current_path.to_string_lossy(), PATH_WIDTH),
        format_count(progress.files_scanned),
        format_count(progress.folders_scanned),
        format_size(progress.bytes_processed),
    );
    if let Some(eta) = progress.eta {
        line.push_str(&format!(" | ~{}s left", eta.as_secs()));
    }
    line
}

/// Print the ranked tables and the outcome of a finished scan.
pub fn write_report<W: Write>(out: &mut W, result: &ScanResult) -> io::Result<()> {
    writeln!(out, "Scan of {}", result.root.display())?;

    if !result.top_files.is_empty() {
        writeln!(out)?;
        writeln!(out, "Largest files")?;
        writeln!(out, "{:>4}  {:>10}  {:<12}  Path", "#", "Size", "Type")?;
        for (rank, file) in result.top_files.iter().enumerate() {
            writeln!(
                out,
                "{:>4}  {:>10}  {:<12}  {}",
                rank + 1,
                format_size(file.size),
                categorize(&file.extension),
                display_path(&file.path),
            )?;
        }
    }

    if !result.top_folders.is_empty() {
        writeln!(out)?;
        writeln!(out, "Largest folders")?;
        writeln!(out, "{:>4}  {:>10}  {:>10}  Path", "#", "Size", "Files")?;
        for (rank, folder) in result.top_folders.iter().enumerate() {
            writeln!(
                out,
                "{:>4}  {:>10}  {:>10}  {}",
                rank + 1,
                format_size(folder.size),
                format_count(folder.item_count),
                display_path(&folder.path),
            )?;
        }
    }

    if !result.file_types.is_empty() {
        writeln!(out)?;
        writeln!(out, "File types (largest files)")?;
        for stats in &result.file_types {
            writeln!(
                out,
                "{:<12}  {:>10}  {:>6}  {:>5.1}%  {}",
                stats.category.label(),
                format_size(stats.total_size),
                format_count(stats.file_count),
                stats.percentage,
                size_bar(stats.percentage, BAR_WIDTH),
            )?;
        }
    }

    let progress = &result.progress;
    writeln!(out)?;
    writeln!(
        out,
        "{} files, {} folders, {} in {:.2}s",
        format_count(progress.files_scanned),
        format_count(progress.folders_scanned),
        format_size(progress.bytes_processed),
        progress.elapsed.as_secs_f64(),
    )?;
    match &result.outcome {
        ScanOutcome::Completed => {}
        ScanOutcome::Cancelled => writeln!(out, "Scan cancelled; results are partial.")?,
        ScanOutcome::Failed(message) => writeln!(out, "Scan failed: {message}")?,
    }
    Ok(())
}

/// Proportional bar for a 0–100 percentage.
fn size_bar(percent: f64, width: usize) -> String {
    let filled = ((percent / 100.0).clamp(0.0, 1.0) * width as f64).round() as usize;
    let mut bar = "#".repeat(filled);
    bar.push_str(&".".repeat(width - filled));
    bar
}

fn display_path(path: &Path) -> String {
    truncate_path(&path.to_string_lossy(), PATH_WIDTH)
}

/// Shorten `path` to at most `max_len` characters by eliding the middle.
fn truncate_path(path: &str, max_len: usize) -> String {
    let len = path.chars().count();
    if len <= max_len {
        return path.to_string();
    }
    let half = max_len.saturating_sub(3) / 2;
    let head: String = path.chars().take(half).collect();
    let tail: String = path.chars().skip(len - half).collect();
    format!("{head}...{tail}")
}
