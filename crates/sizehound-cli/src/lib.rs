/// SizeHound console frontend.
///
/// Parses arguments, merges them with stored defaults, drives a background
/// scan through [`state::ConsoleState`] and prints the report.
pub mod args;
pub mod render;
pub mod settings;
pub mod state;

pub use args::Cli;

use anyhow::{Context, Result};
use sizehound_core::export::{export_result, ExportFormat};
use sizehound_core::scanner::ScanOutcome;
use state::{ConsolePhase, ConsoleState};
use std::io::Write;
use std::process::ExitCode;
use std::time::Duration;
use tracing::info;

/// Interval between two status-line redraws.
const POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Run one scan as described by `cli`.
///
/// Invalid options come back as `Err`; a scan that ran but failed yields a
/// failure exit code after its report is printed.
pub fn run(cli: &Cli) -> Result<ExitCode> {
    let settings_path = cli.settings.clone().or_else(settings::default_path);
    let stored = settings_path
        .as_deref()
        .map(settings::load)
        .unwrap_or_default();
    let defaults = cli.merge(&stored);

    if cli.save_defaults {
        let path = settings_path.context("no config directory to store defaults in")?;
        settings::save(&path, &defaults)?;
        info!("Saved defaults to {}", path.display());
    }

    let mut state = ConsoleState::new();
    state
        .start_scan(defaults.to_options(&cli.path))
        .with_context(|| format!("cannot scan {}", cli.path.display()))?;

    let show_progress = !cli.no_progress;
    let mut stderr = std::io::stderr();
    let mut drawn = 0usize;
    while state.phase != ConsolePhase::Results {
        if state.process_scan_messages() && show_progress && state.is_scanning() {
            let line = render::status_line(&state.progress);
            // Pad over the remains of a longer previous line.
            let _ = write!(stderr, "\r{line:<drawn$}");
            let _ = stderr.flush();
            drawn = line.chars().count();
        }
        if state.is_scanning() {
            std::thread::sleep(POLL_INTERVAL);
        }
    }
    if drawn > 0 {
        let _ = write!(stderr, "\r{:drawn$}\r", "");
        let _ = stderr.flush();
    }

    let Some(result) = state.result.as_ref() else {
        anyhow::bail!("scan ended without a result");
    };

    let mut stdout = std::io::stdout().lock();
    render::write_report(&mut stdout, result).context("cannot write report")?;

    if let Some(path) = &cli.export {
        let format = defaults
            .export_format
            .unwrap_or_else(|| ExportFormat::from_path(path));
        export_result(result, path, format)
            .with_context(|| format!("cannot export to {}", path.display()))?;
    }

    Ok(match result.outcome {
        ScanOutcome::Completed => ExitCode::SUCCESS,
        ScanOutcome::Cancelled => ExitCode::from(130),
        ScanOutcome::Failed(_) => ExitCode::FAILURE,
    })
}
