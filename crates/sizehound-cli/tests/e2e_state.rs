/// End-to-end console tests.
///
/// Drive `ConsoleState` and `run` against real temporary trees, the same way
/// the binary does, and check the phase transitions, exports and the stored
/// settings.
use clap::Parser;
use sizehound_cli::settings::{self, ScanDefaults};
use sizehound_cli::state::{ConsolePhase, ConsoleState};
use sizehound_cli::Cli;
use sizehound_core::export::ExportFormat;
use sizehound_core::scanner::{ScanOptions, ScanState};
use std::fs;
use std::io::Write;
use std::path::Path;
use std::process::ExitCode;
use std::time::{Duration, Instant};
use tempfile::TempDir;

// ── Helpers ──────────────────────────────────────────────────────────────────

fn build_test_tree(root: &Path) {
    let docs = root.join("docs");
    let media = root.join("media");
    fs::create_dir_all(&docs).unwrap();
    fs::create_dir_all(&media).unwrap();
    write_bytes(&docs.join("report.pdf"), 700);
    write_bytes(&docs.join("notes.txt"), 50);
    write_bytes(&media.join("clip.mp4"), 4_000);
    write_bytes(&root.join("setup.exe"), 1_500);
}

fn write_bytes(path: &Path, n: usize) {
    let mut f = fs::File::create(path).unwrap();
    f.write_all(&vec![0u8; n]).unwrap();
}

/// Poll until the state reaches `Results`, panicking after 30 seconds.
fn poll_to_results(state: &mut ConsoleState) {
    let deadline = Instant::now() + Duration::from_secs(30);
    while state.phase != ConsolePhase::Results {
        assert!(
            Instant::now() < deadline,
            "scan did not finish within 30 seconds"
        );
        state.process_scan_messages();
        std::thread::sleep(Duration::from_millis(10));
    }
}

fn cli(args: &[&str]) -> Cli {
    let mut argv = vec!["sizehound"];
    argv.extend_from_slice(args);
    Cli::try_parse_from(argv).unwrap()
}

// ── ConsoleState ─────────────────────────────────────────────────────────────

#[test]
fn state_moves_from_idle_through_scanning_to_results() {
    let dir = TempDir::new().unwrap();
    build_test_tree(dir.path());

    let mut state = ConsoleState::new();
    assert_eq!(state.phase, ConsolePhase::Idle);
    assert_eq!(state.scan_state(), ScanState::Idle);
    assert!(!state.process_scan_messages());

    state.start_scan(ScanOptions::new(dir.path())).unwrap();
    assert_eq!(state.phase, ConsolePhase::Scanning);
    assert_ne!(state.scan_state(), ScanState::Idle);

    poll_to_results(&mut state);
    assert!(state.scan_handle.is_none());
    assert_eq!(state.scan_state(), ScanState::Completed);
    let result = state.result.as_ref().expect("result stored");
    assert!(result.is_completed());
    assert_eq!(result.top_files[0].size, 4_000);
    assert_eq!(state.progress, result.progress);
    assert!(state.messages_received >= 1);
}

#[test]
fn invalid_options_keep_the_state_idle() {
    let dir = TempDir::new().unwrap();
    let mut state = ConsoleState::new();

    let err = state.start_scan(ScanOptions::new(dir.path().join("missing")));
    assert!(err.is_err());
    assert_eq!(state.phase, ConsolePhase::Idle);
    assert_eq!(state.scan_state(), ScanState::Idle);
    assert!(state.scan_handle.is_none());
}

#[test]
fn cancelled_scan_still_reaches_results() {
    let dir = TempDir::new().unwrap();
    for d in 0..20 {
        let sub = dir.path().join(format!("d{d}"));
        fs::create_dir_all(&sub).unwrap();
        for f in 0..50 {
            write_bytes(&sub.join(format!("f{f}")), 1);
        }
    }

    let mut state = ConsoleState::new();
    state.start_scan(ScanOptions::new(dir.path())).unwrap();
    state.cancel_scan();
    poll_to_results(&mut state);

    let result = state.result.as_ref().unwrap();
    assert!(result.was_cancelled() || result.is_completed());
}

#[test]
fn a_second_scan_replaces_the_first_result() {
    let first = TempDir::new().unwrap();
    build_test_tree(first.path());
    let second = TempDir::new().unwrap();
    write_bytes(&second.path().join("only.bin"), 10);

    let mut state = ConsoleState::new();
    state.start_scan(ScanOptions::new(first.path())).unwrap();
    poll_to_results(&mut state);

    state.start_scan(ScanOptions::new(second.path())).unwrap();
    assert!(state.result.is_none());
    poll_to_results(&mut state);

    let sizes: Vec<u64> = state
        .result
        .as_ref()
        .unwrap()
        .top_files
        .iter()
        .map(|f| f.size)
        .collect();
    assert_eq!(sizes, vec![10]);
}

// ── run ──────────────────────────────────────────────────────────────────────

#[test]
fn run_exports_csv_and_succeeds() {
    let dir = TempDir::new().unwrap();
    let tree = dir.path().join("tree");
    fs::create_dir_all(&tree).unwrap();
    build_test_tree(&tree);
    let settings_file = dir.path().join("settings.json");
    let export = dir.path().join("out.csv");

    let args = cli(&[
        tree.to_str().unwrap(),
        "--settings",
        settings_file.to_str().unwrap(),
        "--export",
        export.to_str().unwrap(),
        "--no-progress",
        "-n",
        "2",
    ]);
    let code = sizehound_cli::run(&args).unwrap();
    assert_eq!(code, ExitCode::SUCCESS);

    let csv = fs::read_to_string(&export).unwrap();
    let mut lines = csv.lines();
    assert_eq!(
        lines.next(),
        Some("kind,name,path,size,items,category,modified")
    );
    let kinds: Vec<&str> = lines.map(|l| l.split(',').next().unwrap()).collect();
    assert_eq!(kinds, vec!["file", "file", "folder", "folder"]);
    // Nothing was saved without --save-defaults.
    assert!(!settings_file.exists());
}

#[test]
fn run_saves_merged_defaults_and_reuses_them() {
    let dir = TempDir::new().unwrap();
    let tree = dir.path().join("tree");
    fs::create_dir_all(&tree).unwrap();
    build_test_tree(&tree);
    let settings_file = dir.path().join("conf").join("settings.json");

    let args = cli(&[
        tree.to_str().unwrap(),
        "--settings",
        settings_file.to_str().unwrap(),
        "--save-defaults",
        "--no-progress",
        "--folders-only",
        "--format",
        "json",
        "-x",
        "media",
    ]);
    sizehound_cli::run(&args).unwrap();

    let stored = settings::load(&settings_file);
    assert_eq!(
        stored,
        ScanDefaults {
            folders_only: true,
            excluded_names: vec!["media".into()],
            export_format: Some(ExportFormat::Json),
            ..ScanDefaults::default()
        }
    );

    // The stored format applies even when the export file says otherwise.
    let export = dir.path().join("again.csv");
    let args = cli(&[
        tree.to_str().unwrap(),
        "--settings",
        settings_file.to_str().unwrap(),
        "--export",
        export.to_str().unwrap(),
        "--no-progress",
    ]);
    sizehound_cli::run(&args).unwrap();
    let value: serde_json::Value = serde_json::from_slice(&fs::read(&export).unwrap()).unwrap();
    assert_eq!(value["top_files"].as_array().map(Vec::len), Some(0));
    assert_eq!(value["outcome"]["status"], "completed");
}

#[test]
fn negated_switch_overrides_a_stored_default() {
    let dir = TempDir::new().unwrap();
    let tree = dir.path().join("tree");
    fs::create_dir_all(&tree).unwrap();
    build_test_tree(&tree);
    let settings_file = dir.path().join("settings.json");
    settings::save(
        &settings_file,
        &ScanDefaults {
            folders_only: true,
            ..ScanDefaults::default()
        },
    )
    .unwrap();

    let export = dir.path().join("out.json");
    let args = cli(&[
        tree.to_str().unwrap(),
        "--settings",
        settings_file.to_str().unwrap(),
        "--export",
        export.to_str().unwrap(),
        "--no-progress",
        "--no-folders-only",
    ]);
    sizehound_cli::run(&args).unwrap();

    let value: serde_json::Value = serde_json::from_slice(&fs::read(&export).unwrap()).unwrap();
    assert_eq!(value["top_files"].as_array().map(Vec::len), Some(4));
    assert!(settings::load(&settings_file).folders_only);
}

#[test]
fn run_rejects_a_missing_root() {
    let dir = TempDir::new().unwrap();
    let settings_file = dir.path().join("settings.json");
    let args = cli(&[
        dir.path().join("nope").to_str().unwrap(),
        "--settings",
        settings_file.to_str().unwrap(),
        "--no-progress",
    ]);
    assert!(sizehound_cli::run(&args).is_err());
}
