/// Console state management.
///
/// Mirrors the scan lifecycle for the terminal frontend. The scan thread
/// communicates through the handle's progress channel; state updates happen
/// in `process_scan_messages()`, which the render loop calls once per tick.
use sizehound_core::scanner::{
    start_scan, ScanHandle, ScanOptions, ScanProgress, ScanResult, ScanState,
};
use sizehound_core::ScanError;
use tracing::{debug, info};

/// The current phase of the console.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConsolePhase {
    /// No scan started yet.
    Idle,
    /// A scan is running; the status line shows live counters.
    Scanning,
    /// The scan ended; a result is available.
    Results,
}

/// Maximum number of progress snapshots drained per tick.
///
/// Keeps a backlog from delaying the next redraw. Older snapshots are
/// superseded by newer ones anyway.
const MAX_MESSAGES_PER_POLL: usize = 256;

pub struct ConsoleState {
    pub phase: ConsolePhase,
    pub scan_handle: Option<ScanHandle>,
    /// Latest snapshot received from the scan.
    pub progress: ScanProgress,
    /// Total snapshots received for the current scan.
    pub messages_received: u64,
    pub result: Option<ScanResult>,
}

impl Default for ConsoleState {
    fn default() -> Self {
        Self::new()
    }
}

impl ConsoleState {
    pub fn new() -> Self {
        Self {
            phase: ConsolePhase::Idle,
            scan_handle: None,
            progress: ScanProgress::default(),
            messages_received: 0,
            result: None,
        }
    }

    /// Start a scan with `options`.
    ///
    /// Invalid options leave the state untouched and return the error.
    pub fn start_scan(&mut self, options: ScanOptions) -> Result<(), ScanError> {
        let handle = start_scan(options)?;
        self.phase = ConsolePhase::Scanning;
        self.progress = ScanProgress::default();
        self.messages_received = 0;
        self.result = None;
        self.scan_handle = Some(handle);
        Ok(())
    }

    /// Ask the running scan to stop. The final result still arrives through
    /// `process_scan_messages()`.
    pub fn cancel_scan(&self) {
        if let Some(handle) = &self.scan_handle {
            info!("Cancelling scan");
            handle.cancel();
        }
    }

    /// Drain pending progress and pick up the result once the scan thread is
    /// done. Returns `true` if anything visible changed.
    pub fn process_scan_messages(&mut self) -> bool {
        let Some(handle) = &self.scan_handle else {
            return false;
        };

        let mut changed = false;
        let mut drained = 0usize;
        while drained < MAX_MESSAGES_PER_POLL {
            let Ok(progress) = handle.progress_rx.try_recv() else {
                break;
            };
            drained += 1;
            self.progress = progress;
            changed = true;
        }
        self.messages_received += drained as u64;

        // Only finish once the backlog is empty so the last snapshot shown
        // is the final one.
        if handle.is_finished() && handle.progress_rx.is_empty() {
            if let Some(handle) = self.scan_handle.take() {
                let result = handle.join();
                debug!("scan ended with {:?}", result.outcome);
                self.progress = result.progress.clone();
                self.result = Some(result);
                self.phase = ConsolePhase::Results;
                changed = true;
            }
        }
        changed
    }

    /// Lifecycle state of the current (or last) scan.
    pub fn scan_state(&self) -> ScanState {
        match (&self.scan_handle, &self.result) {
            (Some(handle), _) => handle.state(),
            (None, Some(result)) => result.state(),
            (None, None) => ScanState::Idle,
        }
    }

    pub fn is_scanning(&self) -> bool {
        self.phase == ConsolePhase::Scanning
    }
}
