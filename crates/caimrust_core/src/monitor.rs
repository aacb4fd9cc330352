use std::sync::atomic::{AtomicBool, Ordering};

use crate::errors::CaimError;

/// Progress and cancellation collaborator for long-running fits.
///
/// Cancellation is cooperative: the driver calls `check_cancelled` between
/// outer search iterations and between columns, never inside the inner
/// scoring loop. A cancelled fit aborts the whole operation and leaves no
/// partial model behind.
pub trait ProgressMonitor {
    fn report_progress(&self, _fraction: f64, _message: &str) {}

    fn check_cancelled(&self) -> Result<(), CaimError> {
        Ok(())
    }
}

/// Monitor that never reports and never cancels.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoProgress;

impl ProgressMonitor for NoProgress {}

/// Cancellation flag that can be flipped from another thread.
#[derive(Debug, Default)]
pub struct CancelFlag {
    cancelled: AtomicBool,
}

impl CancelFlag {
    pub fn new() -> Self {
        CancelFlag::default()
    }

    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }
}

impl ProgressMonitor for CancelFlag {
    fn check_cancelled(&self) -> Result<(), CaimError> {
        if self.is_cancelled() {
            Err(CaimError::Cancelled)
        } else {
            Ok(())
        }
    }
}
