//! Aggregation of per-job results into a single batch result.

use super::{FileFailure, VerifyError, VerifySummary};

/// Consumed only by the coordinator; workers hand results over the channel.
#[derive(Debug)]
pub(super) struct Outcomes {
    fail_fast: bool,
    passed: usize,
    failures: Vec<FileFailure>,
}

impl Outcomes {
    pub(super) fn new(fail_fast: bool) -> Self {
        Self {
            fail_fast,
            passed: 0,
            failures: Vec::new(),
        }
    }

    pub(super) fn record(&mut self, res: Result<(), FileFailure>) {
        match res {
            Ok(()) => self.passed += 1,
            Err(failure) => {
                tracing::warn!(path = %failure.path().display(), "verification failed: {}", failure);
                // Fail-fast keeps the first failure received and drops the rest.
                if !self.fail_fast || self.failures.is_empty() {
                    self.failures.push(failure);
                }
            }
        }
    }

    /// `missing` is the number of jobs whose result never arrived (worker panic).
    pub(super) fn finish(mut self, missing: usize) -> Result<VerifySummary, VerifyError> {
        if self.fail_fast {
            if let Some(first) = self.failures.pop() {
                return Err(VerifyError::File(first));
            }
        }
        if missing > 0 {
            return Err(VerifyError::WorkerPanicked { missing });
        }
        if !self.failures.is_empty() {
            self.failures.sort_by(|a, b| a.path().cmp(b.path()));
            return Err(VerifyError::Failures(self.failures));
        }
        Ok(VerifySummary {
            files_checked: self.passed,
        })
    }
}
