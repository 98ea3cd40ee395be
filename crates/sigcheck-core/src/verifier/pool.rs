//! Fixed-size worker pool over a shared job queue.
//!
//! Workers pop jobs until the queue is empty and send every result to the
//! coordinator. A failed job does not stop the pool: every queued job runs.
//! A panicking hasher fails only its own file; the worker moves on.

use std::any::Any;
use std::collections::VecDeque;
use std::panic::{self, AssertUnwindSafe};
use std::sync::mpsc;
use std::sync::{Arc, Mutex, PoisonError};

use crate::checksum::HasherFactory;

use super::outcome::Outcomes;
use super::{check_one, FileFailure, Job, VerifyError, VerifySummary};

pub(super) fn run_pool(
    jobs: Vec<Job>,
    num_workers: usize,
    factory: Arc<dyn HasherFactory>,
    fail_fast: bool,
) -> Result<VerifySummary, VerifyError> {
    let count = jobs.len();
    let work: Arc<Mutex<VecDeque<Job>>> = Arc::new(Mutex::new(jobs.into_iter().collect()));
    let (tx, rx) = mpsc::channel();
    let num_workers = num_workers.clamp(1, count.max(1));

    let mut handles = Vec::with_capacity(num_workers);
    for id in 0..num_workers {
        let work = Arc::clone(&work);
        let tx = tx.clone();
        let factory = Arc::clone(&factory);
        let spawned = std::thread::Builder::new()
            .name(format!("sigcheck-worker-{id}"))
            .spawn(move || loop {
                let job = match work.lock().unwrap_or_else(PoisonError::into_inner).pop_front() {
                    Some(job) => job,
                    None => break,
                };
                tracing::trace!(path = %job.path.display(), "checking");
                let res = panic::catch_unwind(AssertUnwindSafe(|| {
                    check_one(&job, factory.as_ref())
                }))
                .unwrap_or_else(|payload| {
                    Err(FileFailure::HasherPanicked {
                        path: job.path.clone(),
                        message: panic_message(payload.as_ref()),
                    })
                });
                if tx.send(res).is_err() {
                    break;
                }
            });
        match spawned {
            Ok(h) => handles.push(h),
            // Remaining workers drain the queue; only fatal if none started.
            Err(e) if !handles.is_empty() => {
                tracing::warn!("spawned {} of {} workers: {}", handles.len(), num_workers, e);
                break;
            }
            Err(e) => return Err(VerifyError::Spawn(e)),
        }
    }
    drop(tx);
    tracing::debug!(jobs = count, workers = handles.len(), "verification started");

    let mut outcomes = Outcomes::new(fail_fast);
    let mut to_receive = count;
    while to_receive > 0 {
        match rx.recv() {
            Ok(res) => {
                to_receive -= 1;
                outcomes.record(res);
            }
            // Every sender is gone: a worker died with its job unreported.
            Err(_) => break,
        }
    }

    for h in handles {
        if h.join().is_err() {
            tracing::warn!("verification worker panicked");
        }
    }

    outcomes.finish(to_receive)
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}
