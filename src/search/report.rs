use std::time::Duration;

use tracing::{info, warn};

use crate::verifier::Verdict;

/// Everything the coordinator tells the operator during a search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchEvent {
    Started {
        tasks: usize,
        workers: usize,
        /// `None` when the per-task space overflows a `u64`
        candidates_per_task: Option<u64>,
    },
    Progress {
        worker: usize,
        attempts: u64,
        elapsed: Duration,
    },
    /// A candidate passed the header check and awaits confirmation
    Candidate {
        worker: usize,
        password: String,
        attempts: u64,
        elapsed: Duration,
    },
    /// A candidate that full decryption rejected
    FalsePositive {
        password: String,
        reason: Verdict,
    },
    Heartbeat {
        elapsed: Duration,
    },
    Found {
        password: String,
        elapsed: Duration,
    },
    Exhausted {
        attempts: u64,
        elapsed: Duration,
    },
}

/// Sink for [`SearchEvent`]s.
///
/// Only the coordinator calls it, so nothing reaches the sink after the
/// final `Found` or `Exhausted` event.
pub trait Reporter: Send {
    fn report(&mut self, event: &SearchEvent);
}

impl<F> Reporter for F
where
    F: FnMut(&SearchEvent) + Send,
{
    fn report(&mut self, event: &SearchEvent) {
        self(event)
    }
}

/// Writes events as log lines.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingReporter;

impl Reporter for TracingReporter {
    fn report(&mut self, event: &SearchEvent) {
        match event {
            SearchEvent::Started {
                tasks,
                workers,
                candidates_per_task,
            } => match candidates_per_task {
                Some(n) => info!("Searching {tasks} prefixes on {workers} workers, {n} candidates each"),
                None => info!("Searching {tasks} prefixes on {workers} workers"),
            },
            SearchEvent::Progress {
                worker,
                attempts,
                elapsed,
            } => info!(
                "worker-{worker} Attempts: {attempts}, Elapsed: {:.2} s",
                elapsed.as_secs_f64()
            ),
            SearchEvent::Candidate {
                worker,
                password,
                attempts,
                elapsed,
            } => info!(
                "Candidate found by worker-{worker}: {password}, Attempts: {attempts}, Elapsed: {:.2} s",
                elapsed.as_secs_f64()
            ),
            SearchEvent::FalsePositive { password, reason } => match reason {
                Verdict::CrcMismatch => info!("False positive: {password}, bad CRC"),
                Verdict::Undecodable(cause) => {
                    warn!("Error testing candidate {password}: {cause}")
                }
                Verdict::BadPassword | Verdict::Confirmed => {
                    info!("False positive: {password}, rejected on full decryption")
                }
            },
            SearchEvent::Heartbeat { elapsed } => {
                info!("Progress check, Elapsed: {:.2} s", elapsed.as_secs_f64())
            }
            SearchEvent::Found { password, elapsed } => info!(
                "Success! Password: {password}, Total time: {:.2} s",
                elapsed.as_secs_f64()
            ),
            SearchEvent::Exhausted { attempts, elapsed } => warn!(
                "Password not found after {attempts} attempts, Total time: {:.2} s",
                elapsed.as_secs_f64()
            ),
        }
    }
}
