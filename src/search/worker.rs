use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

use tokio::sync::mpsc::UnboundedSender;

use super::alphabet::Alphabet;
use crate::target::EncryptionHeader;
use crate::verifier::fast_check;

/// Message from a worker to the coordinator.
#[derive(Debug)]
pub(crate) enum WorkerEvent {
    Candidate {
        worker: usize,
        password: String,
        attempts: u64,
        elapsed: Duration,
    },
    Progress {
        worker: usize,
        attempts: u64,
        elapsed: Duration,
    },
}

/// One prefix worth of work. Built once by the dispatcher, never mutated.
pub(crate) struct SearchTask {
    pub id: usize,
    pub prefix: char,
    pub alphabet: Arc<Alphabet>,
    pub suffix_len: usize,
    pub header: Arc<EncryptionHeader>,
    pub expected_byte: u8,
    pub progress_every: u64,
    pub started: Instant,
    pub cancel: Arc<AtomicBool>,
    pub events: UnboundedSender<WorkerEvent>,
}

/// Test every candidate of `task` and return the number of attempts made.
///
/// Stops early once `cancel` is raised or the coordinator hangs up.
pub(crate) fn run(task: SearchTask) -> u64 {
    let mut candidates = task.alphabet.candidates(task.prefix, task.suffix_len);
    let mut attempts = 0u64;

    while let Some(password) = candidates.next_candidate() {
        if task.cancel.load(Ordering::Relaxed) {
            break;
        }
        attempts += 1;

        if fast_check(password.as_bytes(), &task.header, task.expected_byte) {
            let event = WorkerEvent::Candidate {
                worker: task.id,
                password: password.to_owned(),
                attempts,
                elapsed: task.started.elapsed(),
            };
            if task.events.send(event).is_err() {
                break;
            }
        }

        if task.progress_every != 0 && attempts % task.progress_every == 0 {
            let event = WorkerEvent::Progress {
                worker: task.id,
                attempts,
                elapsed: task.started.elapsed(),
            };
            if task.events.send(event).is_err() {
                break;
            }
        }
    }

    attempts
}
