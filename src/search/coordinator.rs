use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

use tokio::sync::Semaphore;
use tokio::sync::mpsc::{self, UnboundedReceiver};
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use super::alphabet::Alphabet;
use super::report::{Reporter, SearchEvent};
use super::worker::{self, SearchTask, WorkerEvent};
use crate::error::{CrackError, Result};
use crate::target::{EncryptionHeader, Target};
use crate::verifier::Confirm;

/// Tunables of a search run.
#[derive(Debug, Clone)]
pub struct SearchConfig {
    pub alphabet: Alphabet,
    /// Characters appended to each prefix
    pub suffix_len: usize,
    /// Size of the worker pool
    pub workers: usize,
    /// Attempts between progress events of one worker; 0 disables them
    pub progress_every: u64,
    /// How long the coordinator waits on the result queue per poll
    pub poll_interval: Duration,
    pub heartbeat_interval: Duration,
    /// Where to write the recovered password
    pub output: Option<PathBuf>,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            alphabet: Alphabet::default(),
            suffix_len: 5,
            workers: std::thread::available_parallelism()
                .map(|n| n.get())
                .unwrap_or(1),
            progress_every: 1_000_000,
            poll_interval: Duration::from_millis(100),
            heartbeat_interval: Duration::from_secs(60),
            output: None,
        }
    }
}

impl SearchConfig {
    pub fn with_alphabet(mut self, alphabet: Alphabet) -> Self {
        self.alphabet = alphabet;
        self
    }

    pub fn with_suffix_len(mut self, suffix_len: usize) -> Self {
        self.suffix_len = suffix_len;
        self
    }

    /// Pool size; values below 1 are raised to 1.
    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers.max(1);
        self
    }

    pub fn with_progress_every(mut self, progress_every: u64) -> Self {
        self.progress_every = progress_every;
        self
    }

    pub fn with_poll_interval(mut self, poll_interval: Duration) -> Self {
        self.poll_interval = poll_interval;
        self
    }

    pub fn with_heartbeat_interval(mut self, heartbeat_interval: Duration) -> Self {
        self.heartbeat_interval = heartbeat_interval;
        self
    }

    pub fn with_output(mut self, output: impl Into<PathBuf>) -> Self {
        self.output = Some(output.into());
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchOutcome {
    Found(String),
    Exhausted,
}

/// Summary returned once every worker has been joined.
#[derive(Debug, Clone)]
pub struct SearchReport {
    pub outcome: SearchOutcome,
    /// Candidates tested across all workers
    pub attempts: u64,
    pub false_positives: u64,
    pub elapsed: Duration,
}

impl SearchReport {
    pub fn password(&self) -> Option<&str> {
        match &self.outcome {
            SearchOutcome::Found(password) => Some(password),
            SearchOutcome::Exhausted => None,
        }
    }
}

/// Drives the worker pool and confirms what it finds.
pub struct Coordinator<C, P> {
    header: EncryptionHeader,
    expected_byte: u8,
    confirmer: C,
    reporter: P,
    config: SearchConfig,
}

impl<C: Confirm, P: Reporter> Coordinator<C, P> {
    pub fn new(target: &Target, confirmer: C, reporter: P, config: SearchConfig) -> Self {
        Self {
            header: target.header,
            expected_byte: target.verification_byte,
            confirmer,
            reporter,
            config,
        }
    }

    /// Run until a password is confirmed or every prefix is exhausted.
    ///
    /// Workers are always cancelled and joined before this returns, on
    /// success, exhaustion and fatal errors alike.
    pub async fn run(mut self) -> Result<SearchReport> {
        let started = Instant::now();
        let cancel = Arc::new(AtomicBool::new(false));
        let (tx, rx) = mpsc::unbounded_channel();
        let slots = Arc::new(Semaphore::new(self.config.workers.max(1)));

        let alphabet = Arc::new(self.config.alphabet.clone());
        self.reporter.report(&SearchEvent::Started {
            tasks: alphabet.len(),
            workers: self.config.workers.max(1),
            candidates_per_task: alphabet.suffix_count(self.config.suffix_len),
        });

        let tasks: Vec<SearchTask> = {
            let header = Arc::new(self.header);
            alphabet
                .symbols()
                .iter()
                .enumerate()
                .map(|(id, &prefix)| SearchTask {
                    id,
                    prefix,
                    alphabet: alphabet.clone(),
                    suffix_len: self.config.suffix_len,
                    header: header.clone(),
                    expected_byte: self.expected_byte,
                    progress_every: self.config.progress_every,
                    started,
                    cancel: cancel.clone(),
                    events: tx.clone(),
                })
                .collect()
        };
        // Workers hold the only senders; the queue closes once all have finished
        drop(tx);

        let dispatcher = tokio::spawn(dispatch(tasks, slots.clone(), cancel.clone()));

        let result = self.drain(rx, started).await;

        // Stop everything still running, then wait for it
        cancel.store(true, Ordering::Relaxed);
        slots.close();
        let joined = join_all(dispatcher).await;

        let (outcome, false_positives) = result?;
        let attempts = match (joined, &outcome) {
            (Ok(attempts), _) => attempts,
            (Err(e), SearchOutcome::Found(_)) => {
                warn!("{e}");
                0
            }
            (Err(e), SearchOutcome::Exhausted) => return Err(e),
        };

        let elapsed = started.elapsed();
        if outcome == SearchOutcome::Exhausted {
            self.reporter
                .report(&SearchEvent::Exhausted { attempts, elapsed });
        }

        Ok(SearchReport {
            outcome,
            attempts,
            false_positives,
            elapsed,
        })
    }

    /// Consume the result queue until a confirmed password or closure.
    async fn drain(
        &mut self,
        mut rx: UnboundedReceiver<WorkerEvent>,
        started: Instant,
    ) -> Result<(SearchOutcome, u64)> {
        let mut false_positives = 0u64;
        let mut last_heartbeat = Duration::ZERO;

        loop {
            match tokio::time::timeout(self.config.poll_interval, rx.recv()).await {
                Ok(Some(WorkerEvent::Candidate {
                    worker,
                    password,
                    attempts,
                    elapsed,
                })) => {
                    self.reporter.report(&SearchEvent::Candidate {
                        worker,
                        password: password.clone(),
                        attempts,
                        elapsed,
                    });

                    let verdict = self.confirmer.confirm(&password).await?;
                    if verdict.is_confirmed() {
                        // Surface the password before anything else can fail
                        self.reporter.report(&SearchEvent::Found {
                            password: password.clone(),
                            elapsed: started.elapsed(),
                        });
                        self.persist(&password).await?;
                        return Ok((SearchOutcome::Found(password), false_positives));
                    }

                    false_positives += 1;
                    self.reporter.report(&SearchEvent::FalsePositive {
                        password,
                        reason: verdict,
                    });
                }
                Ok(Some(WorkerEvent::Progress {
                    worker,
                    attempts,
                    elapsed,
                })) => {
                    self.reporter.report(&SearchEvent::Progress {
                        worker,
                        attempts,
                        elapsed,
                    });
                }
                Ok(None) => return Ok((SearchOutcome::Exhausted, false_positives)),
                Err(_) => {}
            }

            let elapsed = started.elapsed();
            if elapsed - last_heartbeat >= self.config.heartbeat_interval {
                last_heartbeat = elapsed;
                self.reporter.report(&SearchEvent::Heartbeat { elapsed });
            }
        }
    }

    async fn persist(&self, password: &str) -> Result<()> {
        let Some(path) = &self.config.output else {
            return Ok(());
        };
        tokio::fs::write(path, password)
            .await
            .map_err(|source| CrackError::Output {
                path: path.clone(),
                password: password.to_owned(),
                source,
            })?;
        debug!(path = %path.display(), "password written");
        Ok(())
    }
}

/// Start one blocking worker per task, at most one per free slot.
///
/// Stops handing out work as soon as the slots are closed or the search is
/// cancelled; undispatched tasks are dropped along with their senders.
async fn dispatch(
    tasks: Vec<SearchTask>,
    slots: Arc<Semaphore>,
    cancel: Arc<AtomicBool>,
) -> Vec<JoinHandle<u64>> {
    let mut handles = Vec::with_capacity(tasks.len());

    for task in tasks {
        let Ok(permit) = slots.clone().acquire_owned().await else {
            break;
        };
        if cancel.load(Ordering::Relaxed) {
            break;
        }
        debug!(worker = task.id, prefix = %task.prefix, "dispatching");
        handles.push(tokio::task::spawn_blocking(move || {
            let _permit = permit;
            worker::run(task)
        }));
    }

    handles
}

/// Wait for the dispatcher and every worker it started; sum their attempts.
async fn join_all(dispatcher: JoinHandle<Vec<JoinHandle<u64>>>) -> Result<u64> {
    let handles = dispatcher
        .await
        .map_err(|e| CrackError::Worker(e.to_string()))?;

    let mut attempts = 0u64;
    let mut failure = None;
    for handle in handles {
        match handle.await {
            Ok(n) => attempts += n,
            Err(e) => failure = Some(CrackError::Worker(e.to_string())),
        }
    }

    match failure {
        Some(e) => Err(e),
        None => Ok(attempts),
    }
}
