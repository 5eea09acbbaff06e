//! Parallel brute-force search over a prefix-partitioned candidate space.
//!
//! Every alphabet character becomes the prefix of one task. A task tests
//! `prefix + suffix` for every fixed-length suffix over the same alphabet,
//! using only the 12-byte header check. Survivors travel over an unbounded
//! channel to the [`Coordinator`], which confirms them by full decryption.
//!
//! ```text
//! INIT -> RUNNING -> FOUND | EXHAUSTED -> TERMINATED
//! ```

mod alphabet;
mod coordinator;
mod report;
mod worker;

pub use alphabet::{Alphabet, Candidates, FREQUENCY_ALPHABET};
pub use coordinator::{Coordinator, SearchConfig, SearchOutcome, SearchReport};
pub use report::{Reporter, SearchEvent, TracingReporter};

use std::path::Path;

use crate::error::Result;
use crate::target::Target;
use crate::verifier::ArchiveConfirmer;

/// Recover the password of `entry` (or the first file) in `archive`.
///
/// Progress is logged through `tracing`.
pub async fn crack(
    archive: &Path,
    entry: Option<&str>,
    config: SearchConfig,
) -> Result<SearchReport> {
    let target = Target::extract(archive, entry).await?;
    let confirmer = ArchiveConfirmer::new(&target);
    Coordinator::new(&target, confirmer, TracingReporter, config)
        .run()
        .await
}
