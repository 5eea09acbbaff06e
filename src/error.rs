use std::path::PathBuf;

use thiserror::Error;

/// Errors that end a recovery run.
///
/// Per-candidate failures (wrong password, false positive, undecodable
/// content) never surface as a `CrackError`; they are counted or logged
/// inside the search.
#[derive(Debug, Error)]
pub enum CrackError {
    /// The archive path does not exist.
    #[error("Archive not found: {}", .0.display())]
    ArchiveNotFound(PathBuf),

    /// The file could not be parsed as a ZIP container.
    #[error("Invalid archive {}: {reason}", path.display())]
    InvalidArchive { path: PathBuf, reason: String },

    /// The selected entry carries no encryption flag.
    #[error("Entry {0} is not encrypted")]
    NotEncrypted(String),

    /// The selected entry uses AES or PKWARE strong encryption.
    #[error("Entry {0} does not use traditional ZipCrypto encryption")]
    UnsupportedEntry(String),

    /// Reading the archive failed.
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The password was recovered but could not be written out.
    #[error("Failed to write password {password:?} to {}: {source}", path.display())]
    Output {
        path: PathBuf,
        password: String,
        #[source]
        source: std::io::Error,
    },

    /// A worker task panicked or was torn down abnormally.
    #[error("Search worker failed: {0}")]
    Worker(String),
}

pub type Result<T, E = CrackError> = std::result::Result<T, E>;
