//! # zipcrack
//!
//! Password recovery for ZIP entries protected with traditional PKWARE
//! ("ZipCrypto") encryption.
//!
//! The cipher is implemented from scratch so that a candidate password can be
//! rejected after decrypting only the 12-byte encryption header of an entry.
//! Candidates that survive this check (about 1 in 256 wrong passwords) are
//! confirmed by decrypting the whole entry and comparing its CRC-32.
//!
//! ## Features
//!
//! - Bit-exact ZipCrypto key schedule and keystream
//! - ZIP and ZIP64 central directory parsing
//! - STORED and DEFLATE entries, with or without a data descriptor
//! - Prefix-partitioned search on a bounded worker pool
//!
//! ## Example
//!
//! ```no_run
//! use std::path::Path;
//! use zipcrack::{Alphabet, SearchConfig, crack};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = SearchConfig::default()
//!         .with_alphabet(Alphabet::new("abc123"))
//!         .with_suffix_len(4)
//!         .with_output("password.txt");
//!
//!     let report = crack(Path::new("secret.zip"), None, config).await?;
//!     if let Some(password) = report.password() {
//!         println!("{password}");
//!     }
//!
//!     Ok(())
//! }
//! ```

pub mod cli;
pub mod crypto;
pub mod error;
pub mod io;
pub mod search;
pub mod target;
pub mod verifier;
pub mod zip;

pub use cli::Cli;
pub use crypto::{KeySet, ZIPCRYPTO_INITIAL_KEYS};
pub use error::CrackError;
pub use io::{LocalFileReader, ReadAt};
pub use search::{
    Alphabet, Coordinator, Reporter, SearchConfig, SearchEvent, SearchOutcome, SearchReport,
    TracingReporter, crack,
};
pub use target::{EncryptionHeader, Target};
pub use verifier::{ArchiveConfirmer, Confirm, Verdict, confirm, fast_check, verify};
pub use zip::{DecryptionOutcome, ZipExtractor, ZipFileEntry};
