//! Cheap password rejection and authoritative confirmation.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tracing::debug;

use crate::crypto::{KeySet, ZIPCRYPTO_INITIAL_KEYS};
use crate::error::{CrackError, Result};
use crate::target::{EncryptionHeader, Target, open_archive};
use crate::zip::{DecryptionOutcome, ZipFileEntry};

/// Decrypt the 12-byte header under `password` and compare its last byte.
///
/// A match is only a hint: about one wrong password in 256 passes.
#[inline]
pub fn fast_check(password: &[u8], header: &EncryptionHeader, expected_byte: u8) -> bool {
    let mut keys = KeySet::from_password(password, ZIPCRYPTO_INITIAL_KEYS);
    let mut last = 0;
    for &c in header {
        last = keys.decrypt(c);
    }
    last == expected_byte
}

/// What full decryption made of a candidate that passed [`fast_check`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    /// Content decrypted to the recorded CRC-32
    Confirmed,
    /// The header check failed after all
    BadPassword,
    /// Content decoded but its CRC-32 differs
    CrcMismatch,
    /// Content could not be decoded; holds the decoder's complaint
    Undecodable(String),
}

impl Verdict {
    pub fn is_confirmed(&self) -> bool {
        matches!(self, Self::Confirmed)
    }
}

/// Decrypt the whole entry under `password` and judge the result.
///
/// Failing to read the archive is an error; everything else is a verdict.
pub async fn verify(
    password: &[u8],
    archive: &Path,
    entry: &ZipFileEntry,
    target_crc: u32,
) -> Result<Verdict> {
    let extractor = open_archive(archive)?;
    let outcome = extractor
        .decrypt_to_memory(entry, password)
        .await
        .map_err(|e| match e.downcast::<std::io::Error>() {
            Ok(source) => CrackError::Io {
                path: archive.to_path_buf(),
                source,
            },
            Err(e) => CrackError::InvalidArchive {
                path: archive.to_path_buf(),
                reason: format!("{e:#}"),
            },
        })?;

    Ok(match outcome {
        DecryptionOutcome::Success(content) => {
            let crc = crc32fast::hash(&content);
            debug!(
                computed = format_args!("{:#010x}", crc),
                expected = format_args!("{:#010x}", target_crc),
                "decrypted candidate content"
            );
            if crc == target_crc {
                Verdict::Confirmed
            } else {
                Verdict::CrcMismatch
            }
        }
        DecryptionOutcome::BadPassword => Verdict::BadPassword,
        DecryptionOutcome::OtherError(e) => Verdict::Undecodable(format!("{e:#}")),
    })
}

/// Like [`verify`], answering only whether `password` is the one.
pub async fn confirm(
    password: &[u8],
    archive: &Path,
    entry: &ZipFileEntry,
    target_crc: u32,
) -> Result<bool> {
    Ok(verify(password, archive, entry, target_crc)
        .await?
        .is_confirmed())
}

/// Final confirmation step of the search.
#[async_trait]
pub trait Confirm: Send + Sync {
    async fn confirm(&self, password: &str) -> Result<Verdict>;
}

/// Confirms candidates against the archive on disk.
///
/// The archive is reopened on every call and never held open in between.
#[derive(Debug, Clone)]
pub struct ArchiveConfirmer {
    archive: PathBuf,
    entry: ZipFileEntry,
    crc32: u32,
}

impl ArchiveConfirmer {
    pub fn new(target: &Target) -> Self {
        Self {
            archive: target.archive.clone(),
            entry: target.entry.clone(),
            crc32: target.crc32,
        }
    }
}

#[async_trait]
impl Confirm for ArchiveConfirmer {
    async fn confirm(&self, password: &str) -> Result<Verdict> {
        verify(password.as_bytes(), &self.archive, &self.entry, self.crc32).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn encrypt_header(password: &[u8], plain: &EncryptionHeader) -> EncryptionHeader {
        let mut header = *plain;
        KeySet::from_password(password, ZIPCRYPTO_INITIAL_KEYS).encrypt_in_place(&mut header);
        header
    }

    #[test]
    fn accepts_the_true_password() {
        let plain = [0x3c, 0x91, 0x07, 0xee, 0x52, 0x10, 0xa4, 0x6b, 0x2f, 0xd8, 0x99, 0xab];
        let header = encrypt_header(b"abc12", &plain);
        assert!(fast_check(b"abc12", &header, plain[11]));
    }

    #[test]
    fn rejects_with_wrong_expected_byte() {
        let plain = [7u8; 12];
        let header = encrypt_header(b"hunter2", &plain);
        assert!(!fast_check(b"hunter2", &header, plain[11].wrapping_add(1)));
    }

    #[test]
    fn false_positive_rate_is_about_one_in_256() {
        let plain = [0x11, 0x22, 0x33, 0x44, 0x55, 0x66, 0x77, 0x88, 0x99, 0xaa, 0xbb, 0xcc];
        let header = encrypt_header(b"the-real-one", &plain);

        let samples = 256_000u32;
        let hits = (0..samples)
            .filter(|n| fast_check(format!("wrong{n}").as_bytes(), &header, plain[11]))
            .count() as f64;

        // Expect 1000; allow for the spread of a binomial(256000, 1/256)
        assert!((800.0..=1200.0).contains(&hits), "hits = {hits}");
    }
}
