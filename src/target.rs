//! Selection of the entry under attack and the values a password test needs.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::debug;

use crate::crypto::ENCRYPTION_HEADER_SIZE;
use crate::error::{CrackError, Result};
use crate::io::LocalFileReader;
use crate::zip::{ZipExtractor, ZipFileEntry};

/// The encrypted first 12 bytes of an entry's data.
pub type EncryptionHeader = [u8; ENCRYPTION_HEADER_SIZE];

/// Everything extracted once from the archive before the search starts.
#[derive(Debug, Clone)]
pub struct Target {
    pub archive: PathBuf,
    pub entry: ZipFileEntry,
    pub header: EncryptionHeader,
    /// Expected last byte of the decrypted header
    pub verification_byte: u8,
    /// CRC-32 of the unencrypted content
    pub crc32: u32,
}

impl Target {
    /// Read the target values for `entry_name`, or the first file entry.
    ///
    /// Only the container metadata and the raw header bytes are read; no
    /// decryption happens here.
    pub async fn extract(archive: &Path, entry_name: Option<&str>) -> Result<Self> {
        let extractor = open_archive(archive)?;

        let entry = extractor
            .find_entry(entry_name)
            .await
            .map_err(|e| invalid(archive, e))?;

        if !entry.is_encrypted() {
            return Err(CrackError::NotEncrypted(entry.file_name));
        }
        if entry.uses_strong_encryption() {
            return Err(CrackError::UnsupportedEntry(entry.file_name));
        }

        let header = extractor
            .read_encryption_header(&entry)
            .await
            .map_err(|e| invalid(archive, e))?;

        let verification_byte = entry.verification_byte();
        debug!(
            entry = %entry.file_name,
            flags = format_args!("{:#06x}", entry.flags),
            verification_byte = format_args!("{:#04x}", verification_byte),
            crc32 = format_args!("{:#010x}", entry.crc32),
            "extracted encryption header"
        );

        Ok(Self {
            archive: archive.to_path_buf(),
            crc32: entry.crc32,
            verification_byte,
            header,
            entry,
        })
    }
}

/// Open `path` for reading, telling a missing file apart from other failures.
pub(crate) fn open_archive(path: &Path) -> Result<ZipExtractor<LocalFileReader>> {
    let reader = LocalFileReader::open(path).map_err(|source| {
        if source.kind() == std::io::ErrorKind::NotFound {
            CrackError::ArchiveNotFound(path.to_path_buf())
        } else {
            CrackError::Io {
                path: path.to_path_buf(),
                source,
            }
        }
    })?;
    Ok(ZipExtractor::new(Arc::new(reader)))
}

fn invalid(path: &Path, e: anyhow::Error) -> CrackError {
    CrackError::InvalidArchive {
        path: path.to_path_buf(),
        reason: format!("{e:#}"),
    }
}
