use flate2::read::DeflateDecoder;
use std::fmt;
use std::io::Read;
use std::sync::Arc;

use crate::crypto::{ENCRYPTION_HEADER_SIZE, KeySet, ZIPCRYPTO_INITIAL_KEYS};
use crate::io::ReadAt;
use anyhow::{Result, anyhow, bail};

use super::parser::ZipParser;
use super::structures::{CompressionMethod, ZipFileEntry};

/// Result of a password-aware extraction.
///
/// A wrong password is an ordinary outcome here, not an error. Only
/// failures to read the archive itself are returned as `Err`.
pub enum DecryptionOutcome {
    /// Decrypted and decoded entry content
    Success(Vec<u8>),
    /// The decrypted encryption header did not end with the verification byte
    BadPassword,
    /// The header matched but the content could not be decoded
    OtherError(anyhow::Error),
}

impl fmt::Debug for DecryptionOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Success(data) => write!(f, "Success({} bytes)", data.len()),
            Self::BadPassword => write!(f, "BadPassword"),
            Self::OtherError(e) => write!(f, "OtherError({e:#})"),
        }
    }
}

/// ZIP file extractor
pub struct ZipExtractor<R: ReadAt> {
    parser: ZipParser<R>,
}

impl<R: ReadAt> ZipExtractor<R> {
    pub fn new(reader: Arc<R>) -> Self {
        Self {
            parser: ZipParser::new(reader),
        }
    }

    /// List all files in the archive
    pub async fn list_files(&self) -> Result<Vec<ZipFileEntry>> {
        self.parser.list_files().await
    }

    /// Find an entry by exact name, or the first non-directory entry.
    pub async fn find_entry(&self, name: Option<&str>) -> Result<ZipFileEntry> {
        let entries = self.list_files().await?;
        let found = match name {
            Some(name) => entries.into_iter().find(|e| e.file_name == name),
            None => entries.into_iter().find(|e| !e.is_directory),
        };
        match (found, name) {
            (Some(entry), _) => Ok(entry),
            (None, Some(name)) => bail!("No entry named {} in archive", name),
            (None, None) => bail!("Archive contains no file entries"),
        }
    }

    /// Offset of the entry's encrypted data, once its declared size is known
    /// to fit inside the archive.
    async fn encrypted_data_offset(&self, entry: &ZipFileEntry) -> Result<u64> {
        if entry.compressed_size < ENCRYPTION_HEADER_SIZE as u64 {
            bail!(
                "Entry {} is too small to hold an encryption header ({} bytes)",
                entry.file_name,
                entry.compressed_size
            );
        }

        let data_offset = self.parser.get_data_offset(entry).await?;
        let archive_size = self.parser.reader().size();
        if data_offset
            .checked_add(entry.compressed_size)
            .is_none_or(|end| end > archive_size)
        {
            bail!(
                "Entry {} claims {} bytes at offset {}, past the end of the archive ({} bytes)",
                entry.file_name,
                entry.compressed_size,
                data_offset,
                archive_size
            );
        }

        Ok(data_offset)
    }

    /// Read the raw (still encrypted) 12-byte header of an entry
    pub async fn read_encryption_header(
        &self,
        entry: &ZipFileEntry,
    ) -> Result<[u8; ENCRYPTION_HEADER_SIZE]> {
        let data_offset = self.encrypted_data_offset(entry).await?;
        let mut header = [0u8; ENCRYPTION_HEADER_SIZE];
        self.parser
            .reader()
            .read_exact_at(data_offset, &mut header)
            .await?;
        Ok(header)
    }

    /// Decrypt an entry with `password` and decode it to memory.
    pub async fn decrypt_to_memory(
        &self,
        entry: &ZipFileEntry,
        password: &[u8],
    ) -> Result<DecryptionOutcome> {
        let data_offset = self.encrypted_data_offset(entry).await?;
        let Ok(len) = usize::try_from(entry.compressed_size) else {
            bail!("Entry {} is too large to decrypt in memory", entry.file_name);
        };
        let mut data = vec![0u8; len];
        self.parser
            .reader()
            .read_exact_at(data_offset, &mut data)
            .await?;

        let mut keys = KeySet::from_password(password, ZIPCRYPTO_INITIAL_KEYS);
        let (header, body) = data.split_at_mut(ENCRYPTION_HEADER_SIZE);
        keys.decrypt_in_place(header);
        if header[ENCRYPTION_HEADER_SIZE - 1] != entry.verification_byte() {
            return Ok(DecryptionOutcome::BadPassword);
        }
        keys.decrypt_in_place(body);

        let body = &data[ENCRYPTION_HEADER_SIZE..];
        Ok(match decode(entry, body) {
            Ok(content) => DecryptionOutcome::Success(content),
            Err(e) => DecryptionOutcome::OtherError(e),
        })
    }
}

/// Undo the entry's compression method.
fn decode(entry: &ZipFileEntry, body: &[u8]) -> Result<Vec<u8>> {
    let content = match entry.compression_method {
        CompressionMethod::Stored => body.to_vec(),
        CompressionMethod::Deflate => {
            // One byte past the declared size is enough to detect a mismatch
            let limit = entry.uncompressed_size.saturating_add(1);
            let mut content = Vec::with_capacity(entry.uncompressed_size.min(1 << 24) as usize);
            DeflateDecoder::new(body)
                .take(limit)
                .read_to_end(&mut content)
                .map_err(|e| anyhow!("Inflate failed: {}", e))?;
            content
        }
        other => bail!("Unsupported compression method: {}", other.as_u16()),
    };

    if content.len() as u64 != entry.uncompressed_size {
        bail!(
            "Size mismatch: expected {} bytes, got {}",
            entry.uncompressed_size,
            content.len()
        );
    }

    Ok(content)
}
