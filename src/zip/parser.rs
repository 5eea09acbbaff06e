//! Central directory walking and local header lookups.
//!
//! Everything the cracker needs from the container comes from two places.
//! The central directory at the tail of the archive names each entry and
//! carries its flags, sizes, CRC and DOS time; it is located through the
//! EOCD record, or the ZIP64 one when the EOCD fields are saturated. The
//! local file header in front of each entry tells where its encrypted bytes
//! begin. That offset is always recomputed from the local header, whose
//! extra field often differs from the central copy.

use byteorder::{LittleEndian, ReadBytesExt};
use std::io::{Cursor, Read};
use std::sync::Arc;

use crate::io::ReadAt;
use anyhow::{Result, bail};

use super::structures::*;

/// Archive comments are at most this long, which bounds the EOCD scan.
const MAX_COMMENT_SIZE: u64 = 65535;

/// Reads container metadata through any [`ReadAt`] source.
///
/// [`ZipExtractor`](super::ZipExtractor) wraps it for entry selection and
/// decryption.
pub struct ZipParser<R: ReadAt> {
    reader: Arc<R>,
    /// Archive length, captured once at construction
    size: u64,
}

impl<R: ReadAt> ZipParser<R> {
    pub fn new(reader: Arc<R>) -> Self {
        let size = reader.size();
        Self { reader, size }
    }

    /// Locate the EOCD record and return it with its file offset.
    ///
    /// A comment-less archive ends with the record; otherwise the tail is
    /// scanned backwards for a signature whose comment length reaches
    /// exactly to the end of the file.
    pub async fn find_eocd(&self) -> Result<(EndOfCentralDirectory, u64)> {
        if self.size < EndOfCentralDirectory::SIZE as u64 {
            bail!("Not a valid ZIP file: {} bytes is too small", self.size);
        }

        let offset = self.size - EndOfCentralDirectory::SIZE as u64;
        let mut buf = vec![0u8; EndOfCentralDirectory::SIZE];
        self.reader.read_exact_at(offset, &mut buf).await?;

        // Signature with a zero-length comment
        if &buf[0..4] == EndOfCentralDirectory::SIGNATURE && &buf[20..22] == b"\x00\x00" {
            let eocd = EndOfCentralDirectory::from_bytes(&buf)?;
            return Ok((eocd, offset));
        }

        let search_size = (MAX_COMMENT_SIZE + EndOfCentralDirectory::SIZE as u64).min(self.size);
        let search_start = self.size - search_size;

        let mut buf = vec![0u8; search_size as usize];
        self.reader.read_exact_at(search_start, &mut buf).await?;

        for i in (0..=buf.len() - EndOfCentralDirectory::SIZE).rev() {
            if &buf[i..i + 4] == EndOfCentralDirectory::SIGNATURE {
                // The comment length must account for every trailing byte
                let comment_len = u16::from_le_bytes([buf[i + 20], buf[i + 21]]) as usize;

                if comment_len == buf.len() - i - EndOfCentralDirectory::SIZE {
                    let eocd = EndOfCentralDirectory::from_bytes(
                        &buf[i..i + EndOfCentralDirectory::SIZE],
                    )?;
                    return Ok((eocd, search_start + i as u64));
                }
            }
        }

        bail!("Not a valid ZIP file")
    }

    /// Read the ZIP64 End of Central Directory record.
    ///
    /// Called when the regular EOCD has fields saturated to 0xFFFF or
    /// 0xFFFFFFFF. The locator sits immediately before the regular EOCD.
    pub async fn read_zip64_eocd(&self, eocd_offset: u64) -> Result<Zip64EOCD> {
        let Some(locator_offset) = eocd_offset.checked_sub(Zip64EOCDLocator::SIZE as u64) else {
            bail!("Invalid ZIP64 format: missing locator");
        };
        let mut locator_buf = vec![0u8; Zip64EOCDLocator::SIZE];
        self.reader
            .read_exact_at(locator_offset, &mut locator_buf)
            .await?;

        let locator = Zip64EOCDLocator::from_bytes(&locator_buf)?;

        let mut eocd64_buf = vec![0u8; Zip64EOCD::MIN_SIZE];
        self.reader
            .read_exact_at(locator.eocd64_offset, &mut eocd64_buf)
            .await?;

        Zip64EOCD::from_bytes(&eocd64_buf)
    }

    /// List all entries in the ZIP archive, in central directory order.
    ///
    /// # Errors
    ///
    /// Returns an error if the archive is invalid, spans several disks, or
    /// its central directory lies outside the file.
    pub async fn list_files(&self) -> Result<Vec<ZipFileEntry>> {
        let (eocd, eocd_offset) = self.find_eocd().await?;

        if eocd.is_multi_disk() {
            bail!("Multi-disk archives are not supported");
        }

        let (cd_offset, cd_size, total_entries) = if eocd.is_zip64() {
            let eocd64 = self.read_zip64_eocd(eocd_offset).await?;
            (eocd64.cd_offset, eocd64.cd_size, eocd64.total_entries)
        } else {
            (
                eocd.cd_offset as u64,
                eocd.cd_size as u64,
                eocd.total_entries as u64,
            )
        };

        if cd_offset.checked_add(cd_size).is_none_or(|end| end > self.size) {
            bail!(
                "Central Directory out of bounds: offset {}, size {}, archive size {}",
                cd_offset,
                cd_size,
                self.size
            );
        }

        // Read the entire Central Directory in one request
        let mut cd_data = vec![0u8; cd_size as usize];
        self.reader.read_exact_at(cd_offset, &mut cd_data).await?;

        // Each header is at least 46 bytes, which bounds a lying entry count
        let mut entries = Vec::with_capacity((total_entries as usize).min(cd_data.len() / 46));
        let mut cursor = Cursor::new(cd_data.as_slice());

        for _ in 0..total_entries {
            let entry = self.parse_cdfh(&mut cursor)?;
            entries.push(entry);
        }

        Ok(entries)
    }

    /// Parse a Central Directory File Header from a cursor.
    fn parse_cdfh(&self, cursor: &mut Cursor<&[u8]>) -> Result<ZipFileEntry> {
        let mut sig = [0u8; 4];
        cursor.read_exact(&mut sig)?;
        if sig != CDFH_SIGNATURE {
            bail!("Invalid Central Directory File Header");
        }

        let _version_made_by = cursor.read_u16::<LittleEndian>()?;
        let _version_needed = cursor.read_u16::<LittleEndian>()?;
        let flags = cursor.read_u16::<LittleEndian>()?;
        let compression_method = cursor.read_u16::<LittleEndian>()?;
        let last_mod_time = cursor.read_u16::<LittleEndian>()?;
        let last_mod_date = cursor.read_u16::<LittleEndian>()?;
        let crc32 = cursor.read_u32::<LittleEndian>()?;
        let compressed_size = cursor.read_u32::<LittleEndian>()? as u64;
        let uncompressed_size = cursor.read_u32::<LittleEndian>()? as u64;
        let file_name_length = cursor.read_u16::<LittleEndian>()?;
        let extra_field_length = cursor.read_u16::<LittleEndian>()?;
        let file_comment_length = cursor.read_u16::<LittleEndian>()?;
        let _disk_number_start = cursor.read_u16::<LittleEndian>()?;
        let _internal_attrs = cursor.read_u16::<LittleEndian>()?;
        let _external_attrs = cursor.read_u32::<LittleEndian>()?;
        let lfh_offset = cursor.read_u32::<LittleEndian>()? as u64;

        let mut file_name_bytes = vec![0u8; file_name_length as usize];
        cursor.read_exact(&mut file_name_bytes)?;
        // Non-UTF8 names only matter for display and entry selection
        let file_name = String::from_utf8_lossy(&file_name_bytes).to_string();

        let is_directory = file_name.ends_with('/');

        let mut extra = vec![0u8; extra_field_length as usize];
        let mut comment = vec![0u8; file_comment_length as usize];
        if cursor.read_exact(&mut extra).is_err() || cursor.read_exact(&mut comment).is_err() {
            bail!("Truncated Central Directory File Header for {}", file_name);
        }

        let mut sizes = Zip64Sizes {
            uncompressed: uncompressed_size,
            compressed: compressed_size,
            lfh_offset,
        };
        sizes.widen_from(&extra)?;

        Ok(ZipFileEntry {
            file_name,
            flags,
            compression_method: CompressionMethod::from_u16(compression_method),
            compressed_size: sizes.compressed,
            uncompressed_size: sizes.uncompressed,
            crc32,
            lfh_offset: sizes.lfh_offset,
            last_mod_time,
            last_mod_date,
            is_directory,
        })
    }

    /// Where the entry's stored bytes start, i.e. its encryption header.
    pub async fn get_data_offset(&self, entry: &ZipFileEntry) -> Result<u64> {
        let mut lfh_buf = vec![0u8; LFH_SIZE];
        self.reader.read_exact_at(entry.lfh_offset, &mut lfh_buf).await?;

        if &lfh_buf[0..4] != LFH_SIGNATURE {
            bail!("Invalid Local File Header for {}", entry.file_name);
        }

        let mut cursor = Cursor::new(&lfh_buf);
        cursor.set_position(LFH_NAME_LEN_OFFSET);

        let file_name_length = cursor.read_u16::<LittleEndian>()? as u64;
        let extra_field_length = cursor.read_u16::<LittleEndian>()? as u64;

        Ok(entry.lfh_offset + LFH_SIZE as u64 + file_name_length + extra_field_length)
    }

    pub fn reader(&self) -> &Arc<R> {
        &self.reader
    }
}

/// 32-bit central directory fields that a ZIP64 extra field may widen.
struct Zip64Sizes {
    uncompressed: u64,
    compressed: u64,
    lfh_offset: u64,
}

impl Zip64Sizes {
    const SATURATED: u64 = 0xFFFF_FFFF;
    const ZIP64_EXTRA_ID: u16 = 0x0001;

    /// Replace saturated fields with the 64-bit values of the ZIP64 record in
    /// `extra`. Values are stored only for saturated fields, in this order.
    fn widen_from(&mut self, extra: &[u8]) -> Result<()> {
        let mut cursor = Cursor::new(extra);

        while cursor.position() + 4 <= extra.len() as u64 {
            let header_id = cursor.read_u16::<LittleEndian>()?;
            let field_size = cursor.read_u16::<LittleEndian>()? as u64;
            let field_end = (cursor.position() + field_size).min(extra.len() as u64);

            if header_id == Self::ZIP64_EXTRA_ID {
                for field in [
                    &mut self.uncompressed,
                    &mut self.compressed,
                    &mut self.lfh_offset,
                ] {
                    if *field == Self::SATURATED && cursor.position() + 8 <= field_end {
                        *field = cursor.read_u64::<LittleEndian>()?;
                    }
                }
            }

            cursor.set_position(field_end);
        }

        Ok(())
    }
}
