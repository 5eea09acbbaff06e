#![allow(dead_code)]

use std::io::Write;
use std::path::{Path, PathBuf};

use byteorder::{LittleEndian, WriteBytesExt};
use flate2::Compression;
use flate2::write::DeflateEncoder;
use zipcrack::{KeySet, ZIPCRYPTO_INITIAL_KEYS};

/// Single-entry archive description.
pub struct EntrySpec<'a> {
    pub name: &'a str,
    pub content: &'a [u8],
    /// `None` writes the entry unencrypted
    pub password: Option<&'a str>,
    pub deflate: bool,
    pub data_descriptor: bool,
    pub mod_time: u16,
    pub mod_date: u16,
    /// Central directory size to announce through a ZIP64 extra field
    pub zip64_compressed_size: Option<u64>,
}

impl<'a> EntrySpec<'a> {
    pub fn encrypted(name: &'a str, content: &'a [u8], password: &'a str) -> Self {
        Self {
            name,
            content,
            password: Some(password),
            deflate: false,
            data_descriptor: false,
            mod_time: 0x6B2D,
            mod_date: 0x5A41,
            zip64_compressed_size: None,
        }
    }

    pub fn deflated(mut self) -> Self {
        self.deflate = true;
        self
    }

    pub fn with_data_descriptor(mut self) -> Self {
        self.data_descriptor = true;
        self
    }

    pub fn with_zip64_compressed_size(mut self, size: u64) -> Self {
        self.zip64_compressed_size = Some(size);
        self
    }

    pub fn unencrypted(mut self) -> Self {
        self.password = None;
        self
    }
}

/// Build an archive holding the given entries, in order.
pub fn build_zip(entries: &[EntrySpec]) -> Vec<u8> {
    let mut out = Vec::new();
    let mut central = Vec::new();

    for spec in entries {
        let crc = crc32fast::hash(spec.content);
        let method: u16 = if spec.deflate { 8 } else { 0 };
        let mut data = if spec.deflate {
            let mut enc = DeflateEncoder::new(Vec::new(), Compression::default());
            enc.write_all(spec.content).unwrap();
            enc.finish().unwrap()
        } else {
            spec.content.to_vec()
        };

        let mut flags: u16 = 0;
        if let Some(password) = spec.password {
            flags |= 1;
            let check = if spec.data_descriptor {
                (spec.mod_time >> 8) as u8
            } else {
                (crc >> 24) as u8
            };
            let mut plain = Vec::with_capacity(12 + data.len());
            // Any 11 bytes will do; keep them deterministic
            plain.extend((0..11u8).map(|i| i.wrapping_mul(37).wrapping_add(spec.name.len() as u8)));
            plain.push(check);
            plain.extend_from_slice(&data);
            KeySet::from_password(password.as_bytes(), ZIPCRYPTO_INITIAL_KEYS)
                .encrypt_in_place(&mut plain);
            data = plain;
        }
        if spec.data_descriptor {
            flags |= 1 << 3;
        }

        let lfh_offset = out.len() as u32;
        let (lfh_crc, lfh_csize, lfh_usize) = if spec.data_descriptor {
            (0, 0, 0)
        } else {
            (crc, data.len() as u32, spec.content.len() as u32)
        };

        out.extend_from_slice(b"PK\x03\x04");
        out.write_u16::<LittleEndian>(20).unwrap();
        out.write_u16::<LittleEndian>(flags).unwrap();
        out.write_u16::<LittleEndian>(method).unwrap();
        out.write_u16::<LittleEndian>(spec.mod_time).unwrap();
        out.write_u16::<LittleEndian>(spec.mod_date).unwrap();
        out.write_u32::<LittleEndian>(lfh_crc).unwrap();
        out.write_u32::<LittleEndian>(lfh_csize).unwrap();
        out.write_u32::<LittleEndian>(lfh_usize).unwrap();
        out.write_u16::<LittleEndian>(spec.name.len() as u16).unwrap();
        // A local extra field the central directory does not repeat
        out.write_u16::<LittleEndian>(8).unwrap();
        out.extend_from_slice(spec.name.as_bytes());
        out.write_u16::<LittleEndian>(0xCAFE).unwrap();
        out.write_u16::<LittleEndian>(4).unwrap();
        out.extend_from_slice(&[1, 2, 3, 4]);
        out.extend_from_slice(&data);

        if spec.data_descriptor {
            out.extend_from_slice(b"PK\x07\x08");
            out.write_u32::<LittleEndian>(crc).unwrap();
            out.write_u32::<LittleEndian>(data.len() as u32).unwrap();
            out.write_u32::<LittleEndian>(spec.content.len() as u32).unwrap();
        }

        central.extend_from_slice(b"PK\x01\x02");
        central.write_u16::<LittleEndian>(20).unwrap();
        central.write_u16::<LittleEndian>(20).unwrap();
        central.write_u16::<LittleEndian>(flags).unwrap();
        central.write_u16::<LittleEndian>(method).unwrap();
        central.write_u16::<LittleEndian>(spec.mod_time).unwrap();
        central.write_u16::<LittleEndian>(spec.mod_date).unwrap();
        central.write_u32::<LittleEndian>(crc).unwrap();
        let mut central_extra = Vec::new();
        match spec.zip64_compressed_size {
            Some(size) => {
                central.write_u32::<LittleEndian>(0xFFFF_FFFF).unwrap();
                central_extra.write_u16::<LittleEndian>(0x0001).unwrap();
                central_extra.write_u16::<LittleEndian>(8).unwrap();
                central_extra.write_u64::<LittleEndian>(size).unwrap();
            }
            None => central.write_u32::<LittleEndian>(data.len() as u32).unwrap(),
        }
        central.write_u32::<LittleEndian>(spec.content.len() as u32).unwrap();
        central.write_u16::<LittleEndian>(spec.name.len() as u16).unwrap();
        central.write_u16::<LittleEndian>(central_extra.len() as u16).unwrap();
        central.write_u16::<LittleEndian>(0).unwrap();
        central.write_u16::<LittleEndian>(0).unwrap();
        central.write_u16::<LittleEndian>(0).unwrap();
        central.write_u32::<LittleEndian>(0).unwrap();
        central.write_u32::<LittleEndian>(lfh_offset).unwrap();
        central.extend_from_slice(spec.name.as_bytes());
        central.extend_from_slice(&central_extra);
    }

    let cd_offset = out.len() as u32;
    out.extend_from_slice(&central);

    out.extend_from_slice(b"PK\x05\x06");
    out.write_u16::<LittleEndian>(0).unwrap();
    out.write_u16::<LittleEndian>(0).unwrap();
    out.write_u16::<LittleEndian>(entries.len() as u16).unwrap();
    out.write_u16::<LittleEndian>(entries.len() as u16).unwrap();
    out.write_u32::<LittleEndian>(central.len() as u32).unwrap();
    out.write_u32::<LittleEndian>(cd_offset).unwrap();
    out.write_u16::<LittleEndian>(0).unwrap();

    out
}

/// Write `entries` as `name` under `dir` and return the path.
pub fn write_zip(dir: &Path, name: &str, entries: &[EntrySpec]) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, build_zip(entries)).expect("write archive");
    path
}

pub const SECRET: &[u8] = b"The emergency storage key is 7741-ALPHA. \
Keep this file encrypted and do not copy it to removable media.\n";
