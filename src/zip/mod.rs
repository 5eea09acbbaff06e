//! ZIP archive parsing and ZipCrypto decryption.
//!
//! This module reads the metadata of a ZIP archive and decrypts individual
//! entries protected with traditional PKWARE encryption.
//!
//! ## Architecture
//!
//! - [`structures`]: Data structures representing ZIP format elements (EOCD, file headers, etc.)
//! - [`parser`]: Low-level parsing of ZIP structures from raw bytes
//! - [`extractor`]: Entry lookup, encryption header access and password-aware decryption
//!
//! ## ZIP Format Overview
//!
//! A ZIP file consists of:
//! 1. Local file headers and (possibly encrypted) data for each file
//! 2. Central Directory with metadata for all files
//! 3. End of Central Directory (EOCD) record at the end
//!
//! An encrypted entry's data starts with a 12-byte encryption header. Once
//! decrypted, its last byte equals a verification byte known from the
//! metadata, which is what makes cheap password rejection possible.
//!
//! ## Supported Features
//!
//! - Standard ZIP format (PKZIP APPNOTE 6.3.x compatible)
//! - ZIP64 extensions for files > 4GB
//! - STORED and DEFLATE entries under ZipCrypto
//!
//! ## Limitations
//!
//! - No AES or strong encryption
//! - No multi-disk archive support
//! - No BZIP2, LZMA, or other compression methods

mod extractor;
mod parser;
mod structures;

pub use extractor::{DecryptionOutcome, ZipExtractor};
pub use parser::ZipParser;
pub use structures::*;
