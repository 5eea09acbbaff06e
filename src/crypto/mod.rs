//! Traditional PKWARE ("ZipCrypto") stream cipher.
//!
//! The cipher state is three 32-bit words updated with every plaintext
//! byte. A keystream byte is derived from the third word and XORed with the
//! data, so encryption and decryption differ only in which byte is fed back
//! into the key update.
//!
//! - [`crc32`]: the table-driven CRC-32 byte step used inside the update
//! - [`keys`]: [`KeySet`], the key schedule and byte encrypt/decrypt

mod crc32;
mod keys;

pub use crc32::{CRC_TABLE, crc32};
pub use keys::{ENCRYPTION_HEADER_SIZE, InitialKeys, KEY1_MULT, KeySet, ZIPCRYPTO_INITIAL_KEYS};
