//! Single-byte CRC-32 step used by the ZipCrypto key schedule.
//!
//! The key schedule runs the raw table step without the usual pre/post
//! inversion, so this cannot be replaced by a streaming CRC hasher.

/// Reflected CRC-32 polynomial (IEEE 802.3)
const CRC_POLY: u32 = 0xEDB88320;

/// Lookup table built at compile time from [`CRC_POLY`].
pub const CRC_TABLE: [u32; 256] = build_table();

const fn build_table() -> [u32; 256] {
    let mut table = [0u32; 256];
    let mut b = 0;
    while b < 256 {
        let mut crc = b as u32;
        let mut bit = 0;
        while bit < 8 {
            crc = if crc & 1 != 0 {
                (crc >> 1) ^ CRC_POLY
            } else {
                crc >> 1
            };
            bit += 1;
        }
        table[b] = crc;
        b += 1;
    }
    table
}

/// Advance `crc` by one byte.
#[inline(always)]
pub fn crc32(crc: u32, b: u8) -> u32 {
    (crc >> 8) ^ CRC_TABLE[((crc as u8) ^ b) as usize]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_matches_known_entries() {
        assert_eq!(CRC_TABLE[0], 0x00000000);
        assert_eq!(CRC_TABLE[1], 0x77073096);
        assert_eq!(CRC_TABLE[255], 0x2D02EF8D);
    }

    #[test]
    fn byte_step_agrees_with_crc32fast() {
        let data = b"The quick brown fox jumps over the lazy dog";
        let crc = !data.iter().fold(0xFFFFFFFF, |crc, &b| crc32(crc, b));
        assert_eq!(crc, crc32fast::hash(data));
        assert_eq!(crc, 0x414FA339);
    }
}
