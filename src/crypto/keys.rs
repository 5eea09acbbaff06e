use super::crc32::crc32;

/// Multiplier of the `k1` linear-congruential step.
pub const KEY1_MULT: u32 = 134775813;

/// Size of the encryption header prepended to every ZipCrypto entry.
pub const ENCRYPTION_HEADER_SIZE: usize = 12;

/// Starting values of the three key words before any password byte is fed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InitialKeys {
    pub k0: u32,
    pub k1: u32,
    pub k2: u32,
}

/// The constants defined by the ZIP application note.
pub const ZIPCRYPTO_INITIAL_KEYS: InitialKeys = InitialKeys {
    k0: 0x12345678,
    k1: 0x23456789,
    k2: 0x34567890,
};

/// Internal state of the ZipCrypto stream cipher.
///
/// A `KeySet` is cheap to copy and is never shared: every password attempt
/// derives its own from [`KeySet::from_password`] and drops it afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeySet {
    k0: u32,
    k1: u32,
    k2: u32,
}

impl KeySet {
    pub fn new(initial: InitialKeys) -> Self {
        Self {
            k0: initial.k0,
            k1: initial.k1,
            k2: initial.k2,
        }
    }

    /// Seed from `initial` and feed every password byte through [`update`](Self::update).
    pub fn from_password(password: &[u8], initial: InitialKeys) -> Self {
        let mut keys = Self::new(initial);
        for &b in password {
            keys.update(b);
        }
        keys
    }

    /// Update the state with a plaintext byte.
    ///
    /// `k2` consumes the high byte of `k1` after its transform; the order of
    /// the three steps must not change.
    #[inline(always)]
    pub fn update(&mut self, p: u8) {
        self.k0 = crc32(self.k0, p);
        self.k1 = self
            .k1
            .wrapping_add(self.k0 & 0xff)
            .wrapping_mul(KEY1_MULT)
            .wrapping_add(1);
        self.k2 = crc32(self.k2, (self.k1 >> 24) as u8);
    }

    /// Keystream byte for the current state. Only `k2[0,16)` is used.
    #[inline(always)]
    pub fn keystream_byte(&self) -> u8 {
        let temp = (self.k2 & 0xffff) | 2;
        (temp.wrapping_mul(temp ^ 1) >> 8) as u8
    }

    /// Decrypt one byte and advance the state with the recovered plaintext.
    #[inline(always)]
    pub fn decrypt(&mut self, c: u8) -> u8 {
        let p = c ^ self.keystream_byte();
        self.update(p);
        p
    }

    /// Encrypt one byte and advance the state with the plaintext.
    #[inline(always)]
    pub fn encrypt(&mut self, p: u8) -> u8 {
        let c = p ^ self.keystream_byte();
        self.update(p);
        c
    }

    pub fn decrypt_in_place(&mut self, buf: &mut [u8]) {
        for b in buf.iter_mut() {
            *b = self.decrypt(*b);
        }
    }

    pub fn encrypt_in_place(&mut self, buf: &mut [u8]) {
        for b in buf.iter_mut() {
            *b = self.encrypt(*b);
        }
    }

    pub fn k0(&self) -> u32 {
        self.k0
    }

    pub fn k1(&self) -> u32 {
        self.k1
    }

    pub fn k2(&self) -> u32 {
        self.k2
    }
}
