use std::fmt;

/// Lowercase letters by English frequency, then digits.
pub const FREQUENCY_ALPHABET: &str = "etaoinshrdlcumwfgpybvkxqjz0123456789";

/// Ordered set of characters candidates are drawn from.
///
/// Order matters twice: every character is also a task prefix, and suffixes
/// are enumerated lexicographically by position in the alphabet.
#[derive(Clone, PartialEq, Eq)]
pub struct Alphabet {
    symbols: Vec<char>,
}

impl Alphabet {
    /// Build from `symbols`, keeping the first occurrence of duplicates.
    pub fn new(symbols: &str) -> Self {
        let mut unique = Vec::with_capacity(symbols.len());
        for c in symbols.chars() {
            if !unique.contains(&c) {
                unique.push(c);
            }
        }
        Self { symbols: unique }
    }

    pub fn symbols(&self) -> &[char] {
        &self.symbols
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    /// Number of suffixes of `length`, if it fits in a `u64`.
    pub fn suffix_count(&self, length: usize) -> Option<u64> {
        let length = u32::try_from(length).ok()?;
        (self.symbols.len() as u64).checked_pow(length)
    }

    /// Lazily enumerate `prefix` followed by every suffix of `suffix_len`.
    pub fn candidates(&self, prefix: char, suffix_len: usize) -> Candidates<'_> {
        Candidates {
            symbols: &self.symbols,
            indices: vec![0; suffix_len],
            prefix_len: prefix.len_utf8(),
            buf: String::from(prefix),
            state: if self.symbols.is_empty() && suffix_len > 0 {
                State::Done
            } else {
                State::Fresh
            },
        }
    }
}

impl Default for Alphabet {
    fn default() -> Self {
        Self::new(FREQUENCY_ALPHABET)
    }
}

impl fmt::Debug for Alphabet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s: String = self.symbols.iter().collect();
        f.debug_tuple("Alphabet").field(&s).finish()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Fresh,
    Running,
    Done,
}

/// Fixed-length candidate enumerator.
///
/// Works as an odometer over alphabet indices, rightmost position fastest.
/// [`next_candidate`](Self::next_candidate) reuses one buffer so the hot
/// loop does not allocate; the [`Iterator`] impl clones it.
pub struct Candidates<'a> {
    symbols: &'a [char],
    indices: Vec<usize>,
    prefix_len: usize,
    buf: String,
    state: State,
}

impl Candidates<'_> {
    /// Advance and borrow the next candidate.
    pub fn next_candidate(&mut self) -> Option<&str> {
        match self.state {
            State::Done => return None,
            State::Fresh => self.state = State::Running,
            State::Running => {
                if !self.step() {
                    self.state = State::Done;
                    return None;
                }
            }
        }

        self.buf.truncate(self.prefix_len);
        for &i in &self.indices {
            self.buf.push(self.symbols[i]);
        }
        Some(&self.buf)
    }

    fn step(&mut self) -> bool {
        for pos in (0..self.indices.len()).rev() {
            self.indices[pos] += 1;
            if self.indices[pos] < self.symbols.len() {
                return true;
            }
            self.indices[pos] = 0;
        }
        false
    }
}

impl Iterator for Candidates<'_> {
    type Item = String;

    fn next(&mut self) -> Option<String> {
        self.next_candidate().map(str::to_owned)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn duplicates_are_dropped_in_order() {
        let alphabet = Alphabet::new("abacb1");
        assert_eq!(alphabet.symbols(), &['a', 'b', 'c', '1']);
    }

    #[test]
    fn default_is_frequency_ordered() {
        let alphabet = Alphabet::default();
        assert_eq!(alphabet.len(), 36);
        assert_eq!(alphabet.symbols()[0], 'e');
        assert_eq!(alphabet.symbols()[35], '9');
    }

    #[test]
    fn enumerates_lexicographically_by_alphabet_order() {
        let alphabet = Alphabet::new("ba");
        let all: Vec<String> = alphabet.candidates('x', 2).collect();
        assert_eq!(all, vec!["xbb", "xba", "xab", "xaa"]);
    }

    #[test]
    fn count_matches_suffix_count() {
        let alphabet = Alphabet::new("abc12");
        assert_eq!(alphabet.candidates('a', 4).count() as u64, alphabet.suffix_count(4).unwrap());
        assert_eq!(alphabet.suffix_count(4), Some(625));
    }

    #[test]
    fn zero_suffix_yields_prefix_only() {
        let alphabet = Alphabet::new("ab");
        let all: Vec<String> = alphabet.candidates('z', 0).collect();
        assert_eq!(all, vec!["z"]);
    }

    #[test]
    fn empty_alphabet_yields_nothing() {
        let alphabet = Alphabet::new("");
        assert!(alphabet.is_empty());
        assert_eq!(alphabet.candidates('a', 3).count(), 0);
    }

    #[test]
    fn multibyte_symbols_are_handled() {
        let alphabet = Alphabet::new("é1");
        let all: Vec<String> = alphabet.candidates('ü', 1).collect();
        assert_eq!(all, vec!["üé", "ü1"]);
    }

    #[test]
    fn huge_spaces_report_overflow() {
        assert_eq!(Alphabet::default().suffix_count(64), None);
    }
}
