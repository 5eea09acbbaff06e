use std::path::PathBuf;

use clap::Parser;

use crate::search::{Alphabet, FREQUENCY_ALPHABET, SearchConfig};

#[derive(Parser, Debug)]
#[command(name = "zipcrack")]
#[command(version)]
#[command(about = "Recover the password of a ZipCrypto-encrypted ZIP entry", long_about = None)]
#[command(after_help = "Examples:\n  \
  zipcrack secret.zip                      try every 6-char password over the default alphabet\n  \
  zipcrack secret.zip -a abc123 -l 4       5-char passwords over a custom alphabet\n  \
  zipcrack secret.zip -e docs/plan.txt -j 4   attack one entry with 4 workers")]
pub struct Cli {
    /// Encrypted ZIP archive
    #[arg(value_name = "FILE")]
    pub file: PathBuf,

    /// Entry to attack (default: first file in the archive)
    #[arg(short = 'e', long, value_name = "NAME")]
    pub entry: Option<String>,

    /// Where to write the recovered password
    #[arg(short = 'o', long, value_name = "PATH", default_value = "password.txt")]
    pub output: PathBuf,

    /// Candidate characters, most likely first; each one is also a task prefix
    #[arg(short = 'a', long, default_value = FREQUENCY_ALPHABET)]
    pub alphabet: String,

    /// Characters appended to each prefix
    #[arg(short = 'l', long, value_name = "N", default_value_t = 5)]
    pub suffix_length: usize,

    /// Number of workers, 0 defaults to the number of CPU cores
    #[arg(short = 'j', long, value_name = "N", default_value_t = 0)]
    pub workers: usize,

    /// Attempts between progress lines of one worker, 0 disables them
    #[arg(long, value_name = "N", default_value_t = 1_000_000)]
    pub progress_every: u64,

    /// Quiet mode, only warnings and the result
    #[arg(short = 'q')]
    pub quiet: bool,
}

impl Cli {
    /// Search settings implied by the arguments.
    pub fn search_config(&self) -> SearchConfig {
        let mut config = SearchConfig::default()
            .with_alphabet(Alphabet::new(&self.alphabet))
            .with_suffix_len(self.suffix_length)
            .with_progress_every(self.progress_every)
            .with_output(self.output.clone());
        if self.workers > 0 {
            config = config.with_workers(self.workers);
        }
        config
    }

    /// Default log filter when `RUST_LOG` is unset.
    pub fn log_level(&self) -> &'static str {
        if self.quiet { "warn" } else { "info" }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let cli = Cli::parse_from(["zipcrack", "secret.zip"]);
        assert_eq!(cli.file, PathBuf::from("secret.zip"));
        assert_eq!(cli.output, PathBuf::from("password.txt"));
        assert_eq!(cli.entry, None);

        let config = cli.search_config();
        assert_eq!(config.alphabet, Alphabet::default());
        assert_eq!(config.suffix_len, 5);
        assert!(config.workers >= 1);
        assert_eq!(config.output, Some(PathBuf::from("password.txt")));
        assert_eq!(cli.log_level(), "info");
    }

    #[test]
    fn overrides() {
        let cli = Cli::parse_from([
            "zipcrack", "a.zip", "-e", "inner.txt", "-a", "xyz", "-l", "3", "-j", "2", "-q",
        ]);
        let config = cli.search_config();
        assert_eq!(cli.entry.as_deref(), Some("inner.txt"));
        assert_eq!(config.alphabet.symbols(), &['x', 'y', 'z']);
        assert_eq!(config.suffix_len, 3);
        assert_eq!(config.workers, 2);
        assert_eq!(cli.log_level(), "warn");
    }
}
