//! BIP-39 English wordlist
//!
//! The 2048-word table is the one shipped by the `bip39` crate. It is exposed
//! read-only: index -> word through the ordered slice, word -> index through a
//! map built once per process.
//!
//! The checksum math only works if the table is in canonical order, so
//! [`verify_integrity`] compares a SHA-256 of the ordered list against the
//! hash of the official `english.txt` before the table is trusted.

use std::collections::HashMap;
use std::sync::OnceLock;

use bip39::Language;
use bitcoin::hashes::{sha256, Hash, HashEngine};
use thiserror::Error;

/// Number of words in a BIP-39 wordlist (one 11-bit group each)
pub const WORDLIST_LEN: usize = 2048;

/// SHA-256 of the official BIP-39 `english.txt` (words joined by `\n`,
/// trailing newline included)
pub const ENGLISH_SHA256: &str =
    "2f5eed53a4727b4bf8880d8f3f199efc90e58503646d9ff8eff3a2ed3b24dbda";

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum WordlistError {
    #[error("Wordlist integrity check failed: expected sha256 {expected}, got {actual}")]
    IntegrityMismatch { expected: String, actual: String },
}

static INDEX: OnceLock<HashMap<&'static str, u16>> = OnceLock::new();
static INTEGRITY: OnceLock<Result<(), WordlistError>> = OnceLock::new();

/// The ordered English wordlist
pub fn words() -> &'static [&'static str; WORDLIST_LEN] {
    Language::English.word_list()
}

/// Word at `index`, if `index < 2048`
pub fn word(index: u16) -> Option<&'static str> {
    words().get(index as usize).copied()
}

/// Dictionary index of `word` (exact, case-sensitive match)
pub fn index_of(word: &str) -> Option<u16> {
    INDEX
        .get_or_init(|| {
            words()
                .iter()
                .enumerate()
                .map(|(i, w)| (*w, i as u16))
                .collect()
        })
        .get(word)
        .copied()
}

/// SHA-256 over an ordered wordlist in `english.txt` layout.
pub fn wordlist_digest(list: &[&str]) -> sha256::Hash {
    let mut engine = sha256::Hash::engine();
    for w in list {
        engine.input(w.as_bytes());
        engine.input(b"\n");
    }
    sha256::Hash::from_engine(engine)
}

/// Check that the table is the canonical, canonically ordered English list.
///
/// The hash is computed once; later calls return the cached verdict.
pub fn verify_integrity() -> Result<(), WordlistError> {
    INTEGRITY
        .get_or_init(|| verify_list(words()))
        .clone()
}

fn verify_list(list: &[&str]) -> Result<(), WordlistError> {
    let actual = wordlist_digest(list).to_string();
    if actual != ENGLISH_SHA256 {
        log::error!("BIP-39 wordlist does not match the canonical english.txt");
        return Err(WordlistError::IntegrityMismatch {
            expected: ENGLISH_SHA256.to_string(),
            actual,
        });
    }
    Ok(())
}
