//! Last-word recovery
//!
//! With 23 words known, the 24th carries 3 bits of entropy and the 8-bit
//! checksum. Exactly one word per 3-bit value satisfies the checksum, so a
//! valid prefix always has 8 candidates. The scan tries all 2048 words.

use rayon::prelude::*;
use thiserror::Error;

use crate::checksum::{self, WORD_COUNT};
use crate::wordlist::{self, WordlistError};

/// Words the caller must supply
pub const PREFIX_LEN: usize = WORD_COUNT - 1;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RecoveryError {
    #[error("Expected {expected} known words, got {found}")]
    PrefixLength { expected: usize, found: usize },
    #[error(transparent)]
    Wordlist(#[from] WordlistError),
}

fn check_prefix<S: AsRef<str>>(prefix: &[S]) -> Result<(), RecoveryError> {
    wordlist::verify_integrity()?;

    if prefix.len() != PREFIX_LEN {
        return Err(RecoveryError::PrefixLength {
            expected: PREFIX_LEN,
            found: prefix.len(),
        });
    }
    // A word outside the dictionary is not an error; no candidate can
    // complete such a prefix, so the scan comes back empty.
    Ok(())
}

fn completes<S: AsRef<str>>(prefix: &[S], candidate: &'static str) -> bool {
    let mut words: Vec<&str> = prefix.iter().map(|w| w.as_ref()).collect();
    words.push(candidate);
    checksum::validate(&words)
}

/// Every dictionary word that completes `prefix` to a valid mnemonic, in
/// dictionary order.
///
/// An empty result means the prefix was mistyped.
pub fn find_last_words<S: AsRef<str>>(
    prefix: &[S],
) -> Result<Vec<&'static str>, RecoveryError> {
    check_prefix(prefix)?;

    let found: Vec<&'static str> = wordlist::words()
        .iter()
        .copied()
        .filter(|candidate| completes(prefix, *candidate))
        .collect();

    log::info!("Checked {} candidates, {} valid", wordlist::WORDLIST_LEN, found.len());
    Ok(found)
}

/// Same as [`find_last_words`], scanning on the rayon pool.
///
/// Results come back in dictionary order regardless of thread scheduling.
pub fn find_last_words_parallel<S: AsRef<str> + Sync>(
    prefix: &[S],
) -> Result<Vec<&'static str>, RecoveryError> {
    check_prefix(prefix)?;

    let found: Vec<&'static str> = wordlist::words()
        .par_iter()
        .copied()
        .filter(|candidate| completes(prefix, *candidate))
        .collect();

    log::info!(
        "Checked {} candidates on {} threads, {} valid",
        wordlist::WORDLIST_LEN,
        rayon::current_num_threads(),
        found.len()
    );
    Ok(found)
}

/// Join `prefix` with each candidate into full mnemonic strings.
pub fn complete_mnemonics<S: AsRef<str>>(prefix: &[S], candidates: &[&str]) -> Vec<String> {
    let base = prefix
        .iter()
        .map(|w| w.as_ref())
        .collect::<Vec<&str>>()
        .join(" ");
    candidates
        .iter()
        .map(|last| format!("{} {}", base, last))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const VOID_COME: &str = "void come effort suffer camp survey warrior heavy shoot primary \
        clutch crush open amazing screen patrol group space point ten exist slush involve unfold";

    fn zero_prefix() -> Vec<&'static str> {
        vec!["abandon"; PREFIX_LEN]
    }

    #[test]
    fn test_zero_entropy_candidates() {
        let found = find_last_words(&zero_prefix()).unwrap();
        assert_eq!(
            found,
            vec!["art", "diesel", "false", "kite", "organ", "ready", "surface", "trouble"]
        );
    }

    #[test]
    fn test_void_come_candidates() {
        let words = checksum::split_words(VOID_COME);
        let found = find_last_words(&words[..PREFIX_LEN]).unwrap();
        assert_eq!(
            found,
            vec!["across", "cancel", "floor", "illegal", "onion", "quit", "story", "unfold"]
        );
    }

    #[test]
    fn test_parallel_matches_sequential() {
        let words = checksum::split_words(VOID_COME);
        let prefix = &words[..PREFIX_LEN];
        assert_eq!(
            find_last_words_parallel(prefix).unwrap(),
            find_last_words(prefix).unwrap()
        );
        assert_eq!(
            find_last_words_parallel(&zero_prefix()).unwrap(),
            find_last_words(&zero_prefix()).unwrap()
        );
    }

    #[test]
    fn test_every_candidate_validates() {
        let prefix = zero_prefix();
        let found = find_last_words(&prefix).unwrap();
        for phrase in complete_mnemonics(&prefix, &found) {
            assert!(checksum::validate(&checksum::split_words(&phrase)));
        }
    }

    #[test]
    fn test_candidates_differ_in_free_bits() {
        // The last word's top 3 bits are entropy; each value appears once.
        let found = find_last_words(&zero_prefix()).unwrap();
        let mut high_bits: Vec<u16> = found
            .iter()
            .map(|w| wordlist::index_of(w).unwrap() >> 8)
            .collect();
        high_bits.sort_unstable();
        assert_eq!(high_bits, (0..8).collect::<Vec<_>>());
    }

    #[test]
    fn test_prefix_length_enforced() {
        let words = checksum::split_words(VOID_COME);
        assert_eq!(
            find_last_words(&words[..22]).unwrap_err(),
            RecoveryError::PrefixLength {
                expected: 23,
                found: 22
            }
        );
        assert_eq!(
            find_last_words(&words).unwrap_err(),
            RecoveryError::PrefixLength {
                expected: 23,
                found: 24
            }
        );
    }

    #[test]
    fn test_mistyped_word_yields_no_candidates() {
        let mut prefix = zero_prefix();
        prefix[5] = "abandn";
        assert!(wordlist::index_of("abandn").is_none());
        assert_eq!(find_last_words(&prefix).unwrap(), Vec::<&str>::new());
        assert_eq!(find_last_words_parallel(&prefix).unwrap(), Vec::<&str>::new());
    }

    #[test]
    fn test_dictionary_word_anywhere_still_scans() {
        // "satoshi" is a real BIP-39 word, so the prefix is well-formed
        let mut prefix = zero_prefix();
        prefix[10] = "satoshi";
        let found = find_last_words_parallel(&prefix).unwrap();
        assert_eq!(found.len(), 8);
        assert_eq!(found, find_last_words(&prefix).unwrap());
    }

    #[test]
    fn test_complete_mnemonics() {
        let prefix = zero_prefix();
        let phrases = complete_mnemonics(&prefix, &["art", "zoo"]);
        assert_eq!(phrases.len(), 2);
        assert!(phrases[0].ends_with("abandon art"));
        assert_eq!(phrases[1].split(' ').count(), 24);
        assert!(complete_mnemonics(&prefix, &[]).is_empty());
    }
}
