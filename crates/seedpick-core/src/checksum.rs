//! BIP-39 checksum engine
//!
//! A 24-word mnemonic packs 24 x 11 = 264 bits: 256 bits of entropy followed
//! by an 8-bit checksum, which must equal the first byte of SHA-256(entropy).
//!
//! ```text
//! word index:  [  11 bits  ][  11 bits  ] ... [  11 bits  ]
//! bitstream:   [ entropy (256 bits)                 ][ cs (8) ]
//! ```

use bitcoin::hashes::{sha256, Hash};
use thiserror::Error;
use zeroize::Zeroizing;

use crate::wordlist;

/// The only mnemonic length this crate accepts
pub const WORD_COUNT: usize = 24;

/// Bits encoded by one word
pub const BITS_PER_WORD: usize = 11;

/// Entropy carried by a 24-word mnemonic
pub const ENTROPY_BYTES: usize = 32;

/// Checksum length: entropy bits / 32
pub const CHECKSUM_BITS: usize = ENTROPY_BYTES * 8 / 32;

const PACKED_BYTES: usize = (WORD_COUNT * BITS_PER_WORD).div_ceil(8);

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MnemonicError {
    #[error("Invalid word count: expected {expected}, found {found}")]
    WordCount { expected: usize, found: usize },
    #[error("Word {position} ('{word}') is not in the BIP-39 wordlist")]
    UnknownWord { position: usize, word: String },
    #[error("Checksum mismatch")]
    Checksum,
}

/// Split user text into words on any whitespace.
pub fn split_words(text: &str) -> Vec<&str> {
    text.split_whitespace().collect()
}

/// Validate a 24-word mnemonic against the BIP-39 checksum.
///
/// Unknown words and wrong word counts are simply invalid.
pub fn validate<S: AsRef<str>>(words: &[S]) -> bool {
    check(words).is_ok()
}

/// Validate a 24-word mnemonic and return its entropy.
pub fn check<S: AsRef<str>>(
    words: &[S],
) -> Result<Zeroizing<[u8; ENTROPY_BYTES]>, MnemonicError> {
    if words.len() != WORD_COUNT {
        return Err(MnemonicError::WordCount {
            expected: WORD_COUNT,
            found: words.len(),
        });
    }

    let mut packed = Zeroizing::new([0u8; PACKED_BYTES]);
    for (position, w) in words.iter().enumerate() {
        let w = w.as_ref();
        let index = wordlist::index_of(w).ok_or_else(|| MnemonicError::UnknownWord {
            position: position + 1,
            word: w.to_string(),
        })?;
        pack_index(&mut packed[..], position * BITS_PER_WORD, index);
    }

    let mut entropy = Zeroizing::new([0u8; ENTROPY_BYTES]);
    entropy.copy_from_slice(&packed[..ENTROPY_BYTES]);

    let digest = sha256::Hash::hash(&entropy[..]);
    let expected = digest.as_byte_array()[0] >> (8 - CHECKSUM_BITS);
    let found = packed[ENTROPY_BYTES] >> (8 - CHECKSUM_BITS);
    if expected != found {
        return Err(MnemonicError::Checksum);
    }

    Ok(entropy)
}

/// Write the low 11 bits of `index` MSB-first starting at bit `offset`.
fn pack_index(buf: &mut [u8], offset: usize, index: u16) {
    for bit in 0..BITS_PER_WORD {
        if index & (1 << (BITS_PER_WORD - 1 - bit)) != 0 {
            let pos = offset + bit;
            buf[pos / 8] |= 0x80 >> (pos % 8);
        }
    }
}
