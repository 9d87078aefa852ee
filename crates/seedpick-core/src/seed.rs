//! BIP-39 seed derivation
//!
//! Seed = PBKDF2-HMAC-SHA512(password = mnemonic, salt = "mnemonic" + passphrase,
//! 2048 rounds, 64 bytes). Both strings are NFKD-normalised first and the
//! mnemonic's whitespace is collapsed to single spaces.

use std::fmt;

use pbkdf2::pbkdf2_hmac;
use sha2::Sha512;
use thiserror::Error;
use unicode_normalization::UnicodeNormalization;
use zeroize::{Zeroize, ZeroizeOnDrop, Zeroizing};

use crate::checksum::{self, MnemonicError, ENTROPY_BYTES};

/// Number of PBKDF2 rounds for seed derivation
pub const PBKDF2_ROUNDS: u32 = 2048;

/// Seed length in bytes
pub const SEED_LEN: usize = 64;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SeedError {
    #[error("Invalid mnemonic: {0}")]
    InvalidMnemonic(#[from] MnemonicError),
}

/// 64-byte BIP-39 seed, wiped on drop
#[derive(Clone, PartialEq, Eq, Zeroize, ZeroizeOnDrop)]
pub struct Seed([u8; SEED_LEN]);

impl Seed {
    pub fn as_bytes(&self) -> &[u8; SEED_LEN] {
        &self.0
    }
}

impl fmt::Debug for Seed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Seed([REDACTED])")
    }
}

/// A checksum-validated 24-word mnemonic
#[derive(Clone)]
pub struct Mnemonic {
    words: Zeroizing<Vec<String>>,
    entropy: Zeroizing<[u8; ENTROPY_BYTES]>,
}

impl Mnemonic {
    pub fn words(&self) -> impl Iterator<Item = &str> {
        self.words.iter().map(String::as_str)
    }

    pub fn word_count(&self) -> usize {
        self.words.len()
    }

    pub fn entropy(&self) -> &[u8; ENTROPY_BYTES] {
        &self.entropy
    }

    /// Derive the seed for this mnemonic (empty passphrase allowed)
    pub fn to_seed(&self, passphrase: &str) -> Seed {
        let phrase = Zeroizing::new(self.words.join(" "));
        derive_seed(&phrase, passphrase)
    }
}

impl fmt::Display for Mnemonic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, w) in self.words.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            f.write_str(w)?;
        }
        Ok(())
    }
}

impl fmt::Debug for Mnemonic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Mnemonic({} words, [REDACTED])", self.words.len())
    }
}

/// Parse and checksum-validate a 24-word mnemonic.
pub fn parse_mnemonic(text: &str) -> Result<Mnemonic, SeedError> {
    let normalized = Zeroizing::new(text.nfkd().collect::<String>());
    let words = checksum::split_words(&normalized);
    let entropy = checksum::check(&words)?;
    Ok(Mnemonic {
        words: Zeroizing::new(words.into_iter().map(str::to_string).collect()),
        entropy,
    })
}

/// Derive seed bytes from a mnemonic string and passphrase.
///
/// No validation happens here; callers that need a valid mnemonic go
/// through [`parse_mnemonic`] first.
pub fn derive_seed(mnemonic: &str, passphrase: &str) -> Seed {
    let normalized = Zeroizing::new(mnemonic.nfkd().collect::<String>());
    let password = Zeroizing::new(checksum::split_words(&normalized).join(" "));
    let salt = Zeroizing::new(format!("mnemonic{}", passphrase.nfkd().collect::<String>()));

    let mut seed = Seed([0u8; SEED_LEN]);
    pbkdf2_hmac::<Sha512>(
        password.as_bytes(),
        salt.as_bytes(),
        PBKDF2_ROUNDS,
        &mut seed.0,
    );
    seed
}
