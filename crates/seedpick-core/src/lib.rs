//! seedpick Core
//!
//! Recovery and derivation of Bitcoin key material from 24-word BIP-39
//! mnemonics.
//!
//! # Derivation
//!
//! From a mnemonic + passphrase:
//! - 64-byte seed via PBKDF2-HMAC-SHA512 (BIP-39)
//! - master key, then the account at m/84'/0'/0' (BIP-32/BIP-84)
//! - ten receive addresses at m/84'/0'/0'/0/0..9, each as
//!   (bech32 address, compressed public key hex, WIF private key)
//!
//! # Recovery
//!
//! Given the first 23 words, every dictionary word is tried as the 24th and
//! kept when the BIP-39 checksum holds.

pub mod checksum;
pub mod encode;
pub mod keys;
pub mod recovery;
pub mod seed;
pub mod wallet;
pub mod wordlist;

pub use checksum::{check, split_words, validate, MnemonicError};
pub use encode::{decode_wif, encode_segwit_address, encode_wif, EncodingError};
pub use keys::{derive_child, derive_master, ChildNumber, DerivationPath, ExtendedKey, KeyError};
pub use recovery::{complete_mnemonics, find_last_words, find_last_words_parallel, RecoveryError};
pub use seed::{derive_seed, parse_mnemonic, Mnemonic, Seed, SeedError};
pub use wallet::{
    account_zpub, derive_address_outcomes, derive_wallet, generate_native_segwit_addresses,
    AddressRecord, LeafOutcome, WalletError, WalletReport,
};
