//! BIP-84 native segwit address derivation
//!
//! mnemonic + passphrase -> seed -> master -> m/84'/0'/0'/0 -> leaves 0..9
//!
//! A bad mnemonic stops everything before any key is derived. A failure on
//! one leaf index only loses that index; the other leaves are still derived.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use zeroize::Zeroizing;

use crate::encode::{encode_segwit_address, encode_wif, EncodingError};
use crate::keys::{derive_master, ChildNumber, DerivationPath, ExtendedKey, KeyError, ZPUB};
use crate::seed::{parse_mnemonic, Seed, SeedError};
use crate::wordlist::{self, WordlistError};

/// BIP-84 purpose
pub const PURPOSE: u32 = 84;
/// Bitcoin mainnet coin type
pub const COIN_TYPE: u32 = 0;
pub const ACCOUNT: u32 = 0;
/// Receive (external) chain
pub const EXTERNAL_CHAIN: u32 = 0;
/// Leaves derived per run
pub const ADDRESS_COUNT: u32 = 10;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum WalletError {
    #[error(transparent)]
    Mnemonic(#[from] SeedError),
    #[error(transparent)]
    Wordlist(#[from] WordlistError),
    #[error("Master key derivation failed: {0}")]
    Master(#[source] KeyError),
    #[error("Derivation of {path} failed: {source}")]
    Derivation { path: String, source: KeyError },
    #[error("Encoding for {path} failed: {source}")]
    Encoding { path: String, source: EncodingError },
}

/// One derived receive address
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddressRecord {
    pub index: u32,
    pub path: String,
    pub address: String,
    pub public_key_hex: String,
    pub wif: String,
}

/// Result of deriving a single leaf
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LeafOutcome {
    pub index: u32,
    pub result: Result<AddressRecord, WalletError>,
}

/// Everything one derivation run produces
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WalletReport {
    /// Account-level extended public key (zpub) for watch-only import
    pub account_zpub: String,
    pub outcomes: Vec<LeafOutcome>,
}

impl WalletReport {
    /// Successful records in index order; failed indices are logged and dropped.
    pub fn into_records(self) -> Vec<AddressRecord> {
        self.outcomes
            .into_iter()
            .filter_map(|outcome| match outcome.result {
                Ok(record) => Some(record),
                Err(e) => {
                    log::warn!("Skipping address index {}: {}", outcome.index, e);
                    None
                }
            })
            .collect()
    }

    pub fn failed_indices(&self) -> Vec<u32> {
        self.outcomes
            .iter()
            .filter(|o| o.result.is_err())
            .map(|o| o.index)
            .collect()
    }
}

/// m/84'/0'/0'
pub fn account_path() -> DerivationPath {
    DerivationPath::from(vec![
        ChildNumber::Hardened(PURPOSE),
        ChildNumber::Hardened(COIN_TYPE),
        ChildNumber::Hardened(ACCOUNT),
    ])
}

/// m/84'/0'/0'/0
pub fn receive_chain_path() -> DerivationPath {
    account_path().child(ChildNumber::Normal(EXTERNAL_CHAIN))
}

/// Full path of every leaf, m/84'/0'/0'/0/0 .. m/84'/0'/0'/0/9
pub fn default_leaf_paths() -> Vec<DerivationPath> {
    let chain = receive_chain_path();
    (0..ADDRESS_COUNT)
        .map(|i| chain.child(ChildNumber::Normal(i)))
        .collect()
}

/// Validate the mnemonic, then derive the account and all leaves.
pub fn derive_wallet(mnemonic: &str, passphrase: &str) -> Result<WalletReport, WalletError> {
    wordlist::verify_integrity()?;
    let mnemonic = parse_mnemonic(mnemonic)?;
    let seed = mnemonic.to_seed(passphrase);
    derive_wallet_from_seed(&seed)
}

/// Derive the account and all leaves from an already computed seed.
pub fn derive_wallet_from_seed(seed: &Seed) -> Result<WalletReport, WalletError> {
    let master = derive_master(seed.as_bytes()).map_err(WalletError::Master)?;

    let account_path = account_path();
    let account = master
        .derive_path(&account_path)
        .map_err(|source| WalletError::Derivation {
            path: account_path.to_string(),
            source,
        })?;
    log::debug!("Derived account {}", account_path);

    let chain_path = receive_chain_path();
    let chain = account
        .derive_child(ChildNumber::Normal(EXTERNAL_CHAIN))
        .map_err(|source| WalletError::Derivation {
            path: chain_path.to_string(),
            source,
        })?;

    // Leaves are siblings; none depends on another's output.
    let outcomes = default_leaf_paths()
        .iter()
        .zip(0..)
        .map(|(leaf_path, index)| LeafOutcome {
            index,
            result: derive_leaf(&chain, &chain_path, leaf_path, index),
        })
        .collect();

    Ok(WalletReport {
        account_zpub: account.to_extended_public(ZPUB),
        outcomes,
    })
}

/// Derive the leaf at `leaf_path`, which must lie under `chain_path`.
fn derive_leaf(
    chain: &ExtendedKey,
    chain_path: &DerivationPath,
    leaf_path: &DerivationPath,
    index: u32,
) -> Result<AddressRecord, WalletError> {
    let path = leaf_path.to_string();
    let derivation_error = |source| WalletError::Derivation {
        path: path.clone(),
        source,
    };

    let steps = leaf_path
        .as_slice()
        .strip_prefix(chain_path.as_slice())
        .ok_or_else(|| {
            derivation_error(KeyError::InvalidPath(format!(
                "{} is not below {}",
                leaf_path, chain_path
            )))
        })?;
    let key = chain
        .derive_path(&DerivationPath::from(steps.to_vec()))
        .map_err(derivation_error)?;
    record_for_key(index, path, &key)
}

/// Encode one derived key as an [`AddressRecord`].
pub fn record_for_key(
    index: u32,
    path: String,
    key: &ExtendedKey,
) -> Result<AddressRecord, WalletError> {
    let secret = key.private_key.as_ref().ok_or_else(|| WalletError::Derivation {
        path: path.clone(),
        source: KeyError::MissingPrivateKey,
    })?;

    let pubkey = key.public_key.serialize();
    let address = encode_segwit_address(&pubkey).map_err(|source| WalletError::Encoding {
        path: path.clone(),
        source,
    })?;
    let wif = encode_wif(&Zeroizing::new(secret.secret_bytes())[..], true).map_err(|source| {
        WalletError::Encoding {
            path: path.clone(),
            source,
        }
    })?;

    Ok(AddressRecord {
        index,
        path,
        address,
        public_key_hex: key.public_key.to_string(),
        wif,
    })
}

/// Per-index outcomes for the ten leaves, without collapsing failures.
pub fn derive_address_outcomes(
    mnemonic: &str,
    passphrase: &str,
) -> Result<Vec<LeafOutcome>, WalletError> {
    Ok(derive_wallet(mnemonic, passphrase)?.outcomes)
}

/// Account-level zpub (m/84'/0'/0') for watch-only import
pub fn account_zpub(mnemonic: &str, passphrase: &str) -> Result<String, WalletError> {
    Ok(derive_wallet(mnemonic, passphrase)?.account_zpub)
}

/// Derive the ten receive addresses for a mnemonic.
///
/// Returns an error only for whole-run failures (invalid mnemonic, wordlist
/// integrity, master/account derivation). Failed leaves are skipped.
pub fn generate_native_segwit_addresses(
    mnemonic: &str,
    passphrase: &str,
) -> Result<Vec<AddressRecord>, WalletError> {
    Ok(derive_wallet(mnemonic, passphrase)?.into_records())
}
