//! Private key and address encoders
//!
//! WIF (mainnet):
//!   payload  = 0x80 || key(32) [|| 0x01 if compressed]
//!   checksum = SHA256(SHA256(payload))[..4]
//!   wif      = base58(payload || checksum)
//!
//! P2WPKH address (mainnet):
//!   program = RIPEMD160(SHA256(compressed pubkey))
//!   address = bech32("bc", witness version 0, program)

use bitcoin::base58;
use bitcoin::bech32::{hrp, segwit, Fe32};
use bitcoin::hashes::{hash160, sha256d, Hash};
use bitcoin::secp256k1::PublicKey;
use thiserror::Error;
use zeroize::Zeroizing;

/// Mainnet WIF version byte
pub const WIF_VERSION: u8 = 0x80;

/// Suffix marking a WIF key whose public key is compressed
pub const WIF_COMPRESSED_FLAG: u8 = 0x01;

pub const PRIVATE_KEY_LEN: usize = 32;
pub const COMPRESSED_PUBKEY_LEN: usize = 33;

const CHECKSUM_LEN: usize = 4;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EncodingError {
    #[error("Invalid {what} length: expected {expected}, found {found}")]
    InvalidLength {
        what: &'static str,
        expected: usize,
        found: usize,
    },
    #[error("Not a valid compressed secp256k1 public key")]
    InvalidPublicKey,
    #[error("Base58 decoding failed: {0}")]
    Base58(String),
    #[error("Checksum mismatch")]
    Checksum,
    #[error("Unexpected version byte 0x{0:02x}")]
    Version(u8),
    #[error("Invalid compression flag 0x{0:02x}")]
    CompressionFlag(u8),
    #[error("Bech32 encoding failed: {0}")]
    Bech32(String),
}

/// Encode a raw 32-byte private key as mainnet WIF.
pub fn encode_wif(private_key: &[u8], compressed: bool) -> Result<String, EncodingError> {
    if private_key.len() != PRIVATE_KEY_LEN {
        return Err(EncodingError::InvalidLength {
            what: "private key",
            expected: PRIVATE_KEY_LEN,
            found: private_key.len(),
        });
    }

    let mut payload = Zeroizing::new(Vec::with_capacity(1 + PRIVATE_KEY_LEN + 1 + CHECKSUM_LEN));
    payload.push(WIF_VERSION);
    payload.extend_from_slice(private_key);
    if compressed {
        payload.push(WIF_COMPRESSED_FLAG);
    }

    let checksum = sha256d::Hash::hash(&payload);
    payload.extend_from_slice(&checksum.as_byte_array()[..CHECKSUM_LEN]);

    Ok(base58::encode(&payload))
}

/// Decode a mainnet WIF string into the raw key and its compression flag.
pub fn decode_wif(wif: &str) -> Result<(Zeroizing<[u8; PRIVATE_KEY_LEN]>, bool), EncodingError> {
    let data = Zeroizing::new(
        base58::decode(wif.trim()).map_err(|e| EncodingError::Base58(e.to_string()))?,
    );

    let compressed = match data.len() {
        37 => false,
        38 => true,
        found => {
            return Err(EncodingError::InvalidLength {
                what: "WIF payload",
                expected: 38,
                found,
            })
        }
    };

    let (payload, checksum) = data.split_at(data.len() - CHECKSUM_LEN);
    if sha256d::Hash::hash(payload).as_byte_array()[..CHECKSUM_LEN] != *checksum {
        return Err(EncodingError::Checksum);
    }
    if payload[0] != WIF_VERSION {
        return Err(EncodingError::Version(payload[0]));
    }
    if compressed && payload[33] != WIF_COMPRESSED_FLAG {
        return Err(EncodingError::CompressionFlag(payload[33]));
    }

    let mut key = Zeroizing::new([0u8; PRIVATE_KEY_LEN]);
    key.copy_from_slice(&payload[1..1 + PRIVATE_KEY_LEN]);
    Ok((key, compressed))
}

/// HASH160 of a public key (RIPEMD160 over SHA256)
pub fn pubkey_hash(pubkey: &[u8]) -> [u8; 20] {
    hash160::Hash::hash(pubkey).to_byte_array()
}

/// Encode a 33-byte compressed public key as a mainnet P2WPKH address.
pub fn encode_segwit_address(pubkey: &[u8]) -> Result<String, EncodingError> {
    if pubkey.len() != COMPRESSED_PUBKEY_LEN {
        return Err(EncodingError::InvalidLength {
            what: "compressed public key",
            expected: COMPRESSED_PUBKEY_LEN,
            found: pubkey.len(),
        });
    }
    PublicKey::from_slice(pubkey).map_err(|_| EncodingError::InvalidPublicKey)?;

    encode_witness_v0(&pubkey_hash(pubkey))
}

/// bech32 (BIP-173) encoding of a 20-byte witness v0 program on mainnet.
pub fn encode_witness_v0(program: &[u8]) -> Result<String, EncodingError> {
    if program.len() != 20 {
        return Err(EncodingError::InvalidLength {
            what: "witness program",
            expected: 20,
            found: program.len(),
        });
    }
    segwit::encode(hrp::BC, Fe32::Q, program).map_err(|e| EncodingError::Bech32(e.to_string()))
}
