//! BIP-32 hierarchical key derivation over secp256k1
//!
//! Master key:
//!   I = HMAC-SHA512(key = "Bitcoin seed", data = seed)
//!   k_master = parse_256(I_L), c_master = I_R
//!
//! Child key (CKDpriv / CKDpub):
//!   hardened: I = HMAC-SHA512(key = c_par, data = 0x00 || ser_256(k_par) || ser_32(i))
//!   normal:   I = HMAC-SHA512(key = c_par, data = ser_P(K_par) || ser_32(i))
//!   k_i = (parse_256(I_L) + k_par) mod n
//!   K_i = parse_256(I_L)*G + K_par
//!   c_i = I_R

use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

use bitcoin::base58;
use bitcoin::hashes::{hash160, sha512, Hash, HashEngine, Hmac, HmacEngine};
use bitcoin::secp256k1::{All, PublicKey, Scalar, Secp256k1, SecretKey};
use thiserror::Error;
use zeroize::{Zeroize, ZeroizeOnDrop, Zeroizing};

/// First hardened child index (2^31)
pub const HARDENED_OFFSET: u32 = 0x8000_0000;

/// HMAC key for master key generation
pub const MASTER_HMAC_KEY: &[u8] = b"Bitcoin seed";

/// Mainnet BIP-32 extended private key version
pub const XPRV: [u8; 4] = [0x04, 0x88, 0xAD, 0xE4];
/// Mainnet BIP-32 extended public key version
pub const XPUB: [u8; 4] = [0x04, 0x88, 0xB2, 0x1E];
/// Mainnet BIP-84 (SLIP-132) extended private key version
pub const ZPRV: [u8; 4] = [0x04, 0xB2, 0x43, 0x0C];
/// Mainnet BIP-84 (SLIP-132) extended public key version
pub const ZPUB: [u8; 4] = [0x04, 0xB2, 0x47, 0x46];

/// Serialized extended key length before the base58 checksum
const EXTENDED_KEY_LEN: usize = 78;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum KeyError {
    #[error("Seed must be 16 to 64 bytes, got {0}")]
    InvalidSeedLength(usize),
    #[error("Master key derivation produced an invalid key")]
    InvalidMasterKey,
    #[error("Child {0} is not a valid key (tweak out of range or point at infinity)")]
    InvalidChildKey(ChildNumber),
    #[error("Hardened child {0} requires a private key")]
    HardenedFromPublic(ChildNumber),
    #[error("Key requires a private key")]
    MissingPrivateKey,
    #[error("Maximum derivation depth exceeded")]
    MaxDepth,
    #[error("Invalid child index: {0}")]
    InvalidIndex(u32),
    #[error("Invalid path: {0}")]
    InvalidPath(String),
}

fn secp() -> &'static Secp256k1<All> {
    static CONTEXT: OnceLock<Secp256k1<All>> = OnceLock::new();
    CONTEXT.get_or_init(Secp256k1::new)
}

// ============================================================================
// Child numbers & paths
// ============================================================================

/// A single step in a derivation path
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChildNumber {
    /// Index in `0..2^31`, derivable from public data
    Normal(u32),
    /// Index in `0..2^31`, serialized as `index + 2^31`
    Hardened(u32),
}

impl ChildNumber {
    pub fn normal(index: u32) -> Result<Self, KeyError> {
        if index >= HARDENED_OFFSET {
            return Err(KeyError::InvalidIndex(index));
        }
        Ok(ChildNumber::Normal(index))
    }

    pub fn hardened(index: u32) -> Result<Self, KeyError> {
        if index >= HARDENED_OFFSET {
            return Err(KeyError::InvalidIndex(index));
        }
        Ok(ChildNumber::Hardened(index))
    }

    /// Interpret a raw BIP-32 index (`>= 2^31` means hardened).
    pub fn from_u32(raw: u32) -> Self {
        if raw >= HARDENED_OFFSET {
            ChildNumber::Hardened(raw - HARDENED_OFFSET)
        } else {
            ChildNumber::Normal(raw)
        }
    }

    /// Raw BIP-32 index as fed to the HMAC
    pub fn to_u32(self) -> u32 {
        match self {
            ChildNumber::Normal(index) => index,
            ChildNumber::Hardened(index) => index | HARDENED_OFFSET,
        }
    }
}

impl fmt::Display for ChildNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChildNumber::Normal(index) => write!(f, "{}", index),
            ChildNumber::Hardened(index) => write!(f, "{}'", index),
        }
    }
}

impl FromStr for ChildNumber {
    type Err = KeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (digits, hardened) = match s.strip_suffix(['\'', 'h', 'H']) {
            Some(digits) => (digits, true),
            None => (s, false),
        };
        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return Err(KeyError::InvalidPath(format!("bad component '{}'", s)));
        }
        let index: u32 = digits
            .parse()
            .map_err(|_| KeyError::InvalidPath(format!("index out of range '{}'", s)))?;
        if hardened {
            ChildNumber::hardened(index)
        } else {
            ChildNumber::normal(index)
        }
    }
}

/// Ordered list of child steps applied from some parent key
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DerivationPath(Vec<ChildNumber>);

impl DerivationPath {
    /// Path extended by one more step
    pub fn child(&self, child: ChildNumber) -> Self {
        let mut steps = self.0.clone();
        steps.push(child);
        Self(steps)
    }

    pub fn as_slice(&self) -> &[ChildNumber] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<Vec<ChildNumber>> for DerivationPath {
    fn from(steps: Vec<ChildNumber>) -> Self {
        Self(steps)
    }
}

impl fmt::Display for DerivationPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("m")?;
        for step in &self.0 {
            write!(f, "/{}", step)?;
        }
        Ok(())
    }
}

impl FromStr for DerivationPath {
    type Err = KeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parts = s.trim().split('/');
        if parts.next() != Some("m") {
            return Err(KeyError::InvalidPath(format!(
                "path must start with 'm': '{}'",
                s
            )));
        }
        parts
            .map(ChildNumber::from_str)
            .collect::<Result<Vec<_>, _>>()
            .map(DerivationPath)
    }
}

// ============================================================================
// Key material
// ============================================================================

/// 32-byte chain code, wiped on drop
#[derive(Clone, PartialEq, Eq, Zeroize, ZeroizeOnDrop)]
pub struct ChainCode(pub [u8; 32]);

impl fmt::Debug for ChainCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ChainCode([REDACTED])")
    }
}

/// First 4 bytes of HASH160 of a compressed public key
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Fingerprint(pub [u8; 4]);

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for b in self.0 {
            write!(f, "{:02x}", b)?;
        }
        Ok(())
    }
}

/// A node of the BIP-32 tree.
///
/// `private_key` is `None` for public-only (neutered) nodes, which can still
/// derive normal children.
#[derive(Clone, PartialEq, Eq)]
pub struct ExtendedKey {
    pub private_key: Option<SecretKey>,
    pub public_key: PublicKey,
    pub chain_code: ChainCode,
    pub depth: u8,
    pub parent_fingerprint: Fingerprint,
    pub child_number: ChildNumber,
}

impl fmt::Debug for ExtendedKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExtendedKey")
            .field("private_key", &self.private_key.map(|_| "[REDACTED]"))
            .field("public_key", &self.public_key)
            .field("depth", &self.depth)
            .field("parent_fingerprint", &self.parent_fingerprint)
            .field("child_number", &self.child_number)
            .finish()
    }
}

/// Derive the master key from a BIP-39 seed.
pub fn derive_master(seed: &[u8]) -> Result<ExtendedKey, KeyError> {
    if !(16..=64).contains(&seed.len()) {
        return Err(KeyError::InvalidSeedLength(seed.len()));
    }

    let mut engine = HmacEngine::<sha512::Hash>::new(MASTER_HMAC_KEY);
    engine.input(seed);
    let i = Zeroizing::new(Hmac::from_engine(engine).to_byte_array());

    let private_key = SecretKey::from_slice(&i[..32]).map_err(|_| KeyError::InvalidMasterKey)?;
    let mut chain_code = ChainCode([0u8; 32]);
    chain_code.0.copy_from_slice(&i[32..]);

    Ok(ExtendedKey {
        private_key: Some(private_key),
        public_key: PublicKey::from_secret_key(secp(), &private_key),
        chain_code,
        depth: 0,
        parent_fingerprint: Fingerprint::default(),
        child_number: ChildNumber::Normal(0),
    })
}

/// Derive the child at raw BIP-32 `index` (`>= 2^31` is hardened).
pub fn derive_child(parent: &ExtendedKey, index: u32) -> Result<ExtendedKey, KeyError> {
    parent.derive_child(ChildNumber::from_u32(index))
}

impl ExtendedKey {
    /// Derive one child. The parent is left untouched.
    pub fn derive_child(&self, child: ChildNumber) -> Result<ExtendedKey, KeyError> {
        let mut engine = HmacEngine::<sha512::Hash>::new(&self.chain_code.0);
        match child {
            ChildNumber::Hardened(_) => {
                let sk = self
                    .private_key
                    .as_ref()
                    .ok_or(KeyError::HardenedFromPublic(child))?;
                engine.input(&[0u8]);
                engine.input(&Zeroizing::new(sk.secret_bytes())[..]);
            }
            ChildNumber::Normal(_) => {
                engine.input(&self.public_key.serialize());
            }
        }
        engine.input(&child.to_u32().to_be_bytes());
        let i = Zeroizing::new(Hmac::from_engine(engine).to_byte_array());

        let mut il = Zeroizing::new([0u8; 32]);
        il.copy_from_slice(&i[..32]);
        let tweak = Scalar::from_be_bytes(*il).map_err(|_| KeyError::InvalidChildKey(child))?;

        let private_key = self
            .private_key
            .map(|sk| sk.add_tweak(&tweak))
            .transpose()
            .map_err(|_| KeyError::InvalidChildKey(child))?;

        // tweak*G + K_par
        let public_key = self
            .public_key
            .add_exp_tweak(secp(), &tweak)
            .map_err(|_| KeyError::InvalidChildKey(child))?;

        let mut chain_code = ChainCode([0u8; 32]);
        chain_code.0.copy_from_slice(&i[32..]);

        Ok(ExtendedKey {
            private_key,
            public_key,
            chain_code,
            depth: self.depth.checked_add(1).ok_or(KeyError::MaxDepth)?,
            parent_fingerprint: self.fingerprint(),
            child_number: child,
        })
    }

    /// Walk `path` from this key.
    pub fn derive_path(&self, path: &DerivationPath) -> Result<ExtendedKey, KeyError> {
        let mut key = self.clone();
        for &step in path.as_slice() {
            key = key.derive_child(step)?;
        }
        Ok(key)
    }

    /// Public-only copy of this node
    pub fn neuter(&self) -> ExtendedKey {
        ExtendedKey {
            private_key: None,
            ..self.clone()
        }
    }

    pub fn identifier(&self) -> hash160::Hash {
        hash160::Hash::hash(&self.public_key.serialize())
    }

    pub fn fingerprint(&self) -> Fingerprint {
        let mut fp = [0u8; 4];
        fp.copy_from_slice(&self.identifier().as_byte_array()[..4]);
        Fingerprint(fp)
    }

    /// Base58check extended private key (`xprv`, `zprv`, ...)
    pub fn to_extended_private(&self, version: [u8; 4]) -> Result<String, KeyError> {
        let sk = self.private_key.as_ref().ok_or(KeyError::MissingPrivateKey)?;
        let mut key_data = Zeroizing::new([0u8; 33]);
        key_data[1..].copy_from_slice(&sk.secret_bytes());
        Ok(self.encode_extended(version, &key_data))
    }

    /// Base58check extended public key (`xpub`, `zpub`, ...)
    pub fn to_extended_public(&self, version: [u8; 4]) -> String {
        self.encode_extended(version, &self.public_key.serialize())
    }

    fn encode_extended(&self, version: [u8; 4], key_data: &[u8; 33]) -> String {
        let mut payload = Zeroizing::new(Vec::with_capacity(EXTENDED_KEY_LEN));
        payload.extend_from_slice(&version);
        payload.push(self.depth);
        payload.extend_from_slice(&self.parent_fingerprint.0);
        payload.extend_from_slice(&self.child_number.to_u32().to_be_bytes());
        payload.extend_from_slice(&self.chain_code.0);
        payload.extend_from_slice(key_data);
        debug_assert_eq!(payload.len(), EXTENDED_KEY_LEN);
        base58::encode_check(&payload)
    }
}
