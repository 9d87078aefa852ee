//! Security-specific tests.
//!
//! These tests verify:
//! 1. Malformed inputs are rejected without panicking
//! 2. Secret-bearing types never print their contents
//! 3. The checksum catches corrupted mnemonics
//! 4. Random fuzz-style inputs into every parser

use std::str::FromStr;

use rand::{Rng, RngCore};
use seedpick_core::keys::{derive_master, DerivationPath, ExtendedKey, KeyError, ZPRV};
use seedpick_core::wallet::derive_wallet;
use seedpick_core::{
    check, decode_wif, encode_wif, find_last_words, find_last_words_parallel, parse_mnemonic,
    split_words, validate, wordlist, EncodingError, MnemonicError,
};
use zeroize::Zeroize;

const VOID_COME: &str = "void come effort suffer camp survey warrior heavy shoot primary \
    clutch crush open amazing screen patrol group space point ten exist slush involve unfold";

fn random_phrase() -> String {
    let mut entropy = [0u8; 32];
    rand::thread_rng().fill_bytes(&mut entropy);
    bip39::Mnemonic::from_entropy(&entropy).unwrap().to_string()
}

// ============================================================================
// 1. Input rejection
// ============================================================================

#[test]
fn test_wordlist_is_canonical() {
    assert!(wordlist::verify_integrity().is_ok());
    assert_eq!(wordlist::words().len(), 2048);
}

#[test]
fn test_mnemonic_words_are_case_sensitive() {
    let upper = VOID_COME.to_uppercase();
    assert!(matches!(
        parse_mnemonic(&upper).unwrap_err(),
        seedpick_core::SeedError::InvalidMnemonic(MnemonicError::UnknownWord { position: 1, .. })
    ));
}

#[test]
fn test_extra_whitespace_accepted() {
    let spaced = format!("\n  {}  \t", VOID_COME.replace(' ', "   "));
    let a = parse_mnemonic(&spaced).unwrap();
    let b = parse_mnemonic(VOID_COME).unwrap();
    assert_eq!(a.entropy(), b.entropy());
    assert_eq!(a.to_seed("x"), b.to_seed("x"));
}

#[test]
fn test_wif_rejects_garbage() {
    for input in ["", "   ", "not-base58-0OIl", "5HueCGU8rMjxEXxiPuD5BDku4MkFqeZyd4dZ1jvhTVqvbTLvyTJ0"] {
        assert!(decode_wif(input).is_err(), "accepted {:?}", input);
    }
    assert!(matches!(
        encode_wif(&[], true).unwrap_err(),
        EncodingError::InvalidLength { found: 0, .. }
    ));
}

#[test]
fn test_master_key_seed_bounds() {
    assert_eq!(
        derive_master(&[0u8; 15]).unwrap_err(),
        KeyError::InvalidSeedLength(15)
    );
    assert_eq!(
        derive_master(&[0u8; 65]).unwrap_err(),
        KeyError::InvalidSeedLength(65)
    );
    assert!(derive_master(&[0u8; 16]).is_ok());
    assert!(derive_master(&[0u8; 64]).is_ok());
}

#[test]
fn test_public_key_cannot_export_private() {
    let master = derive_master(&[7u8; 32]).unwrap();
    let public = master.neuter();
    assert!(master.to_extended_private(ZPRV).is_ok());
    assert_eq!(
        public.to_extended_private(ZPRV).unwrap_err(),
        KeyError::MissingPrivateKey
    );
}

// ============================================================================
// 2. Redaction
// ============================================================================

#[test]
fn test_debug_output_hides_secrets() {
    let mnemonic = parse_mnemonic(VOID_COME).unwrap();
    let seed = mnemonic.to_seed("");
    let master: ExtendedKey = derive_master(seed.as_bytes()).unwrap();

    let printed = format!("{:?} {:?} {:?}", mnemonic, seed, master);
    assert!(!printed.contains("void"));
    assert!(!printed.contains(&hex::encode(&seed.as_bytes()[..8])));
    let sk = master.private_key.unwrap();
    assert!(!printed.contains(&hex::encode(&sk.secret_bytes()[..8])));
}

#[test]
fn test_report_errors_hide_mnemonic() {
    let bad = VOID_COME.replace("unfold", "zoo");
    let err = derive_wallet(&bad, "").unwrap_err();
    let message = err.to_string();
    assert!(!message.contains("void"));
    assert!(!message.contains("zoo"));
}

#[test]
fn test_seed_zeroize() {
    let mnemonic = parse_mnemonic(VOID_COME).unwrap();
    let mut seed = mnemonic.to_seed("");
    assert_ne!(seed.as_bytes(), &[0u8; 64]);
    seed.zeroize();
    assert_eq!(seed.as_bytes(), &[0u8; 64]);
}

// ============================================================================
// 3. Checksum strength
// ============================================================================

#[test]
fn test_swapped_words_usually_detected() {
    let mut detected = 0;
    let trials = 64;
    let mut rng = rand::thread_rng();
    for _ in 0..trials {
        let phrase = random_phrase();
        let mut words = split_words(&phrase);
        let a = rng.gen_range(0..23);
        let b = a + 1;
        if words[a] == words[b] {
            detected += 1;
            continue;
        }
        words.swap(a, b);
        if !validate(&words) {
            detected += 1;
        }
    }
    // 8-bit checksum misses about 1 in 256
    assert!(detected >= trials - 4, "only {} of {} detected", detected, trials);
}

#[test]
fn test_recovery_of_mistyped_prefix_is_empty() {
    let mut words = split_words(VOID_COME);
    words[0] = "Void";
    assert!(find_last_words(&words[..23]).unwrap().is_empty());

    words[0] = "void";
    words[7] = "heavvy";
    assert!(find_last_words(&words[..23]).unwrap().is_empty());
    assert!(find_last_words_parallel(&words[..23]).unwrap().is_empty());
}

// ============================================================================
// 4. Random input fuzzing
// ============================================================================

#[test]
fn test_random_strings_never_panic() {
    let mut rng = rand::thread_rng();
    for _ in 0..500 {
        let len = rng.gen_range(0..200);
        let bytes: Vec<u8> = (0..len).map(|_| rng.gen()).collect();
        let text = String::from_utf8_lossy(&bytes);

        let _ = parse_mnemonic(&text);
        let _ = check(&split_words(&text));
        let _ = decode_wif(&text);
        let _ = DerivationPath::from_str(&text);
    }
}

#[test]
fn test_random_word_sequences_never_panic() {
    let mut rng = rand::thread_rng();
    let list = wordlist::words();
    let mut valid = 0;
    for _ in 0..2048 {
        let words: Vec<&str> = (0..24).map(|_| list[rng.gen_range(0..2048)]).collect();
        if validate(&words) {
            valid += 1;
        }
    }
    // Expect about 8 of 2048 to pass by chance
    assert!(valid < 64, "{} random sequences passed the checksum", valid);
}
