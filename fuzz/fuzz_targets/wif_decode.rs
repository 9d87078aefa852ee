#![no_main]

use libfuzzer_sys::fuzz_target;
use seedpick_core::encode::{decode_wif, encode_wif};

fuzz_target!(|data: &[u8]| {
    // decode_wif must never panic, and anything it accepts must re-encode
    // to the same string.
    if let Ok(s) = std::str::from_utf8(data) {
        if let Ok((key, compressed)) = decode_wif(s) {
            let reencoded = encode_wif(&key[..], compressed).expect("32-byte key encodes");
            assert_eq!(reencoded, s.trim());
        }
    }
});
