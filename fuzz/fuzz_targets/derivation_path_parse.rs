#![no_main]

use std::str::FromStr;

use libfuzzer_sys::fuzz_target;
use seedpick_core::keys::DerivationPath;

fuzz_target!(|data: &[u8]| {
    if let Ok(s) = std::str::from_utf8(data) {
        if let Ok(path) = DerivationPath::from_str(s) {
            // Display output parses back to the same path
            let shown = path.to_string();
            assert_eq!(DerivationPath::from_str(&shown).ok(), Some(path));
        }
    }
});
