#![no_main]

use libfuzzer_sys::fuzz_target;
use seedpick_core::checksum::{check, split_words, validate};
use seedpick_core::recovery::find_last_words;
use seedpick_core::seed::parse_mnemonic;

fuzz_target!(|data: &[u8]| {
    if let Ok(s) = std::str::from_utf8(data) {
        let words = split_words(s);
        let checked = check(&words);
        assert_eq!(checked.is_ok(), validate(&words));

        if checked.is_ok() {
            let mnemonic = parse_mnemonic(s).expect("checked mnemonic must parse");
            assert_eq!(mnemonic.entropy(), &*checked.unwrap());
        }

        // Every candidate the driver returns must complete a valid mnemonic
        if words.len() == 23 {
            if let Ok(candidates) = find_last_words(&words) {
                for last in candidates {
                    let mut full = words.clone();
                    full.push(last);
                    assert!(validate(&full));
                }
            }
        }
    }
});
