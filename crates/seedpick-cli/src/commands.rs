//! `derive`, `recover` and `wif` subcommands

use std::io::Write;

use anyhow::{Context, Result};
use serde::Serialize;
use zeroize::Zeroizing;

use seedpick_core::wallet::{account_path, derive_wallet};
use seedpick_core::{
    complete_mnemonics, encode_wif, find_last_words, find_last_words_parallel, split_words,
    AddressRecord,
};

use crate::prompt::Console;

#[derive(Serialize)]
struct DeriveOutput<'a> {
    account_path: String,
    account_zpub: &'a str,
    addresses: &'a [AddressRecord],
}

#[derive(Serialize)]
struct RecoverOutput<'a> {
    candidates: &'a [&'static str],
    mnemonics: &'a [String],
}

#[derive(Serialize)]
struct WifOutput<'a> {
    uncompressed: &'a str,
    compressed: &'a str,
}

fn write_json<T: Serialize>(out: &mut dyn Write, value: &T) -> Result<()> {
    serde_json::to_writer_pretty(&mut *out, value).context("Failed to serialize output")?;
    writeln!(out)?;
    Ok(())
}

/// Prompt for a mnemonic + passphrase and print the receive addresses.
pub fn derive(console: &mut Console<'_>, json: bool) -> Result<()> {
    let mnemonic = console.ask("Enter your BIP-39 mnemonic words: ")?;
    let passphrase = console.ask("Enter your passphrase (optional): ")?;

    let report = derive_wallet(&mnemonic, &passphrase).context("Failed to generate addresses")?;
    let zpub = report.account_zpub.clone();
    let records = report.into_records();
    log::info!("Derived {} addresses", records.len());

    if json {
        return write_json(
            console.out,
            &DeriveOutput {
                account_path: account_path().to_string(),
                account_zpub: &zpub,
                addresses: &records,
            },
        );
    }
    render_addresses(console.out, &zpub, &records)
}

fn render_addresses(out: &mut dyn Write, zpub: &str, records: &[AddressRecord]) -> Result<()> {
    writeln!(out, "Account ({}): {}", account_path(), zpub)?;
    writeln!(out)?;
    writeln!(out, "Generated Addresses:")?;
    for record in records {
        writeln!(out, "Address {}:", record.index + 1)?;
        writeln!(out, "  Path: {}", record.path)?;
        writeln!(out, "  Address: {}", record.address)?;
        writeln!(out, "  Public Key: {}", record.public_key_hex)?;
        writeln!(out, "  Private Key: {}", record.wif)?;
        writeln!(out)?;
    }
    Ok(())
}

/// Prompt for 23 words and print every valid 24th word.
pub fn recover(console: &mut Console<'_>, json: bool, parallel: bool) -> Result<()> {
    let line = console
        .ask("Enter the first 23 words of your BIP-39 mnemonic, separated by spaces:\n> ")?;
    let prefix = split_words(&line);

    let candidates = if parallel {
        find_last_words_parallel(&prefix)
    } else {
        find_last_words(&prefix)
    }
    .context("Last-word recovery failed")?;
    let mnemonics = Zeroizing::new(complete_mnemonics(&prefix, &candidates));

    if json {
        return write_json(
            console.out,
            &RecoverOutput {
                candidates: &candidates,
                mnemonics: &mnemonics,
            },
        );
    }
    render_candidates(console.out, &candidates, &mnemonics)
}

fn render_candidates(out: &mut dyn Write, candidates: &[&str], mnemonics: &[String]) -> Result<()> {
    if candidates.is_empty() {
        writeln!(
            out,
            "No valid last word found based on the first 23 words provided."
        )?;
        return Ok(());
    }

    writeln!(out, "Possible valid last word(s) found:")?;
    for (i, word) in candidates.iter().enumerate() {
        writeln!(out, "{}. {}", i + 1, word)?;
    }
    writeln!(out)?;
    writeln!(out, "Complete valid mnemonic(s):")?;
    for mnemonic in mnemonics {
        writeln!(out, "- {}", mnemonic)?;
    }
    Ok(())
}

/// Convert a raw hex private key to WIF, both compressed and uncompressed.
pub fn wif(console: &mut Console<'_>, hex_key: Option<&str>, json: bool) -> Result<()> {
    let hex_key = match hex_key {
        Some(k) => Zeroizing::new(k.to_string()),
        None => console.ask("Enter the private key (hex): ")?,
    };
    let key = Zeroizing::new(
        hex::decode(hex_key.trim()).context("Private key must be hexadecimal")?,
    );

    let uncompressed =
        Zeroizing::new(encode_wif(&key, false).context("Invalid private key")?);
    let compressed = Zeroizing::new(encode_wif(&key, true).context("Invalid private key")?);

    if json {
        return write_json(
            console.out,
            &WifOutput {
                uncompressed: &uncompressed,
                compressed: &compressed,
            },
        );
    }
    writeln!(console.out, "WIF (Uncompressed): {}", uncompressed.as_str())?;
    writeln!(console.out, "WIF (Compressed): {}", compressed.as_str())?;
    Ok(())
}
