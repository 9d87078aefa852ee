//! seedpick: BIP-39 last-word recovery and BIP-84 address derivation
//!
//! Words are read from stdin; prompts go to stderr so results can be piped.
//!
//! # Usage
//!
//! ```bash
//! seedpick derive            # mnemonic + passphrase -> 10 receive addresses
//! seedpick recover           # 23 words -> every valid 24th word
//! seedpick wif <HEX>         # raw private key -> WIF
//! ```

mod commands;
mod config;
mod hardening;
mod prompt;

use anyhow::{Context, Result};
use std::io;
use std::path::PathBuf;

enum Command {
    Derive,
    Recover,
    Wif(Option<String>),
}

fn main() -> Result<()> {
    // Parse CLI args (minimal, no clap dependency needed)
    let args: Vec<String> = std::env::args().collect();

    let mut config_path: Option<PathBuf> = None;
    let mut command: Option<Command> = None;
    let mut json_flag = false;
    let mut parallel_flag: Option<bool> = None;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--config" | "-c" => {
                i += 1;
                if i < args.len() {
                    config_path = Some(PathBuf::from(&args[i]));
                } else {
                    anyhow::bail!("--config requires a path argument");
                }
            }
            "--json" => {
                json_flag = true;
            }
            "--parallel" => {
                parallel_flag = Some(true);
            }
            "--sequential" => {
                parallel_flag = Some(false);
            }
            "--help" | "-h" => {
                print_help();
                return Ok(());
            }
            "--version" | "-V" => {
                println!("seedpick {}", env!("CARGO_PKG_VERSION"));
                return Ok(());
            }
            "derive" if command.is_none() => {
                command = Some(Command::Derive);
            }
            "recover" if command.is_none() => {
                command = Some(Command::Recover);
            }
            "wif" if command.is_none() => {
                let key = args.get(i + 1).filter(|a| !a.starts_with('-')).cloned();
                if key.is_some() {
                    i += 1;
                }
                command = Some(Command::Wif(key));
            }
            other => {
                anyhow::bail!("Unknown argument: {}", other);
            }
        }
        i += 1;
    }

    let Some(command) = command else {
        print_help();
        anyhow::bail!("No command given");
    };

    // Load config
    let mut cli_config = config::CliConfig::load(config_path.as_deref()).with_context(|| {
        match &config_path {
            Some(path) => format!("Failed to load config from {}", path.display()),
            None => format!("Failed to load {}", config::DEFAULT_CONFIG_PATH),
        }
    })?;

    // Apply env overrides
    cli_config.apply_env_overrides();

    // Validate
    cli_config
        .validate()
        .context("Configuration validation failed")?;

    // Init logger
    let rust_log = std::env::var("RUST_LOG").ok();
    env_logger::Builder::new()
        .parse_filters(&cli_config.log_filter(rust_log.as_deref()))
        .init();

    // Mnemonics and keys pass through this process; keep them out of core files
    hardening::disable_core_dumps();

    let json = json_flag || cli_config.cli.json;
    let parallel = parallel_flag.unwrap_or(cli_config.recovery.parallel);

    if parallel && cli_config.recovery.threads > 0 {
        rayon::ThreadPoolBuilder::new()
            .num_threads(cli_config.recovery.threads)
            .build_global()
            .context("Failed to configure recovery thread pool")?;
    }

    let stdin = io::stdin();
    let mut input = stdin.lock();
    let mut prompts = io::stderr();
    let stdout = io::stdout();
    let mut out = stdout.lock();
    let mut console = prompt::Console::new(&mut input, &mut prompts, &mut out);

    match command {
        Command::Derive => commands::derive(&mut console, json),
        Command::Recover => commands::recover(&mut console, json, parallel),
        Command::Wif(key) => commands::wif(&mut console, key.as_deref(), json),
    }
}

fn print_help() {
    println!(
        r#"seedpick: BIP-39 last-word recovery and BIP-84 address derivation

USAGE:
    seedpick [OPTIONS] <COMMAND>

COMMANDS:
    derive                Read a 24-word mnemonic and passphrase, print the
                          account zpub and addresses m/84'/0'/0'/0/0..9.
                          The passphrase is used exactly as typed: leading
                          and trailing spaces are kept, not trimmed
    recover               Read the first 23 words, print every valid 24th word
    wif [HEX]             Convert a raw 32-byte hex private key to WIF

OPTIONS:
    -c, --config <PATH>   Config file path (default: ./seedpick.toml if present)
    --json                Print results as JSON
    --parallel            Scan recovery candidates on all cores
    --sequential          Scan recovery candidates on one thread
    -h, --help            Show this help message
    -V, --version         Show version

ENVIRONMENT VARIABLES (override config file):
    SEEDPICK_LOG_LEVEL    Log level (off/error/warn/info/debug/trace)
    SEEDPICK_JSON         JSON output (true/false)
    SEEDPICK_PARALLEL     Parallel recovery scan (true/false)
    SEEDPICK_THREADS      Recovery worker threads (0 = all cores)
    RUST_LOG              env_logger filter; overrides the log level when set

EXAMPLES:
    # Find the missing last word
    echo "abandon ... abandon" | seedpick recover

    # Addresses as JSON
    seedpick derive --json > addresses.json
"#
    );
}
