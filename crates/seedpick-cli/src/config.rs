//! CLI configuration, parsed from an optional TOML file + environment variable overrides.
//!
//! Priority: environment variables > config file > defaults.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Config file looked up in the working directory when `--config` is absent
pub const DEFAULT_CONFIG_PATH: &str = "seedpick.toml";

const LOG_LEVELS: [&str; 6] = ["off", "error", "warn", "info", "debug", "trace"];

/// Top-level CLI configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CliConfig {
    /// Output and logging
    #[serde(default)]
    pub cli: CliSection,

    /// Last-word recovery
    #[serde(default)]
    pub recovery: RecoverySection,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CliSection {
    /// Log level (off, error, warn, info, debug, trace)
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Print results as JSON instead of text
    #[serde(default)]
    pub json: bool,
}

impl Default for CliSection {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            json: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecoverySection {
    /// Scan candidates on the rayon thread pool
    #[serde(default = "default_parallel")]
    pub parallel: bool,

    /// Worker threads for the parallel scan; 0 lets rayon decide
    #[serde(default)]
    pub threads: usize,
}

impl Default for RecoverySection {
    fn default() -> Self {
        Self {
            parallel: default_parallel(),
            threads: 0,
        }
    }
}

fn default_log_level() -> String {
    "warn".to_string()
}

fn default_parallel() -> bool {
    true
}

/// Lenient boolean for environment variables
fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

impl CliConfig {
    /// Load configuration from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        let config: CliConfig =
            toml::from_str(&contents).with_context(|| "Failed to parse TOML config")?;
        Ok(config)
    }

    /// Load an explicit config file, or the default one if it exists.
    ///
    /// A missing default file means "use defaults"; a missing explicit file
    /// is an error.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        match explicit {
            Some(path) => Self::from_file(path),
            None => {
                let path = Path::new(DEFAULT_CONFIG_PATH);
                if path.is_file() {
                    Self::from_file(path)
                } else {
                    Ok(Self::default())
                }
            }
        }
    }

    /// Apply environment variable overrides.
    ///
    /// Supported env vars:
    /// - `SEEDPICK_LOG_LEVEL`
    /// - `SEEDPICK_JSON`
    /// - `SEEDPICK_PARALLEL`
    /// - `SEEDPICK_THREADS`
    pub fn apply_env_overrides(&mut self) {
        if let Ok(v) = std::env::var("SEEDPICK_LOG_LEVEL") {
            self.cli.log_level = v;
        }
        if let Ok(v) = std::env::var("SEEDPICK_JSON") {
            if let Some(json) = parse_bool(&v) {
                self.cli.json = json;
            }
        }
        if let Ok(v) = std::env::var("SEEDPICK_PARALLEL") {
            if let Some(parallel) = parse_bool(&v) {
                self.recovery.parallel = parallel;
            }
        }
        if let Ok(v) = std::env::var("SEEDPICK_THREADS") {
            if let Ok(threads) = v.parse::<usize>() {
                self.recovery.threads = threads;
            }
        }
    }

    /// Filter string for `env_logger`.
    ///
    /// A non-empty `RUST_LOG` wins over `cli.log_level`, so per-module
    /// directives such as `seedpick_core=debug` keep working.
    pub fn log_filter(&self, rust_log: Option<&str>) -> String {
        match rust_log.map(str::trim) {
            Some(filter) if !filter.is_empty() => filter.to_string(),
            _ => self.cli.log_level.clone(),
        }
    }

    /// Validate that the configuration is usable.
    pub fn validate(&self) -> Result<()> {
        anyhow::ensure!(
            LOG_LEVELS.contains(&self.cli.log_level.to_ascii_lowercase().as_str()),
            "cli.log_level must be one of {}",
            LOG_LEVELS.join(", ")
        );

        anyhow::ensure!(
            self.recovery.threads <= 1024,
            "recovery.threads must be <= 1024"
        );

        Ok(())
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn full_toml() -> &'static str {
        r#"
[cli]
log_level = "debug"
json = true

[recovery]
parallel = false
threads = 4
"#
    }

    fn load_str(toml: &str) -> CliConfig {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "{}", toml).unwrap();
        CliConfig::from_file(file.path()).unwrap()
    }

    #[test]
    fn test_parse_empty_config() {
        let config = load_str("");
        assert_eq!(config, CliConfig::default());
        assert_eq!(config.cli.log_level, "warn");
        assert!(!config.cli.json);
        assert!(config.recovery.parallel);
        assert_eq!(config.recovery.threads, 0);
    }

    #[test]
    fn test_parse_full_config() {
        let config = load_str(full_toml());
        assert_eq!(config.cli.log_level, "debug");
        assert!(config.cli.json);
        assert!(!config.recovery.parallel);
        assert_eq!(config.recovery.threads, 4);
    }

    #[test]
    fn test_partial_section_keeps_defaults() {
        let config = load_str("[recovery]\nthreads = 2\n");
        assert!(config.recovery.parallel);
        assert_eq!(config.recovery.threads, 2);
        assert_eq!(config.cli.log_level, "warn");
    }

    #[test]
    fn test_invalid_toml_is_error() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "[cli\nlog_level = ").unwrap();
        assert!(CliConfig::from_file(file.path()).is_err());
    }

    #[test]
    fn test_explicit_missing_file_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope.toml");
        let err = CliConfig::load(Some(&missing)).unwrap_err();
        assert!(format!("{:#}", err).contains("Failed to read config file"));
    }

    #[test]
    fn test_explicit_file_is_loaded() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "{}", full_toml()).unwrap();
        let config = CliConfig::load(Some(file.path())).unwrap();
        assert!(config.cli.json);
    }

    #[test]
    fn test_env_overrides() {
        let mut config = CliConfig::default();

        std::env::set_var("SEEDPICK_LOG_LEVEL", "trace");
        std::env::set_var("SEEDPICK_JSON", "yes");
        std::env::set_var("SEEDPICK_PARALLEL", "0");
        std::env::set_var("SEEDPICK_THREADS", "3");

        config.apply_env_overrides();

        assert_eq!(config.cli.log_level, "trace");
        assert!(config.cli.json);
        assert!(!config.recovery.parallel);
        assert_eq!(config.recovery.threads, 3);

        std::env::remove_var("SEEDPICK_LOG_LEVEL");
        std::env::remove_var("SEEDPICK_JSON");
        std::env::remove_var("SEEDPICK_PARALLEL");
        std::env::remove_var("SEEDPICK_THREADS");
    }

    #[test]
    fn test_log_filter_prefers_rust_log() {
        let config = load_str("[cli]\nlog_level = \"info\"\n");
        assert_eq!(config.log_filter(None), "info");
        assert_eq!(config.log_filter(Some("")), "info");
        assert_eq!(config.log_filter(Some("  ")), "info");
        assert_eq!(
            config.log_filter(Some("seedpick_core=debug")),
            "seedpick_core=debug"
        );
    }

    #[test]
    fn test_parse_bool() {
        assert_eq!(parse_bool("TRUE"), Some(true));
        assert_eq!(parse_bool(" on "), Some(true));
        assert_eq!(parse_bool("no"), Some(false));
        assert_eq!(parse_bool("maybe"), None);
    }

    #[test]
    fn test_validation_ok() {
        assert!(CliConfig::default().validate().is_ok());
        assert!(load_str(full_toml()).validate().is_ok());
    }

    #[test]
    fn test_validation_bad_log_level() {
        let config = load_str("[cli]\nlog_level = \"loud\"\n");
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validation_too_many_threads() {
        let config = load_str("[recovery]\nthreads = 100000\n");
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_serde_roundtrip() {
        let config = load_str(full_toml());
        let serialized = toml::to_string_pretty(&config).unwrap();
        let reparsed: CliConfig = toml::from_str(&serialized).unwrap();
        assert_eq!(reparsed, config);
    }
}
