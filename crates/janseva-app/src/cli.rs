//! CLI argument definitions for the JanSeva terminal client.
//!
//! Priority resolution: CLI args > env vars > config file > defaults.

use clap::Parser;
use janseva_core::Language;
use std::path::PathBuf;

/// Ask JanSeva: chat about Maharashtra government schemes in English, Hindi or Marathi.
#[derive(Parser, Debug)]
#[command(name = "janseva", version, about)]
pub struct CliArgs {
    /// Path to the configuration file.
    #[arg(short = 'c', long = "config")]
    pub config: Option<PathBuf>,

    /// Chat backend base URL.
    #[arg(short = 'u', long = "base-url")]
    pub base_url: Option<String>,

    /// Starting language (en, hi, mr).
    #[arg(short = 'L', long = "language")]
    pub language: Option<Language>,

    /// Log level (trace, debug, info, warn, error).
    #[arg(short = 'l', long = "log-level")]
    pub log_level: Option<String>,
}

impl CliArgs {
    /// Resolve the configuration file path.
    ///
    /// Priority: --config flag > JANSEVA_CONFIG env var > ~/.janseva/config.toml.
    pub fn resolve_config_path(&self) -> PathBuf {
        if let Some(ref p) = self.config {
            return p.clone();
        }
        if let Ok(p) = std::env::var("JANSEVA_CONFIG") {
            return PathBuf::from(p);
        }
        default_config_path()
    }

    /// Resolve the backend base URL.
    ///
    /// Priority: --base-url flag > JANSEVA_BASE_URL env var > config file value.
    pub fn resolve_base_url(&self, config_url: &str) -> String {
        if let Some(ref url) = self.base_url {
            return url.clone();
        }
        match std::env::var("JANSEVA_BASE_URL") {
            Ok(url) if !url.trim().is_empty() => url,
            _ => config_url.to_string(),
        }
    }

    /// Priority: --language flag > config file value.
    pub fn resolve_language(&self, config_language: Language) -> Language {
        self.language.unwrap_or(config_language)
    }

    /// Build the log filter directive.
    ///
    /// Priority: --log-level flag > RUST_LOG env var > config file value.
    /// `None` means RUST_LOG should be used as is.
    pub fn resolve_log_filter(&self, config_level: &str) -> Option<String> {
        if let Some(ref level) = self.log_level {
            return Some(level.clone());
        }
        if std::env::var("RUST_LOG").is_ok() {
            return None;
        }
        Some(config_level.to_string())
    }
}

/// Default config file path for the current platform.
fn default_config_path() -> PathBuf {
    #[cfg(target_os = "windows")]
    if let Ok(home) = std::env::var("USERPROFILE") {
        return PathBuf::from(home).join(".janseva").join("config.toml");
    }
    #[cfg(not(target_os = "windows"))]
    if let Ok(home) = std::env::var("HOME") {
        return PathBuf::from(home).join(".janseva").join("config.toml");
    }
    PathBuf::from("config.toml")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> CliArgs {
        CliArgs::parse_from(std::iter::once("janseva").chain(args.iter().copied()))
    }

    #[test]
    fn test_parse_all_flags() {
        let args = parse(&[
            "--config",
            "/tmp/j.toml",
            "--base-url",
            "http://backend:9000",
            "--language",
            "hi",
            "--log-level",
            "debug",
        ]);
        assert_eq!(args.resolve_config_path(), PathBuf::from("/tmp/j.toml"));
        assert_eq!(args.resolve_base_url("http://localhost:8000"), "http://backend:9000");
        assert_eq!(args.resolve_language(Language::Marathi), Language::Hindi);
        assert_eq!(args.resolve_log_filter("info").as_deref(), Some("debug"));
    }

    #[test]
    fn test_language_falls_back_to_config() {
        let args = parse(&[]);
        assert_eq!(args.resolve_language(Language::English), Language::English);
    }

    #[test]
    fn test_rejects_unknown_language() {
        let result = CliArgs::try_parse_from(["janseva", "--language", "fr"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_default_config_path_ends_with_janseva_dir() {
        let path = default_config_path();
        assert!(path.ends_with("config.toml"));
    }
}
