use std::str::FromStr;
use std::time::Duration;

use anyhow::{bail, Context, Result};

const DEFAULT_LANGUAGETOOL_URL: &str = "https://api.languagetool.org";
const DEFAULT_MAX_UPLOAD_BYTES: usize = 5 * 1024 * 1024;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GrammarBackend {
    LanguageTool,
    None,
}

impl FromStr for GrammarBackend {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "languagetool" => Ok(GrammarBackend::LanguageTool),
            "none" | "off" | "" => Ok(GrammarBackend::None),
            other => bail!("unknown grammar backend '{other}' (expected 'languagetool' or 'none')"),
        }
    }
}

/// Application configuration loaded from environment variables.
/// Every variable has a default; malformed values fail startup.
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub rust_log: String,
    pub grammar_backend: GrammarBackend,
    pub languagetool_url: String,
    pub grammar_language: String,
    /// Per-call timeout for the grammar backend.
    pub grammar_timeout: Duration,
    /// Upper bound on the whole grammar pass of one analysis.
    pub grammar_budget: Duration,
    pub grammar_max_errors: usize,
    pub max_upload_bytes: usize,
    /// How long finished upload jobs stay retrievable.
    pub job_ttl: Duration,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let var = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());

        let grammar_timeout_secs: u64 = parse_var(&lookup, "GRAMMAR_TIMEOUT_SECS", 10)?;
        let grammar_budget_secs: u64 = parse_var(&lookup, "GRAMMAR_BUDGET_SECS", 30)?;
        let job_ttl_secs: u64 = parse_var(&lookup, "JOB_TTL_SECS", 3600)?;

        Ok(Config {
            port: parse_var(&lookup, "PORT", 8080)?,
            rust_log: var("RUST_LOG", "info"),
            grammar_backend: var("GRAMMAR_BACKEND", "none")
                .parse()
                .context("GRAMMAR_BACKEND is invalid")?,
            languagetool_url: var("LANGUAGETOOL_URL", DEFAULT_LANGUAGETOOL_URL),
            grammar_language: var("GRAMMAR_LANGUAGE", "en-US"),
            grammar_timeout: Duration::from_secs(grammar_timeout_secs),
            grammar_budget: Duration::from_secs(grammar_budget_secs),
            grammar_max_errors: parse_var(&lookup, "GRAMMAR_MAX_ERRORS", 10)?,
            max_upload_bytes: parse_var(&lookup, "MAX_UPLOAD_BYTES", DEFAULT_MAX_UPLOAD_BYTES)?,
            job_ttl: Duration::from_secs(job_ttl_secs),
        })
    }
}

fn parse_var<T>(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .with_context(|| format!("{key} must be a valid number, got '{raw}'")),
        None => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn config_from(pairs: &[(&str, &str)]) -> Result<Config> {
        let env: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| env.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = config_from(&[]).unwrap();
        assert_eq!(config.port, 8080);
        assert_eq!(config.rust_log, "info");
        assert_eq!(config.grammar_backend, GrammarBackend::None);
        assert_eq!(config.languagetool_url, DEFAULT_LANGUAGETOOL_URL);
        assert_eq!(config.grammar_language, "en-US");
        assert_eq!(config.grammar_timeout, Duration::from_secs(10));
        assert_eq!(config.grammar_max_errors, 10);
        assert_eq!(config.max_upload_bytes, 5 * 1024 * 1024);
        assert_eq!(config.job_ttl, Duration::from_secs(3600));
    }

    #[test]
    fn test_overrides() {
        let config = config_from(&[
            ("PORT", "9000"),
            ("GRAMMAR_BACKEND", "LanguageTool"),
            ("GRAMMAR_TIMEOUT_SECS", "3"),
            ("MAX_UPLOAD_BYTES", "1024"),
            ("JOB_TTL_SECS", "60"),
        ])
        .unwrap();
        assert_eq!(config.port, 9000);
        assert_eq!(config.grammar_backend, GrammarBackend::LanguageTool);
        assert_eq!(config.grammar_timeout, Duration::from_secs(3));
        assert_eq!(config.max_upload_bytes, 1024);
        assert_eq!(config.job_ttl, Duration::from_secs(60));
    }

    #[test]
    fn test_invalid_values_are_reported() {
        let err = config_from(&[("PORT", "eighty")]).unwrap_err();
        assert!(err.to_string().contains("PORT"));
        assert!(config_from(&[("GRAMMAR_BACKEND", "grammarly")]).is_err());
    }
}
