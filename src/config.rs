// src/config.rs

//! Configuration loading utilities.
//!
//! Settings are assembled once at start-up from three layers, later layers
//! winning: the TOML config file, environment variables, then command-line
//! values. The result is passed explicitly into the pipeline.

use std::path::PathBuf;

use crate::error::{AppError, Result};
use crate::models::Config;
use crate::services::notifier::NotifierConfig;

/// Environment accessor. Injected so tests never touch the process env.
pub type EnvLookup<'a> = &'a dyn Fn(&str) -> Option<String>;

/// Read a variable, treating blank values as unset.
pub fn env_value(lookup: EnvLookup<'_>, key: &str) -> Option<String> {
    lookup(key)
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

/// Fully assembled run settings.
#[derive(Debug, Clone)]
pub struct Settings {
    pub config: Config,
    /// Raw target, validated by the checker
    pub target: Option<String>,
    pub notifier: Option<NotifierConfig>,
}

impl Settings {
    /// Assemble settings from the process environment.
    pub fn from_env(config: Config, arg_url: Option<String>) -> Result<Self> {
        Self::from_lookup(config, &|key| std::env::var(key).ok(), arg_url)
    }

    /// Assemble settings from an arbitrary environment.
    ///
    /// `WEBPAGE_URL` takes precedence over the positional argument.
    pub fn from_lookup(
        mut config: Config,
        lookup: EnvLookup<'_>,
        arg_url: Option<String>,
    ) -> Result<Self> {
        if let Some(path) = env_value(lookup, "CHECKSUM_FILE") {
            config.state.checksum_file = PathBuf::from(path);
        }
        if let Some(path) = env_value(lookup, "HEARTBEAT_FILE") {
            config.state.heartbeat_file = PathBuf::from(path);
        }
        if let Some(raw) = env_value(lookup, "HEARTBEAT_INTERVAL_DAYS") {
            let days = raw.parse::<u32>().map_err(|_| {
                AppError::config(format!("HEARTBEAT_INTERVAL_DAYS must be a number, got '{raw}'"))
            })?;
            config.heartbeat.interval_days = Some(days);
        }
        if let Some(raw) = env_value(lookup, "FINGERPRINT_ALGORITHM") {
            config.fingerprint.algorithm = raw.parse()?;
        }
        if let Some(agent) = env_value(lookup, "USER_AGENT") {
            config.fetcher.user_agent = agent;
        }
        if let Some(raw) = env_value(lookup, "FETCH_TIMEOUT_SECS") {
            config.fetcher.timeout_secs = raw.parse::<u64>().map_err(|_| {
                AppError::config(format!("FETCH_TIMEOUT_SECS must be a number, got '{raw}'"))
            })?;
        }

        config.validate()?;

        let target = env_value(lookup, "WEBPAGE_URL").or_else(|| {
            arg_url
                .map(|url| url.trim().to_string())
                .filter(|url| !url.is_empty())
        });

        Ok(Self {
            config,
            target,
            notifier: NotifierConfig::from_lookup(lookup),
        })
    }

    /// The target URL as given, or `InvalidTarget` when none was supplied.
    pub fn target(&self) -> Result<&str> {
        self.target.as_deref().ok_or_else(|| {
            AppError::invalid_target(
                "",
                "URL not provided. Set WEBPAGE_URL or pass it as an argument",
            )
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::FingerprintAlgorithm;
    use std::collections::HashMap;

    fn settings(pairs: &[(&str, &str)], arg: Option<&str>) -> Result<Settings> {
        let env: HashMap<&str, &str> = pairs.iter().copied().collect();
        let lookup = |key: &str| env.get(key).map(|v| v.to_string());
        Settings::from_lookup(Config::default(), &lookup, arg.map(str::to_string))
    }

    #[test]
    fn test_env_url_takes_precedence() {
        let s = settings(
            &[("WEBPAGE_URL", "https://env.example.com")],
            Some("https://arg.example.com"),
        )
        .unwrap();
        assert_eq!(s.target().unwrap(), "https://env.example.com");
    }

    #[test]
    fn test_argument_used_without_env() {
        let s = settings(&[], Some("https://arg.example.com")).unwrap();
        assert_eq!(s.target().unwrap(), "https://arg.example.com");
    }

    #[test]
    fn test_blank_env_falls_back_to_argument() {
        let s = settings(&[("WEBPAGE_URL", "  ")], Some("https://arg.example.com")).unwrap();
        assert_eq!(s.target().unwrap(), "https://arg.example.com");
    }

    #[test]
    fn test_missing_target_is_invalid() {
        let s = settings(&[], None).unwrap();
        assert!(matches!(s.target(), Err(AppError::InvalidTarget { .. })));
    }

    #[test]
    fn test_env_overrides() {
        let s = settings(
            &[
                ("CHECKSUM_FILE", "/var/lib/pagewatch/sum"),
                ("HEARTBEAT_INTERVAL_DAYS", "7"),
                ("FINGERPRINT_ALGORITHM", "sha256"),
                ("FETCH_TIMEOUT_SECS", "5"),
            ],
            None,
        )
        .unwrap();
        assert_eq!(
            s.config.state.checksum_file,
            PathBuf::from("/var/lib/pagewatch/sum")
        );
        assert_eq!(s.config.heartbeat.interval_days, Some(7));
        assert_eq!(s.config.fingerprint.algorithm, FingerprintAlgorithm::Sha256);
        assert_eq!(s.config.fetcher.timeout_secs, 5);
    }

    #[test]
    fn test_bad_numbers_are_config_errors() {
        assert!(matches!(
            settings(&[("HEARTBEAT_INTERVAL_DAYS", "weekly")], None),
            Err(AppError::Config(_))
        ));
        assert!(settings(&[("FETCH_TIMEOUT_SECS", "0")], None).is_err());
    }

    #[test]
    fn test_no_notifier_configured() {
        let s = settings(&[("WEBPAGE_URL", "https://example.com")], None).unwrap();
        assert!(s.notifier.is_none());
    }
}
