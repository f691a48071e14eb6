use anyhow::{Context, Result};
use dotenvy::dotenv;
use once_cell::sync::Lazy;
use std::env;
use std::path::PathBuf;

pub static CONFIG: Lazy<Config> = Lazy::new(|| {
    dotenv().ok(); // Load .env file if present
    Config {
        host: get_env_or_default("HOST", "127.0.0.1"),
        port: get_env_or_default("PORT", "8000"),
        responses_file: get_env_opt("RESPONSES_FILE").map(PathBuf::from),
        log_level: get_env_or_default("LOG_LEVEL", "info"),
    }
});

#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: String,
    /// JSON response table to use instead of the built-in one.
    pub responses_file: Option<PathBuf>,
    pub log_level: String,
}

impl Config {
    pub fn port(&self) -> Result<u16> {
        parse_port(&self.port)
    }

    pub fn log_level(&self) -> Result<tracing::Level> {
        parse_log_level(&self.log_level)
    }
}

/// Command-line values that take precedence over [`Config`].
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub host: Option<String>,
    pub port: Option<u16>,
    pub responses_file: Option<PathBuf>,
    pub log_level: Option<String>,
}

/// Fully parsed server settings.
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub host: String,
    pub port: u16,
    pub responses_file: Option<PathBuf>,
    pub log_level: tracing::Level,
}

impl Settings {
    /// Merge overrides onto the environment config. An environment value is
    /// only parsed when no override replaces it.
    pub fn resolve(config: &Config, overrides: Overrides) -> Result<Self> {
        let port = match overrides.port {
            Some(port) => port,
            None => config.port()?,
        };
        let log_level = match overrides.log_level {
            Some(level) => parse_log_level(&level)?,
            None => config.log_level()?,
        };

        Ok(Self {
            host: overrides.host.unwrap_or_else(|| config.host.clone()),
            port,
            responses_file: overrides
                .responses_file
                .or_else(|| config.responses_file.clone()),
            log_level,
        })
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn parse_port(raw: &str) -> Result<u16> {
    raw.parse()
        .with_context(|| format!("Invalid PORT value: {raw:?}"))
}

fn parse_log_level(raw: &str) -> Result<tracing::Level> {
    raw.parse()
        .with_context(|| format!("Invalid LOG_LEVEL value: {raw:?}"))
}

fn get_env_opt(key: &str) -> Option<String> {
    env::var(key).ok().filter(|v| !v.is_empty())
}

fn get_env_or_default(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(port: &str, log_level: &str) -> Config {
        Config {
            host: "0.0.0.0".to_string(),
            port: port.to_string(),
            responses_file: None,
            log_level: log_level.to_string(),
        }
    }

    #[test]
    fn test_resolve_from_env_values() {
        let settings = Settings::resolve(&config("8000", "info"), Overrides::default()).unwrap();
        assert_eq!(settings.port, 8000);
        assert_eq!(settings.log_level, tracing::Level::INFO);
        assert_eq!(settings.bind_addr(), "0.0.0.0:8000");
    }

    #[test]
    fn test_overrides_take_precedence() {
        let overrides = Overrides {
            host: Some("127.0.0.1".to_string()),
            port: Some(9000),
            responses_file: Some(PathBuf::from("answers.json")),
            log_level: Some("debug".to_string()),
        };
        let settings = Settings::resolve(&config("8000", "info"), overrides).unwrap();
        assert_eq!(settings.bind_addr(), "127.0.0.1:9000");
        assert_eq!(settings.log_level, tracing::Level::DEBUG);
        assert_eq!(settings.responses_file, Some(PathBuf::from("answers.json")));
    }

    #[test]
    fn test_port_override_skips_bad_env_port() {
        let overrides = Overrides {
            port: Some(9000),
            ..Overrides::default()
        };
        let settings = Settings::resolve(&config("eighty", "info"), overrides).unwrap();
        assert_eq!(settings.port, 9000);
    }

    #[test]
    fn test_invalid_port() {
        assert!(config("eighty", "info").port().is_err());
        assert!(config("70000", "info").port().is_err());
        assert!(Settings::resolve(&config("eighty", "info"), Overrides::default()).is_err());
    }

    #[test]
    fn test_log_level() {
        assert_eq!(config("1", "debug").log_level().unwrap(), tracing::Level::DEBUG);
        assert!(config("1", "loud").log_level().is_err());
        let overrides = Overrides {
            log_level: Some("loud".to_string()),
            ..Overrides::default()
        };
        assert!(Settings::resolve(&config("1", "info"), overrides).is_err());
    }
}
