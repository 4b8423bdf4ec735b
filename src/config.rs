//! Configuration
//!
//! Bootstrap configuration from an optional TOML file with command-line and
//! environment overrides applied by `main`. Priority: command line >
//! environment > TOML file > built-in defaults.

use std::fs;
use std::net::IpAddr;
use std::path::Path;

use serde::Deserialize;

use crate::controller::DEFAULT_STEP;
use crate::error::{Error, Result};

/// Service configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Address the HTTP server binds to
    pub bind: IpAddr,

    /// HTTP server port
    pub port: u16,

    /// Volume step percent for up/down
    pub step: u8,

    /// Logging configuration
    pub logging: LoggingConfig,
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level filter (trace, debug, info, warn, error)
    pub level: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            // Reachable from other devices on the LAN by default
            bind: IpAddr::from([0, 0, 0, 0]),
            port: 5000,
            step: DEFAULT_STEP,
            logging: LoggingConfig::default(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

impl Config {
    /// Load configuration from a TOML file, or defaults when no file given.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => {
                let raw = fs::read_to_string(path)?;
                toml::from_str(&raw)
                    .map_err(|e| Error::Config(format!("{}: {}", path.display(), e)))
            }
            None => Ok(Config::default()),
        }
    }

    /// Reject values the controller cannot work with. Called after overrides
    /// are applied.
    pub fn validate(&self) -> Result<()> {
        if self.step == 0 || self.step > 100 {
            return Err(Error::Config(format!(
                "volume step must be within 1-100, got {}",
                self.step
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let config = Config::default();
        assert_eq!(config.port, 5000);
        assert_eq!(config.step, DEFAULT_STEP);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn partial_file_keeps_defaults_for_the_rest() {
        let config: Config = toml::from_str("port = 8080").unwrap();
        assert_eq!(config.port, 8080);
        assert_eq!(config.step, DEFAULT_STEP);
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn full_file_parses() {
        let config: Config = toml::from_str(
            r#"
            bind = "127.0.0.1"
            port = 9000
            step = 10

            [logging]
            level = "debug"
            "#,
        )
        .unwrap();
        assert_eq!(config.bind, IpAddr::from([127, 0, 0, 1]));
        assert_eq!(config.port, 9000);
        assert_eq!(config.step, 10);
        assert_eq!(config.logging.level, "debug");
    }

    #[test]
    fn zero_step_is_rejected() {
        let config = Config {
            step: 0,
            ..Config::default()
        };
        assert!(config.validate().is_err());
    }
}
