//! Simulator configuration.
//!
//! Everything here has a default, so an empty JSON object `{}` is a valid
//! configuration file and reproduces the behaviour of the sales form.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors arising from loading a configuration file.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid config value: {0}")]
    Invalid(String),
}

/// What to do with a malformed optional field on a quote form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CoercionMode {
    /// Substitute the configured default and log a warning.
    #[default]
    Lenient,
    /// Reject the form with the field's error.
    Strict,
}

/// How raw form input becomes a validated quote input.
///
/// The vehicle price is never defaulted: a missing or non-positive price
/// is rejected under every mode.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct InputPolicy {
    pub mode: CoercionMode,
    /// Used when the down payment field is blank or unreadable.
    pub default_down_payment: Decimal,
    /// Used when the installment field is unreadable or not positive.
    pub default_installments: u32,
    /// Monthly rate as a fraction, used when the rate field is unreadable.
    pub default_monthly_rate: Decimal,
    /// Only accept the installment counts and rates offered by the sales form.
    pub catalog_only: bool,
}

impl Default for InputPolicy {
    fn default() -> Self {
        Self {
            mode: CoercionMode::Lenient,
            default_down_payment: Decimal::ZERO,
            default_installments: 24,
            default_monthly_rate: dec!(0.015),
            catalog_only: false,
        }
    }
}

impl InputPolicy {
    pub fn strict() -> Self {
        Self {
            mode: CoercionMode::Strict,
            ..Default::default()
        }
    }

    pub fn is_strict(&self) -> bool {
        self.mode == CoercionMode::Strict
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.default_installments == 0 {
            return Err(ConfigError::Invalid(
                "default_installments must be positive".to_string(),
            ));
        }
        if self.default_monthly_rate < Decimal::ZERO {
            return Err(ConfigError::Invalid(format!(
                "default_monthly_rate must not be negative, got {}",
                self.default_monthly_rate
            )));
        }
        if self.default_down_payment < Decimal::ZERO {
            return Err(ConfigError::Invalid(format!(
                "default_down_payment must not be negative, got {}",
                self.default_down_payment
            )));
        }
        Ok(())
    }
}

/// Top-level configuration for the simulator front-end.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulatorConfig {
    pub input: InputPolicy,
}

impl SimulatorConfig {
    /// Parse and validate a configuration from JSON text.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: SimulatorConfig = serde_json::from_str(json)?;
        config.input.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a configuration file.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_json_str(&content)?;
        log::debug!("loaded config from {}: {:?}", path.display(), config);
        Ok(config)
    }
}
