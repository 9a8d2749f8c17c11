use std::collections::HashMap;

use thiserror::Error;

use crate::core::{MAX_SIMULATION_MONTHS, MonthKey, SimulationOptions};

const MAX_CONFIGURABLE_MONTHS: u32 = 1200;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub port: u16,
    pub max_months: u32,
    /// Pins the simulated "today"; the current calendar month when unset.
    pub start_month: Option<MonthKey>,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid value for {0}: {1}")]
    InvalidValue(String, String),
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: 8080,
            max_months: MAX_SIMULATION_MONTHS,
            start_month: None,
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_env_map(std::env::vars().collect())
    }

    pub fn from_env_map(env_map: HashMap<String, String>) -> Result<Self, ConfigError> {
        let defaults = Config::default();

        let port = match env_map.get("PAYOFF_PORT") {
            Some(raw) => raw.trim().parse::<u16>().map_err(|_| {
                ConfigError::InvalidValue(
                    "PAYOFF_PORT".to_string(),
                    "must be a valid u16".to_string(),
                )
            })?,
            None => defaults.port,
        };

        let max_months = match env_map.get("PAYOFF_MAX_MONTHS") {
            Some(raw) => raw
                .trim()
                .parse::<u32>()
                .ok()
                .filter(|m| (1..=MAX_CONFIGURABLE_MONTHS).contains(m))
                .ok_or_else(|| {
                    ConfigError::InvalidValue(
                        "PAYOFF_MAX_MONTHS".to_string(),
                        format!("must be between 1 and {MAX_CONFIGURABLE_MONTHS}"),
                    )
                })?,
            None => defaults.max_months,
        };

        let start_month = env_map
            .get("PAYOFF_START_MONTH")
            .filter(|raw| !raw.trim().is_empty())
            .map(|raw| raw.parse::<MonthKey>())
            .transpose()
            .map_err(|e| {
                ConfigError::InvalidValue("PAYOFF_START_MONTH".to_string(), e.to_string())
            })?;

        Ok(Config {
            port,
            max_months,
            start_month,
        })
    }

    pub fn simulation_options(&self) -> SimulationOptions {
        SimulationOptions {
            start: self.start_month.unwrap_or_else(MonthKey::current),
            max_months: self.max_months,
        }
    }
}
