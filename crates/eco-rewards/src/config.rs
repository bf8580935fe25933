use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Serialize};

use eco_types::amount::decimal_str;
use eco_types::TokenAmount;

use crate::catalog::CatalogItem;

/// Bottle counts at which each tier above `Novice` begins.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TierThresholds {
    pub explorer: u64,
    pub guardian: u64,
    pub master: u64,
}

impl Default for TierThresholds {
    fn default() -> Self {
        Self {
            explorer: 50,
            guardian: 150,
            master: 300,
        }
    }
}

/// Conversion rates applied to every deposit.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RewardConfig {
    /// Tokens credited per bottle.
    #[serde(with = "decimal_str")]
    pub reward_rate: TokenAmount,
    /// CO2 avoided per kilogram recycled.
    pub co2_grams_per_kg: u64,
    /// CO2 avoided per bottle, used when a reading carries no weight.
    pub co2_grams_per_bottle: u64,
    pub max_bottles_per_reading: u32,
    pub max_weight_kg_per_reading: f64,
    /// Location tag recorded on deposit entries.
    pub location: String,
    pub tiers: TierThresholds,
}

impl Default for RewardConfig {
    fn default() -> Self {
        Self {
            reward_rate: TokenAmount::from_cents(50),
            co2_grams_per_kg: 1_500,
            co2_grams_per_bottle: 20,
            max_bottles_per_reading: 500,
            max_weight_kg_per_reading: 50.0,
            location: "Sensor_ITSO_01".into(),
            tiers: TierThresholds::default(),
        }
    }
}

/// Opening state of a session's user profile.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProfileConfig {
    pub name: String,
    #[serde(with = "decimal_str")]
    pub balance: TokenAmount,
    pub bottles: u64,
}

impl Default for ProfileConfig {
    fn default() -> Self {
        Self {
            name: "Francisco Cevallos".into(),
            balance: TokenAmount::from_cents(1_250),
            bottles: 120,
        }
    }
}

/// Everything needed to start a session.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    pub profile: ProfileConfig,
    pub rewards: RewardConfig,
    pub catalog: Vec<CatalogItem>,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            profile: ProfileConfig::default(),
            rewards: RewardConfig::default(),
            catalog: CatalogItem::defaults(),
        }
    }
}

impl SessionConfig {
    /// Parse and validate a TOML document. Missing keys take their defaults.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(s).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::Io(format!("{}: {e}", path.display())))?;
        Self::from_toml_str(&text)
    }

    pub fn to_toml_string(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let t = &self.rewards.tiers;
        if t.explorer == 0 || t.explorer >= t.guardian || t.guardian >= t.master {
            return Err(ConfigError::Invalid(format!(
                "tier thresholds must be non-zero and strictly increasing, got {}/{}/{}",
                t.explorer, t.guardian, t.master
            )));
        }
        if self.rewards.max_bottles_per_reading == 0 {
            return Err(ConfigError::Invalid(
                "max_bottles_per_reading must be at least 1".into(),
            ));
        }
        let max_kg = self.rewards.max_weight_kg_per_reading;
        if !max_kg.is_finite() || max_kg <= 0.0 {
            return Err(ConfigError::Invalid(
                "max_weight_kg_per_reading must be a positive number".into(),
            ));
        }
        if self.rewards.location.trim().is_empty() {
            return Err(ConfigError::Invalid("location must not be empty".into()));
        }

        let mut seen = HashSet::new();
        for item in &self.catalog {
            if item.id.trim().is_empty() {
                return Err(ConfigError::Invalid("catalog item with empty id".into()));
            }
            if !seen.insert(item.id.as_str()) {
                return Err(ConfigError::Invalid(format!(
                    "duplicate catalog item id: {}",
                    item.id
                )));
            }
        }
        Ok(())
    }
}

/// Errors from loading or validating configuration.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("cannot read config: {0}")]
    Io(String),

    #[error("cannot parse config: {0}")]
    Parse(String),

    #[error("invalid config: {0}")]
    Invalid(String),
}
