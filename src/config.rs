//! Validator configuration: thresholds, caps, cycle policy and UI timing.
//!
//! Every field has a default, so `{}` is a valid configuration document.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// A category pairing must score strictly above this to be accepted when no
/// port allow-list decides the connection.
pub const VALID_THRESHOLD: u8 = 50;
/// A candidate connection must score strictly above this to be suggested.
pub const SUGGEST_THRESHOLD: u8 = 60;
pub const MAX_CONNECTION_SUGGESTIONS: usize = 3;
pub const MIN_DISPLAY_MS: u64 = 400;

/// How the structural validator treats cycles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CyclePolicy {
    /// Loops are intended (iteration nodes); say nothing.
    Allow,
    #[default]
    Warn,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ValidatorConfig {
    pub valid_threshold: u8,
    pub suggest_threshold: u8,
    pub max_connection_suggestions: usize,
    pub cycle_policy: CyclePolicy,
    /// Minimum time a "validating..." indicator stays visible.
    pub min_display_ms: u64,
}

impl Default for ValidatorConfig {
    fn default() -> Self {
        ValidatorConfig {
            valid_threshold: VALID_THRESHOLD,
            suggest_threshold: SUGGEST_THRESHOLD,
            max_connection_suggestions: MAX_CONNECTION_SUGGESTIONS,
            cycle_policy: CyclePolicy::default(),
            min_display_ms: MIN_DISPLAY_MS,
        }
    }
}

impl ValidatorConfig {
    pub fn from_json(json: &str) -> Result<Self> {
        let config: ValidatorConfig =
            serde_json::from_str(json).map_err(|e| Error::parse("config", e))?;
        config.check()?;
        Ok(config)
    }

    pub fn check(&self) -> Result<()> {
        if self.valid_threshold > 100 || self.suggest_threshold > 100 {
            return Err(Error::InvalidConfig(
                "thresholds must be between 0 and 100".into(),
            ));
        }
        if self.max_connection_suggestions == 0 {
            return Err(Error::InvalidConfig(
                "maxConnectionSuggestions must be at least 1".into(),
            ));
        }
        Ok(())
    }

    pub fn with_cycle_policy(mut self, policy: CyclePolicy) -> Self {
        self.cycle_policy = policy;
        self
    }

    pub fn is_valid_score(&self, score: u8) -> bool {
        score > self.valid_threshold
    }

    pub fn is_suggestable_score(&self, score: u8) -> bool {
        score > self.suggest_threshold
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_document_uses_defaults() {
        let config = ValidatorConfig::from_json("{}").unwrap();
        assert_eq!(config, ValidatorConfig::default());
        assert_eq!(config.cycle_policy, CyclePolicy::Warn);
    }

    #[test]
    fn partial_override() {
        let config =
            ValidatorConfig::from_json(r#"{"suggestThreshold": 75, "cyclePolicy": "error"}"#).unwrap();
        assert_eq!(config.suggest_threshold, 75);
        assert_eq!(config.valid_threshold, VALID_THRESHOLD);
        assert_eq!(config.cycle_policy, CyclePolicy::Error);
    }

    #[test]
    fn thresholds_are_strict() {
        let config = ValidatorConfig::default();
        assert!(!config.is_valid_score(50));
        assert!(config.is_valid_score(51));
        assert!(!config.is_suggestable_score(60));
        assert!(config.is_suggestable_score(61));
    }

    #[test]
    fn rejects_out_of_range_values() {
        assert!(matches!(
            ValidatorConfig::from_json(r#"{"validThreshold": 120}"#),
            Err(Error::InvalidConfig(_))
        ));
        assert!(ValidatorConfig::from_json(r#"{"maxConnectionSuggestions": 0}"#).is_err());
        assert!(ValidatorConfig::from_json("not json").is_err());
    }
}
