// SPDX-FileCopyrightText: 2026 Tiller Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Post-deserialization validation for configuration values.
//!
//! Validates semantic constraints that cannot be expressed via serde
//! attributes, such as thresholds staying inside the unit interval and the
//! forcing floor dominating the intent floor.

use crate::diagnostic::ConfigError;
use crate::model::TillerConfig;

/// Validate a deserialized configuration for semantic correctness.
///
/// Returns `Ok(())` if all validations pass, or `Err(Vec<ConfigError>)` with
/// all collected validation errors (does not fail fast).
pub fn validate_config(config: &TillerConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();

    if config.agent.name.trim().is_empty() {
        errors.push(ConfigError::Validation {
            message: "agent.name must not be empty".to_string(),
        });
    }

    let unit_interval = [
        ("classifier.route_threshold", config.classifier.route_threshold),
        ("classifier.intent_floor", config.classifier.intent_floor),
        ("classifier.forcing_floor", config.classifier.forcing_floor),
        (
            "classifier.simple_context_ceiling",
            config.classifier.simple_context_ceiling,
        ),
        (
            "classifier.long_history_weight",
            config.classifier.long_history_weight,
        ),
        ("registry.min_admission_ratio", config.registry.min_admission_ratio),
    ];
    for (key, value) in unit_interval {
        if !(0.0..=1.0).contains(&value) {
            errors.push(ConfigError::Validation {
                message: format!("{key} must be in [0.0, 1.0], got {value}"),
            });
        }
    }

    // The forcing floor must not undercut the intent floor: an intent that
    // forces a single tool must at least count as present.
    if config.classifier.forcing_floor < config.classifier.intent_floor {
        errors.push(ConfigError::Validation {
            message: format!(
                "classifier.forcing_floor ({}) must be >= classifier.intent_floor ({})",
                config.classifier.forcing_floor, config.classifier.intent_floor
            ),
        });
    }

    if config.cache.comprehensive_aspect_threshold < 1 {
        errors.push(ConfigError::Validation {
            message: format!(
                "cache.comprehensive_aspect_threshold must be at least 1, got {}",
                config.cache.comprehensive_aspect_threshold
            ),
        });
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_validates() {
        let config = TillerConfig::default();
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn out_of_range_threshold_fails_validation() {
        let mut config = TillerConfig::default();
        config.classifier.route_threshold = 1.5;
        let errors = validate_config(&config).unwrap_err();
        assert!(errors
            .iter()
            .any(|e| matches!(e, ConfigError::Validation { message } if message.contains("route_threshold"))));
    }

    #[test]
    fn forcing_floor_below_intent_floor_fails_validation() {
        let mut config = TillerConfig::default();
        config.classifier.intent_floor = 0.4;
        config.classifier.forcing_floor = 0.2;
        let errors = validate_config(&config).unwrap_err();
        assert!(errors
            .iter()
            .any(|e| matches!(e, ConfigError::Validation { message } if message.contains("forcing_floor"))));
    }

    #[test]
    fn zero_aspect_threshold_fails_validation() {
        let mut config = TillerConfig::default();
        config.cache.comprehensive_aspect_threshold = 0;
        let errors = validate_config(&config).unwrap_err();
        assert!(errors
            .iter()
            .any(|e| matches!(e, ConfigError::Validation { message } if message.contains("comprehensive_aspect_threshold"))));
    }

    #[test]
    fn empty_agent_name_fails_validation() {
        let mut config = TillerConfig::default();
        config.agent.name = "  ".to_string();
        let errors = validate_config(&config).unwrap_err();
        assert!(errors
            .iter()
            .any(|e| matches!(e, ConfigError::Validation { message } if message.contains("agent.name"))));
    }

    #[test]
    fn valid_custom_config_passes() {
        let mut config = TillerConfig::default();
        config.classifier.route_threshold = 0.5;
        config.registry.min_admission_ratio = 0.75;
        config.cache.comprehensive_aspect_threshold = 4;
        assert!(validate_config(&config).is_ok());
    }
}
