// SPDX-FileCopyrightText: 2026 Tiller Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration model structs for the Tiller dispatch layer.
//!
//! All structs use `#[serde(deny_unknown_fields)]` to reject unrecognized
//! config keys at startup, providing actionable error messages.

use serde::{Deserialize, Serialize};

/// Top-level Tiller configuration.
///
/// Loaded from TOML files following XDG hierarchy, with environment variable
/// overrides. All sections are optional and default to sensible values.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct TillerConfig {
    /// Agent identity settings.
    #[serde(default)]
    pub agent: AgentConfig,

    /// Intent classifier thresholds.
    #[serde(default)]
    pub classifier: ClassifierConfig,

    /// Tool registry admission settings.
    #[serde(default)]
    pub registry: RegistryConfig,

    /// Tool result cache settings.
    #[serde(default)]
    pub cache: CacheConfig,
}

/// Agent identity configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct AgentConfig {
    /// Display name of the agent.
    #[serde(default = "default_agent_name")]
    pub name: String,

    /// Logging level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            name: default_agent_name(),
            log_level: default_log_level(),
        }
    }
}

fn default_agent_name() -> String {
    "tiller".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Intent classifier configuration.
///
/// Controls the thresholds that turn a scored query into a route and a
/// tool-forcing directive. Defaults match the tuned production values.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ClassifierConfig {
    /// Score threshold above which the averaged complexity routes to the
    /// tool-capable path when no pattern override fires (0.0-1.0).
    #[serde(default = "default_route_threshold")]
    pub route_threshold: f64,

    /// Confidence above which a tool-specific intent counts as present,
    /// unconditionally forcing the tool path (0.0-1.0).
    #[serde(default = "default_intent_floor")]
    pub intent_floor: f64,

    /// Confidence above which a tool intent participates in forcing
    /// resolution: one confident intent forces that tool, two or more
    /// leave the choice to the model (0.0-1.0).
    #[serde(default = "default_forcing_floor")]
    pub forcing_floor: f64,

    /// Context complexity below which a conversational query (with no
    /// complex pattern match) skips the tool path entirely (0.0-1.0).
    #[serde(default = "default_simple_context_ceiling")]
    pub simple_context_ceiling: f64,

    /// Conversation length (in turns) beyond which the complexity score
    /// receives a flat boost.
    #[serde(default = "default_long_history_turns")]
    pub long_history_turns: usize,

    /// Flat complexity boost applied once the conversation exceeds
    /// `long_history_turns` (0.0-1.0).
    #[serde(default = "default_long_history_weight")]
    pub long_history_weight: f64,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            route_threshold: default_route_threshold(),
            intent_floor: default_intent_floor(),
            forcing_floor: default_forcing_floor(),
            simple_context_ceiling: default_simple_context_ceiling(),
            long_history_turns: default_long_history_turns(),
            long_history_weight: default_long_history_weight(),
        }
    }
}

fn default_route_threshold() -> f64 {
    0.6
}

fn default_intent_floor() -> f64 {
    0.1
}

fn default_forcing_floor() -> f64 {
    0.3
}

fn default_simple_context_ceiling() -> f64 {
    0.3
}

fn default_long_history_turns() -> usize {
    3
}

fn default_long_history_weight() -> f64 {
    0.2
}

/// Tool registry admission configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct RegistryConfig {
    /// Minimum fraction of a provider's declared tools that must pass
    /// schema validation. Below this ratio the whole batch is rejected
    /// (circuit breaker); at or above it, tools are admitted individually.
    #[serde(default = "default_min_admission_ratio")]
    pub min_admission_ratio: f64,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            min_admission_ratio: default_min_admission_ratio(),
        }
    }
}

fn default_min_admission_ratio() -> f64 {
    0.5
}

/// Tool result cache configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct CacheConfig {
    /// Enable the tool result cache. When false, every call executes.
    #[serde(default = "default_cache_enabled")]
    pub enabled: bool,

    /// Number of distinct search aspects in a single query at which the
    /// fingerprint collapses to the per-subject "comprehensive" key.
    /// Tuned empirically; preserved for fingerprint compatibility.
    #[serde(default = "default_comprehensive_aspect_threshold")]
    pub comprehensive_aspect_threshold: usize,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            enabled: default_cache_enabled(),
            comprehensive_aspect_threshold: default_comprehensive_aspect_threshold(),
        }
    }
}

fn default_cache_enabled() -> bool {
    true
}

fn default_comprehensive_aspect_threshold() -> usize {
    3
}
