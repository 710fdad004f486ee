// SPDX-FileCopyrightText: 2026 Tiller Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration loader using Figment for layered config merging.
//!
//! Supports XDG hierarchy: `./tiller.toml` > `~/.config/tiller/tiller.toml` > `/etc/tiller/tiller.toml`
//! with environment variable overrides via `TILLER_` prefix.

#![allow(clippy::result_large_err)] // figment::Error is external and cannot be boxed without wrapper

use std::path::Path;

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};

use crate::model::TillerConfig;

/// Load configuration from the standard XDG hierarchy with env var overrides.
///
/// Merge order (later overrides earlier):
/// 1. Compiled defaults
/// 2. `/etc/tiller/tiller.toml` (system-wide)
/// 3. `~/.config/tiller/tiller.toml` (user XDG config)
/// 4. `./tiller.toml` (local directory)
/// 5. `TILLER_*` environment variables
pub fn load_config() -> Result<TillerConfig, figment::Error> {
    build_figment().extract()
}

/// Load configuration from a specific TOML string only (no XDG lookup).
///
/// Used for testing and for hosts that manage config content themselves.
pub fn load_config_from_str(toml_content: &str) -> Result<TillerConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(TillerConfig::default()))
        .merge(Toml::string(toml_content))
        .extract()
}

/// Load configuration from a specific file path with env var overrides.
pub fn load_config_from_path(path: &Path) -> Result<TillerConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(TillerConfig::default()))
        .merge(Toml::file(path))
        .merge(env_provider())
        .extract()
}

/// Build the Figment used internally for config loading (exposed for diagnostic use).
///
/// Returns the Figment before extraction so callers can inspect metadata.
pub fn build_figment() -> Figment {
    Figment::new()
        .merge(Serialized::defaults(TillerConfig::default()))
        .merge(Toml::file("/etc/tiller/tiller.toml"))
        .merge(Toml::file(
            dirs::config_dir()
                .map(|d| d.join("tiller/tiller.toml"))
                .unwrap_or_default(),
        ))
        .merge(Toml::file("tiller.toml"))
        .merge(env_provider())
}

/// Create the environment variable provider using explicit `map()` for section-to-dot mapping.
///
/// CRITICAL: Uses `Env::map()` NOT `Env::split("_")` to avoid ambiguity with
/// underscore-containing key names. For example, `TILLER_CLASSIFIER_ROUTE_THRESHOLD`
/// must map to `classifier.route_threshold`, not `classifier.route.threshold`.
fn env_provider() -> Env {
    Env::prefixed("TILLER_").map(|key| {
        // `key` is the lowercased env var name with prefix stripped.
        // Example: TILLER_CLASSIFIER_ROUTE_THRESHOLD -> "classifier_route_threshold"
        let key_str = key.as_str();
        let mapped = key_str
            .replacen("agent_", "agent.", 1)
            .replacen("classifier_", "classifier.", 1)
            .replacen("registry_", "registry.", 1)
            .replacen("cache_", "cache.", 1);
        mapped.into()
    })
}
