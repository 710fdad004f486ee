// SPDX-FileCopyrightText: 2026 Tiller Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Diagnostic rendering for configuration errors.
//!
//! The config surface is small and closed: four flat sections with a fixed
//! key set each. Figment errors are resolved against that table, so an
//! unknown key can name its section, suggest the nearest valid key via
//! Jaro-Winkler similarity, and point a miette span at the offending line.

use miette::{Diagnostic, NamedSource, SourceSpan};
use thiserror::Error;

/// Minimum Jaro-Winkler similarity before a correction is offered.
const SUGGESTION_THRESHOLD: f64 = 0.75;

/// Every section and key the config model accepts. Kept in sync with
/// `model.rs` by the `table_matches_model` test below.
const SECTIONS: &[(&str, &[&str])] = &[
    ("agent", &["name", "log_level"]),
    (
        "classifier",
        &[
            "route_threshold",
            "intent_floor",
            "forcing_floor",
            "simple_context_ceiling",
            "long_history_turns",
            "long_history_weight",
        ],
    ),
    ("registry", &["min_admission_ratio"]),
    ("cache", &["enabled", "comprehensive_aspect_threshold"]),
];

/// A configuration error, rendered through miette.
#[derive(Debug, Error, Diagnostic)]
pub enum ConfigError {
    /// A key (or section) the model does not accept.
    #[error("unknown configuration key `{key}`")]
    #[diagnostic(code(tiller::config::unknown_key), help("{help}"))]
    UnknownKey {
        key: String,
        /// Either a "did you mean" suggestion or the valid key listing.
        help: String,
        #[label("unrecognized key")]
        span: Option<SourceSpan>,
        #[source_code]
        src: Option<NamedSource<String>>,
    },

    /// A value of the wrong TOML type.
    #[error("invalid value for `{key}`: {detail}")]
    #[diagnostic(code(tiller::config::invalid_value))]
    InvalidValue { key: String, detail: String },

    /// A semantic constraint violation (see `validation.rs`).
    #[error("validation error: {message}")]
    #[diagnostic(code(tiller::config::validation))]
    Validation { message: String },

    /// Anything figment reports that has no richer mapping.
    #[error("configuration error: {0}")]
    #[diagnostic(code(tiller::config::other))]
    Other(String),
}

/// Convert a figment error (which may bundle several) into diagnostics.
///
/// `sources` is the ordered list of `(path, content)` TOML files that fed
/// the load; the first one containing the offending key supplies the span.
pub fn figment_to_config_errors(
    err: figment::Error,
    sources: &[(String, String)],
) -> Vec<ConfigError> {
    use figment::error::Kind;

    err.into_iter()
        .map(|e| match &e.kind {
            Kind::UnknownField(field, _) => {
                unknown_key_error(e.path.first().map(String::as_str), field, sources)
            }
            Kind::InvalidType(actual, expected) => ConfigError::InvalidValue {
                key: e.path.join("."),
                detail: format!("found {actual}, expected {expected}"),
            },
            _ => ConfigError::Other(e.to_string()),
        })
        .collect()
}

fn unknown_key_error(
    section: Option<&str>,
    key: &str,
    sources: &[(String, String)],
) -> ConfigError {
    let help = match section {
        Some(s) => match suggest_key(s, key) {
            Some(valid) => format!("did you mean `{valid}`?"),
            None => format!("valid [{s}] keys: {}", section_keys(s).join(", ")),
        },
        // The unknown key is a section header itself.
        None => match closest(key, SECTIONS.iter().map(|(name, _)| *name)) {
            Some(valid) => format!("did you mean `[{valid}]`?"),
            None => format!(
                "valid sections: {}",
                SECTIONS
                    .iter()
                    .map(|(name, _)| *name)
                    .collect::<Vec<_>>()
                    .join(", ")
            ),
        },
    };

    let (span, src) = sources
        .iter()
        .find_map(|(path, content)| {
            key_span(content, section, key)
                .map(|span| (Some(span), Some(NamedSource::new(path, content.clone()))))
        })
        .unwrap_or((None, None));

    ConfigError::UnknownKey {
        key: key.to_string(),
        help,
        span,
        src,
    }
}

/// Nearest valid key within a section, if any clears the threshold.
pub fn suggest_key(section: &str, unknown: &str) -> Option<&'static str> {
    closest(unknown, section_keys(section).iter().copied())
}

fn section_keys(section: &str) -> &'static [&'static str] {
    SECTIONS
        .iter()
        .find(|(name, _)| *name == section)
        .map(|(_, keys)| *keys)
        .unwrap_or(&[])
}

fn closest<'a>(unknown: &str, candidates: impl IntoIterator<Item = &'a str>) -> Option<&'a str> {
    let mut best_score = SUGGESTION_THRESHOLD;
    let mut best = None;
    for candidate in candidates {
        let score = strsim::jaro_winkler(unknown, candidate);
        if score > best_score {
            best_score = score;
            best = Some(candidate);
        }
    }
    best
}

/// Locate `key` inside `[section]` (or a bad section header when `section`
/// is `None`), returning the span of the key text.
fn key_span(content: &str, section: Option<&str>, key: &str) -> Option<SourceSpan> {
    let Some(section) = section else {
        let header = format!("[{key}]");
        let pos = content.find(&header)?;
        return Some(SourceSpan::new((pos + 1).into(), key.len()));
    };

    let header = format!("[{section}]");
    let body_start = content.find(&header)? + header.len();
    let body = &content[body_start..];
    // Stop at the next section header so a key repeated elsewhere in the
    // file cannot shadow the one being reported.
    let body = &body[..body.find("\n[").map(|i| i + 1).unwrap_or(body.len())];

    let mut line_start = 0;
    for line in body.lines() {
        let trimmed = line.trim_start();
        if let Some(rest) = trimmed.strip_prefix(key) {
            if rest.trim_start().starts_with('=') {
                let indent = line.len() - trimmed.len();
                return Some(SourceSpan::new(
                    (body_start + line_start + indent).into(),
                    key.len(),
                ));
            }
        }
        line_start += line.len() + 1;
    }
    None
}

/// Render diagnostics to stderr with miette's graphical handler.
pub fn render_errors(errors: &[ConfigError]) {
    let handler = miette::GraphicalReportHandler::new();
    for error in errors {
        let mut out = String::new();
        if handler.render_report(&mut out, error).is_err() {
            out = format!("error: {error}\n");
        }
        eprint!("{out}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::TillerConfig;

    #[test]
    fn table_matches_model() {
        let value =
            serde_json::to_value(TillerConfig::default()).expect("default config serializes");
        for (section, keys) in SECTIONS {
            let section_obj = value
                .get(*section)
                .and_then(|v| v.as_object())
                .unwrap_or_else(|| panic!("section {section} missing from model"));
            for key in *keys {
                assert!(
                    section_obj.contains_key(*key),
                    "key {section}.{key} missing from model"
                );
            }
            assert_eq!(section_obj.len(), keys.len(), "[{section}] key count drifted");
        }
    }

    #[test]
    fn suggests_within_section() {
        assert_eq!(
            suggest_key("classifier", "route_treshold"),
            Some("route_threshold")
        );
        assert_eq!(suggest_key("classifier", "intent_flor"), Some("intent_floor"));
    }

    #[test]
    fn no_suggestion_for_distant_typo() {
        assert_eq!(suggest_key("classifier", "zzzzzz"), None);
    }

    #[test]
    fn unknown_section_suggests_a_section() {
        let err = unknown_key_error(None, "clasifier", &[]);
        let ConfigError::UnknownKey { help, .. } = err else {
            panic!("expected UnknownKey");
        };
        assert!(help.contains("[classifier]"), "got: {help}");
    }

    #[test]
    fn span_points_at_the_key_line() {
        let content = "[agent]\nname = \"x\"\n\n[classifier]\nroute_treshold = 0.6\n";
        let span = key_span(content, Some("classifier"), "route_treshold")
            .expect("key should be found");
        let start = span.offset();
        assert_eq!(&content[start..start + 14], "route_treshold");
    }

    #[test]
    fn span_does_not_cross_into_the_next_section() {
        // `enabled` exists only under [cache]; searching [agent] finds nothing.
        let content = "[agent]\nname = \"x\"\n\n[cache]\nenabled = true\n";
        assert!(key_span(content, Some("agent"), "enabled").is_none());
    }
}
