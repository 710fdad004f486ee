// SPDX-FileCopyrightText: 2026 Tiller Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Intent classification for the Tiller dispatch layer.
//!
//! This crate provides:
//! - [`PatternLibrary`]: static regex rule tables grouped by category,
//!   plus per-tool intent profiles
//! - [`IntentClassifier`]: complexity scoring, pattern matching, routing,
//!   and tool-forcing resolution (zero-cost, zero-latency)
//!
//! The classifier runs before every model invocation, deciding whether the
//! turn takes the tool-capable path and whether a specific tool call is
//! mandatory. It never fails a turn: internal errors degrade to the
//! tool-capable path with no forcing.

pub mod classifier;
pub mod patterns;

pub use classifier::{ClassificationResult, ForcingDirective, IntentClassifier};
pub use patterns::{IntentScore, PatternCategory, PatternLibrary};
