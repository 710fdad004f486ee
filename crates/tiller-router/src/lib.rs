// SPDX-FileCopyrightText: 2026 Tiller Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Turn orchestration for the Tiller dispatch layer.
//!
//! Composes the classifier, registry, cache, and coordinator into the
//! single entry point a host agent drives: [`OrchestrationRouter::plan_turn`]
//! before the model call, [`OrchestrationRouter::dispatch_tool_calls`] after.

pub mod router;

pub use router::{OrchestrationRouter, ToolChoice, TurnPlan};
