// SPDX-FileCopyrightText: 2026 Tiller Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Tool registry for the Tiller dispatch layer.
//!
//! Validates tool descriptors arriving from external providers before they
//! reach the calling model's function-calling interface:
//! - [`SchemaNode`]: typed schema model with recursive structural validation
//! - [`ToolRegistry`]: per-provider admission with a validity-ratio circuit
//!   breaker that drops a whole batch when too many of its schemas are broken

pub mod registry;
pub mod schema;

pub use registry::{AdmissionReport, RejectedTool, ToolRegistry};
pub use schema::{SchemaNode, SchemaViolation};
