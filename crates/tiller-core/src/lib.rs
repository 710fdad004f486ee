// SPDX-FileCopyrightText: 2026 Tiller Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core types for the Tiller decision-and-dispatch layer.
//!
//! Tiller routes a natural-language request through an LLM-driven agent:
//! it decides whether the request needs external tools, which ones, and
//! prevents redundant tool calls across a conversation. This crate holds
//! the shared vocabulary: the error type, the domain types (queries, tool
//! calls, descriptors, results), and the [`ToolExecutor`] trait the calling
//! layer implements.

pub mod error;
pub mod executor;
pub mod types;

pub use error::TillerError;
pub use executor::ToolExecutor;
pub use types::{ChatTurn, Query, Role, ToolCall, ToolDescriptor, ToolResult, ToolSource};
