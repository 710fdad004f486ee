// SPDX-FileCopyrightText: 2026 Tiller Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Common types shared across the Tiller crates.
//!
//! Everything here is created once per turn (or per provider-connect event)
//! and never mutated afterwards: the classifier, registry, cache, and
//! coordinator all treat these as read-only inputs.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// The author of a conversation turn.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
    System,
    Tool,
}

/// A single prior turn of the conversation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatTurn {
    pub role: Role,
    pub content: String,
}

impl ChatTurn {
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }
}

/// A user request: immutable text plus ordered prior turns.
#[derive(Debug, Clone)]
pub struct Query {
    pub text: String,
    pub history: Vec<ChatTurn>,
}

impl Query {
    pub fn new(text: impl Into<String>, history: Vec<ChatTurn>) -> Self {
        Self {
            text: text.into(),
            history,
        }
    }
}

/// One model-requested tool invocation.
///
/// `id` is provider-assigned and unique within a batch. Two calls with the
/// same cache fingerprint are treated as semantically identical even when
/// their ids and raw arguments differ.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolCall {
    pub id: String,
    pub name: String,
    pub args: serde_json::Value,
}

impl ToolCall {
    pub fn new(id: impl Into<String>, name: impl Into<String>, args: serde_json::Value) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            args,
        }
    }
}

/// Output from one tool invocation, correlated back to its originating call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolResult {
    /// The `ToolCall::id` this result answers.
    pub call_id: String,
    /// Name of the tool that produced the result.
    pub tool_name: String,
    /// The result payload (text or JSON).
    pub content: String,
    /// Whether the invocation failed. Error results are never cached.
    pub is_error: bool,
}

impl ToolResult {
    pub fn ok(call_id: impl Into<String>, tool_name: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            call_id: call_id.into(),
            tool_name: tool_name.into(),
            content: content.into(),
            is_error: false,
        }
    }

    pub fn error(call_id: impl Into<String>, tool_name: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            call_id: call_id.into(),
            tool_name: tool_name.into(),
            content: message.into(),
            is_error: true,
        }
    }
}

/// Where a tool descriptor came from.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum ToolSource {
    /// Built-in tool registered at process start.
    Fixed,
    /// Tool discovered from an external provider at connect time.
    Dynamic,
}

/// A tool as declared by a provider, before admission.
///
/// Immutable once admitted into the registry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolDescriptor {
    pub name: String,
    pub description: String,
    /// Declared input schema. `None` admits the tool with a permissive
    /// accept-any-object schema at call time.
    pub schema: Option<serde_json::Value>,
    pub source: ToolSource,
    /// Whether an executor capability exists for this tool.
    pub executable: bool,
}

impl ToolDescriptor {
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        schema: Option<serde_json::Value>,
        source: ToolSource,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            schema,
            source,
            executable: true,
        }
    }
}
