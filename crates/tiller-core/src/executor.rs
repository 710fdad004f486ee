// SPDX-FileCopyrightText: 2026 Tiller Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The executor capability supplied by the calling layer.
//!
//! The executor performs the actual network/tool invocation and is opaque
//! to this layer. Timeouts and retries belong to the executor, not to the
//! coordinator that drives it.

use async_trait::async_trait;

use crate::error::TillerError;
use crate::types::{ToolCall, ToolResult};

/// Executes a single tool call against its concrete backend.
///
/// The coordinator may have several calls from one batch in flight at once;
/// implementations must correlate each result back to `call.id`.
#[async_trait]
pub trait ToolExecutor: Send + Sync {
    async fn run(&self, call: &ToolCall) -> Result<ToolResult, TillerError>;
}
