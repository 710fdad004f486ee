// SPDX-FileCopyrightText: 2026 Tiller Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mock tool executor for deterministic testing.
//!
//! `MockExecutor` implements `ToolExecutor` with pre-configured per-tool
//! responses and failures, enabling fast, CI-runnable tests without real
//! tool backends. Every invocation is recorded so tests can assert on
//! exactly which calls reached execution.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;

use tiller_core::{TillerError, ToolCall, ToolExecutor, ToolResult};

/// A mock executor that answers tool calls from a fixed response table.
///
/// Tools in the failure set return `Err`; tools in the error-result set
/// return a non-`Err` result flagged `is_error`. Anything else returns the
/// configured response text, or a default payload naming the tool.
pub struct MockExecutor {
    responses: HashMap<String, String>,
    failures: HashSet<String>,
    error_results: HashSet<String>,
    invocations: Arc<Mutex<Vec<ToolCall>>>,
}

impl MockExecutor {
    pub fn new() -> Self {
        Self {
            responses: HashMap::new(),
            failures: HashSet::new(),
            error_results: HashSet::new(),
            invocations: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Configure the response text for a tool.
    pub fn with_response(mut self, tool: impl Into<String>, content: impl Into<String>) -> Self {
        self.responses.insert(tool.into(), content.into());
        self
    }

    /// Make a tool return `Err` from `run`.
    pub fn with_failure(mut self, tool: impl Into<String>) -> Self {
        self.failures.insert(tool.into());
        self
    }

    /// Make a tool return a result flagged `is_error`.
    pub fn with_error_result(mut self, tool: impl Into<String>) -> Self {
        self.error_results.insert(tool.into());
        self
    }

    /// The calls that reached execution, in dispatch order.
    pub async fn invocations(&self) -> Vec<ToolCall> {
        self.invocations.lock().await.clone()
    }

    pub async fn call_count(&self) -> usize {
        self.invocations.lock().await.len()
    }
}

impl Default for MockExecutor {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ToolExecutor for MockExecutor {
    async fn run(&self, call: &ToolCall) -> Result<ToolResult, TillerError> {
        self.invocations.lock().await.push(call.clone());

        if self.failures.contains(&call.name) {
            return Err(TillerError::execution(format!(
                "mock failure for `{}`",
                call.name
            )));
        }
        if self.error_results.contains(&call.name) {
            return Ok(ToolResult::error(
                &call.id,
                &call.name,
                format!("mock error result for `{}`", call.name),
            ));
        }

        let content = self
            .responses
            .get(&call.name)
            .cloned()
            .unwrap_or_else(|| format!("mock response from `{}`", call.name));
        Ok(ToolResult::ok(&call.id, &call.name, content))
    }
}
