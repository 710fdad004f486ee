// SPDX-FileCopyrightText: 2026 Tiller Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Concurrent tool call execution with cache integration.
//!
//! The coordinator owns the batch lifecycle: deduplicate, answer what the
//! cache can, dispatch the remainder concurrently, write successful results
//! back, and merge everything in first-occurrence order. Failures are
//! isolated per call: one failing tool never aborts its siblings, and its
//! result is never cached.

use std::collections::HashMap;
use std::sync::Arc;

use futures::future::join_all;
use tokio::sync::Mutex;
use tracing::{debug, warn};

use tiller_cache::{CacheStats, ToolCache};
use tiller_core::{ToolCall, ToolExecutor, ToolResult};

/// Per-batch accounting: how each unique call was answered.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DispatchSummary {
    /// Unique calls answered from cache.
    pub cached: usize,
    /// Unique calls dispatched to an executor.
    pub executed: usize,
    /// Unique calls in the batch after deduplication.
    pub total: usize,
}

/// Outcome of executing one batch of tool calls.
#[derive(Debug, Clone, Default)]
pub struct ExecutionReport {
    /// One result per unique call, in first-occurrence order.
    pub results: Vec<ToolResult>,
    pub summary: DispatchSummary,
    /// Human-readable messages for calls that failed outright.
    pub errors: Vec<String>,
}

/// Drives batches of tool calls through the cache and an executor.
///
/// The cache is shared behind an async mutex so a long-lived session and
/// its coordinator can observe the same entries. The lock is held only
/// around the partition and write-back phases, never across dispatch.
pub struct ToolExecutionCoordinator {
    cache: Arc<Mutex<ToolCache>>,
}

impl ToolExecutionCoordinator {
    pub fn new(cache: Arc<Mutex<ToolCache>>) -> Self {
        Self { cache }
    }

    /// Execute a batch of tool calls.
    ///
    /// Duplicates (by cache fingerprint) are collapsed to their first
    /// occurrence before anything runs. Cache-answerable calls never reach
    /// the executor. The rest dispatch concurrently; an `Err` from the
    /// executor becomes an error-flagged result for that call alone.
    /// Only `is_error == false` results are written back to the cache.
    pub async fn execute(
        &self,
        calls: &[ToolCall],
        executor: &dyn ToolExecutor,
    ) -> ExecutionReport {
        if calls.is_empty() {
            return ExecutionReport::default();
        }

        let partition = self.cache.lock().await.partition(calls);
        let cached_count = partition.cached.len();
        let executed_count = partition.to_execute.len();
        debug!(
            cached = cached_count,
            executing = executed_count,
            submitted = calls.len(),
            "tool batch partitioned"
        );

        let dispatches = partition
            .to_execute
            .iter()
            .map(|call| async move { (call, executor.run(call).await) });

        let mut errors = Vec::new();
        let mut executed: Vec<ToolResult> = Vec::with_capacity(executed_count);
        for (call, outcome) in join_all(dispatches).await {
            match outcome {
                Ok(result) => executed.push(result),
                Err(err) => {
                    let message = format!("tool `{}` failed: {err}", call.name);
                    warn!(tool = call.name.as_str(), call_id = call.id.as_str(), "{message}");
                    errors.push(message);
                    executed.push(ToolResult::error(&call.id, &call.name, err.to_string()));
                }
            }
        }

        {
            let mut cache = self.cache.lock().await;
            for (call, result) in partition.to_execute.iter().zip(&executed) {
                if !result.is_error {
                    cache.set(call, result.content.clone());
                }
            }
        }

        // Merge back into first-occurrence order: every unique call appears
        // in exactly one of the two partitions, keyed by call id.
        let mut by_id: HashMap<&str, &ToolResult> = HashMap::new();
        for result in partition.cached.iter().chain(&executed) {
            by_id.insert(result.call_id.as_str(), result);
        }
        let results: Vec<ToolResult> = calls
            .iter()
            .filter_map(|call| by_id.remove(call.id.as_str()))
            .cloned()
            .collect();

        ExecutionReport {
            results,
            summary: DispatchSummary {
                cached: cached_count,
                executed: executed_count,
                total: cached_count + executed_count,
            },
            errors,
        }
    }

    /// Cumulative cache statistics across all batches so far.
    pub async fn cache_stats(&self) -> CacheStats {
        self.cache.lock().await.stats()
    }
}
