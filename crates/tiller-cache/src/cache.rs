// SPDX-FileCopyrightText: 2026 Tiller Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Tool result cache keyed by semantic fingerprint.
//!
//! Entries live for the process lifetime; there is no TTL or eviction. The
//! working set is bounded by the small set of distinct fingerprints a
//! conversation produces, and staleness is acceptable at session scope.

use std::collections::HashMap;

use tiller_config::CacheConfig;
use tiller_core::{ToolCall, ToolResult};
use tracing::debug;

use crate::fingerprint::fingerprint;

/// Cumulative lookup statistics. Updated on every lookup, including lookups
/// resolved by intra-batch deduplication.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    pub total_calls: u64,
}

impl CacheStats {
    /// Hit rate over all lookups so far; 0.0 before any lookup.
    pub fn hit_rate(&self) -> f64 {
        if self.total_calls == 0 {
            0.0
        } else {
            self.hits as f64 / self.total_calls as f64
        }
    }
}

/// The batch split produced by [`ToolCache::partition`]: results answerable
/// from cache, and the deduplicated remainder that must execute.
#[derive(Debug, Clone, Default)]
pub struct CachePartition {
    pub cached: Vec<ToolResult>,
    pub to_execute: Vec<ToolCall>,
}

/// In-memory tool result cache.
///
/// Not internally synchronized: callers needing shared access wrap it in
/// their own lock (the coordinator holds it behind an async mutex).
pub struct ToolCache {
    config: CacheConfig,
    entries: HashMap<String, String>,
    stats: CacheStats,
}

impl ToolCache {
    pub fn new(config: CacheConfig) -> Self {
        Self {
            config,
            entries: HashMap::new(),
            stats: CacheStats::default(),
        }
    }

    /// The fingerprint this cache assigns to a call.
    pub fn key_for(&self, call: &ToolCall) -> String {
        fingerprint(call, self.config.comprehensive_aspect_threshold)
    }

    /// Look up a single call, recording the hit or miss.
    pub fn get(&mut self, call: &ToolCall) -> Option<String> {
        if !self.config.enabled {
            return None;
        }
        let key = self.key_for(call);
        self.stats.total_calls += 1;
        match self.entries.get(&key) {
            Some(content) => {
                self.stats.hits += 1;
                debug!(tool = call.name.as_str(), key, "cache hit");
                Some(content.clone())
            }
            None => {
                self.stats.misses += 1;
                None
            }
        }
    }

    /// Store a successful result. Error results must never reach this method;
    /// the coordinator only writes back `is_error == false` outputs.
    pub fn set(&mut self, call: &ToolCall, content: impl Into<String>) {
        if !self.config.enabled {
            return;
        }
        let key = self.key_for(call);
        self.entries.insert(key, content.into());
    }

    /// Split a batch into cache-answerable results and calls to execute.
    ///
    /// Duplicates are collapsed first: within one batch, calls sharing a
    /// fingerprint beyond the first occurrence are dropped before the
    /// cached/to-execute partition is computed, so the batch resolves to one
    /// result per unique fingerprint. A collapsed duplicate still counts as
    /// a lookup, mirroring its first occurrence's hit/miss outcome.
    pub fn partition(&mut self, calls: &[ToolCall]) -> CachePartition {
        // key -> whether the first occurrence was a cache hit
        let mut seen: HashMap<String, bool> = HashMap::new();
        let mut partition = CachePartition::default();

        for call in calls {
            let key = self.key_for(call);
            if let Some(&was_hit) = seen.get(&key) {
                if self.config.enabled {
                    self.stats.total_calls += 1;
                    if was_hit {
                        self.stats.hits += 1;
                    } else {
                        self.stats.misses += 1;
                    }
                }
                debug!(tool = call.name.as_str(), key, "duplicate call collapsed");
                continue;
            }
            if self.config.enabled {
                self.stats.total_calls += 1;
                if let Some(content) = self.entries.get(&key) {
                    self.stats.hits += 1;
                    debug!(tool = call.name.as_str(), key, "cache hit");
                    seen.insert(key, true);
                    partition
                        .cached
                        .push(ToolResult::ok(&call.id, &call.name, content.clone()));
                    continue;
                }
                self.stats.misses += 1;
            }
            seen.insert(key, false);
            partition.to_execute.push(call.clone());
        }

        partition
    }

    pub fn stats(&self) -> CacheStats {
        self.stats
    }

    /// Drop all entries and zero the statistics.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.stats = CacheStats::default();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for ToolCache {
    fn default() -> Self {
        Self::new(CacheConfig::default())
    }
}
