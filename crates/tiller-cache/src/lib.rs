// SPDX-FileCopyrightText: 2026 Tiller Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Semantic tool result cache.
//!
//! Tool calls are keyed by a tool-aware fingerprint rather than raw
//! arguments, so differently-worded but semantically equivalent calls share
//! one cache entry. See [`fingerprint::fingerprint`] for the per-tool
//! normalization rules and [`ToolCache`] for lookup, write-back, and the
//! dedup-then-partition batch operation the coordinator drives.

pub mod cache;
pub mod fingerprint;

pub use cache::{CachePartition, CacheStats, ToolCache};
pub use fingerprint::fingerprint;
