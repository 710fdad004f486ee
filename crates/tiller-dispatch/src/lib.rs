// SPDX-FileCopyrightText: 2026 Tiller Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Tool call batch execution for the Tiller dispatch layer.
//!
//! [`ToolExecutionCoordinator`] sits between the routing layer and a
//! [`tiller_core::ToolExecutor`]: it collapses duplicate calls, serves what
//! the shared cache already knows, runs the rest concurrently, and reports
//! per-batch accounting.

pub mod coordinator;

pub use coordinator::{DispatchSummary, ExecutionReport, ToolExecutionCoordinator};
