// SPDX-FileCopyrightText: 2026 Tiller Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Shared test doubles for the Tiller crates.

pub mod mock_executor;

pub use mock_executor::MockExecutor;
