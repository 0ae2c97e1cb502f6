// SPDX-FileCopyrightText: 2026 Escrowd Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Row types stored in SQLite.
//!
//! The deal types live in `escrowd-core` so the bot layer can use them
//! without depending on storage; they are re-exported here for query code.

pub use escrowd_core::{Deal, DealDraft, DealStatus};

/// A page of deals plus the total row count for the active filter.
///
/// The total drives pagination arithmetic in the dashboard keyboard.
#[derive(Debug, Clone)]
pub struct DealPage {
    pub deals: Vec<Deal>,
    pub total: i64,
}
