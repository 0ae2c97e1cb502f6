// SPDX-FileCopyrightText: 2026 Escrowd Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! SQLite persistence layer for the escrowd bot.
//!
//! Provides WAL-mode SQLite storage with embedded migrations, a single-writer
//! concurrency model via `tokio-rusqlite`, and typed stores for escrow deals
//! and runtime settings.
//!
//! All writes are serialized through tokio-rusqlite's single background
//! thread; `Database` IS the single writer. Query modules accept `&Database`
//! and call through `connection().call()`.

pub mod database;
pub mod migrations;
pub mod models;
pub mod queries;
pub mod store;

pub use database::Database;
pub use models::*;
pub use store::{DealStore, SettingsStore};
