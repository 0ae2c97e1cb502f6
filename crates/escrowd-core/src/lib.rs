// SPDX-FileCopyrightText: 2026 Escrowd Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for the escrowd escrow bot.
//!
//! This crate provides the domain types, the escrow fee schedule, the deal
//! form parser, and the error type used throughout the escrowd workspace.
//! It has no knowledge of Telegram or SQLite; those live in the adapter
//! crates.

pub mod error;
pub mod fees;
pub mod form;
pub mod traits;
pub mod types;

// Re-export key items at crate root for ergonomic imports.
pub use error::EscrowdError;
pub use types::{Deal, DealDraft, DealStatus, EditField};

pub use traits::{Detection, ImageClassifier};
