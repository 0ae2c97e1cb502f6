// SPDX-FileCopyrightText: 2026 Escrowd Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Adapter traits implemented by the escrowd collaborator crates.

pub mod classifier;

pub use classifier::{Detection, ImageClassifier};
