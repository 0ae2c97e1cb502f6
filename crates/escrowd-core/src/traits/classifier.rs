// SPDX-FileCopyrightText: 2026 Escrowd Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Image classifier trait for content moderation backends.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::EscrowdError;

/// One classifier detection: a label with a confidence score in `0.0..=1.0`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Detection {
    pub label: String,
    pub score: f64,
}

/// Adapter for image-content classification backends.
///
/// Given raw image bytes, returns the set of detected labels with
/// confidence scores. The moderation policy (which labels matter, at what
/// threshold) is decided by the caller, not the classifier.
#[async_trait]
pub trait ImageClassifier: Send + Sync {
    async fn classify(&self, image: &[u8]) -> Result<Vec<Detection>, EscrowdError>;
}
