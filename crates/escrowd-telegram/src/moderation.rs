// SPDX-FileCopyrightText: 2026 Escrowd Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Image moderation for the managed groups.
//!
//! Every photo or image document posted in an allowed group is classified
//! by an external detector service. Messages with an explicit detection at
//! or above the configured confidence are deleted and the sender is warned
//! with a short-lived notice.

use std::time::Duration;

use async_trait::async_trait;
use escrowd_core::{Detection, EscrowdError, ImageClassifier};
use teloxide::prelude::*;
use teloxide::types::ParseMode;
use tracing::{debug, warn};

use crate::context::AppContext;
use crate::media;
use crate::render;

/// Detection labels that warrant deletion.
pub const SENSITIVE_LABELS: &[&str] = &[
    "FEMALE_GENITALIA_EXPOSED",
    "MALE_GENITALIA_EXPOSED",
    "FEMALE_BREAST_EXPOSED",
    "ANUS_EXPOSED",
    "BUTTOCKS_EXPOSED",
];

/// How long the warning stays up before the bot removes it.
const WARNING_TTL: Duration = Duration::from_secs(5);

/// Whether any detection is a sensitive label at or above `threshold`.
pub fn is_sensitive(detections: &[Detection], threshold: f64) -> bool {
    detections
        .iter()
        .any(|d| d.score >= threshold && SENSITIVE_LABELS.contains(&d.label.as_str()))
}

/// Classifier backed by an HTTP detector service.
///
/// POSTs raw image bytes and expects a JSON array of labeled detections.
pub struct HttpImageClassifier {
    client: reqwest::Client,
    endpoint: String,
}

impl HttpImageClassifier {
    pub fn new(endpoint: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint,
        }
    }
}

#[async_trait]
impl ImageClassifier for HttpImageClassifier {
    async fn classify(&self, image: &[u8]) -> Result<Vec<Detection>, EscrowdError> {
        let response = self
            .client
            .post(&self.endpoint)
            .header(reqwest::header::CONTENT_TYPE, "application/octet-stream")
            .body(image.to_vec())
            .send()
            .await
            .map_err(|e| EscrowdError::Classifier {
                message: format!("classifier request failed: {e}"),
                source: Some(Box::new(e)),
            })?
            .error_for_status()
            .map_err(|e| EscrowdError::Classifier {
                message: format!("classifier returned error status: {e}"),
                source: Some(Box::new(e)),
            })?;

        response
            .json::<Vec<Detection>>()
            .await
            .map_err(|e| EscrowdError::Classifier {
                message: format!("classifier response was not valid JSON: {e}"),
                source: Some(Box::new(e)),
            })
    }
}

/// Classify a group message's image and delete it if sensitive.
///
/// Returns `true` when the message was removed. Classifier failures are
/// logged and leave the message alone; moderation must not take the whole
/// update handler down.
pub async fn moderate(bot: &Bot, msg: &Message, ctx: &AppContext) -> Result<bool, EscrowdError> {
    let Some(classifier) = ctx.classifier.as_ref() else {
        return Ok(false);
    };
    let Some(file_meta) = media::classifiable_image(msg) else {
        return Ok(false);
    };

    let image = media::download_file(bot, file_meta).await?;
    let detections = match classifier.classify(&image).await {
        Ok(detections) => detections,
        Err(e) => {
            warn!(error = %e, msg_id = msg.id.0, "image classification failed, leaving message");
            return Ok(false);
        }
    };

    let threshold = ctx.config.moderation.confidence_threshold;
    if !is_sensitive(&detections, threshold) {
        return Ok(false);
    }

    bot.delete_message(msg.chat.id, msg.id)
        .await
        .map_err(|e| EscrowdError::Channel {
            message: format!("failed to delete flagged message: {e}"),
            source: Some(Box::new(e)),
        })?;
    metrics::counter!("escrowd_moderation_deletions_total").increment(1);
    debug!(chat_id = msg.chat.id.0, msg_id = msg.id.0, "flagged image removed");

    let mention = msg
        .from
        .as_ref()
        .map(|u| render::mention(u.id.0, &u.full_name()))
        .unwrap_or_else(|| "User".to_string());
    let warning = bot
        .send_message(
            msg.chat.id,
            format!(
                "\u{1F6AB} {mention}, NSFW content is not allowed in this group and has been removed."
            ),
        )
        .parse_mode(ParseMode::Html)
        .await
        .map_err(|e| EscrowdError::Channel {
            message: format!("failed to send moderation warning: {e}"),
            source: Some(Box::new(e)),
        })?;

    tokio::time::sleep(WARNING_TTL).await;
    if let Err(e) = bot.delete_message(warning.chat.id, warning.id).await {
        debug!(error = %e, "could not remove moderation warning");
    }

    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn detection(label: &str, score: f64) -> Detection {
        Detection {
            label: label.to_string(),
            score,
        }
    }

    #[test]
    fn sensitive_label_above_threshold_flags() {
        let detections = vec![
            detection("FACE_FEMALE", 0.99),
            detection("BUTTOCKS_EXPOSED", 0.62),
        ];
        assert!(is_sensitive(&detections, 0.5));
    }

    #[test]
    fn below_threshold_does_not_flag() {
        let detections = vec![detection("FEMALE_BREAST_EXPOSED", 0.49)];
        assert!(!is_sensitive(&detections, 0.5));
    }

    #[test]
    fn boundary_score_flags() {
        let detections = vec![detection("ANUS_EXPOSED", 0.5)];
        assert!(is_sensitive(&detections, 0.5));
    }

    #[test]
    fn benign_labels_never_flag() {
        let detections = vec![
            detection("FACE_MALE", 0.99),
            detection("FEET_COVERED", 0.97),
        ];
        assert!(!is_sensitive(&detections, 0.5));
        assert!(!is_sensitive(&[], 0.5));
    }
}
