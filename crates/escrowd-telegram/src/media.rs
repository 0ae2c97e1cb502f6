// SPDX-FileCopyrightText: 2026 Escrowd Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Downloading message media from Telegram servers.

use escrowd_core::EscrowdError;
use teloxide::net::Download;
use teloxide::prelude::*;
use teloxide::types::FileMeta;
use tracing::debug;

/// Downloads a file from Telegram servers by its file metadata.
///
/// Uses the Bot API's `getFile` to resolve the file path, then downloads
/// the file content as bytes.
pub async fn download_file(bot: &Bot, file_meta: &FileMeta) -> Result<Vec<u8>, EscrowdError> {
    let file = bot
        .get_file(file_meta.id.clone())
        .await
        .map_err(|e| EscrowdError::Channel {
            message: format!("failed to get file info: {e}"),
            source: Some(Box::new(e)),
        })?;

    let mut buf = Vec::new();
    bot.download_file(&file.path, &mut buf)
        .await
        .map_err(|e| EscrowdError::Channel {
            message: format!("failed to download file: {e}"),
            source: Some(Box::new(e)),
        })?;

    debug!(
        file_id = %file_meta.id,
        size = buf.len(),
        "downloaded file from Telegram"
    );
    Ok(buf)
}

/// The image file attached to a message, if it carries one that can be
/// classified: a photo (largest size) or an image document. Videos,
/// stickers, and non-image documents return `None`.
pub fn classifiable_image(msg: &Message) -> Option<&FileMeta> {
    if let Some(photos) = msg.photo() {
        return photos.last().map(|p| &p.file);
    }
    if let Some(doc) = msg.document()
        && doc
            .mime_type
            .as_ref()
            .is_some_and(|m| m.essence_str().starts_with("image/"))
    {
        return Some(&doc.file);
    }
    None
}
