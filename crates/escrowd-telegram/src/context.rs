// SPDX-FileCopyrightText: 2026 Escrowd Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Shared handler context injected into every update handler.

use std::sync::Arc;

use escrowd_config::EscrowdConfig;
use escrowd_core::{EscrowdError, ImageClassifier};
use escrowd_dialog::SessionStore;
use escrowd_storage::{DealStore, SettingsStore};

/// Everything a handler needs: config, stores, dialog sessions, and the
/// optional image classifier.
pub struct AppContext {
    pub config: EscrowdConfig,
    pub deals: DealStore,
    pub settings: SettingsStore,
    pub dialogs: Arc<dyn SessionStore>,
    pub classifier: Option<Arc<dyn ImageClassifier>>,
}

/// Map a failed Telegram request into the crate error type.
pub(crate) fn send_err(e: teloxide::RequestError) -> EscrowdError {
    EscrowdError::Channel {
        message: format!("telegram request failed: {e}"),
        source: Some(Box::new(e)),
    }
}
