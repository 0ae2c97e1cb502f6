// SPDX-FileCopyrightText: 2026 Escrowd Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Post-deserialization validation for configuration values.
//!
//! Validates semantic constraints that cannot be expressed via serde
//! attributes, such as non-empty paths and well-formed group identifiers.

use crate::diagnostic::ConfigError;
use crate::model::EscrowdConfig;

/// Validate a deserialized configuration for semantic correctness.
///
/// Returns `Ok(())` if all validations pass, or `Err(Vec<ConfigError>)` with
/// all collected validation errors (does not fail fast).
pub fn validate_config(config: &EscrowdConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();

    // Validate database_path is not empty
    if config.storage.database_path.trim().is_empty() {
        errors.push(ConfigError::Validation {
            message: "storage.database_path must not be empty".to_string(),
        });
    }

    // Telegram supergroup chat ids are negative; a positive id is a user
    // or a mistyped value.
    if let Some(id) = config.telegram.escrow_group_id
        && id >= 0
    {
        errors.push(ConfigError::Validation {
            message: format!("telegram.escrow_group_id must be a negative group chat id, got {id}"),
        });
    }

    if let Some(id) = config.telegram.main_group_id
        && id >= 0
    {
        errors.push(ConfigError::Validation {
            message: format!("telegram.main_group_id must be a negative group chat id, got {id}"),
        });
    }

    // Validate bot token is not blank when present
    if let Some(token) = &config.telegram.bot_token
        && token.trim().is_empty()
    {
        errors.push(ConfigError::Validation {
            message: "telegram.bot_token must not be blank when set".to_string(),
        });
    }

    // Validate confidence threshold is a probability
    let threshold = config.moderation.confidence_threshold;
    if !(0.0..=1.0).contains(&threshold) {
        errors.push(ConfigError::Validation {
            message: format!(
                "moderation.confidence_threshold must be between 0.0 and 1.0, got {threshold}"
            ),
        });
    }

    // Validate moderation endpoint looks like an HTTP URL when set
    if let Some(endpoint) = &config.moderation.endpoint
        && !(endpoint.starts_with("http://") || endpoint.starts_with("https://"))
    {
        errors.push(ConfigError::Validation {
            message: format!(
                "moderation.endpoint must be an http(s) URL, got `{endpoint}`"
            ),
        });
    }

    // Validate the exporter listen address parses when metrics are on
    if config.prometheus.enabled
        && config
            .prometheus
            .listen_addr
            .parse::<std::net::SocketAddr>()
            .is_err()
    {
        errors.push(ConfigError::Validation {
            message: format!(
                "prometheus.listen_addr must be a host:port socket address, got `{}`",
                config.prometheus.listen_addr
            ),
        });
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
