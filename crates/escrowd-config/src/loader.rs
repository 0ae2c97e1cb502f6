// SPDX-FileCopyrightText: 2026 Escrowd Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration loader using Figment for layered config merging.
//!
//! Supports XDG hierarchy: `./escrowd.toml` > `~/.config/escrowd/escrowd.toml` > `/etc/escrowd/escrowd.toml`
//! with environment variable overrides via `ESCROWD_` prefix.

#![allow(clippy::result_large_err)] // figment::Error is external and cannot be boxed without wrapper

use std::path::Path;

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};

use crate::model::EscrowdConfig;

/// Load configuration from the standard XDG hierarchy with env var overrides.
///
/// Merge order (later overrides earlier):
/// 1. Compiled defaults
/// 2. `/etc/escrowd/escrowd.toml` (system-wide)
/// 3. `~/.config/escrowd/escrowd.toml` (user XDG config)
/// 4. `./escrowd.toml` (local directory)
/// 5. `ESCROWD_*` environment variables
pub fn load_config() -> Result<EscrowdConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(EscrowdConfig::default()))
        .merge(Toml::file("/etc/escrowd/escrowd.toml"))
        .merge(Toml::file(
            dirs::config_dir()
                .map(|d| d.join("escrowd/escrowd.toml"))
                .unwrap_or_default(),
        ))
        .merge(Toml::file("escrowd.toml"))
        .merge(env_provider())
        .extract()
}

/// Load configuration from a TOML string only (no XDG lookup, no env).
///
/// Used for testing and for callers that supply config inline.
pub fn load_config_from_str(toml_content: &str) -> Result<EscrowdConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(EscrowdConfig::default()))
        .merge(Toml::string(toml_content))
        .extract()
}

/// Load configuration from a specific file path with env var overrides.
pub fn load_config_from_path(path: &Path) -> Result<EscrowdConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(EscrowdConfig::default()))
        .merge(Toml::file(path))
        .merge(env_provider())
        .extract()
}

/// Create the environment variable provider using explicit `map()` for section-to-dot mapping.
///
/// Uses `Env::map()` NOT `Env::split("_")` to avoid ambiguity with
/// underscore-containing key names. For example, `ESCROWD_TELEGRAM_BOT_TOKEN`
/// must map to `telegram.bot_token`, not `telegram.bot.token`.
fn env_provider() -> Env {
    Env::prefixed("ESCROWD_").map(|key| {
        // `key` is the lowercased env var name with prefix stripped.
        // Example: ESCROWD_TELEGRAM_BOT_TOKEN -> "telegram_bot_token"
        let key_str = key.as_str();
        let mapped = key_str
            .replacen("agent_", "agent.", 1)
            .replacen("telegram_", "telegram.", 1)
            .replacen("storage_", "storage.", 1)
            .replacen("moderation_", "moderation.", 1);
        mapped.into()
    })
}
