// SPDX-FileCopyrightText: 2026 Escrowd Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration model structs for the escrowd bot.
//!
//! All structs use `#[serde(deny_unknown_fields)]` to reject unrecognized
//! config keys at startup, providing actionable error messages.

use serde::{Deserialize, Serialize};

/// Top-level escrowd configuration.
///
/// Loaded from TOML files following the XDG hierarchy, with environment
/// variable overrides. All sections are optional and default to sensible
/// values; the bot token is the only value required to actually serve.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct EscrowdConfig {
    /// Process identity and logging settings.
    #[serde(default)]
    pub agent: AgentConfig,

    /// Telegram bot, admin list, and managed-group settings.
    #[serde(default)]
    pub telegram: TelegramConfig,

    /// Storage backend settings.
    #[serde(default)]
    pub storage: StorageConfig,

    /// Image moderation settings.
    #[serde(default)]
    pub moderation: ModerationConfig,

    /// Prometheus metrics exporter settings.
    #[serde(default)]
    pub prometheus: PrometheusConfig,
}

/// Process identity and logging configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct AgentConfig {
    /// Display name of the bot process.
    #[serde(default = "default_agent_name")]
    pub name: String,

    /// Logging level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            name: default_agent_name(),
            log_level: default_log_level(),
        }
    }
}

fn default_agent_name() -> String {
    "escrowd".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Telegram bot integration configuration.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct TelegramConfig {
    /// Telegram Bot API token. `None` makes `serve` refuse to start.
    #[serde(default)]
    pub bot_token: Option<String>,

    /// Telegram user IDs authorized for the private admin dashboard.
    #[serde(default)]
    pub admin_ids: Vec<u64>,

    /// The group where escrow deals are made (commands work here).
    #[serde(default)]
    pub escrow_group_id: Option<i64>,

    /// The main community group (redirect and moderation only).
    #[serde(default)]
    pub main_group_id: Option<i64>,

    /// Invite link shown on redirect and greeting keyboards.
    #[serde(default)]
    pub escrow_group_link: Option<String>,

    /// Invite link to the main group, shown when greeting escrow members.
    #[serde(default)]
    pub main_group_link: Option<String>,

    /// Link to the announcement channel.
    #[serde(default)]
    pub main_channel_link: Option<String>,
}

impl TelegramConfig {
    /// The group-chat allow-list: events from any other group are dropped.
    pub fn allowed_group_ids(&self) -> Vec<i64> {
        self.escrow_group_id
            .into_iter()
            .chain(self.main_group_id)
            .collect()
    }
}

/// Storage backend configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct StorageConfig {
    /// Path to the SQLite database file.
    #[serde(default = "default_database_path")]
    pub database_path: String,

    /// Enable WAL (Write-Ahead Logging) mode for SQLite.
    #[serde(default = "default_wal_mode")]
    pub wal_mode: bool,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            database_path: default_database_path(),
            wal_mode: default_wal_mode(),
        }
    }
}

fn default_database_path() -> String {
    dirs::data_dir()
        .map(|p| p.join("escrowd").join("escrowd.db"))
        .unwrap_or_else(|| std::path::PathBuf::from("escrowd.db"))
        .to_string_lossy()
        .into_owned()
}

fn default_wal_mode() -> bool {
    true
}

/// Image moderation configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ModerationConfig {
    /// HTTP endpoint of the image classifier. `None` disables moderation.
    #[serde(default)]
    pub endpoint: Option<String>,

    /// Minimum detection confidence that counts as a positive signal.
    #[serde(default = "default_confidence_threshold")]
    pub confidence_threshold: f64,
}

impl Default for ModerationConfig {
    fn default() -> Self {
        Self {
            endpoint: None,
            confidence_threshold: default_confidence_threshold(),
        }
    }
}

fn default_confidence_threshold() -> f64 {
    0.5
}

/// Prometheus metrics exporter configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct PrometheusConfig {
    /// Serve metrics in Prometheus text format over HTTP when true.
    #[serde(default)]
    pub enabled: bool,

    /// Socket address the exporter listens on.
    #[serde(default = "default_prometheus_listen_addr")]
    pub listen_addr: String,
}

impl Default for PrometheusConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            listen_addr: default_prometheus_listen_addr(),
        }
    }
}

fn default_prometheus_listen_addr() -> String {
    "127.0.0.1:9184".to_string()
}
