// SPDX-FileCopyrightText: 2026 Escrowd Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `escrowd serve` command implementation.
//!
//! Opens the SQLite database, wires up the deal and settings stores, the
//! in-memory dialog sessions, and the optional image classifier, then runs
//! the Telegram long-polling dispatcher until interrupted.

use std::sync::Arc;

use escrowd_config::EscrowdConfig;
use escrowd_core::{EscrowdError, ImageClassifier};
use escrowd_dialog::InMemorySessionStore;
use escrowd_storage::{Database, DealStore, SettingsStore};
use escrowd_telegram::{EscrowBot, HttpImageClassifier};
use metrics_exporter_prometheus::PrometheusBuilder;
use tracing::{debug, info, warn};

/// Runs the `escrowd serve` command.
pub async fn run_serve(config: EscrowdConfig) -> Result<(), EscrowdError> {
    init_tracing(&config.agent.log_level);

    info!(name = %config.agent.name, "starting escrowd serve");

    init_metrics(&config);

    let db = Database::open_with(&config.storage.database_path, config.storage.wal_mode).await?;
    let deals = DealStore::new(db.clone());
    let settings = SettingsStore::new(db.clone());
    let dialogs = Arc::new(InMemorySessionStore::new());

    let classifier: Option<Arc<dyn ImageClassifier>> = match config.moderation.endpoint.clone() {
        Some(endpoint) => {
            info!(%endpoint, "image moderation enabled");
            Some(Arc::new(HttpImageClassifier::new(endpoint)))
        }
        None => {
            info!("image moderation disabled (no endpoint configured)");
            None
        }
    };

    let bot = EscrowBot::new(config, deals, settings, dialogs, classifier)?;
    bot.dispatch().await;

    info!("escrowd serve stopped");
    db.close().await?;
    Ok(())
}

/// Installs the Prometheus recorder and its HTTP listener when enabled.
///
/// Failures are logged and the process continues without metrics; the
/// counters fall back to the facade's no-op recorder.
fn init_metrics(config: &EscrowdConfig) {
    if !config.prometheus.enabled {
        debug!("prometheus metrics disabled by configuration");
        return;
    }

    let addr: std::net::SocketAddr = match config.prometheus.listen_addr.parse() {
        Ok(addr) => addr,
        Err(e) => {
            warn!(error = %e, addr = %config.prometheus.listen_addr,
                "invalid prometheus.listen_addr, continuing without metrics");
            return;
        }
    };

    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => info!(%addr, "prometheus metrics enabled"),
        Err(e) => {
            warn!(error = %e, "prometheus initialization failed, continuing without metrics");
        }
    }
}

/// Initializes the tracing subscriber with the configured log level.
fn init_tracing(log_level: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("escrowd={log_level},warn")));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_names(false)
        .init();
}
