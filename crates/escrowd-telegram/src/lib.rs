// SPDX-FileCopyrightText: 2026 Escrowd Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Telegram front end for the escrowd deal bot.
//!
//! Connects via long polling and routes updates three ways: group messages
//! to the keyword command handlers, private messages and callback queries
//! to the admin dashboard. Chats outside the configured groups are dropped
//! before any handler runs.

pub mod access;
pub mod callback;
pub mod commands;
pub mod context;
pub mod dashboard;
pub mod keyboards;
pub mod media;
pub mod moderation;
pub mod render;
pub mod scope;

use std::sync::Arc;

use escrowd_config::EscrowdConfig;
use escrowd_core::{EscrowdError, ImageClassifier};
use escrowd_dialog::SessionStore;
use escrowd_storage::{DealStore, SettingsStore};
use teloxide::prelude::*;
use teloxide::types::ChatKind;
use tracing::{error, info};

pub use context::AppContext;
pub use dashboard::PAGE_SIZE;
pub use moderation::HttpImageClassifier;

/// The long-polling Telegram bot.
///
/// Owns the teloxide [`Bot`] plus the shared [`AppContext`] that every
/// handler receives through dptree dependency injection.
pub struct EscrowBot {
    bot: Bot,
    ctx: Arc<AppContext>,
}

impl EscrowBot {
    /// Creates the bot from config and the already-opened stores.
    ///
    /// Requires `config.telegram.bot_token` to be set and non-empty.
    pub fn new(
        config: EscrowdConfig,
        deals: DealStore,
        settings: SettingsStore,
        dialogs: Arc<dyn SessionStore>,
        classifier: Option<Arc<dyn ImageClassifier>>,
    ) -> Result<Self, EscrowdError> {
        let token = config.telegram.bot_token.as_deref().ok_or_else(|| {
            EscrowdError::Config("telegram.bot_token is required to serve".into())
        })?;

        if token.is_empty() {
            return Err(EscrowdError::Config(
                "telegram.bot_token cannot be empty".into(),
            ));
        }

        let bot = Bot::new(token);
        let ctx = Arc::new(AppContext {
            config,
            deals,
            settings,
            dialogs,
            classifier,
        });

        Ok(Self { bot, ctx })
    }

    /// Returns a reference to the underlying teloxide Bot.
    pub fn bot(&self) -> &Bot {
        &self.bot
    }

    /// Runs the long-polling dispatcher until Ctrl-C.
    pub async fn dispatch(self) {
        info!("starting Telegram long polling");

        let handler = dptree::entry()
            .branch(Update::filter_message().endpoint(on_message))
            .branch(Update::filter_callback_query().endpoint(on_callback));

        Dispatcher::builder(self.bot, handler)
            .dependencies(dptree::deps![self.ctx])
            .default_handler(|_| async {}) // Silently ignore other update kinds
            .enable_ctrlc_handler()
            .build()
            .dispatch()
            .await;
    }
}

async fn on_message(bot: Bot, msg: Message, ctx: Arc<AppContext>) -> ResponseResult<()> {
    if !scope::admit(&msg.chat, &ctx.config.telegram.allowed_group_ids()) {
        return Ok(());
    }

    let result = match msg.chat.kind {
        ChatKind::Private(_) => dashboard::handle_private_message(&bot, &msg, &ctx).await,
        ChatKind::Public(_) => commands::handle_group_message(&bot, &msg, &ctx).await,
    };
    if let Err(e) = result {
        error!(error = %e, chat_id = msg.chat.id.0, "message handler failed");
    }
    Ok(())
}

async fn on_callback(bot: Bot, q: CallbackQuery, ctx: Arc<AppContext>) -> ResponseResult<()> {
    if let Err(e) = dashboard::handle_callback(&bot, &q, &ctx).await {
        error!(error = %e, user_id = q.from.id.0, "callback handler failed");
    }
    Ok(())
}
