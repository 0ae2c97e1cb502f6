// SPDX-FileCopyrightText: 2026 Escrowd Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Private admin dashboard: /start, inline callback actions, and the
//! message steps of the edit/status/QR flows.
//!
//! Callback payloads are stateless where possible (deal id, page, and
//! filter ride along in the payload); the dialog store carries only what
//! a payload cannot: which deal and field an upcoming free-text message
//! applies to.

use escrowd_core::{DealStatus, EditField, EscrowdError};
use escrowd_dialog::{DialogState, ListPosition, SessionKey};
use teloxide::prelude::*;
use teloxide::types::{ChatId, InlineKeyboardMarkup, MessageId, ParseMode};
use tracing::debug;

use crate::access::is_platform_admin;
use crate::callback::CallbackAction;
use crate::context::{send_err, AppContext};
use crate::keyboards;
use crate::render;

/// Deals shown per dashboard list page.
pub const PAGE_SIZE: u32 = 10;

/// Handle a private-chat message: /start plus the free-text steps of the
/// QR and edit flows.
pub async fn handle_private_message(
    bot: &Bot,
    msg: &Message,
    ctx: &AppContext,
) -> Result<(), EscrowdError> {
    let Some(user) = msg.from.as_ref() else {
        return Ok(());
    };
    let text = msg.text().unwrap_or_default().trim();

    if text == "/start" || text.starts_with("/start ") {
        if !is_platform_admin(user.id.0, &ctx.config.telegram.admin_ids) {
            bot.send_message(msg.chat.id, "\u{26D4} Access Denied")
                .await
                .map_err(send_err)?;
            return Ok(());
        }
        let key = SessionKey::new(msg.chat.id.0, user.id.0);
        ctx.dialogs.clear(&key).await?;
        bot.send_message(msg.chat.id, render::DASHBOARD_TEXT)
            .parse_mode(ParseMode::Html)
            .reply_markup(keyboards::admin_home())
            .await
            .map_err(send_err)?;
        return Ok(());
    }

    if !is_platform_admin(user.id.0, &ctx.config.telegram.admin_ids) {
        return Ok(());
    }

    let key = SessionKey::new(msg.chat.id.0, user.id.0);
    match ctx.dialogs.get(&key).await? {
        Some(DialogState::WaitingQrUrl) => receive_qr_url(bot, msg, ctx, key, text).await,
        Some(DialogState::EditWaitingValue {
            deal_id,
            field,
            origin,
        }) => receive_edit_value(bot, msg, ctx, key, deal_id, field, origin, text).await,
        // Choose-field and choose-status steps are callback-driven; a free
        // text message during them means nothing.
        _ => Ok(()),
    }
}

fn valid_qr_url(url: &str) -> bool {
    url.starts_with("http://") || url.starts_with("https://")
}

/// Amounts typed into the edit flow obey the same rule the form parser
/// enforces at creation: finite and non-negative.
fn parse_edit_amount(raw: &str) -> Option<f64> {
    let amount: f64 = raw.parse().ok()?;
    (amount.is_finite() && amount >= 0.0).then_some(amount)
}

/// Outcome of feeding one message into the change-QR flow.
#[derive(Debug, PartialEq, Eq)]
enum QrStep {
    /// Input rejected; the session is left in place so the admin can retry.
    Reprompt,
    /// URL persisted, session cleared.
    Updated,
}

async fn advance_qr_url(
    ctx: &AppContext,
    key: SessionKey,
    url: &str,
) -> Result<QrStep, EscrowdError> {
    if !valid_qr_url(url) {
        return Ok(QrStep::Reprompt);
    }
    ctx.settings.set_qr_photo_url(url).await?;
    ctx.dialogs.clear(&key).await?;
    Ok(QrStep::Updated)
}

async fn receive_qr_url(
    bot: &Bot,
    msg: &Message,
    ctx: &AppContext,
    key: SessionKey,
    url: &str,
) -> Result<(), EscrowdError> {
    match advance_qr_url(ctx, key, url).await? {
        QrStep::Reprompt => {
            bot.send_message(
                msg.chat.id,
                "\u{26A0}\u{FE0F} Please provide a valid URL starting with http/https.",
            )
            .await
            .map_err(send_err)?;
        }
        QrStep::Updated => {
            debug!("qr photo url updated");
            bot.send_message(
                msg.chat.id,
                format!(
                    "\u{2705} QR URL updated successfully.\n<code>{}</code>",
                    render::escape_html(url)
                ),
            )
            .parse_mode(ParseMode::Html)
            .reply_markup(keyboards::admin_home())
            .await
            .map_err(send_err)?;
        }
    }
    Ok(())
}

#[allow(clippy::too_many_arguments)]
async fn receive_edit_value(
    bot: &Bot,
    msg: &Message,
    ctx: &AppContext,
    key: SessionKey,
    deal_id: i64,
    field: EditField,
    origin: ListPosition,
    raw: &str,
) -> Result<(), EscrowdError> {
    if field == EditField::Amount {
        let Some(amount) = parse_edit_amount(raw) else {
            // Keep the session alive so the admin can just try again.
            bot.send_message(msg.chat.id, "\u{26A0}\u{FE0F} Amount must be a non-negative number. Try again:")
                .await
                .map_err(send_err)?;
            return Ok(());
        };
        ctx.deals.update_amount(deal_id, amount).await?;
    } else {
        let value = match field {
            EditField::Seller | EditField::Buyer => raw.trim_start_matches('@'),
            _ => raw,
        };
        ctx.deals.update_field(deal_id, field, value).await?;
    }

    ctx.dialogs.clear(&key).await?;
    let body = match ctx.deals.get(deal_id).await? {
        Some(deal) => render::deal_detail_text(&deal),
        None => format!("Deal #{deal_id} updated."),
    };
    bot.send_message(msg.chat.id, format!("\u{2705} Field updated.\n\n{body}"))
        .parse_mode(ParseMode::Html)
        .reply_markup(keyboards::deal_actions(deal_id, origin))
        .await
        .map_err(send_err)?;
    Ok(())
}

/// Handle every callback query. All actions require platform admin.
pub async fn handle_callback(
    bot: &Bot,
    q: &CallbackQuery,
    ctx: &AppContext,
) -> Result<(), EscrowdError> {
    let Some(action) = q.data.as_deref().and_then(CallbackAction::parse) else {
        debug!(data = ?q.data, "ignoring unknown callback payload");
        return ack(bot, q).await;
    };

    if !is_platform_admin(q.from.id.0, &ctx.config.telegram.admin_ids) {
        return alert(bot, q, "\u{26D4} Admins only.").await;
    }

    // Every edit targets the message the button was attached to. Without
    // it (inaccessible or too-old message) only the side effects run.
    let target = q
        .message
        .as_ref()
        .and_then(|m| m.regular_message())
        .map(|m| (m.chat.id, m.id));
    let key = SessionKey::new(
        target.map_or(q.from.id.0 as i64, |(chat, _)| chat.0),
        q.from.id.0,
    );

    match action {
        CallbackAction::PayConfirm { deal_id } => {
            pay_confirm(bot, q, ctx, deal_id, target).await
        }
        CallbackAction::PayCancel { deal_id } => pay_cancel(bot, q, ctx, deal_id, target).await,
        CallbackAction::AdminHome => {
            ctx.dialogs.clear(&key).await?;
            edit_html(
                bot,
                target,
                render::DASHBOARD_TEXT,
                Some(keyboards::admin_home()),
            )
            .await?;
            ack(bot, q).await
        }
        CallbackAction::ChangeQr => {
            ctx.dialogs.set(key, DialogState::WaitingQrUrl).await?;
            edit_html(
                bot,
                target,
                "\u{2699}\u{FE0F} <b>Change QR Image URL</b>\nSend the new image URL now:",
                Some(keyboards::cancel_to_home()),
            )
            .await?;
            ack(bot, q).await
        }
        CallbackAction::DealPage(pos) => {
            let page = ctx.deals.list(pos.status_filter, pos.page, PAGE_SIZE).await?;
            let label = match pos.status_filter {
                None => "All".to_string(),
                Some(status) => capitalize(&status.to_string()),
            };
            let text = format!(
                "\u{1F4CB} <b>{label} Deals</b> (page {}) \u{2014} {} total",
                pos.page + 1,
                page.total
            );
            edit_html(
                bot,
                target,
                &text,
                Some(keyboards::deal_list(&page.deals, page.total, pos, PAGE_SIZE)),
            )
            .await?;
            ack(bot, q).await
        }
        CallbackAction::DealView { deal_id, pos } => {
            let Some(deal) = ctx.deals.get(deal_id).await? else {
                return alert(bot, q, "Deal not found.").await;
            };
            edit_html(
                bot,
                target,
                &render::deal_detail_text(&deal),
                Some(keyboards::deal_actions(deal_id, pos)),
            )
            .await?;
            ack(bot, q).await
        }
        CallbackAction::DealEdit { deal_id, pos } => {
            ctx.dialogs
                .set(key, DialogState::EditChooseField { deal_id, origin: pos })
                .await?;
            edit_html(
                bot,
                target,
                &format!("\u{270F}\u{FE0F} <b>Edit Deal #{deal_id}</b>\nChoose field to edit:"),
                Some(keyboards::edit_fields()),
            )
            .await?;
            ack(bot, q).await
        }
        CallbackAction::DealChangeStatus { deal_id, pos } => {
            ctx.dialogs
                .set(key, DialogState::WaitingStatus { deal_id, origin: pos })
                .await?;
            edit_html(
                bot,
                target,
                &format!(
                    "\u{1F504} <b>Change Status \u{2014} Deal #{deal_id}</b>\nSelect new status:"
                ),
                Some(keyboards::status_choices()),
            )
            .await?;
            ack(bot, q).await
        }
        CallbackAction::DealDelete { deal_id, pos } => {
            edit_html(
                bot,
                target,
                &format!(
                    "\u{1F5D1} Are you sure you want to <b>delete Deal #{deal_id}</b>? This is irreversible."
                ),
                Some(keyboards::confirm_delete(deal_id, pos)),
            )
            .await?;
            ack(bot, q).await
        }
        CallbackAction::DealDeleteConfirm { deal_id, pos } => {
            ctx.deals.delete(deal_id).await?;
            ctx.dialogs.clear(&key).await?;
            metrics::counter!("escrowd_deals_deleted_total").increment(1);
            edit_html(
                bot,
                target,
                &format!("\u{1F5D1} Deal #{deal_id} has been deleted."),
                Some(keyboards::back_to_list(pos)),
            )
            .await?;
            ack_text(bot, q, "Deleted.").await
        }
        CallbackAction::EditField(choice) => edit_field_chosen(bot, q, ctx, key, target, choice).await,
        CallbackAction::SetStatus(choice) => status_chosen(bot, q, ctx, key, target, choice).await,
    }
}

async fn pay_confirm(
    bot: &Bot,
    q: &CallbackQuery,
    ctx: &AppContext,
    deal_id: i64,
    target: Option<(ChatId, MessageId)>,
) -> Result<(), EscrowdError> {
    ctx.deals.update_status(deal_id, DealStatus::Paid).await?;
    metrics::counter!("escrowd_deals_paid_total").increment(1);

    if let Some(deal) = ctx.deals.get(deal_id).await?
        && let Some((chat_id, _)) = target
    {
        bot.send_message(
            chat_id,
            format!(
                "\u{2705} Payment received for Deal #{deal_id}\n\
                 @{} \u{2014} Buyer @{} has paid.\n\
                 Please proceed with the transfer.",
                deal.seller, deal.buyer
            ),
        )
        .await
        .map_err(send_err)?;
    }

    ack_text(bot, q, "\u{2705} Deal marked as paid.").await?;

    // Stamp the QR message and drop its buttons; the caption edit is best
    // effort since the message may already be gone.
    if let Some((chat_id, message_id)) = target {
        let old = q
            .message
            .as_ref()
            .and_then(|m| m.regular_message())
            .and_then(|m| m.caption())
            .unwrap_or_default();
        let result = bot
            .edit_message_caption(chat_id, message_id)
            .caption(format!("{old}\n\n\u{2705} Payment confirmed."))
            .await;
        if let Err(e) = result {
            debug!(error = %e, "could not edit QR caption");
        }
    }
    Ok(())
}

async fn pay_cancel(
    bot: &Bot,
    q: &CallbackQuery,
    ctx: &AppContext,
    deal_id: i64,
    target: Option<(ChatId, MessageId)>,
) -> Result<(), EscrowdError> {
    ctx.deals
        .update_status(deal_id, DealStatus::Cancelled)
        .await?;
    ack_text(bot, q, "\u{274C} Payment cancelled.").await?;

    if let Some((chat_id, message_id)) = target {
        let result = bot
            .edit_message_caption(chat_id, message_id)
            .caption("\u{274C} Payment Cancelled.")
            .await;
        if let Err(e) = result {
            debug!(error = %e, "could not edit QR caption");
        }
    }
    Ok(())
}

/// Outcome of a field choice in the edit flow.
#[derive(Debug, PartialEq, Eq)]
enum EditChoiceStep {
    /// No matching session; the buttons outlived the flow.
    Expired,
    /// Flow cancelled; session cleared without touching the deal.
    Cancelled { deal_id: i64, origin: ListPosition },
    /// Field picked; the next message carries the value.
    AwaitingValue {
        deal_id: i64,
        field: EditField,
        origin: ListPosition,
    },
}

async fn advance_edit_choice(
    ctx: &AppContext,
    key: SessionKey,
    choice: Option<EditField>,
) -> Result<EditChoiceStep, EscrowdError> {
    let Some(DialogState::EditChooseField { deal_id, origin }) = ctx.dialogs.get(&key).await?
    else {
        ctx.dialogs.clear(&key).await?;
        return Ok(EditChoiceStep::Expired);
    };

    match choice {
        None => {
            ctx.dialogs.clear(&key).await?;
            Ok(EditChoiceStep::Cancelled { deal_id, origin })
        }
        Some(field) => {
            ctx.dialogs
                .set(
                    key,
                    DialogState::EditWaitingValue {
                        deal_id,
                        field,
                        origin,
                    },
                )
                .await?;
            Ok(EditChoiceStep::AwaitingValue {
                deal_id,
                field,
                origin,
            })
        }
    }
}

async fn edit_field_chosen(
    bot: &Bot,
    q: &CallbackQuery,
    ctx: &AppContext,
    key: SessionKey,
    target: Option<(ChatId, MessageId)>,
    choice: Option<EditField>,
) -> Result<(), EscrowdError> {
    match advance_edit_choice(ctx, key, choice).await? {
        EditChoiceStep::Expired => {
            return alert(bot, q, "This flow has expired. Use /start to begin again.").await;
        }
        EditChoiceStep::Cancelled { deal_id, origin } => {
            edit_html(
                bot,
                target,
                "\u{274C} Edit cancelled.",
                Some(keyboards::back_to_deal(deal_id, origin)),
            )
            .await?;
        }
        EditChoiceStep::AwaitingValue { field, .. } => {
            edit_html(
                bot,
                target,
                &format!(
                    "\u{270F}\u{FE0F} Send the new value for <b>{}</b>:",
                    field.prompt_label()
                ),
                None,
            )
            .await?;
        }
    }
    ack(bot, q).await
}

async fn status_chosen(
    bot: &Bot,
    q: &CallbackQuery,
    ctx: &AppContext,
    key: SessionKey,
    target: Option<(ChatId, MessageId)>,
    choice: Option<DealStatus>,
) -> Result<(), EscrowdError> {
    let session = ctx.dialogs.get(&key).await?;
    let Some(DialogState::WaitingStatus { deal_id, origin }) = session else {
        ctx.dialogs.clear(&key).await?;
        return alert(bot, q, "This flow has expired. Use /start to begin again.").await;
    };

    match choice {
        None => {
            ctx.dialogs.clear(&key).await?;
            edit_html(
                bot,
                target,
                "\u{274C} Status change cancelled.",
                Some(keyboards::back_to_deal(deal_id, origin)),
            )
            .await?;
        }
        Some(status) => {
            ctx.deals.update_status(deal_id, status).await?;
            ctx.dialogs.clear(&key).await?;
            let body = match ctx.deals.get(deal_id).await? {
                Some(deal) => render::deal_detail_text(&deal),
                None => String::new(),
            };
            edit_html(
                bot,
                target,
                &format!("\u{2705} Status updated to <code>{status}</code>.\n\n{body}"),
                Some(keyboards::deal_actions(deal_id, origin)),
            )
            .await?;
        }
    }
    ack(bot, q).await
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}

/// Edit the message a callback button hangs off, in HTML. "Not modified"
/// errors are normal on refresh and are swallowed.
async fn edit_html(
    bot: &Bot,
    target: Option<(ChatId, MessageId)>,
    text: &str,
    keyboard: Option<InlineKeyboardMarkup>,
) -> Result<(), EscrowdError> {
    let Some((chat_id, message_id)) = target else {
        return Ok(());
    };
    let request = bot
        .edit_message_text(chat_id, message_id, text)
        .parse_mode(ParseMode::Html);
    let request = match keyboard {
        Some(kb) => request.reply_markup(kb),
        None => request,
    };
    match request.await {
        Ok(_) => Ok(()),
        Err(e) if e.to_string().contains("message is not modified") => Ok(()),
        Err(e) => Err(send_err(e)),
    }
}

async fn ack(bot: &Bot, q: &CallbackQuery) -> Result<(), EscrowdError> {
    bot.answer_callback_query(q.id.clone())
        .await
        .map_err(send_err)?;
    Ok(())
}

async fn ack_text(bot: &Bot, q: &CallbackQuery, text: &str) -> Result<(), EscrowdError> {
    bot.answer_callback_query(q.id.clone())
        .text(text)
        .await
        .map_err(send_err)?;
    Ok(())
}

async fn alert(bot: &Bot, q: &CallbackQuery, text: &str) -> Result<(), EscrowdError> {
    bot.answer_callback_query(q.id.clone())
        .text(text)
        .show_alert(true)
        .await
        .map_err(send_err)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use escrowd_config::EscrowdConfig;
    use escrowd_core::DealDraft;
    use escrowd_dialog::InMemorySessionStore;
    use escrowd_storage::{Database, DealStore, SettingsStore};

    use super::*;

    async fn test_ctx() -> (AppContext, tempfile::TempDir) {
        let dir = tempfile::tempdir().unwrap();
        let db = Database::open(dir.path().join("dash.db")).await.unwrap();
        let ctx = AppContext {
            config: EscrowdConfig::default(),
            deals: DealStore::new(db.clone()),
            settings: SettingsStore::new(db),
            dialogs: Arc::new(InMemorySessionStore::new()),
            classifier: None,
        };
        (ctx, dir)
    }

    fn make_draft() -> DealDraft {
        DealDraft {
            seller: "alice".to_string(),
            buyer: "bob".to_string(),
            details: "vintage camera".to_string(),
            amount: 500.0,
            escrow_till: "2026-09-01".to_string(),
            seller_upi: "alice@upi".to_string(),
        }
    }

    #[test]
    fn capitalize_handles_statuses() {
        assert_eq!(capitalize("paid"), "Paid");
        assert_eq!(capitalize("cancelled"), "Cancelled");
        assert_eq!(capitalize(""), "");
    }

    #[test]
    fn edit_amounts_must_be_finite_and_non_negative() {
        assert_eq!(parse_edit_amount("500"), Some(500.0));
        assert_eq!(parse_edit_amount("42.5"), Some(42.5));
        assert_eq!(parse_edit_amount("0"), Some(0.0));
        assert_eq!(parse_edit_amount("-5"), None);
        assert_eq!(parse_edit_amount("NaN"), None);
        assert_eq!(parse_edit_amount("inf"), None);
        assert_eq!(parse_edit_amount("five"), None);
    }

    #[tokio::test]
    async fn invalid_qr_url_keeps_the_session_waiting() {
        let (ctx, _dir) = test_ctx().await;
        let key = SessionKey::new(1, 1);
        ctx.dialogs.set(key, DialogState::WaitingQrUrl).await.unwrap();

        for bad in ["ftp://example.com/qr.png", "qr.png", "www.example.com"] {
            let step = advance_qr_url(&ctx, key, bad).await.unwrap();
            assert_eq!(step, QrStep::Reprompt, "{bad} should be rejected");
            assert_eq!(
                ctx.dialogs.get(&key).await.unwrap(),
                Some(DialogState::WaitingQrUrl),
                "session must survive the rejected input {bad}"
            );
        }
        assert_eq!(ctx.settings.qr_photo_url().await.unwrap(), None);
    }

    #[tokio::test]
    async fn valid_qr_url_persists_and_clears_the_session() {
        let (ctx, _dir) = test_ctx().await;
        let key = SessionKey::new(1, 1);
        ctx.dialogs.set(key, DialogState::WaitingQrUrl).await.unwrap();

        let step = advance_qr_url(&ctx, key, "https://example.com/qr.png")
            .await
            .unwrap();
        assert_eq!(step, QrStep::Updated);
        assert!(ctx.dialogs.get(&key).await.unwrap().is_none());
        assert_eq!(
            ctx.settings.qr_photo_url().await.unwrap().as_deref(),
            Some("https://example.com/qr.png")
        );
    }

    #[tokio::test]
    async fn cancelling_an_edit_clears_the_session_without_mutating() {
        let (ctx, _dir) = test_ctx().await;
        let deal = ctx.deals.create(&make_draft()).await.unwrap();
        let key = SessionKey::new(2, 2);
        let origin = ListPosition {
            page: 1,
            status_filter: Some(DealStatus::Pending),
        };
        ctx.dialogs
            .set(
                key,
                DialogState::EditChooseField {
                    deal_id: deal.deal_id,
                    origin,
                },
            )
            .await
            .unwrap();

        let step = advance_edit_choice(&ctx, key, None).await.unwrap();
        assert_eq!(
            step,
            EditChoiceStep::Cancelled {
                deal_id: deal.deal_id,
                origin
            }
        );
        assert!(ctx.dialogs.get(&key).await.unwrap().is_none());

        let after = ctx.deals.get(deal.deal_id).await.unwrap().unwrap();
        assert_eq!(after.seller, deal.seller);
        assert_eq!(after.escrow_till, deal.escrow_till);
        assert_eq!(after.amount, deal.amount);
        assert_eq!(after.escrow_fee, deal.escrow_fee);
    }

    #[tokio::test]
    async fn choosing_a_field_advances_to_waiting_value() {
        let (ctx, _dir) = test_ctx().await;
        let deal = ctx.deals.create(&make_draft()).await.unwrap();
        let key = SessionKey::new(2, 2);
        ctx.dialogs
            .set(
                key,
                DialogState::EditChooseField {
                    deal_id: deal.deal_id,
                    origin: ListPosition::default(),
                },
            )
            .await
            .unwrap();

        let step = advance_edit_choice(&ctx, key, Some(EditField::EscrowTill))
            .await
            .unwrap();
        assert!(matches!(
            step,
            EditChoiceStep::AwaitingValue {
                field: EditField::EscrowTill,
                ..
            }
        ));
        assert_eq!(
            ctx.dialogs.get(&key).await.unwrap(),
            Some(DialogState::EditWaitingValue {
                deal_id: deal.deal_id,
                field: EditField::EscrowTill,
                origin: ListPosition::default(),
            })
        );
    }

    #[tokio::test]
    async fn edit_choice_without_a_session_expires() {
        let (ctx, _dir) = test_ctx().await;
        let key = SessionKey::new(3, 3);

        let step = advance_edit_choice(&ctx, key, Some(EditField::Seller))
            .await
            .unwrap();
        assert_eq!(step, EditChoiceStep::Expired);
        assert!(ctx.dialogs.get(&key).await.unwrap().is_none());
    }
}
