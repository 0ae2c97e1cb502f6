// SPDX-FileCopyrightText: 2026 Escrowd Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Group message handling.
//!
//! The escrow group accepts plain-text keywords rather than slash commands:
//! `form` and `fee`/`fees` for everyone; `save`, `pin`, `help`, and
//! `qr<amount>` for group admins. Any text in the main group gets a
//! redirect to the escrow group, and new members of either group are
//! greeted. Non-admins sending admin keywords are silently ignored.

use std::sync::OnceLock;

use escrowd_core::{form, EscrowdError};
use regex::Regex;
use teloxide::prelude::*;
use teloxide::types::{InputFile, ParseMode, ReplyParameters, User};
use tracing::{debug, warn};

use crate::access;
use crate::context::{send_err, AppContext};
use crate::keyboards;
use crate::moderation;
use crate::render;

fn qr_command_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)^qr([\d.]+)(?:[:#](\d+))?$").unwrap())
}

fn deal_id_marker_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)Deal\s*ID[:\s#]*(\d+)").unwrap())
}

/// Parse a `qr<amount>` command, with an optional inline deal id suffix
/// (`qr500:1` or `qr500#1`). Returns `None` if the text is not a qr command.
pub fn parse_qr_command(text: &str) -> Option<(f64, Option<i64>)> {
    let caps = qr_command_re().captures(text.trim())?;
    let amount: f64 = caps.get(1)?.as_str().parse().ok()?;
    if !amount.is_finite() {
        return None;
    }
    let deal_id = caps.get(2).and_then(|m| m.as_str().parse().ok());
    Some((amount, deal_id))
}

/// Find a `Deal ID: #N` marker in a message text or caption, as written by
/// the save confirmation and QR captions.
pub fn extract_deal_id_marker(text: &str) -> Option<i64> {
    deal_id_marker_re()
        .captures(text)?
        .get(1)?
        .as_str()
        .parse()
        .ok()
}

async fn reply_html(bot: &Bot, msg: &Message, text: &str) -> Result<Message, EscrowdError> {
    bot.send_message(msg.chat.id, text)
        .parse_mode(ParseMode::Html)
        .reply_parameters(ReplyParameters::new(msg.id))
        .await
        .map_err(send_err)
}

/// Entry point for every in-scope group message.
pub async fn handle_group_message(
    bot: &Bot,
    msg: &Message,
    ctx: &AppContext,
) -> Result<(), EscrowdError> {
    if let Some(members) = msg.new_chat_members() {
        return greet_new_members(bot, msg, ctx, members).await;
    }

    if moderation::moderate(bot, msg, ctx).await? {
        return Ok(());
    }

    let Some(text) = msg.text() else {
        return Ok(());
    };

    let chat_id = msg.chat.id.0;
    if ctx.config.telegram.main_group_id == Some(chat_id) {
        return escrow_redirect(bot, msg, ctx).await;
    }
    if ctx.config.telegram.escrow_group_id != Some(chat_id) {
        return Ok(());
    }

    match text.trim().to_lowercase().as_str() {
        "form" => {
            reply_html(bot, msg, render::FORM_TEMPLATE).await?;
        }
        "fee" | "fees" => {
            reply_html(bot, msg, render::CHARGES_TEXT).await?;
        }
        "help" => {
            if sender_is_group_admin(bot, msg).await {
                reply_html(bot, msg, render::HELP_TEXT).await?;
            }
        }
        "save" => {
            if sender_is_group_admin(bot, msg).await {
                save_deal(bot, msg, ctx).await?;
            }
        }
        "pin" => {
            if sender_is_group_admin(bot, msg).await {
                pin_replied_message(bot, msg).await?;
            }
        }
        lowered => {
            if let Some((amount, inline_id)) = parse_qr_command(lowered)
                && sender_is_group_admin(bot, msg).await
            {
                send_qr_request(bot, msg, ctx, amount, inline_id).await?;
            }
        }
    }
    Ok(())
}

async fn sender_is_group_admin(bot: &Bot, msg: &Message) -> bool {
    match msg.from.as_ref() {
        Some(user) => access::is_group_admin(bot, msg.chat.id, user.id).await,
        None => false,
    }
}

/// Main group: any text gets pointed at the escrow group and channel.
async fn escrow_redirect(bot: &Bot, msg: &Message, ctx: &AppContext) -> Result<(), EscrowdError> {
    let telegram = &ctx.config.telegram;
    bot.send_message(
        msg.chat.id,
        "\u{1F447} Use the buttons below to join our Escrow Group or visit the Main Channel:",
    )
    .reply_parameters(ReplyParameters::new(msg.id))
    .reply_markup(keyboards::escrow_links(
        telegram.escrow_group_link.as_deref(),
        telegram.main_channel_link.as_deref(),
    ))
    .await
    .map_err(send_err)?;
    Ok(())
}

async fn greet_new_members(
    bot: &Bot,
    msg: &Message,
    ctx: &AppContext,
    members: &[User],
) -> Result<(), EscrowdError> {
    let telegram = &ctx.config.telegram;
    let in_main_group = telegram.main_group_id == Some(msg.chat.id.0);

    for member in members.iter().filter(|m| !m.is_bot) {
        let mention = render::mention(member.id.0, &member.full_name());
        let (text, keyboard) = if in_main_group {
            (
                render::greet_main_group(&mention),
                keyboards::escrow_links(
                    telegram.escrow_group_link.as_deref(),
                    telegram.main_channel_link.as_deref(),
                ),
            )
        } else {
            (
                render::greet_escrow_group(&mention),
                keyboards::main_links(
                    telegram.main_group_link.as_deref(),
                    telegram.main_channel_link.as_deref(),
                ),
            )
        };
        bot.send_message(msg.chat.id, text)
            .parse_mode(ParseMode::Html)
            .reply_markup(keyboard)
            .await
            .map_err(send_err)?;
    }
    Ok(())
}

/// `save`: parse the replied-to form and persist the deal.
async fn save_deal(bot: &Bot, msg: &Message, ctx: &AppContext) -> Result<(), EscrowdError> {
    let replied_text = msg.reply_to_message().and_then(|m| m.text());
    let Some(replied_text) = replied_text else {
        reply_html(
            bot,
            msg,
            "\u{26A0}\u{FE0F} Please reply to a filled form message with save.",
        )
        .await?;
        return Ok(());
    };

    let Some(draft) = form::parse(replied_text) else {
        reply_html(
            bot,
            msg,
            "\u{26A0}\u{FE0F} Could not parse the form. Ensure all fields are present:\n\
             Seller, Buyer, Details, Amount, Escrow Till, Seller UPI.",
        )
        .await?;
        return Ok(());
    };

    let deal = match ctx.deals.create(&draft).await {
        Ok(deal) => deal,
        Err(e) => {
            warn!(error = %e, "failed to create deal");
            reply_html(
                bot,
                msg,
                "\u{274C} Database error while saving the deal. Please try again.",
            )
            .await?;
            return Ok(());
        }
    };

    metrics::counter!("escrowd_deals_saved_total").increment(1);
    debug!(deal_id = deal.deal_id, "deal saved from group form");
    reply_html(
        bot,
        msg,
        &format!(
            "\u{2705} <b>Deal Saved Successfully</b>\nDeal ID: #{}\nStatus: Pending",
            deal.deal_id
        ),
    )
    .await?;
    Ok(())
}

/// `pin`: pin the replied-to message and remove the trigger.
async fn pin_replied_message(bot: &Bot, msg: &Message) -> Result<(), EscrowdError> {
    let Some(target) = msg.reply_to_message() else {
        reply_html(bot, msg, "\u{26A0}\u{FE0F} Reply to a message to pin it.").await?;
        return Ok(());
    };

    if let Err(e) = bot.pin_chat_message(msg.chat.id, target.id).await {
        warn!(error = %e, "could not pin message");
        reply_html(
            bot,
            msg,
            "\u{274C} Failed to pin. Make sure I am an admin with pin permission.",
        )
        .await?;
        return Ok(());
    }

    // Keep the group tidy: the bare "pin" trigger adds nothing once pinned.
    if let Err(e) = bot.delete_message(msg.chat.id, msg.id).await {
        debug!(error = %e, "could not delete pin trigger message");
    }
    Ok(())
}

/// `qr<amount>`: send the payment QR with confirm/cancel buttons.
async fn send_qr_request(
    bot: &Bot,
    msg: &Message,
    ctx: &AppContext,
    amount: f64,
    inline_id: Option<i64>,
) -> Result<(), EscrowdError> {
    // Prefer the deal id marker in the replied-to message; fall back to the
    // inline suffix.
    let deal_id = msg
        .reply_to_message()
        .and_then(|m| m.text().or(m.caption()))
        .and_then(extract_deal_id_marker)
        .or(inline_id);

    let Some(deal_id) = deal_id else {
        reply_html(
            bot,
            msg,
            "\u{26A0}\u{FE0F} Reply to the deal save confirmation message, or include the deal ID in the command.\n\
             Examples: qr500 (reply to save msg) or qr500:1 (deal ID = 1)",
        )
        .await?;
        return Ok(());
    };

    let Some(deal) = ctx.deals.get(deal_id).await? else {
        reply_html(
            bot,
            msg,
            &format!("\u{26A0}\u{FE0F} Deal #{deal_id} not found in database."),
        )
        .await?;
        return Ok(());
    };

    let Some(qr_url) = ctx.settings.qr_photo_url().await? else {
        reply_html(
            bot,
            msg,
            "\u{274C} No QR image set. Use the admin dashboard (\u{2699}\u{FE0F} Change QR) to set one.",
        )
        .await?;
        return Ok(());
    };

    let Ok(url) = reqwest::Url::parse(&qr_url) else {
        reply_html(
            bot,
            msg,
            "\u{274C} Could not send QR image. Check the QR URL in settings.",
        )
        .await?;
        return Ok(());
    };

    let sent = bot
        .send_photo(msg.chat.id, InputFile::url(url))
        .caption(render::qr_caption(&deal, amount))
        .reply_markup(keyboards::pay_choices(deal_id))
        .await;
    if let Err(e) = sent {
        warn!(error = %e, deal_id, "failed to send QR photo");
        reply_html(
            bot,
            msg,
            "\u{274C} Could not send QR image. Check the QR URL in settings.",
        )
        .await?;
    }
    Ok(())
}
