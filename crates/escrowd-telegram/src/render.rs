// SPDX-FileCopyrightText: 2026 Escrowd Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Message text rendering. Everything is sent as Telegram HTML, so all
//! user-supplied values go through [`escape_html`].

use escrowd_core::Deal;

/// The blank deal form users copy, fill in, and send back.
pub const FORM_TEMPLATE: &str = "\u{1F4CB} <b>Escrow Deal Form</b>\n\n\
Please fill in all fields and send this message back:\n\n\
Seller: @username\n\
Buyer: @username\n\
Details: describe the deal\n\
Amount: 0.00\n\
Escrow Till: date or condition\n\
Seller UPI: upi@handle";

/// The fee schedule shown for `fee` / `fees`.
pub const CHARGES_TEXT: &str = "\u{1F4B0} <b>Escrow Fee Structure</b>\n\n\
\u{2022} Under \u{20B9}190 \u{2192} <b>\u{20B9}10</b>\n\
\u{2022} \u{20B9}190 to \u{20B9}599 \u{2192} <b>\u{20B9}20</b>\n\
\u{2022} \u{20B9}600 to \u{20B9}2000 \u{2192} <b>3.5%</b>\n\
\u{2022} Above \u{20B9}2000 \u{2192} <b>3%</b>";

/// Group help text, admin-only.
pub const HELP_TEXT: &str = "\u{1F4D6} <b>Escrow Bot \u{2014} Commands</b>\n\n\
<b>For Everyone:</b>\n\
\u{2022} <code>form</code> \u{2014} Get the escrow deal form template\n\
\u{2022} <code>fee</code> / <code>fees</code> \u{2014} View the escrow fee structure\n\n\
<b>Group Admins Only:</b>\n\
\u{2022} <code>save</code> \u{2014} Reply to a filled form to save the deal\n\
\u{2022} <code>qr&lt;amount&gt;</code> \u{2014} Reply to save confirmation to send QR\n\
   e.g. <code>qr500</code> or <code>qr500:1</code> (deal ID = 1)\n\
\u{2022} <code>pin</code> \u{2014} Reply to any message to pin it\n\
\u{2022} <code>help</code> \u{2014} Show this help message\n\n\
<b>Bot Admins (Private Chat):</b>\n\
\u{2022} /start \u{2014} Open the admin dashboard\n\
   \u{2014} View, edit, delete deals\n\
   \u{2014} Change deal status\n\
   \u{2014} Update QR image URL";

pub const DASHBOARD_TEXT: &str =
    "\u{1F3E0} <b>Admin Dashboard</b>\nSelect an option:";

/// Greeting for new members of the main group.
pub fn greet_main_group(mention: &str) -> String {
    format!(
        "\u{1F44B} Welcome {mention}!\n\n\
         This is our main group. For escrow deals, join our Escrow Group using the button below."
    )
}

/// Greeting for new members of the escrow group, listing open commands.
pub fn greet_escrow_group(mention: &str) -> String {
    format!(
        "\u{1F44B} Welcome {mention}!\n\n\
         \u{1F4D6} <b>Escrow Bot \u{2014} Commands</b>\n\n\
         <b>For Everyone:</b>\n\
         \u{2022} <code>form</code> \u{2014} Get the escrow deal form template\n\
         \u{2022} <code>fee</code> / <code>fees</code> \u{2014} View the escrow fee structure"
    )
}

/// Escape the characters Telegram HTML treats specially.
pub fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

/// An HTML mention link for a user without a public username.
pub fn mention(user_id: u64, name: &str) -> String {
    format!(
        "<a href=\"tg://user?id={user_id}\">{}</a>",
        escape_html(name)
    )
}

/// Pretty-print a stored creation timestamp; falls back to the raw value
/// for anything chrono cannot parse.
pub fn format_created(created_at: &str) -> String {
    match chrono::DateTime::parse_from_rfc3339(created_at) {
        Ok(dt) => dt.format("%Y-%m-%d %H:%M UTC").to_string(),
        Err(_) => created_at.to_string(),
    }
}

/// The full detail view of one deal.
pub fn deal_detail_text(deal: &Deal) -> String {
    format!(
        "\u{1F4C4} <b>Deal #{}</b>\n\
         Status: <code>{}</code>\n\
         Seller: @{}\n\
         Buyer: @{}\n\
         Details: {}\n\
         Amount: \u{20B9}{:.2}\n\
         Escrow Fee: \u{20B9}{:.2}\n\
         Escrow Till: {}\n\
         Seller UPI: {}\n\
         Created: {}",
        deal.deal_id,
        deal.status,
        escape_html(&deal.seller),
        escape_html(&deal.buyer),
        escape_html(&deal.details),
        deal.amount,
        deal.escrow_fee,
        escape_html(&deal.escrow_till),
        escape_html(&deal.seller_upi),
        format_created(&deal.created_at),
    )
}

/// Caption for the group QR payment request.
pub fn qr_caption(deal: &Deal, payment_amount: f64) -> String {
    let total = escrowd_core::fees::round2(payment_amount + deal.escrow_fee);
    format!(
        "Deal ID: #{}\n@{}\n\n\
         Pay \u{20B9}{payment_amount:.2} + Escrow Fee \u{20B9}{:.2} = \u{20B9}{total:.2}\n\
         on this QR.",
        deal.deal_id,
        escape_html(&deal.buyer),
        deal.escrow_fee,
    )
}
