// SPDX-FileCopyrightText: 2026 Escrowd Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Deal form parsing.
//!
//! Extracts a [`DealDraft`] from a free-form message by labeled-field
//! matching. Validation is all-or-nothing: if any of the six required
//! fields is missing, or the amount does not parse as a number, the whole
//! parse is rejected and no partial result escapes.

use std::sync::OnceLock;

use regex::Regex;

use crate::types::DealDraft;

fn seller_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)Seller:\s*@?(\S+)").expect("valid regex"))
}

fn buyer_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)Buyer:\s*@?(\S+)").expect("valid regex"))
}

fn details_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)Details:\s*(.+)").expect("valid regex"))
}

fn amount_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)Amount:\s*([\d.]+)").expect("valid regex"))
}

fn escrow_till_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)Escrow Till:\s*(.+)").expect("valid regex"))
}

fn seller_upi_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)Seller UPI:\s*(\S+)").expect("valid regex"))
}

fn capture(re: &Regex, text: &str) -> Option<String> {
    re.captures(text)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().trim().to_string())
}

/// Parse a filled escrow form message into a [`DealDraft`].
///
/// Labels are matched case-insensitively anywhere in the text. Seller,
/// buyer, amount, and UPI capture a single whitespace-delimited token;
/// details and escrow-till capture through end of line. A leading `@` is
/// stripped from seller and buyer handles.
///
/// Returns `None` if any field is missing or the amount is not a
/// non-negative number.
pub fn parse(text: &str) -> Option<DealDraft> {
    let seller = capture(seller_re(), text)?;
    let buyer = capture(buyer_re(), text)?;
    let details = capture(details_re(), text)?;
    let amount_raw = capture(amount_re(), text)?;
    let escrow_till = capture(escrow_till_re(), text)?;
    let seller_upi = capture(seller_upi_re(), text)?;

    let amount: f64 = amount_raw.parse().ok()?;
    if !amount.is_finite() || amount < 0.0 {
        return None;
    }

    Some(DealDraft {
        seller: seller.trim_start_matches('@').to_string(),
        buyer: buyer.trim_start_matches('@').to_string(),
        details,
        amount,
        escrow_till,
        seller_upi,
    })
}
