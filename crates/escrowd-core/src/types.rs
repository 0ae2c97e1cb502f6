// SPDX-FileCopyrightText: 2026 Escrowd Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Domain types shared across the escrowd workspace.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Lifecycle status of an escrow deal.
///
/// Every deal starts as `Pending`. Transitions are driven exclusively by
/// explicit admin actions and any status is reachable from any other.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum DealStatus {
    Pending,
    Paid,
    Cancelled,
}

/// One brokered escrow transaction.
///
/// `deal_id` is assigned sequentially starting at 1 and is never reused,
/// even after the deal is deleted. `escrow_fee` is derived from `amount`
/// via [`crate::fees::calculate`] at creation time and recomputed whenever
/// the amount is edited.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Deal {
    pub deal_id: i64,
    /// Seller handle, stored without a leading `@`.
    pub seller: String,
    /// Buyer handle, stored without a leading `@`.
    pub buyer: String,
    pub details: String,
    pub amount: f64,
    /// Free-text date or condition the escrow holds until.
    pub escrow_till: String,
    pub seller_upi: String,
    pub escrow_fee: f64,
    pub status: DealStatus,
    /// ISO-8601 UTC timestamp, set once at creation.
    pub created_at: String,
}

/// The validated fields of a filled deal form, before persistence.
///
/// Produced by [`crate::form::parse`]; consumed by the deal store, which
/// assigns the id, fee, status, and creation timestamp.
#[derive(Debug, Clone, PartialEq)]
pub struct DealDraft {
    pub seller: String,
    pub buyer: String,
    pub details: String,
    pub amount: f64,
    pub escrow_till: String,
    pub seller_upi: String,
}

/// The editable fields of a deal, as exposed by the admin dashboard.
///
/// `deal_id`, `escrow_fee`, `status`, and `created_at` are not directly
/// editable: the id and timestamp are immutable, the fee is derived, and
/// status changes go through their own flow.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum EditField {
    Seller,
    Buyer,
    Details,
    Amount,
    EscrowTill,
    SellerUpi,
}

impl EditField {
    /// The SQL column this field maps to.
    pub fn column(&self) -> &'static str {
        match self {
            EditField::Seller => "seller",
            EditField::Buyer => "buyer",
            EditField::Details => "details",
            EditField::Amount => "amount",
            EditField::EscrowTill => "escrow_till",
            EditField::SellerUpi => "seller_upi",
        }
    }

    /// Human-readable prompt label used when asking for a new value.
    pub fn prompt_label(&self) -> &'static str {
        match self {
            EditField::Seller => "Seller @username",
            EditField::Buyer => "Buyer @username",
            EditField::Details => "Deal details",
            EditField::Amount => "Amount (number)",
            EditField::EscrowTill => "Escrow Till (date/condition)",
            EditField::SellerUpi => "Seller UPI handle",
        }
    }
}
