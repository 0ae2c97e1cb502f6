// SPDX-FileCopyrightText: 2026 Escrowd Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Deal CRUD operations.
//!
//! Deal ids are allocated from the `counters` table inside the insert
//! transaction, so ids are strictly increasing and never reused, even
//! after deletions.

use escrowd_core::EscrowdError;
use rusqlite::params;

use crate::database::Database;
use crate::models::{Deal, DealDraft, DealStatus};

const DEAL_COLUMNS: &str = "deal_id, seller, buyer, details, amount, escrow_till, \
                            seller_upi, escrow_fee, status, created_at";

fn deal_from_row(row: &rusqlite::Row<'_>) -> Result<Deal, rusqlite::Error> {
    let status_text: String = row.get(8)?;
    let status = status_text.parse::<DealStatus>().map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(8, rusqlite::types::Type::Text, Box::new(e))
    })?;
    Ok(Deal {
        deal_id: row.get(0)?,
        seller: row.get(1)?,
        buyer: row.get(2)?,
        details: row.get(3)?,
        amount: row.get(4)?,
        escrow_till: row.get(5)?,
        seller_upi: row.get(6)?,
        escrow_fee: row.get(7)?,
        status,
        created_at: row.get(9)?,
    })
}

/// Insert a new deal, allocating its id from the `deal_id` counter.
///
/// The counter bump and the insert commit atomically, so concurrent
/// creates get distinct sequential ids.
pub async fn create_deal(
    db: &Database,
    draft: &DealDraft,
    escrow_fee: f64,
) -> Result<Deal, EscrowdError> {
    let draft = draft.clone();
    db.connection()
        .call(move |conn| {
            let tx = conn.transaction()?;
            let deal_id: i64 = tx.query_row(
                "UPDATE counters SET value = value + 1 WHERE name = 'deal_id' RETURNING value",
                [],
                |row| row.get(0),
            )?;
            tx.execute(
                "INSERT INTO deals (deal_id, seller, buyer, details, amount, escrow_till, \
                 seller_upi, escrow_fee, status) \
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, 'pending')",
                params![
                    deal_id,
                    draft.seller,
                    draft.buyer,
                    draft.details,
                    draft.amount,
                    draft.escrow_till,
                    draft.seller_upi,
                    escrow_fee,
                ],
            )?;
            let deal = tx.query_row(
                &format!("SELECT {DEAL_COLUMNS} FROM deals WHERE deal_id = ?1"),
                params![deal_id],
                deal_from_row,
            )?;
            tx.commit()?;
            Ok(deal)
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Get a deal by id.
pub async fn get_deal(db: &Database, deal_id: i64) -> Result<Option<Deal>, EscrowdError> {
    db.connection()
        .call(move |conn| {
            let result = conn.query_row(
                &format!("SELECT {DEAL_COLUMNS} FROM deals WHERE deal_id = ?1"),
                params![deal_id],
                deal_from_row,
            );
            match result {
                Ok(deal) => Ok(Some(deal)),
                Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                Err(e) => Err(e),
            }
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// List deals newest-first, optionally filtered by status.
pub async fn list_deals(
    db: &Database,
    status: Option<DealStatus>,
    limit: i64,
    offset: i64,
) -> Result<Vec<Deal>, EscrowdError> {
    db.connection()
        .call(move |conn| {
            let mut deals = Vec::new();
            match status {
                Some(status) => {
                    let mut stmt = conn.prepare(&format!(
                        "SELECT {DEAL_COLUMNS} FROM deals WHERE status = ?1 \
                         ORDER BY deal_id DESC LIMIT ?2 OFFSET ?3"
                    ))?;
                    let rows =
                        stmt.query_map(params![status.to_string(), limit, offset], deal_from_row)?;
                    for row in rows {
                        deals.push(row?);
                    }
                }
                None => {
                    let mut stmt = conn.prepare(&format!(
                        "SELECT {DEAL_COLUMNS} FROM deals \
                         ORDER BY deal_id DESC LIMIT ?1 OFFSET ?2"
                    ))?;
                    let rows = stmt.query_map(params![limit, offset], deal_from_row)?;
                    for row in rows {
                        deals.push(row?);
                    }
                }
            }
            Ok(deals)
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Count deals, optionally filtered by status.
pub async fn count_deals(db: &Database, status: Option<DealStatus>) -> Result<i64, EscrowdError> {
    db.connection()
        .call(move |conn| {
            let count = match status {
                Some(status) => conn.query_row(
                    "SELECT COUNT(*) FROM deals WHERE status = ?1",
                    params![status.to_string()],
                    |row| row.get(0),
                )?,
                None => conn.query_row("SELECT COUNT(*) FROM deals", [], |row| row.get(0))?,
            };
            Ok(count)
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Set a deal's status. Returns false if no such deal exists.
pub async fn update_status(
    db: &Database,
    deal_id: i64,
    status: DealStatus,
) -> Result<bool, EscrowdError> {
    db.connection()
        .call(move |conn| {
            let changed = conn.execute(
                "UPDATE deals SET status = ?1 WHERE deal_id = ?2",
                params![status.to_string(), deal_id],
            )?;
            Ok(changed > 0)
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Overwrite a single text column of a deal. Returns false if no such deal.
///
/// `column` must be one of the deal text columns; callers pass
/// `EditField::column()`, never user input.
pub(crate) async fn update_text_field(
    db: &Database,
    deal_id: i64,
    column: &'static str,
    value: &str,
) -> Result<bool, EscrowdError> {
    let value = value.to_string();
    db.connection()
        .call(move |conn| {
            let changed = conn.execute(
                &format!("UPDATE deals SET {column} = ?1 WHERE deal_id = ?2"),
                params![value, deal_id],
            )?;
            Ok(changed > 0)
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Overwrite a deal's amount and fee in one statement so the two columns
/// can never drift apart. Returns false if no such deal.
pub async fn update_amount(
    db: &Database,
    deal_id: i64,
    amount: f64,
    escrow_fee: f64,
) -> Result<bool, EscrowdError> {
    db.connection()
        .call(move |conn| {
            let changed = conn.execute(
                "UPDATE deals SET amount = ?1, escrow_fee = ?2 WHERE deal_id = ?3",
                params![amount, escrow_fee, deal_id],
            )?;
            Ok(changed > 0)
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Delete a deal. Returns false if it was already gone. The id counter is
/// untouched, so the id is never handed out again.
pub async fn delete_deal(db: &Database, deal_id: i64) -> Result<bool, EscrowdError> {
    db.connection()
        .call(move |conn| {
            let changed = conn.execute("DELETE FROM deals WHERE deal_id = ?1", params![deal_id])?;
            Ok(changed > 0)
        })
        .await
        .map_err(crate::database::map_tr_err)
}
