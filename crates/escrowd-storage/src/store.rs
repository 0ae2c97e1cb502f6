// SPDX-FileCopyrightText: 2026 Escrowd Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! High-level deal and settings stores used by the bot layer.
//!
//! These wrap the query modules and enforce the invariant that a deal's
//! `escrow_fee` is always derived from its current amount.

use escrowd_core::{fees, Deal, DealDraft, DealStatus, EditField, EscrowdError};

use crate::database::Database;
use crate::models::DealPage;
use crate::queries;

/// Store for escrow deals.
///
/// Cloning is cheap; clones share the same database handle.
#[derive(Clone)]
pub struct DealStore {
    db: Database,
}

impl DealStore {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    /// Create a deal from a parsed form, computing the escrow fee from the
    /// amount. The new deal starts out pending.
    pub async fn create(&self, draft: &DealDraft) -> Result<Deal, EscrowdError> {
        let escrow_fee = fees::calculate(draft.amount);
        queries::deals::create_deal(&self.db, draft, escrow_fee).await
    }

    pub async fn get(&self, deal_id: i64) -> Result<Option<Deal>, EscrowdError> {
        queries::deals::get_deal(&self.db, deal_id).await
    }

    /// One page of deals, newest first, with the total for the filter.
    pub async fn list(
        &self,
        status: Option<DealStatus>,
        page: u32,
        page_size: u32,
    ) -> Result<DealPage, EscrowdError> {
        let limit = i64::from(page_size);
        let offset = i64::from(page) * limit;
        let deals = queries::deals::list_deals(&self.db, status, limit, offset).await?;
        let total = queries::deals::count_deals(&self.db, status).await?;
        Ok(DealPage { deals, total })
    }

    /// Set a deal's status. Returns false if no such deal exists.
    pub async fn update_status(
        &self,
        deal_id: i64,
        status: DealStatus,
    ) -> Result<bool, EscrowdError> {
        queries::deals::update_status(&self.db, deal_id, status).await
    }

    /// Overwrite one text field of a deal.
    ///
    /// Amount is not a text field; callers must go through
    /// [`update_amount`](Self::update_amount) so the fee is recomputed.
    pub async fn update_field(
        &self,
        deal_id: i64,
        field: EditField,
        value: &str,
    ) -> Result<bool, EscrowdError> {
        if field == EditField::Amount {
            return Err(EscrowdError::Internal(
                "amount edits must go through update_amount".to_string(),
            ));
        }
        queries::deals::update_text_field(&self.db, deal_id, field.column(), value).await
    }

    /// Overwrite a deal's amount, recomputing the escrow fee alongside it.
    pub async fn update_amount(&self, deal_id: i64, amount: f64) -> Result<bool, EscrowdError> {
        let escrow_fee = fees::calculate(amount);
        queries::deals::update_amount(&self.db, deal_id, amount, escrow_fee).await
    }

    /// Delete a deal. The id is retired permanently.
    pub async fn delete(&self, deal_id: i64) -> Result<bool, EscrowdError> {
        queries::deals::delete_deal(&self.db, deal_id).await
    }
}

/// Store for runtime-editable bot settings.
#[derive(Clone)]
pub struct SettingsStore {
    db: Database,
}

const QR_PHOTO_URL: &str = "qr_photo_url";

impl SettingsStore {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    /// The payment QR photo URL shown by the qr command, if one is set.
    pub async fn qr_photo_url(&self) -> Result<Option<String>, EscrowdError> {
        queries::settings::get_value(&self.db, QR_PHOTO_URL).await
    }

    pub async fn set_qr_photo_url(&self, url: &str) -> Result<(), EscrowdError> {
        queries::settings::set_value(&self.db, QR_PHOTO_URL, url).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    async fn setup_store() -> (DealStore, tempfile::TempDir) {
        let dir = tempdir().unwrap();
        let db = Database::open(dir.path().join("store.db")).await.unwrap();
        (DealStore::new(db), dir)
    }

    fn make_draft(amount: f64) -> DealDraft {
        DealDraft {
            seller: "alice".to_string(),
            buyer: "bob".to_string(),
            details: "PS5 console".to_string(),
            amount,
            escrow_till: "delivery confirmed".to_string(),
            seller_upi: "alice@upi".to_string(),
        }
    }

    #[tokio::test]
    async fn create_computes_fee_from_amount() {
        let (store, _dir) = setup_store().await;

        // Flat tier.
        let small = store.create(&make_draft(150.0)).await.unwrap();
        assert_eq!(small.escrow_fee, 10.0);

        // Percentage tier.
        let large = store.create(&make_draft(3000.0)).await.unwrap();
        assert_eq!(large.escrow_fee, 90.0);
    }

    #[tokio::test]
    async fn update_amount_recomputes_fee() {
        let (store, _dir) = setup_store().await;
        let deal = store.create(&make_draft(500.0)).await.unwrap();
        assert_eq!(deal.escrow_fee, 20.0);

        assert!(store.update_amount(deal.deal_id, 1000.0).await.unwrap());
        let updated = store.get(deal.deal_id).await.unwrap().unwrap();
        assert_eq!(updated.amount, 1000.0);
        assert_eq!(updated.escrow_fee, 35.0);
    }

    #[tokio::test]
    async fn update_field_rejects_amount() {
        let (store, _dir) = setup_store().await;
        let deal = store.create(&make_draft(500.0)).await.unwrap();

        let result = store
            .update_field(deal.deal_id, EditField::Amount, "999")
            .await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn update_field_edits_text_columns() {
        let (store, _dir) = setup_store().await;
        let deal = store.create(&make_draft(500.0)).await.unwrap();

        assert!(store
            .update_field(deal.deal_id, EditField::SellerUpi, "new@upi")
            .await
            .unwrap());
        let updated = store.get(deal.deal_id).await.unwrap().unwrap();
        assert_eq!(updated.seller_upi, "new@upi");
    }

    #[tokio::test]
    async fn list_reports_total_for_filter() {
        let (store, _dir) = setup_store().await;
        for _ in 0..3 {
            store.create(&make_draft(500.0)).await.unwrap();
        }
        store.update_status(1, DealStatus::Paid).await.unwrap();

        let page = store.list(None, 0, 2).await.unwrap();
        assert_eq!(page.deals.len(), 2);
        assert_eq!(page.total, 3);

        let paid = store.list(Some(DealStatus::Paid), 0, 2).await.unwrap();
        assert_eq!(paid.deals.len(), 1);
        assert_eq!(paid.total, 1);
    }
}
