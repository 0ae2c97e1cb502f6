// SPDX-FileCopyrightText: 2026 Escrowd Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Dialog session state for the escrowd admin flows.
//!
//! A dialog session is transient per-conversation state that survives
//! across multiple independent Telegram updates: which deal is being
//! edited, which field was picked, which list page to return to. Three
//! flows exist (edit-field, change-status, change-QR) and a conversation
//! holds at most one at a time; entering a new flow replaces whatever was
//! active before.
//!
//! Sessions live behind the [`SessionStore`] trait so the in-memory
//! default can be swapped for a durable backend without touching call
//! sites. In-memory sessions are lost on restart, which is acceptable:
//! the flows are human-paced and restartable.

pub mod store;

use escrowd_core::types::{DealStatus, EditField};
use serde::{Deserialize, Serialize};

pub use store::{InMemorySessionStore, SessionStore};

/// Identifies one conversation: the chat plus the acting user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionKey {
    pub chat_id: i64,
    pub user_id: u64,
}

impl SessionKey {
    pub fn new(chat_id: i64, user_id: u64) -> Self {
        Self { chat_id, user_id }
    }
}

/// Where a flow should navigate back to: the list page and status filter
/// that were active when the flow was entered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ListPosition {
    pub page: u32,
    pub status_filter: Option<DealStatus>,
}

/// The active dialog state for one conversation.
///
/// Each variant carries the context the flow needs to complete or to
/// navigate back on cancellation. Terminal transitions are expressed by
/// clearing the session, not by a dedicated state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum DialogState {
    /// Edit-deal flow: waiting for the admin to pick which field to edit.
    EditChooseField { deal_id: i64, origin: ListPosition },
    /// Edit-deal flow: waiting for the next message to carry the new value.
    EditWaitingValue {
        deal_id: i64,
        field: EditField,
        origin: ListPosition,
    },
    /// Change-status flow: waiting for a status choice.
    WaitingStatus { deal_id: i64, origin: ListPosition },
    /// Change-QR flow: waiting for the next message to carry the new URL.
    WaitingQrUrl,
}
