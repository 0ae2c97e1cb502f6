// SPDX-FileCopyrightText: 2026 Escrowd Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Session store trait and the in-memory default implementation.

use async_trait::async_trait;
use dashmap::DashMap;
use escrowd_core::EscrowdError;
use tracing::debug;

use crate::{DialogState, SessionKey};

/// Storage for per-conversation dialog sessions.
///
/// The trait is async and fallible so a durable backend (SQLite, Redis)
/// can implement it without changing handler call sites. If two updates
/// for the same conversation race, the last write wins.
#[async_trait]
pub trait SessionStore: Send + Sync {
    async fn get(&self, key: &SessionKey) -> Result<Option<DialogState>, EscrowdError>;

    /// Set the active state for a conversation, replacing any prior flow.
    async fn set(&self, key: SessionKey, state: DialogState) -> Result<(), EscrowdError>;

    /// Clear the session. Clearing an absent session is not an error.
    async fn clear(&self, key: &SessionKey) -> Result<(), EscrowdError>;
}

/// In-memory session store backed by a concurrent map.
///
/// Sessions do not survive a process restart.
#[derive(Debug, Default)]
pub struct InMemorySessionStore {
    sessions: DashMap<SessionKey, DialogState>,
}

impl InMemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SessionStore for InMemorySessionStore {
    async fn get(&self, key: &SessionKey) -> Result<Option<DialogState>, EscrowdError> {
        Ok(self.sessions.get(key).map(|entry| entry.value().clone()))
    }

    async fn set(&self, key: SessionKey, state: DialogState) -> Result<(), EscrowdError> {
        debug!(chat_id = key.chat_id, user_id = key.user_id, ?state, "dialog state set");
        self.sessions.insert(key, state);
        Ok(())
    }

    async fn clear(&self, key: &SessionKey) -> Result<(), EscrowdError> {
        if self.sessions.remove(key).is_some() {
            debug!(chat_id = key.chat_id, user_id = key.user_id, "dialog state cleared");
        }
        Ok(())
    }
}
