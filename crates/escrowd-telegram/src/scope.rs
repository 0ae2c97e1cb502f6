// SPDX-FileCopyrightText: 2026 Escrowd Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Group allow-list enforcement.
//!
//! Updates from groups the bot was added to but is not configured for are
//! dropped with no response, leaving only a debug trace. Private chats
//! always pass; they carry their own admin checks.

use teloxide::types::{Chat, ChatKind};
use tracing::debug;

/// Whether an update from `chat` should be processed at all.
pub fn in_scope(chat: &Chat, allowed_group_ids: &[i64]) -> bool {
    match &chat.kind {
        ChatKind::Private(_) => true,
        ChatKind::Public(_) => allowed_group_ids.contains(&chat.id.0),
    }
}

/// Gate an inbound update. Out-of-scope group events are dropped with a
/// trace so a misconfigured allow-list shows up in the logs.
pub fn admit(chat: &Chat, allowed_group_ids: &[i64]) -> bool {
    let admitted = in_scope(chat, allowed_group_ids);
    if !admitted {
        debug!(chat_id = chat.id.0, "dropping out-of-scope group event");
    }
    admitted
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_chat(json: serde_json::Value) -> Chat {
        serde_json::from_value(json).expect("failed to deserialize mock chat")
    }

    fn private_chat() -> Chat {
        make_chat(serde_json::json!({
            "id": 12345,
            "type": "private",
            "first_name": "Test",
        }))
    }

    fn group_chat(id: i64) -> Chat {
        make_chat(serde_json::json!({
            "id": id,
            "type": "supergroup",
            "title": "Test Group",
        }))
    }

    #[test]
    fn private_chats_always_pass() {
        assert!(in_scope(&private_chat(), &[]));
        assert!(in_scope(&private_chat(), &[-100111]));
    }

    #[test]
    fn allowed_groups_pass() {
        assert!(in_scope(&group_chat(-100111), &[-100111, -100222]));
        assert!(in_scope(&group_chat(-100222), &[-100111, -100222]));
    }

    #[test]
    fn unknown_groups_are_dropped() {
        assert!(!in_scope(&group_chat(-100999), &[-100111, -100222]));
        assert!(!in_scope(&group_chat(-100111), &[]));
    }

    #[test]
    fn admit_gates_the_same_chats_as_in_scope() {
        assert!(admit(&private_chat(), &[]));
        assert!(admit(&group_chat(-100111), &[-100111]));
        assert!(!admit(&group_chat(-100999), &[-100111]));
    }
}
