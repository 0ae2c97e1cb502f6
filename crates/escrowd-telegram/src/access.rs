// SPDX-FileCopyrightText: 2026 Escrowd Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Admin access checks.
//!
//! Two distinct notions of "admin":
//! - platform admins: user ids from the config, allowed into the private
//!   dashboard and callback actions;
//! - group admins: administrators or the owner of the group a command was
//!   sent in, allowed to run privileged group commands.

use teloxide::prelude::*;
use teloxide::types::ChatMember;
use tracing::debug;

/// Whether `user_id` is in the configured platform admin list.
///
/// An empty list means nobody has dashboard access.
pub fn is_platform_admin(user_id: u64, admin_ids: &[u64]) -> bool {
    admin_ids.contains(&user_id)
}

/// Decide group-admin access from a chat member lookup.
///
/// Fails closed: a lookup error never grants access.
pub fn grants_group_admin<E: std::fmt::Display>(lookup: Result<ChatMember, E>) -> bool {
    match lookup {
        Ok(member) => member.kind.is_privileged(),
        Err(e) => {
            debug!(error = %e, "chat member lookup failed, denying group admin");
            false
        }
    }
}

/// Whether `user_id` is an administrator or the owner of `chat_id`.
pub async fn is_group_admin(bot: &Bot, chat_id: ChatId, user_id: UserId) -> bool {
    grants_group_admin(bot.get_chat_member(chat_id, user_id).await)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_member(status: &str) -> ChatMember {
        let mut json = serde_json::json!({
            "user": {
                "id": 12345,
                "is_bot": false,
                "first_name": "Test",
            },
            "status": status,
        });
        if status == "administrator" {
            let extra = serde_json::json!({
                "can_be_edited": false,
                "is_anonymous": false,
                "can_manage_chat": true,
                "can_delete_messages": true,
                "can_manage_video_chats": true,
                "can_restrict_members": true,
                "can_promote_members": false,
                "can_change_info": true,
                "can_invite_users": true,
                "can_post_stories": false,
                "can_edit_stories": false,
                "can_delete_stories": false,
            });
            for (k, v) in extra.as_object().unwrap() {
                json[k] = v.clone();
            }
        }
        if status == "creator" {
            json["is_anonymous"] = serde_json::json!(false);
        }
        serde_json::from_value(json).expect("failed to deserialize mock chat member")
    }

    #[test]
    fn platform_admin_matches_listed_ids() {
        assert!(is_platform_admin(42, &[7, 42]));
        assert!(!is_platform_admin(43, &[7, 42]));
        assert!(!is_platform_admin(42, &[]));
    }

    #[test]
    fn owner_and_administrator_are_group_admins() {
        assert!(grants_group_admin::<String>(Ok(make_member("creator"))));
        assert!(grants_group_admin::<String>(Ok(make_member("administrator"))));
    }

    #[test]
    fn regular_member_is_not_group_admin() {
        assert!(!grants_group_admin::<String>(Ok(make_member("member"))));
        assert!(!grants_group_admin::<String>(Ok(make_member("left"))));
    }

    #[test]
    fn lookup_failure_denies_access() {
        assert!(!grants_group_admin(Err("network unreachable".to_string())));
    }
}
