// SPDX-FileCopyrightText: 2026 Escrowd Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Typed callback data for inline keyboards.
//!
//! Callback payloads are colon-separated strings (Telegram caps them at 64
//! bytes). Deal actions carry the originating list position so every flow
//! can navigate back to the exact page and filter it came from.

use std::str::FromStr;

use escrowd_core::{DealStatus, EditField};
use escrowd_dialog::ListPosition;

/// Everything an inline button can ask the bot to do.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CallbackAction {
    /// Mark the deal paid from the group QR message.
    PayConfirm { deal_id: i64 },
    /// Cancel the payment from the group QR message.
    PayCancel { deal_id: i64 },
    /// Show the dashboard home screen, clearing any active flow.
    AdminHome,
    /// Start the change-QR-url flow.
    ChangeQr,
    /// Show a page of the deal list.
    DealPage(ListPosition),
    DealView { deal_id: i64, pos: ListPosition },
    DealEdit { deal_id: i64, pos: ListPosition },
    DealChangeStatus { deal_id: i64, pos: ListPosition },
    DealDelete { deal_id: i64, pos: ListPosition },
    DealDeleteConfirm { deal_id: i64, pos: ListPosition },
    /// Field picked in the edit flow; `None` cancels the flow.
    EditField(Option<EditField>),
    /// Status picked in the change-status flow; `None` cancels the flow.
    SetStatus(Option<DealStatus>),
}

/// Filter token used in callback payloads: a status name or `all`.
pub fn filter_token(filter: Option<DealStatus>) -> String {
    match filter {
        Some(status) => status.to_string(),
        None => "all".to_string(),
    }
}

fn parse_filter(token: &str) -> Option<Option<DealStatus>> {
    if token == "all" {
        Some(None)
    } else {
        DealStatus::from_str(token).ok().map(Some)
    }
}

fn pos_suffix(pos: ListPosition) -> String {
    format!("{}:{}", pos.page, filter_token(pos.status_filter))
}

impl CallbackAction {
    /// Serialize to the wire payload.
    pub fn encode(&self) -> String {
        match self {
            Self::PayConfirm { deal_id } => format!("pay_confirm:{deal_id}"),
            Self::PayCancel { deal_id } => format!("pay_cancel:{deal_id}"),
            Self::AdminHome => "admin_home".to_string(),
            Self::ChangeQr => "admin_change_qr".to_string(),
            Self::DealPage(pos) => format!("deal_page:{}", pos_suffix(*pos)),
            Self::DealView { deal_id, pos } => {
                format!("deal_view:{deal_id}:{}", pos_suffix(*pos))
            }
            Self::DealEdit { deal_id, pos } => {
                format!("deal_edit:{deal_id}:{}", pos_suffix(*pos))
            }
            Self::DealChangeStatus { deal_id, pos } => {
                format!("deal_changestatus:{deal_id}:{}", pos_suffix(*pos))
            }
            Self::DealDelete { deal_id, pos } => {
                format!("deal_delete:{deal_id}:{}", pos_suffix(*pos))
            }
            Self::DealDeleteConfirm { deal_id, pos } => {
                format!("deal_delete_confirm:{deal_id}:{}", pos_suffix(*pos))
            }
            Self::EditField(Some(field)) => format!("editfield:{field}"),
            Self::EditField(None) => "editfield:cancel".to_string(),
            Self::SetStatus(Some(status)) => format!("setstatus:{status}"),
            Self::SetStatus(None) => "setstatus:cancel".to_string(),
        }
    }

    /// Parse a wire payload. Returns `None` for malformed or unknown data.
    pub fn parse(data: &str) -> Option<Self> {
        match data {
            "admin_home" => return Some(Self::AdminHome),
            "admin_change_qr" => return Some(Self::ChangeQr),
            "editfield:cancel" => return Some(Self::EditField(None)),
            "setstatus:cancel" => return Some(Self::SetStatus(None)),
            _ => {}
        }

        let (head, rest) = data.split_once(':')?;
        match head {
            "pay_confirm" => Some(Self::PayConfirm {
                deal_id: rest.parse().ok()?,
            }),
            "pay_cancel" => Some(Self::PayCancel {
                deal_id: rest.parse().ok()?,
            }),
            "editfield" => Some(Self::EditField(Some(EditField::from_str(rest).ok()?))),
            "setstatus" => Some(Self::SetStatus(Some(DealStatus::from_str(rest).ok()?))),
            "deal_page" => {
                let (page, filter) = rest.split_once(':')?;
                Some(Self::DealPage(ListPosition {
                    page: page.parse().ok()?,
                    status_filter: parse_filter(filter)?,
                }))
            }
            "deal_view" | "deal_edit" | "deal_changestatus" | "deal_delete"
            | "deal_delete_confirm" => {
                let mut parts = rest.splitn(3, ':');
                let deal_id = parts.next()?.parse().ok()?;
                let pos = ListPosition {
                    page: parts.next()?.parse().ok()?,
                    status_filter: parse_filter(parts.next()?)?,
                };
                Some(match head {
                    "deal_view" => Self::DealView { deal_id, pos },
                    "deal_edit" => Self::DealEdit { deal_id, pos },
                    "deal_changestatus" => Self::DealChangeStatus { deal_id, pos },
                    "deal_delete" => Self::DealDelete { deal_id, pos },
                    _ => Self::DealDeleteConfirm { deal_id, pos },
                })
            }
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pos(page: u32, filter: Option<DealStatus>) -> ListPosition {
        ListPosition {
            page,
            status_filter: filter,
        }
    }

    #[test]
    fn encodes_original_wire_formats() {
        assert_eq!(
            CallbackAction::DealView {
                deal_id: 3,
                pos: pos(0, None)
            }
            .encode(),
            "deal_view:3:0:all"
        );
        assert_eq!(
            CallbackAction::DealPage(pos(2, Some(DealStatus::Paid))).encode(),
            "deal_page:2:paid"
        );
        assert_eq!(
            CallbackAction::PayConfirm { deal_id: 7 }.encode(),
            "pay_confirm:7"
        );
        assert_eq!(
            CallbackAction::EditField(Some(EditField::SellerUpi)).encode(),
            "editfield:seller_upi"
        );
        assert_eq!(CallbackAction::SetStatus(None).encode(), "setstatus:cancel");
        assert_eq!(CallbackAction::AdminHome.encode(), "admin_home");
    }

    #[test]
    fn all_actions_round_trip() {
        let actions = [
            CallbackAction::PayConfirm { deal_id: 1 },
            CallbackAction::PayCancel { deal_id: 99 },
            CallbackAction::AdminHome,
            CallbackAction::ChangeQr,
            CallbackAction::DealPage(pos(0, None)),
            CallbackAction::DealPage(pos(3, Some(DealStatus::Cancelled))),
            CallbackAction::DealView {
                deal_id: 12,
                pos: pos(1, Some(DealStatus::Pending)),
            },
            CallbackAction::DealEdit {
                deal_id: 12,
                pos: pos(1, None),
            },
            CallbackAction::DealChangeStatus {
                deal_id: 5,
                pos: pos(0, Some(DealStatus::Paid)),
            },
            CallbackAction::DealDelete {
                deal_id: 5,
                pos: pos(0, None),
            },
            CallbackAction::DealDeleteConfirm {
                deal_id: 5,
                pos: pos(0, None),
            },
            CallbackAction::EditField(Some(EditField::Amount)),
            CallbackAction::EditField(None),
            CallbackAction::SetStatus(Some(DealStatus::Paid)),
            CallbackAction::SetStatus(None),
        ];
        for action in actions {
            let encoded = action.encode();
            assert_eq!(
                CallbackAction::parse(&encoded),
                Some(action),
                "failed for {encoded}"
            );
            assert!(encoded.len() <= 64, "payload too long: {encoded}");
        }
    }

    #[test]
    fn malformed_payloads_are_rejected() {
        for data in [
            "",
            "unknown",
            "deal_view:abc:0:all",
            "deal_view:3:0:refunded",
            "deal_page:0",
            "editfield:escrow_fee",
            "setstatus:refunded",
            "pay_confirm:",
        ] {
            assert_eq!(CallbackAction::parse(data), None, "accepted {data:?}");
        }
    }
}
