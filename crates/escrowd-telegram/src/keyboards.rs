// SPDX-FileCopyrightText: 2026 Escrowd Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Inline keyboard builders for the dashboard and group flows.

use escrowd_core::{Deal, DealStatus, EditField};
use escrowd_dialog::ListPosition;
use teloxide::types::{InlineKeyboardButton, InlineKeyboardMarkup};

use crate::callback::CallbackAction;

fn action_button(text: &str, action: CallbackAction) -> InlineKeyboardButton {
    InlineKeyboardButton::callback(text.to_string(), action.encode())
}

/// Dashboard home: list filters, QR settings, refresh.
pub fn admin_home() -> InlineKeyboardMarkup {
    InlineKeyboardMarkup::new([
        vec![
            action_button(
                "\u{1F4C2} All Deals",
                CallbackAction::DealPage(ListPosition::default()),
            ),
            action_button(
                "\u{1F7E2} Paid Deals",
                CallbackAction::DealPage(ListPosition {
                    page: 0,
                    status_filter: Some(DealStatus::Paid),
                }),
            ),
        ],
        vec![
            action_button(
                "\u{1F534} Cancelled Deals",
                CallbackAction::DealPage(ListPosition {
                    page: 0,
                    status_filter: Some(DealStatus::Cancelled),
                }),
            ),
            action_button("\u{2699}\u{FE0F} Change QR", CallbackAction::ChangeQr),
        ],
        vec![action_button("\u{1F504} Refresh", CallbackAction::AdminHome)],
    ])
}

/// One row per deal, then prev/next navigation, then a home button.
pub fn deal_list(deals: &[Deal], total: i64, pos: ListPosition, page_size: u32) -> InlineKeyboardMarkup {
    let mut rows: Vec<Vec<InlineKeyboardButton>> = deals
        .iter()
        .map(|deal| {
            vec![action_button(
                &format!(
                    "#{} \u{2014} {} \u{2194} {} [{}]",
                    deal.deal_id, deal.seller, deal.buyer, deal.status
                ),
                CallbackAction::DealView {
                    deal_id: deal.deal_id,
                    pos,
                },
            )]
        })
        .collect();

    let mut nav = Vec::new();
    if pos.page > 0 {
        nav.push(action_button(
            "\u{2B05}\u{FE0F} Prev",
            CallbackAction::DealPage(ListPosition {
                page: pos.page - 1,
                ..pos
            }),
        ));
    }
    if i64::from(pos.page + 1) * i64::from(page_size) < total {
        nav.push(action_button(
            "Next \u{27A1}\u{FE0F}",
            CallbackAction::DealPage(ListPosition {
                page: pos.page + 1,
                ..pos
            }),
        ));
    }
    if !nav.is_empty() {
        rows.push(nav);
    }
    rows.push(vec![action_button("\u{1F3E0} Back", CallbackAction::AdminHome)]);
    InlineKeyboardMarkup::new(rows)
}

/// Actions for one deal in the detail view.
pub fn deal_actions(deal_id: i64, pos: ListPosition) -> InlineKeyboardMarkup {
    InlineKeyboardMarkup::new([
        vec![
            action_button(
                "\u{270F}\u{FE0F} Edit Fields",
                CallbackAction::DealEdit { deal_id, pos },
            ),
            action_button(
                "\u{1F504} Change Status",
                CallbackAction::DealChangeStatus { deal_id, pos },
            ),
        ],
        vec![action_button(
            "\u{1F5D1} Delete Deal",
            CallbackAction::DealDelete { deal_id, pos },
        )],
        vec![action_button(
            "\u{2B05}\u{FE0F} Back to List",
            CallbackAction::DealPage(pos),
        )],
    ])
}

/// Field picker for the edit flow.
pub fn edit_fields() -> InlineKeyboardMarkup {
    InlineKeyboardMarkup::new([
        vec![
            action_button("Seller", CallbackAction::EditField(Some(EditField::Seller))),
            action_button("Buyer", CallbackAction::EditField(Some(EditField::Buyer))),
        ],
        vec![
            action_button(
                "Details",
                CallbackAction::EditField(Some(EditField::Details)),
            ),
            action_button("Amount", CallbackAction::EditField(Some(EditField::Amount))),
        ],
        vec![
            action_button(
                "Escrow Till",
                CallbackAction::EditField(Some(EditField::EscrowTill)),
            ),
            action_button(
                "Seller UPI",
                CallbackAction::EditField(Some(EditField::SellerUpi)),
            ),
        ],
        vec![action_button("\u{274C} Cancel", CallbackAction::EditField(None))],
    ])
}

/// Status picker for the change-status flow.
pub fn status_choices() -> InlineKeyboardMarkup {
    InlineKeyboardMarkup::new([
        vec![
            action_button(
                "\u{23F3} Pending",
                CallbackAction::SetStatus(Some(DealStatus::Pending)),
            ),
            action_button(
                "\u{2705} Paid",
                CallbackAction::SetStatus(Some(DealStatus::Paid)),
            ),
            action_button(
                "\u{274C} Cancelled",
                CallbackAction::SetStatus(Some(DealStatus::Cancelled)),
            ),
        ],
        vec![action_button("\u{274C} Cancel", CallbackAction::SetStatus(None))],
    ])
}

/// Yes/no confirmation for deleting a deal.
pub fn confirm_delete(deal_id: i64, pos: ListPosition) -> InlineKeyboardMarkup {
    InlineKeyboardMarkup::new([vec![
        action_button(
            "\u{2705} Yes, Delete",
            CallbackAction::DealDeleteConfirm { deal_id, pos },
        ),
        action_button(
            "\u{274C} No, Go Back",
            CallbackAction::DealView { deal_id, pos },
        ),
    ]])
}

/// Single back button to the detail view, used on cancelled flows.
pub fn back_to_deal(deal_id: i64, pos: ListPosition) -> InlineKeyboardMarkup {
    InlineKeyboardMarkup::new([vec![action_button(
        "\u{2B05}\u{FE0F} Back",
        CallbackAction::DealView { deal_id, pos },
    )]])
}

/// Single back button to the list, used after deletion.
pub fn back_to_list(pos: ListPosition) -> InlineKeyboardMarkup {
    InlineKeyboardMarkup::new([vec![action_button(
        "\u{2B05}\u{FE0F} Back to List",
        CallbackAction::DealPage(pos),
    )]])
}

/// Cancel button that returns to the dashboard home.
pub fn cancel_to_home() -> InlineKeyboardMarkup {
    InlineKeyboardMarkup::new([vec![action_button(
        "\u{274C} Cancel",
        CallbackAction::AdminHome,
    )]])
}

/// Paid / cancel buttons under the group QR payment request.
pub fn pay_choices(deal_id: i64) -> InlineKeyboardMarkup {
    InlineKeyboardMarkup::new([vec![
        action_button("\u{2705} Paid", CallbackAction::PayConfirm { deal_id }),
        action_button("\u{274C} Cancel", CallbackAction::PayCancel { deal_id }),
    ]])
}

/// URL buttons pointing members at the escrow group and channel.
pub fn escrow_links(
    escrow_group_link: Option<&str>,
    main_channel_link: Option<&str>,
) -> InlineKeyboardMarkup {
    let mut row = Vec::new();
    if let Some(link) = escrow_group_link
        && let Ok(url) = reqwest::Url::parse(link)
    {
        row.push(InlineKeyboardButton::url(
            "\u{1F512} Escrow Group".to_string(),
            url,
        ));
    }
    if let Some(link) = main_channel_link
        && let Ok(url) = reqwest::Url::parse(link)
    {
        row.push(InlineKeyboardButton::url(
            "\u{1F4E2} Main Channel".to_string(),
            url,
        ));
    }
    link_rows(row)
}

/// URL buttons pointing escrow-group members at the main group and channel.
pub fn main_links(
    main_group_link: Option<&str>,
    main_channel_link: Option<&str>,
) -> InlineKeyboardMarkup {
    let mut row = Vec::new();
    if let Some(link) = main_group_link
        && let Ok(url) = reqwest::Url::parse(link)
    {
        row.push(InlineKeyboardButton::url(
            "\u{1F4AC} Main Group".to_string(),
            url,
        ));
    }
    if let Some(link) = main_channel_link
        && let Ok(url) = reqwest::Url::parse(link)
    {
        row.push(InlineKeyboardButton::url(
            "\u{1F4E2} Main Channel".to_string(),
            url,
        ));
    }
    link_rows(row)
}

// The Bot API rejects keyboards containing an empty row.
fn link_rows(row: Vec<InlineKeyboardButton>) -> InlineKeyboardMarkup {
    if row.is_empty() {
        InlineKeyboardMarkup::new(Vec::<Vec<InlineKeyboardButton>>::new())
    } else {
        InlineKeyboardMarkup::new([row])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_deal(id: i64) -> Deal {
        Deal {
            deal_id: id,
            seller: "alice".to_string(),
            buyer: "bob".to_string(),
            details: "thing".to_string(),
            amount: 100.0,
            escrow_till: "soon".to_string(),
            seller_upi: "a@upi".to_string(),
            escrow_fee: 10.0,
            status: DealStatus::Pending,
            created_at: "2026-01-01T00:00:00.000Z".to_string(),
        }
    }

    #[test]
    fn deal_list_shows_nav_only_when_needed() {
        let deals: Vec<Deal> = (1..=3).map(make_deal).collect();

        // Single page: only deal rows + home.
        let kb = deal_list(&deals, 3, ListPosition::default(), 10);
        assert_eq!(kb.inline_keyboard.len(), 4);

        // First of several pages: a Next button appears.
        let kb = deal_list(&deals, 25, ListPosition::default(), 10);
        assert_eq!(kb.inline_keyboard.len(), 5);
        assert_eq!(kb.inline_keyboard[3].len(), 1);

        // Middle page: both Prev and Next.
        let kb = deal_list(
            &deals,
            25,
            ListPosition {
                page: 1,
                status_filter: None,
            },
            10,
        );
        assert_eq!(kb.inline_keyboard[3].len(), 2);
    }

    #[test]
    fn list_rows_link_to_deal_view_with_position() {
        let deals = vec![make_deal(7)];
        let pos = ListPosition {
            page: 2,
            status_filter: Some(DealStatus::Paid),
        };
        let kb = deal_list(&deals, 50, pos, 10);
        match &kb.inline_keyboard[0][0].kind {
            teloxide::types::InlineKeyboardButtonKind::CallbackData(data) => {
                assert_eq!(data, "deal_view:7:2:paid");
            }
            other => panic!("expected callback button, got {other:?}"),
        }
    }

    #[test]
    fn link_keyboards_skip_missing_urls() {
        let kb = escrow_links(Some("https://t.me/+abc"), None);
        assert_eq!(kb.inline_keyboard[0].len(), 1);

        let kb = escrow_links(None, None);
        assert!(kb.inline_keyboard.is_empty());

        let kb = main_links(Some("not a url"), Some("https://t.me/channel"));
        assert_eq!(kb.inline_keyboard[0].len(), 1);
    }
}
