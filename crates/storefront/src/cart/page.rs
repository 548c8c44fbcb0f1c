//! Render model for the cart page.
//!
//! Everything a template or client needs to draw the page, already derived:
//! visible rows with their checkbox state, the page strip, totals, and the
//! props of the open dialog.

use serde::Serialize;

use tote_core::{CartItem, CartOwner, CurrencyCode, Price};

use super::modal::ModalProps;

/// One visible cart row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartRow {
    #[serde(flatten)]
    pub item: CartItem,
    pub selected: bool,
    pub line_total: Price,
    pub price_display: String,
    pub line_total_display: String,
}

impl CartRow {
    /// `None` if the line total overflows.
    pub(crate) fn new(item: &CartItem, selected: bool, currency: CurrencyCode) -> Option<Self> {
        let line_total = item.line_total()?;
        Some(Self {
            item: item.clone(),
            selected,
            line_total,
            price_display: currency.format(item.price),
            line_total_display: currency.format(line_total),
        })
    }
}

/// A numbered page button.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PageButton {
    pub number: usize,
    pub active: bool,
}

/// The whole cart page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartPage {
    pub owner: CartOwner,
    pub rows: Vec<CartRow>,
    pub current_page: usize,
    pub total_pages: usize,
    /// Empty whenever `is_empty` is set.
    pub page_buttons: Vec<PageButton>,
    pub prev_disabled: bool,
    pub next_disabled: bool,
    pub select_all_checked: bool,
    pub selected_count: usize,
    /// Deduplicated lines across all pages.
    pub item_count: usize,
    /// Over every page, not just the visible rows.
    pub total_price: Price,
    pub total_price_display: String,
    /// No visible rows: show the empty-cart state instead of the list.
    pub is_empty: bool,
    pub modal: Option<ModalProps>,
}
