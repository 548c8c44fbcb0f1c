//! The cart view: derivation, pagination, selection, dialogs, and intents.
//!
//! A [`CartView`] is rebuilt for every event turn from its persisted
//! [`CartViewState`], a store handle, and a navigator. [`CartView::refresh`]
//! derives the projection from a fresh store snapshot; every mutating
//! operation dispatches intents and re-derives before returning, so the
//! view never shows state older than the intents it sent.

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use tote_core::{CartItem, CartKey, CartOwner, CurrencyCode, Price};

use super::auth::AuthSnapshot;
use super::error::CartError;
use super::migration::MigrationTrigger;
use super::modal::{Modal, ModalProps};
use super::navigation::{CHECKOUT_ROUTE, Navigator};
use super::page::{CartPage, CartRow, PageButton};
use super::pagination::{self, Pagination};
use super::projection::CartProjection;
use super::selection::Selection;
use super::store::{CartIntent, CartStore};

/// Per-shopper UI state that outlives a single event turn.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartViewState {
    pub pagination: Pagination,
    pub selection: Selection,
    pub modal: Modal,
    pub migration: MigrationTrigger,
}

pub struct CartView<S, N> {
    store: S,
    navigator: N,
    state: CartViewState,
    auth: AuthSnapshot,
    owner: CartOwner,
    projection: CartProjection,
}

impl<S, N> std::fmt::Debug for CartView<S, N> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CartView")
            .field("owner", &self.owner)
            .field("state", &self.state)
            .field("items", &self.projection.len())
            .finish_non_exhaustive()
    }
}

impl<S: CartStore, N: Navigator> CartView<S, N> {
    /// Build a view around persisted state. Call [`refresh`](Self::refresh)
    /// before reading anything derived.
    pub fn new(store: S, navigator: N, state: CartViewState) -> Self {
        Self {
            store,
            navigator,
            state,
            auth: AuthSnapshot::guest(),
            owner: CartOwner::Guest,
            projection: CartProjection::default(),
        }
    }

    /// Re-derive from the store for the given auth state.
    ///
    /// Fires the guest-cart migration on its rising edge.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be read or the migration
    /// intent is rejected.
    pub fn refresh(&mut self, auth: AuthSnapshot) -> Result<(), CartError> {
        self.auth = auth;
        self.rederive()
    }

    fn rederive(&mut self) -> Result<(), CartError> {
        let snapshot = self.store.snapshot(self.auth.clone())?;
        self.owner = snapshot.auth.active_owner_or_guest();

        let mut items = snapshot.items;
        if let Some(intent) = self.state.migration.observe(&self.owner, &items) {
            info!(owner = %self.owner, "Guest cart found after login, requesting migration");
            if let Err(err) = self.store.dispatch(intent) {
                self.state.migration.rearm();
                return Err(err.into());
            }
            items = self.store.items()?;
        }

        self.projection = CartProjection::derive(&items, &self.owner);
        let projection = &self.projection;
        self.state
            .selection
            .retain_keys(|key| projection.get(key).is_some());

        let total_pages = self.total_pages();
        let current = self.state.pagination.current_page();
        let changed = if current > total_pages.max(1) {
            self.state.pagination.clamp(total_pages)
        } else {
            self.state.pagination.normalize(total_pages)
        };
        if changed {
            self.navigator.scroll_to_top();
        }

        debug!(
            owner = %self.owner,
            items = self.projection.len(),
            page = self.state.pagination.current_page(),
            total_pages,
            "Derived cart view"
        );
        Ok(())
    }

    // -------------------------------------------------------------------------
    // Derived reads
    // -------------------------------------------------------------------------

    #[must_use]
    pub const fn owner(&self) -> &CartOwner {
        &self.owner
    }

    #[must_use]
    pub const fn projection(&self) -> &CartProjection {
        &self.projection
    }

    #[must_use]
    pub const fn state(&self) -> &CartViewState {
        &self.state
    }

    #[must_use]
    pub const fn store(&self) -> &S {
        &self.store
    }

    #[must_use]
    pub const fn navigator(&self) -> &N {
        &self.navigator
    }

    #[must_use]
    pub const fn current_page(&self) -> usize {
        self.state.pagination.current_page()
    }

    #[must_use]
    pub const fn total_pages(&self) -> usize {
        pagination::total_pages(self.projection.len())
    }

    /// Rows on the current page.
    #[must_use]
    pub fn current_items(&self) -> &[CartItem] {
        self.state.pagination.window(self.projection.items())
    }

    /// # Errors
    ///
    /// Returns [`CartError::PriceOverflow`] if the total does not fit in a price.
    pub fn total_price(&self) -> Result<Price, CartError> {
        self.projection.total_price().ok_or(CartError::PriceOverflow)
    }

    #[must_use]
    pub fn is_selected(&self, key: &CartKey) -> bool {
        self.state.selection.contains(key)
    }

    /// Whether the select-all checkbox shows as checked.
    #[must_use]
    pub fn all_selected(&self) -> bool {
        self.state.selection.covers(self.current_items())
    }

    // -------------------------------------------------------------------------
    // Selection
    // -------------------------------------------------------------------------

    fn lookup(&self, key: &CartKey) -> Result<CartItem, CartError> {
        self.projection
            .get(key)
            .cloned()
            .ok_or_else(|| CartError::ItemNotFound(key.clone()))
    }

    /// Flip one row's checkbox. Returns `true` if the row is now selected.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::ItemNotFound`] if `key` is not in this cart.
    pub fn toggle_selection(&mut self, key: &CartKey) -> Result<bool, CartError> {
        let item = self.lookup(key)?;
        Ok(self.state.selection.toggle(&item))
    }

    /// Select-all toggle over the current page only.
    pub fn select_all(&mut self) {
        let page = self.current_items().to_vec();
        self.state.selection.toggle_page(&page);
    }

    // -------------------------------------------------------------------------
    // Dialogs
    // -------------------------------------------------------------------------

    /// # Errors
    ///
    /// Returns [`CartError::ItemNotFound`] if `key` is not in this cart.
    pub fn open_detail(&mut self, key: &CartKey) -> Result<(), CartError> {
        self.state.modal = Modal::Detail(self.lookup(key)?);
        Ok(())
    }

    /// # Errors
    ///
    /// Returns [`CartError::ItemNotFound`] if `key` is not in this cart.
    pub fn open_delete(&mut self, key: &CartKey) -> Result<(), CartError> {
        self.state.modal = Modal::ConfirmDelete(self.lookup(key)?);
        Ok(())
    }

    pub fn open_bulk_delete(&mut self) {
        self.state.modal = Modal::ConfirmBulkDelete;
    }

    /// Shared close/cancel callback for every dialog.
    pub fn close_modal(&mut self) {
        self.state.modal = Modal::Closed;
    }

    /// Delete the line shown in the single-delete confirmation.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::ModalMismatch`] if that dialog is not open, or a
    /// store error if the intent is rejected.
    pub fn confirm_delete(&mut self) -> Result<(), CartError> {
        let Modal::ConfirmDelete(item) = &self.state.modal else {
            return Err(CartError::ModalMismatch {
                expected: "delete confirmation",
            });
        };
        let key = item.key();
        self.state.modal = Modal::Closed;

        info!(id = %key.id, category = %key.category, "Deleting cart item");
        self.store.dispatch(CartIntent::DeleteCart(key.clone()))?;

        self.clamp_after_delete(&[key]);
        self.rederive()
    }

    /// Delete every selected line, then clear the selection.
    ///
    /// Each line is its own intent. If one is rejected, the ones before it
    /// stay applied.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::ModalMismatch`] if the bulk dialog is not open,
    /// or the first store error.
    pub fn confirm_bulk_delete(&mut self) -> Result<(), CartError> {
        if self.state.modal != Modal::ConfirmBulkDelete {
            return Err(CartError::ModalMismatch {
                expected: "bulk delete confirmation",
            });
        }
        self.state.modal = Modal::Closed;

        let keys = self.state.selection.keys();
        info!(count = keys.len(), "Deleting selected cart items");
        for key in &keys {
            self.store.dispatch(CartIntent::DeleteCart(key.clone()))?;
        }
        self.state.selection.clear();

        self.clamp_after_delete(&keys);
        self.rederive()
    }

    fn clamp_after_delete(&mut self, removed: &[CartKey]) {
        let remaining = self.projection.count_without(removed);
        if self.state.pagination.clamp(pagination::total_pages(remaining)) {
            self.navigator.scroll_to_top();
        }
    }

    // -------------------------------------------------------------------------
    // Navigation
    // -------------------------------------------------------------------------

    /// Direct page click.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::PageOutOfRange`] unless `1 <= page <= total_pages`.
    pub fn go_to_page(&mut self, page: usize) -> Result<(), CartError> {
        let total_pages = self.total_pages();
        if self.state.pagination.go_to(page, total_pages)? {
            self.navigator.scroll_to_top();
        }
        Ok(())
    }

    pub fn next_page(&mut self) {
        if self.state.pagination.next(self.total_pages()) {
            self.navigator.scroll_to_top();
        }
    }

    pub fn prev_page(&mut self) {
        if self.state.pagination.prev() {
            self.navigator.scroll_to_top();
        }
    }

    pub fn checkout(&mut self) {
        self.navigator.go_to(CHECKOUT_ROUTE);
    }

    pub fn go_back(&mut self) {
        self.navigator.go_back();
    }

    // -------------------------------------------------------------------------
    // Render
    // -------------------------------------------------------------------------

    /// The render model for the current state.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::PriceOverflow`] if a line or the cart total does
    /// not fit in a price.
    pub fn page(&self, currency: CurrencyCode) -> Result<CartPage, CartError> {
        let rows = self
            .current_items()
            .iter()
            .map(|item| CartRow::new(item, self.is_selected(&item.key()), currency))
            .collect::<Option<Vec<CartRow>>>()
            .ok_or(CartError::PriceOverflow)?;
        let is_empty = rows.is_empty();
        let current_page = self.current_page();
        let total_pages = self.total_pages();

        let page_buttons = if is_empty {
            Vec::new()
        } else {
            (1..=total_pages)
                .map(|number| PageButton {
                    number,
                    active: number == current_page,
                })
                .collect()
        };

        let modal = match &self.state.modal {
            Modal::Closed => None,
            Modal::Detail(item) => Some(ModalProps::Detail { item: item.clone() }),
            Modal::ConfirmDelete(item) => Some(ModalProps::ConfirmDelete { item: item.clone() }),
            Modal::ConfirmBulkDelete => Some(ModalProps::ConfirmBulkDelete {
                items: self.state.selection.items().to_vec(),
            }),
        };

        let total_price = self.total_price()?;
        Ok(CartPage {
            owner: self.owner.clone(),
            rows,
            current_page,
            total_pages,
            page_buttons,
            prev_disabled: current_page <= 1,
            next_disabled: current_page >= total_pages,
            select_all_checked: self.all_selected(),
            selected_count: self.state.selection.len(),
            item_count: self.projection.len(),
            total_price,
            total_price_display: currency.format(total_price),
            is_empty,
            modal,
        })
    }

    /// Hand back the state to persist and the navigator with its effects.
    pub fn into_parts(self) -> (CartViewState, N) {
        (self.state, self.navigator)
    }
}
