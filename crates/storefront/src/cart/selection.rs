//! Checkbox selection over cart lines, keyed by identity.

use serde::{Deserialize, Serialize};

use tote_core::{CartItem, CartKey};

/// Selected lines in the order they were picked.
///
/// Membership is decided by [`CartKey`], never by field-wise equality, so a
/// line whose count changed in the store stays selected. Selection survives
/// page changes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Selection {
    items: Vec<CartItem>,
}

impl Selection {
    #[must_use]
    pub fn items(&self) -> &[CartItem] {
        &self.items
    }

    #[must_use]
    pub fn keys(&self) -> Vec<CartKey> {
        self.items.iter().map(CartItem::key).collect()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    #[must_use]
    pub fn contains(&self, key: &CartKey) -> bool {
        self.items.iter().any(|item| item.has_key(key))
    }

    /// Flip membership of `item`. Returns `true` if it is now selected.
    pub fn toggle(&mut self, item: &CartItem) -> bool {
        let key = item.key();
        if self.contains(&key) {
            self.items.retain(|selected| !selected.has_key(&key));
            false
        } else {
            self.items.push(item.clone());
            true
        }
    }

    /// Whether every line of `page` is selected. An empty page never is.
    #[must_use]
    pub fn covers(&self, page: &[CartItem]) -> bool {
        !page.is_empty() && page.iter().all(|item| self.contains(&item.key()))
    }

    /// Select-all toggle over one page: if the whole page is already
    /// selected, clear everything; otherwise the page becomes the selection.
    pub fn toggle_page(&mut self, page: &[CartItem]) {
        if self.covers(page) {
            self.items.clear();
        } else {
            self.items = page.to_vec();
        }
    }

    /// Drop every entry whose key is not in `keep`.
    pub fn retain_keys(&mut self, keep: impl Fn(&CartKey) -> bool) {
        self.items.retain(|item| keep(&item.key()));
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }
}
