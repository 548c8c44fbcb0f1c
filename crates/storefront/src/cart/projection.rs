//! Per-shopper cart projection: filter by owner, then dedupe by identity key.

use std::collections::HashMap;

use tote_core::{CartItem, CartKey, CartOwner, Price};

/// The active shopper's cart lines with no duplicate identity keys.
///
/// Dedupe follows overwrite-by-key map semantics: a key stays at the
/// position where it first appeared, and the **last** occurrence's fields
/// win.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CartProjection {
    items: Vec<CartItem>,
}

impl CartProjection {
    /// Project `items` onto `owner`.
    #[must_use]
    pub fn derive(items: &[CartItem], owner: &CartOwner) -> Self {
        let mut positions: HashMap<CartKey, usize> = HashMap::new();
        let mut projected: Vec<CartItem> = Vec::new();

        for item in items.iter().filter(|item| &item.owner == owner) {
            match positions.get(&item.key()) {
                Some(&slot) => {
                    if let Some(existing) = projected.get_mut(slot) {
                        existing.clone_from(item);
                    }
                }
                None => {
                    positions.insert(item.key(), projected.len());
                    projected.push(item.clone());
                }
            }
        }

        Self { items: projected }
    }

    #[must_use]
    pub fn items(&self) -> &[CartItem] {
        &self.items
    }

    #[must_use]
    pub const fn len(&self) -> usize {
        self.items.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Look up a line by identity key.
    #[must_use]
    pub fn get(&self, key: &CartKey) -> Option<&CartItem> {
        self.items.iter().find(|item| item.has_key(key))
    }

    /// `sum(price * count)` over every projected line, not just one page.
    /// `None` if the sum overflows.
    #[must_use]
    pub fn total_price(&self) -> Option<Price> {
        self.items
            .iter()
            .try_fold(Price::ZERO, |total, item| total.checked_add(item.line_total()?))
    }

    /// How many lines would remain once every key in `removed` is gone.
    #[must_use]
    pub fn count_without(&self, removed: &[CartKey]) -> usize {
        self.items
            .iter()
            .filter(|item| !removed.iter().any(|key| item.has_key(key)))
            .count()
    }
}
