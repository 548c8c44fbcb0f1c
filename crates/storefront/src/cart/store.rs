//! The shared cart store and the intents it accepts.
//!
//! The view never mutates cart lines directly. It reads a snapshot through
//! [`CartStore::items`] and requests changes with [`CartStore::dispatch`],
//! so every mutation is serialized through the store.

use std::collections::HashSet;
use std::sync::{Arc, RwLock};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info};

use tote_core::{CartItem, CartKey, CartOwner, Email, ItemError, ProductId};

use super::auth::AuthSnapshot;

/// Errors raised by a [`CartStore`].
#[derive(Debug, Error)]
pub enum StoreError {
    /// A writer panicked while holding the lock.
    #[error("cart store lock poisoned")]
    Poisoned,

    /// A line violates cart invariants.
    #[error("invalid cart item: {0}")]
    InvalidItem(#[from] ItemError),

    /// A seed document could not be parsed.
    #[error("invalid seed document: {0}")]
    Seed(#[from] serde_json::Error),
}

/// A mutation request sent from the view to the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum CartIntent {
    /// Remove every stored line with this identity key.
    DeleteCart(CartKey),
    /// Move all guest lines to the given shopper.
    #[serde(rename_all = "camelCase")]
    MigrateGuestCartToUser { user_email: Email },
}

/// Read-only view of everything the cart page derives from.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StoreSnapshot {
    pub items: Vec<CartItem>,
    pub auth: AuthSnapshot,
}

/// Snapshot reads plus intent dispatch.
pub trait CartStore {
    /// All stored lines in insertion order. Not deduplicated.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be read.
    fn items(&self) -> Result<Vec<CartItem>, StoreError>;

    /// Apply one intent. Intents apply in the order they are dispatched.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be written.
    fn dispatch(&self, intent: CartIntent) -> Result<(), StoreError>;

    /// Pair the current lines with the caller's auth state.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be read.
    fn snapshot(&self, auth: AuthSnapshot) -> Result<StoreSnapshot, StoreError> {
        Ok(StoreSnapshot {
            items: self.items()?,
            auth,
        })
    }
}

impl<T: CartStore + ?Sized> CartStore for Arc<T> {
    fn items(&self) -> Result<Vec<CartItem>, StoreError> {
        (**self).items()
    }

    fn dispatch(&self, intent: CartIntent) -> Result<(), StoreError> {
        (**self).dispatch(intent)
    }
}

impl<T: CartStore + ?Sized> CartStore for &T {
    fn items(&self) -> Result<Vec<CartItem>, StoreError> {
        (**self).items()
    }

    fn dispatch(&self, intent: CartIntent) -> Result<(), StoreError> {
        (**self).dispatch(intent)
    }
}

/// Process-local cart store.
///
/// The service keeps shopper-owned lines in one shared instance. Guest lines
/// live per session, see [`SessionCartStore`](super::SessionCartStore).
#[derive(Debug, Default)]
pub struct InMemoryCartStore {
    items: RwLock<Vec<CartItem>>,
}

impl InMemoryCartStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store holding `items`, in order.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::InvalidItem`] for the first line that fails validation.
    pub fn with_items(items: Vec<CartItem>) -> Result<Self, StoreError> {
        for item in &items {
            item.validate()?;
        }
        Ok(Self {
            items: RwLock::new(items),
        })
    }

    /// Load a store from a JSON array of cart lines.
    ///
    /// # Errors
    ///
    /// Returns an error if the document is malformed or a line is invalid.
    pub fn from_json(json: &str) -> Result<Self, StoreError> {
        let items: Vec<CartItem> = serde_json::from_str(json)?;
        Self::with_items(items)
    }

    /// Append a line. Duplicate keys are allowed; the view dedupes.
    ///
    /// # Errors
    ///
    /// Returns an error if the line is invalid or the lock is poisoned.
    pub fn insert(&self, item: CartItem) -> Result<(), StoreError> {
        item.validate()?;
        self.items
            .write()
            .map_err(|_| StoreError::Poisoned)?
            .push(item);
        Ok(())
    }

    /// Number of stored lines, duplicates included.
    ///
    /// # Errors
    ///
    /// Returns an error if the lock is poisoned.
    pub fn len(&self) -> Result<usize, StoreError> {
        Ok(self.items.read().map_err(|_| StoreError::Poisoned)?.len())
    }

    /// Whether the store holds no lines.
    ///
    /// # Errors
    ///
    /// Returns an error if the lock is poisoned.
    pub fn is_empty(&self) -> Result<bool, StoreError> {
        Ok(self.len()? == 0)
    }

    /// Remove and return every guest line, in order.
    ///
    /// # Errors
    ///
    /// Returns an error if the lock is poisoned.
    pub fn take_guest_lines(&self) -> Result<Vec<CartItem>, StoreError> {
        let mut items = self.items.write().map_err(|_| StoreError::Poisoned)?;
        let (guest, kept): (Vec<CartItem>, Vec<CartItem>) = std::mem::take(&mut *items)
            .into_iter()
            .partition(|item| item.owner.is_guest());
        *items = kept;
        Ok(guest)
    }

    /// Append guest lines held outside this store, re-owned to `user`, with
    /// the same replacement rule as [`CartIntent::MigrateGuestCartToUser`].
    /// Returns the number of lines adopted.
    ///
    /// # Errors
    ///
    /// Returns an error if the lock is poisoned.
    pub fn adopt_guest_lines(&self, user: &Email, lines: Vec<CartItem>) -> Result<usize, StoreError> {
        let owner = CartOwner::User(user.clone());
        let products: HashSet<(ProductId, String)> = lines
            .iter()
            .map(|item| (item.id, item.category.clone()))
            .collect();

        let mut items = self.items.write().map_err(|_| StoreError::Poisoned)?;
        drop_replaced_lines(&mut items, &owner, &products);
        let adopted = lines.len();
        items.extend(lines.into_iter().map(|mut item| {
            item.owner = owner.clone();
            item
        }));
        Ok(adopted)
    }
}

impl CartStore for InMemoryCartStore {
    fn items(&self) -> Result<Vec<CartItem>, StoreError> {
        Ok(self.items.read().map_err(|_| StoreError::Poisoned)?.clone())
    }

    fn dispatch(&self, intent: CartIntent) -> Result<(), StoreError> {
        let mut items = self.items.write().map_err(|_| StoreError::Poisoned)?;
        match intent {
            CartIntent::DeleteCart(key) => {
                let before = items.len();
                items.retain(|item| !item.has_key(&key));
                let removed = before - items.len();
                if removed == 0 {
                    debug!(id = %key.id, category = %key.category, "Delete for missing cart item ignored");
                } else {
                    info!(id = %key.id, category = %key.category, owner = %key.owner, removed, "Deleted cart item");
                }
            }
            CartIntent::MigrateGuestCartToUser { user_email } => {
                let migrated = migrate_guest_lines(&mut items, &user_email);
                if migrated > 0 {
                    info!(user = %user_email, migrated, "Migrated guest cart to user");
                }
            }
        }
        Ok(())
    }
}

/// Re-own guest lines to `user`. A guest line replaces any line the user
/// already holds for the same `(id, category)`. Returns the number of lines
/// migrated; zero when no guest lines remain.
fn migrate_guest_lines(items: &mut Vec<CartItem>, user: &Email) -> usize {
    let guest_products: HashSet<(ProductId, String)> = items
        .iter()
        .filter(|item| item.owner.is_guest())
        .map(|item| (item.id, item.category.clone()))
        .collect();
    if guest_products.is_empty() {
        return 0;
    }

    let owner = CartOwner::User(user.clone());
    drop_replaced_lines(items, &owner, &guest_products);

    let mut migrated = 0;
    for item in items.iter_mut().filter(|item| item.owner.is_guest()) {
        item.owner = owner.clone();
        migrated += 1;
    }
    migrated
}

/// Remove `owner`'s lines for products a guest line is about to replace.
fn drop_replaced_lines(
    items: &mut Vec<CartItem>,
    owner: &CartOwner,
    products: &HashSet<(ProductId, String)>,
) {
    items.retain(|item| &item.owner != owner || !products.contains(&(item.id, item.category.clone())));
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use tote_core::Price;

    use super::*;

    fn line(id: i64, category: &str, owner: &CartOwner, count: u32) -> CartItem {
        CartItem {
            id: ProductId::new(id),
            category: category.to_string(),
            title: format!("item {id}"),
            img: String::new(),
            price: Price::from_units(1_000),
            count,
            owner: owner.clone(),
        }
    }

    fn user() -> Email {
        Email::parse("kim@shop.kr").unwrap()
    }

    #[test]
    fn test_delete_removes_every_duplicate_of_key() {
        let owner = CartOwner::User(user());
        let store = InMemoryCartStore::with_items(vec![
            line(1, "a", &owner, 1),
            line(2, "a", &owner, 1),
            line(1, "a", &owner, 5),
        ])
        .unwrap();

        store
            .dispatch(CartIntent::DeleteCart(line(1, "a", &owner, 1).key()))
            .unwrap();

        let items = store.items().unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].id, ProductId::new(2));
    }

    #[test]
    fn test_delete_missing_key_is_noop() {
        let owner = CartOwner::Guest;
        let store = InMemoryCartStore::with_items(vec![line(1, "a", &owner, 1)]).unwrap();
        store
            .dispatch(CartIntent::DeleteCart(line(9, "a", &owner, 1).key()))
            .unwrap();
        assert_eq!(store.len().unwrap(), 1);
    }

    #[test]
    fn test_delete_only_matches_owner() {
        let owner = CartOwner::User(user());
        let store = InMemoryCartStore::with_items(vec![
            line(1, "a", &owner, 1),
            line(1, "a", &CartOwner::Guest, 1),
        ])
        .unwrap();
        store
            .dispatch(CartIntent::DeleteCart(line(1, "a", &owner, 1).key()))
            .unwrap();
        let items = store.items().unwrap();
        assert_eq!(items.len(), 1);
        assert!(items[0].owner.is_guest());
    }

    #[test]
    fn test_migration_reowns_guest_lines_and_is_idempotent() {
        let owner = CartOwner::User(user());
        let other = CartOwner::User(Email::parse("lee@shop.kr").unwrap());
        let store = InMemoryCartStore::with_items(vec![
            line(1, "a", &owner, 1),
            line(1, "a", &CartOwner::Guest, 3),
            line(2, "b", &CartOwner::Guest, 1),
            line(3, "c", &other, 1),
        ])
        .unwrap();

        let intent = CartIntent::MigrateGuestCartToUser { user_email: user() };
        store.dispatch(intent.clone()).unwrap();
        let after_first = store.items().unwrap();

        assert_eq!(after_first.len(), 3);
        assert!(after_first.iter().all(|item| !item.owner.is_guest()));
        let replaced = after_first
            .iter()
            .find(|item| item.id == ProductId::new(1))
            .unwrap();
        assert_eq!(replaced.count, 3);
        assert_eq!(after_first[2].owner, other);

        store.dispatch(intent).unwrap();
        assert_eq!(store.items().unwrap(), after_first);
    }

    #[test]
    fn test_take_guest_lines() {
        let owner = CartOwner::User(user());
        let store = InMemoryCartStore::with_items(vec![
            line(1, "a", &CartOwner::Guest, 1),
            line(2, "a", &owner, 1),
            line(3, "a", &CartOwner::Guest, 2),
        ])
        .unwrap();

        let guest = store.take_guest_lines().unwrap();
        let ids: Vec<i64> = guest.iter().map(|item| item.id.as_i64()).collect();
        assert_eq!(ids, vec![1, 3]);
        assert_eq!(store.items().unwrap(), vec![line(2, "a", &owner, 1)]);
        assert!(store.take_guest_lines().unwrap().is_empty());
    }

    #[test]
    fn test_adopt_guest_lines_replaces_same_product() {
        let owner = CartOwner::User(user());
        let store = InMemoryCartStore::with_items(vec![
            line(1, "a", &owner, 1),
            line(2, "a", &owner, 1),
        ])
        .unwrap();

        let adopted = store
            .adopt_guest_lines(&user(), vec![line(1, "a", &CartOwner::Guest, 4)])
            .unwrap();

        assert_eq!(adopted, 1);
        assert_eq!(
            store.items().unwrap(),
            vec![line(2, "a", &owner, 1), line(1, "a", &owner, 4)]
        );
    }

    #[test]
    fn test_insert_validates() {
        let store = InMemoryCartStore::new();
        assert!(matches!(
            store.insert(line(1, "a", &CartOwner::Guest, 0)),
            Err(StoreError::InvalidItem(_))
        ));
        assert!(store.is_empty().unwrap());
    }

    #[test]
    fn test_from_json() {
        let store = InMemoryCartStore::from_json(
            r#"[{"id": 1, "category": "tea", "title": "Green tea", "img": "/t.png",
                 "price": 4500, "count": 2, "userEmail": "guest"}]"#,
        )
        .unwrap();
        assert_eq!(store.len().unwrap(), 1);

        assert!(matches!(
            InMemoryCartStore::from_json("{}"),
            Err(StoreError::Seed(_))
        ));
    }

    #[test]
    fn test_from_json_rejects_overflowing_line() {
        let result = InMemoryCartStore::from_json(
            r#"[{"id": 1, "category": "tea", "title": "Gold tea", "img": "/t.png",
                 "price": "50000000000000000000000000000", "count": 2, "userEmail": "guest"}]"#,
        );
        assert!(matches!(
            result,
            Err(StoreError::InvalidItem(ItemError::TotalOverflow { .. }))
        ));
    }

    #[test]
    fn test_intent_wire_format() {
        let intent = CartIntent::MigrateGuestCartToUser { user_email: user() };
        let json = serde_json::to_value(&intent).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"type": "migrateGuestCartToUser", "userEmail": "kim@shop.kr"})
        );
    }
}
