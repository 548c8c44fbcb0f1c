//! Application state shared across handlers.

use std::sync::Arc;

use tote_core::CartItem;

use crate::cart::{InMemoryCartStore, StoreError};
use crate::config::StorefrontConfig;

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and provides access to
/// the shared cart store and configuration.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: StorefrontConfig,
    store: Arc<InMemoryCartStore>,
    guest_seed: Vec<CartItem>,
}

impl AppState {
    /// Create a new application state around a seeded cart store.
    ///
    /// Guest lines are moved out of `store`: they become the starting guest
    /// cart of every new session rather than a bucket all sessions share.
    ///
    /// # Errors
    ///
    /// Returns an error if the store lock is poisoned.
    pub fn new(config: StorefrontConfig, store: InMemoryCartStore) -> Result<Self, StoreError> {
        let guest_seed = store.take_guest_lines()?;
        Ok(Self {
            inner: Arc::new(AppStateInner {
                config,
                store: Arc::new(store),
                guest_seed,
            }),
        })
    }

    /// Get a reference to the storefront configuration.
    #[must_use]
    pub fn config(&self) -> &StorefrontConfig {
        &self.inner.config
    }

    /// Get a handle to the shared cart store.
    #[must_use]
    pub fn store(&self) -> Arc<InMemoryCartStore> {
        Arc::clone(&self.inner.store)
    }

    /// Guest lines a session starts with.
    #[must_use]
    pub fn guest_seed(&self) -> &[CartItem] {
        &self.inner.guest_seed
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use tote_core::{CartOwner, Email, Price, ProductId};

    use super::*;
    use crate::cart::CartStore;

    fn line(id: i64, owner: CartOwner) -> CartItem {
        CartItem {
            id: ProductId::new(id),
            category: "tea".to_string(),
            title: format!("tea {id}"),
            img: String::new(),
            price: Price::from_units(100),
            count: 1,
            owner,
        }
    }

    #[test]
    fn test_guest_lines_become_session_seed() {
        let kim = CartOwner::User(Email::parse("kim@shop.kr").unwrap());
        let store = InMemoryCartStore::with_items(vec![
            line(1, CartOwner::Guest),
            line(2, kim.clone()),
        ])
        .unwrap();

        let state = AppState::new(StorefrontConfig::default(), store).unwrap();
        assert_eq!(state.guest_seed(), &[line(1, CartOwner::Guest)]);
        assert_eq!(state.store().items().unwrap(), vec![line(2, kim)]);
    }
}
