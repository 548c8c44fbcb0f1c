//! Cart store as one HTTP session sees it.
//!
//! Shopper-owned lines live in the shared [`InMemoryCartStore`]. The guest
//! bucket belongs to the browser session: its lines are loaded from the
//! session, held in a private store for the turn, and written back after.
//! Two anonymous visitors therefore never see each other's guest lines, and
//! a login migrates only the logging-in session's guest cart.

use std::sync::Arc;

use tracing::info;

use tote_core::CartItem;

use super::store::{CartIntent, CartStore, InMemoryCartStore, StoreError};

#[derive(Debug)]
pub struct SessionCartStore {
    shared: Arc<InMemoryCartStore>,
    guest: InMemoryCartStore,
}

impl SessionCartStore {
    /// Layer this session's guest lines over the shared store. Lines in
    /// `guest_lines` owned by anyone but the guest are dropped.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::InvalidItem`] if a guest line fails validation.
    pub fn new(shared: Arc<InMemoryCartStore>, mut guest_lines: Vec<CartItem>) -> Result<Self, StoreError> {
        guest_lines.retain(|item| item.owner.is_guest());
        Ok(Self {
            shared,
            guest: InMemoryCartStore::with_items(guest_lines)?,
        })
    }

    /// This session's guest lines, for writing back to the session.
    ///
    /// # Errors
    ///
    /// Returns an error if the lock is poisoned.
    pub fn guest_lines(&self) -> Result<Vec<CartItem>, StoreError> {
        self.guest.items()
    }
}

impl CartStore for SessionCartStore {
    fn items(&self) -> Result<Vec<CartItem>, StoreError> {
        let mut items: Vec<CartItem> = self
            .shared
            .items()?
            .into_iter()
            .filter(|item| !item.owner.is_guest())
            .collect();
        items.extend(self.guest.items()?);
        Ok(items)
    }

    fn dispatch(&self, intent: CartIntent) -> Result<(), StoreError> {
        match intent {
            CartIntent::DeleteCart(key) if key.owner.is_guest() => {
                self.guest.dispatch(CartIntent::DeleteCart(key))
            }
            CartIntent::DeleteCart(key) => self.shared.dispatch(CartIntent::DeleteCart(key)),
            CartIntent::MigrateGuestCartToUser { user_email } => {
                let lines = self.guest.take_guest_lines()?;
                if lines.is_empty() {
                    return Ok(());
                }
                let migrated = self.shared.adopt_guest_lines(&user_email, lines)?;
                info!(user = %user_email, migrated, "Migrated session guest cart to user");
                Ok(())
            }
        }
    }
}
