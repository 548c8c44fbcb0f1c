//! Edge-triggered guest-to-user cart migration.
//!
//! The condition "logged in and the store still holds guest lines" is
//! re-evaluated on every derivation. The trigger remembers which shopper it
//! already fired for, so a run of renders with the condition still true
//! issues a single intent. It re-arms once the condition goes false, which
//! covers both "became logged in" and "guest lines appeared again".

use serde::{Deserialize, Serialize};

use tote_core::{CartItem, CartOwner, Email};

use super::store::CartIntent;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MigrationTrigger {
    fired_for: Option<Email>,
}

impl MigrationTrigger {
    /// Feed one derivation. Returns the intent to dispatch on a rising edge.
    pub fn observe(&mut self, owner: &CartOwner, items: &[CartItem]) -> Option<CartIntent> {
        let has_guest_lines = items.iter().any(|item| item.owner.is_guest());
        match owner {
            CartOwner::User(email) if has_guest_lines => {
                if self.fired_for.as_ref() == Some(email) {
                    return None;
                }
                self.fired_for = Some(email.clone());
                Some(CartIntent::MigrateGuestCartToUser {
                    user_email: email.clone(),
                })
            }
            _ => {
                self.fired_for = None;
                None
            }
        }
    }

    /// Forget the last firing so the next observation may fire again.
    pub fn rearm(&mut self) {
        self.fired_for = None;
    }
}
