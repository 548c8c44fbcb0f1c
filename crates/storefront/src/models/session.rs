//! Session-related types.
//!
//! Types stored in the session for identity, cart view state and the
//! guest cart.

use serde::{Deserialize, Serialize};

use tote_core::Email;

use crate::cart::AuthSnapshot;

/// Session-stored shopper identity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurrentUser {
    /// Shopper's email address, which is also their cart owner key.
    pub email: Email,
}

impl CurrentUser {
    /// The auth slice the cart view derives from.
    #[must_use]
    pub fn auth_snapshot(user: Option<&Self>) -> AuthSnapshot {
        user.map_or_else(AuthSnapshot::guest, |user| {
            AuthSnapshot::logged_in(user.email.clone())
        })
    }
}

/// Session keys.
pub mod keys {
    /// Key for storing the current logged-in shopper.
    pub const CURRENT_USER: &str = "current_user";

    /// Key for the persisted cart view state.
    pub const CART_VIEW: &str = "cart_view";

    /// Key for this session's guest cart lines.
    pub const GUEST_CART: &str = "guest_cart";
}
