//! Cart ownership: a logged-in shopper or the shared guest bucket.

use core::fmt;

use serde::{Deserialize, Serialize};

use super::email::{Email, EmailError};

/// Owner string used by the store for carts built before login.
pub const GUEST_SENTINEL: &str = "guest";

/// Errors that can occur when parsing a [`CartOwner`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum OwnerError {
    /// The owner is neither the guest sentinel nor a valid email.
    #[error("cart owner must be \"{GUEST_SENTINEL}\" or an email: {0}")]
    InvalidEmail(#[from] EmailError),
}

/// Who a cart line belongs to.
///
/// On the wire this is a single string, either `"guest"` or the shopper's
/// email. Because a valid [`Email`] always contains `@`, the two cases can
/// never collide.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum CartOwner {
    /// Items added while nobody was logged in.
    Guest,
    /// Items owned by a logged-in shopper.
    User(Email),
}

impl CartOwner {
    /// Parse an owner string.
    ///
    /// # Errors
    ///
    /// Returns an error if the string is not `"guest"` and not a valid email.
    pub fn parse(s: &str) -> Result<Self, OwnerError> {
        if s == GUEST_SENTINEL {
            return Ok(Self::Guest);
        }
        Ok(Self::User(Email::parse(s)?))
    }

    /// Whether this is the guest bucket.
    #[must_use]
    pub const fn is_guest(&self) -> bool {
        matches!(self, Self::Guest)
    }

    /// The owner as it appears on the wire.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Guest => GUEST_SENTINEL,
            Self::User(email) => email.as_str(),
        }
    }
}

impl From<Email> for CartOwner {
    fn from(email: Email) -> Self {
        Self::User(email)
    }
}

impl TryFrom<String> for CartOwner {
    type Error = OwnerError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<CartOwner> for String {
    fn from(owner: CartOwner) -> Self {
        match owner {
            CartOwner::Guest => GUEST_SENTINEL.to_string(),
            CartOwner::User(email) => email.into_inner(),
        }
    }
}

impl fmt::Display for CartOwner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for CartOwner {
    type Err = OwnerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}
