//! Cart lines and their composite identity key.

use serde::{Deserialize, Serialize};

use super::id::ProductId;
use super::owner::CartOwner;
use super::price::Price;

/// Errors raised when a cart line breaks its invariants.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ItemError {
    /// A cart line must hold at least one unit.
    #[error("item {id} ({category}) has count 0; count must be at least 1")]
    ZeroCount {
        /// Product ID of the offending line.
        id: ProductId,
        /// Category of the offending line.
        category: String,
    },
    /// Category is part of the identity key and cannot be blank.
    #[error("item {0} has an empty category")]
    EmptyCategory(ProductId),
    /// `price * count` does not fit in a price.
    #[error("item {id} ({category}) line total overflows")]
    TotalOverflow {
        /// Product ID of the offending line.
        id: ProductId,
        /// Category of the offending line.
        category: String,
    },
}

/// Identity of a cart line: `(id, category, owner)`.
///
/// Two lines with equal keys are the same line, whatever their other fields
/// say. The same product can sit in the cart under different categories.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CartKey {
    pub id: ProductId,
    pub category: String,
    #[serde(rename = "userEmail")]
    pub owner: CartOwner,
}

impl CartKey {
    #[must_use]
    pub fn new(id: ProductId, category: impl Into<String>, owner: CartOwner) -> Self {
        Self {
            id,
            category: category.into(),
            owner,
        }
    }
}

/// A single line in the shared cart store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartItem {
    pub id: ProductId,
    pub category: String,
    pub title: String,
    /// Image URL shown on the cart row.
    pub img: String,
    /// Unit price.
    pub price: Price,
    /// Number of units, at least 1.
    pub count: u32,
    #[serde(rename = "userEmail")]
    pub owner: CartOwner,
}

impl CartItem {
    /// The identity key of this line.
    #[must_use]
    pub fn key(&self) -> CartKey {
        CartKey::new(self.id, self.category.clone(), self.owner.clone())
    }

    /// Whether this line has the given identity key, without allocating.
    #[must_use]
    pub fn has_key(&self, key: &CartKey) -> bool {
        self.id == key.id && self.category == key.category && self.owner == key.owner
    }

    /// `price * count`, or `None` on overflow.
    #[must_use]
    pub fn line_total(&self) -> Option<Price> {
        self.price.line_total(self.count)
    }

    /// Check the invariants the store relies on.
    ///
    /// # Errors
    ///
    /// Returns an error if `count` is zero, the category is blank, or the
    /// line total overflows.
    pub fn validate(&self) -> Result<(), ItemError> {
        if self.count == 0 {
            return Err(ItemError::ZeroCount {
                id: self.id,
                category: self.category.clone(),
            });
        }
        if self.category.trim().is_empty() {
            return Err(ItemError::EmptyCategory(self.id));
        }
        if self.line_total().is_none() {
            return Err(ItemError::TotalOverflow {
                id: self.id,
                category: self.category.clone(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn item(count: u32) -> CartItem {
        CartItem {
            id: ProductId::new(7),
            category: "snack".to_string(),
            title: "Dried mango".to_string(),
            img: "/img/mango.png".to_string(),
            price: Price::from_units(3_500),
            count,
            owner: CartOwner::Guest,
        }
    }

    #[test]
    fn test_key_equality_is_structural() {
        let a = item(1);
        let mut b = item(4);
        b.title = "Something else".to_string();
        assert_eq!(a.key(), b.key());
        assert!(b.has_key(&a.key()));

        b.category = "fruit".to_string();
        assert_ne!(a.key(), b.key());
        assert!(!b.has_key(&a.key()));
    }

    #[test]
    fn test_line_total() {
        assert_eq!(item(3).line_total(), Some(Price::from_units(10_500)));
    }

    #[test]
    fn test_validate() {
        assert!(item(1).validate().is_ok());
        assert!(matches!(item(0).validate(), Err(ItemError::ZeroCount { .. })));

        let mut blank = item(1);
        blank.category = "  ".to_string();
        assert_eq!(blank.validate(), Err(ItemError::EmptyCategory(ProductId::new(7))));
    }

    #[test]
    fn test_validate_rejects_overflowing_line_total() {
        let mut huge = item(1);
        huge.price = Price::new("50000000000000000000000000000".parse().unwrap()).unwrap();
        assert!(huge.validate().is_ok());

        huge.count = 2;
        assert!(matches!(huge.validate(), Err(ItemError::TotalOverflow { .. })));
    }

    #[test]
    fn test_wire_format() {
        let json = r#"{
            "id": 7, "category": "snack", "title": "Dried mango",
            "img": "/img/mango.png", "price": 3500, "count": 2,
            "userEmail": "guest"
        }"#;
        let parsed: CartItem = serde_json::from_str(json).unwrap();
        assert_eq!(parsed, item(2));
    }
}
