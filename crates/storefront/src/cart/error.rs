//! Errors raised by cart view operations.

use thiserror::Error;

use tote_core::CartKey;

use super::store::StoreError;

/// Errors returned by [`CartView`](super::CartView) operations.
#[derive(Debug, Error)]
pub enum CartError {
    /// The store rejected a read or an intent.
    #[error("cart store error: {0}")]
    Store(#[from] StoreError),

    /// The key does not belong to the current shopper's projection.
    #[error("item {} ({}) is not in this cart", .0.id, .0.category)]
    ItemNotFound(CartKey),

    /// A page click outside `1..=total_pages`.
    #[error("page {page} is out of range (1..={total_pages})")]
    PageOutOfRange { page: usize, total_pages: usize },

    /// The cart total does not fit in a price.
    #[error("cart total overflows")]
    PriceOverflow,

    /// A confirm callback arrived while a different modal (or none) was open.
    #[error("{expected} modal is not open")]
    ModalMismatch { expected: &'static str },
}
