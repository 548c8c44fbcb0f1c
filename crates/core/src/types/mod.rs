//! Core types for Tote.
//!
//! This module provides type-safe wrappers for common cart concepts.

pub mod cart_item;
pub mod email;
pub mod id;
pub mod owner;
pub mod price;

pub use cart_item::{CartItem, CartKey, ItemError};
pub use email::{Email, EmailError};
pub use id::*;
pub use owner::{CartOwner, GUEST_SENTINEL, OwnerError};
pub use price::{CurrencyCode, Price, PriceError};
