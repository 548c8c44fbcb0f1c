//! Tote Core - Shared cart types library.
//!
//! This crate provides the value types used across all Tote components:
//! - `storefront` - Cart view service and its HTTP surface
//! - `integration-tests` - In-process tests of the storefront router
//!
//! # Architecture
//!
//! The core crate contains only types and validation - no I/O, no stores,
//! no HTTP. This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for IDs, prices, emails, cart owners, and cart items

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
