//! Tote storefront library.
//!
//! The cart view domain, the shared in-memory cart store, and the HTTP
//! surface that serves them. Exposed as a library so the router can be
//! driven in-process by tests.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod cart;
pub mod config;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod state;
