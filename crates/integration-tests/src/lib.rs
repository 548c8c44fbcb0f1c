//! Integration tests for Tote.
//!
//! Each test spawns the full storefront router on an ephemeral port with its
//! own seeded cart store, then drives it over HTTP with a cookie-carrying
//! client, so session state flows between requests exactly as in a browser.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p tote-integration-tests
//! ```

use std::net::SocketAddr;
use std::sync::Arc;

use reqwest::{Client, StatusCode, redirect};
use serde_json::Value;

use tote_core::{CartItem, CartOwner, Email, Price, ProductId};
use tote_storefront::cart::InMemoryCartStore;
use tote_storefront::config::StorefrontConfig;
use tote_storefront::routes;
use tote_storefront::state::AppState;

/// A running storefront plus a client bound to one shopper session.
pub struct TestContext {
    pub client: Client,
    pub base_url: String,
    pub store: Arc<InMemoryCartStore>,
}

impl TestContext {
    /// Start a storefront whose store holds `items`. Guest lines in `items`
    /// seed every new session's guest cart.
    ///
    /// # Panics
    ///
    /// Panics if the server cannot be started.
    pub async fn spawn(items: Vec<CartItem>) -> Self {
        let listener = tokio::net::TcpListener::bind(SocketAddr::from(([127, 0, 0, 1], 0)))
            .await
            .expect("Failed to bind test listener");
        let addr = listener.local_addr().expect("Failed to read local address");
        let base_url = format!("http://{addr}");

        let config = StorefrontConfig {
            base_url: base_url.clone(),
            ..StorefrontConfig::default()
        };
        let store = InMemoryCartStore::with_items(items).expect("Invalid seed items");
        let state = AppState::new(config, store).expect("Failed to build application state");
        let store = state.store();

        tokio::spawn(async move {
            axum::serve(listener, routes::app(state))
                .await
                .expect("Test server error");
        });

        Self {
            client: shopper_client(),
            base_url,
            store,
        }
    }

    /// A second shopper against the same server, with its own cookie jar.
    #[must_use]
    pub fn new_visitor(&self) -> Self {
        Self {
            client: shopper_client(),
            base_url: self.base_url.clone(),
            store: Arc::clone(&self.store),
        }
    }

    #[must_use]
    pub fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    /// `GET` a JSON endpoint.
    ///
    /// # Panics
    ///
    /// Panics on transport errors or a non-JSON body.
    pub async fn get_json(&self, path: &str) -> (StatusCode, Value) {
        let resp = self
            .client
            .get(self.url(path))
            .send()
            .await
            .expect("Request failed");
        let status = resp.status();
        (status, resp.json().await.expect("Body was not JSON"))
    }

    /// `POST` with an optional form body and return status plus body text.
    ///
    /// # Panics
    ///
    /// Panics on transport errors.
    pub async fn post(&self, path: &str, form: &[(&str, &str)]) -> (StatusCode, String) {
        let resp = self
            .client
            .post(self.url(path))
            .form(form)
            .send()
            .await
            .expect("Request failed");
        let status = resp.status();
        (status, resp.text().await.expect("Failed to read body"))
    }

    /// `POST` and parse a JSON cart response.
    ///
    /// # Panics
    ///
    /// Panics unless the response is `200 OK` with a JSON body.
    pub async fn post_json(&self, path: &str, form: &[(&str, &str)]) -> Value {
        let (status, body) = self.post(path, form).await;
        assert_eq!(status, StatusCode::OK, "POST {path} failed: {body}");
        serde_json::from_str(&body).expect("Body was not JSON")
    }

    /// Attach a shopper identity to this client's session.
    ///
    /// # Panics
    ///
    /// Panics unless the login redirects.
    pub async fn login(&self, email: &str) {
        let (status, body) = self.post("/auth/session", &[("email", email)]).await;
        assert_eq!(status, StatusCode::SEE_OTHER, "login failed: {body}");
    }
}

/// A browser-like client: keeps cookies, does not follow redirects.
fn shopper_client() -> Client {
    Client::builder()
        .cookie_store(true)
        .redirect(redirect::Policy::none())
        .build()
        .expect("Failed to create HTTP client")
}

/// A cart line fixture.
///
/// # Panics
///
/// Panics if `owner` is neither `"guest"` nor a valid email.
#[must_use]
pub fn line(id: i64, category: &str, owner: &str, price: u32, count: u32) -> CartItem {
    CartItem {
        id: ProductId::new(id),
        category: category.to_string(),
        title: format!("{category} {id}"),
        img: format!("/img/{id}.png"),
        price: Price::from_units(price),
        count,
        owner: CartOwner::parse(owner).expect("Invalid owner"),
    }
}

/// Parse an email fixture.
///
/// # Panics
///
/// Panics if `email` is invalid.
#[must_use]
pub fn email(email: &str) -> Email {
    Email::parse(email).expect("Invalid email")
}

/// Row ids of a cart response, in display order.
#[must_use]
pub fn row_ids(response: &Value) -> Vec<i64> {
    response["page"]["rows"]
        .as_array()
        .map(|rows| rows.iter().filter_map(|row| row["id"].as_i64()).collect())
        .unwrap_or_default()
}
