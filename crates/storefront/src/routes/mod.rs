//! HTTP route handlers for the storefront.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                    - Health check
//!
//! # Cart (JSON render model + navigation effects)
//! GET  /cart                      - Cart page
//! POST /cart/select               - Toggle one row (form: id, category)
//! POST /cart/select-all           - Select-all toggle over the current page
//! POST /cart/page/{page}          - Direct page click
//! POST /cart/next                 - Next page
//! POST /cart/prev                 - Previous page
//! POST /cart/detail               - Open detail dialog (form: id, category)
//! POST /cart/delete               - Open delete confirmation (form: id, category)
//! POST /cart/bulk-delete          - Open bulk delete confirmation
//! POST /cart/modal/close          - Close or cancel any dialog
//! POST /cart/delete/confirm       - Confirm single delete
//! POST /cart/bulk-delete/confirm  - Confirm bulk delete
//! GET  /cart/back                 - Redirect to the referrer
//!
//! # Checkout
//! GET  /checkout                  - Redirect to the payment page
//!
//! # Session identity
//! POST /auth/session              - Attach shopper email (form: email)
//! POST /auth/session/logout       - Detach shopper
//! ```

pub mod auth;
pub mod cart;

use axum::{
    Router,
    body::Body,
    http::Request,
    middleware::from_fn,
    routing::{get, post},
};
use tower_http::trace::TraceLayer;

use crate::middleware::{create_session_layer, request_id_middleware};
use crate::state::AppState;

/// Create the cart routes router.
pub fn cart_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(cart::show))
        .route("/select", post(cart::select))
        .route("/select-all", post(cart::select_all))
        .route("/page/{page}", post(cart::go_to_page))
        .route("/next", post(cart::next_page))
        .route("/prev", post(cart::prev_page))
        .route("/detail", post(cart::open_detail))
        .route("/delete", post(cart::open_delete))
        .route("/delete/confirm", post(cart::confirm_delete))
        .route("/bulk-delete", post(cart::open_bulk_delete))
        .route("/bulk-delete/confirm", post(cart::confirm_bulk_delete))
        .route("/modal/close", post(cart::close_modal))
        .route("/back", get(cart::back))
}

/// Create the session identity routes router.
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/session", post(auth::login))
        .route("/session/logout", post(auth::logout))
}

/// Create all routes for the storefront.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health))
        .nest("/cart", cart_routes())
        .route("/checkout", get(cart::checkout))
        .nest("/auth", auth_routes())
}

/// The full application: routes, sessions, request IDs, and tracing.
///
/// Sentry layers are added by the binary.
pub fn app(state: AppState) -> Router {
    let session_layer = create_session_layer(state.config());

    routes()
        .layer(session_layer)
        .layer(from_fn(request_id_middleware))
        .layer(
            TraceLayer::new_for_http().make_span_with(|request: &Request<Body>| {
                tracing::info_span!(
                    "http_request",
                    method = %request.method(),
                    uri = %request.uri(),
                    request_id = tracing::field::Empty,
                )
            }),
        )
        .with_state(state)
}

/// Liveness health check endpoint.
async fn health() -> &'static str {
    "ok"
}
