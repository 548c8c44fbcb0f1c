//! Cart route handlers.
//!
//! Each request rebuilds the cart view from the shared store and the
//! shopper's session, applies one operation, saves the view state and the
//! session's guest cart back, and returns the render model with any
//! navigation effects.

use axum::{
    Form, Json,
    extract::{Path, State},
    http::{HeaderMap, header},
    response::Redirect,
};
use serde::{Deserialize, Serialize};
use tower_sessions::Session;
use tracing::instrument;

use tote_core::{CartItem, CartKey, ProductId};

use crate::cart::{
    CHECKOUT_ROUTE, CartError, CartPage, CartView, CartViewState, Navigation, RecordingNavigator,
    SessionCartStore,
};
use crate::error::{Result, add_breadcrumb};
use crate::middleware::OptionalAuth;
use crate::models::{CurrentUser, session_keys};
use crate::state::AppState;

type StoreView = CartView<SessionCartStore, RecordingNavigator>;

/// Body of every cart response.
#[derive(Debug, Serialize)]
pub struct CartResponse {
    pub page: CartPage,
    pub effects: Vec<Navigation>,
}

/// Identifies a row of the shopper's own cart.
#[derive(Debug, Deserialize)]
pub struct ItemForm {
    pub id: ProductId,
    pub category: String,
}

impl ItemForm {
    fn key(&self, view: &StoreView) -> CartKey {
        CartKey::new(self.id, self.category.clone(), view.owner().clone())
    }
}

// =============================================================================
// Session Helpers
// =============================================================================

/// Rebuild the view for this shopper and derive it from the store.
async fn load_view(state: &AppState, session: &Session, user: Option<&CurrentUser>) -> Result<StoreView> {
    let view_state = session
        .get::<CartViewState>(session_keys::CART_VIEW)
        .await?
        .unwrap_or_default();
    let guest_lines = match session.get::<Vec<CartItem>>(session_keys::GUEST_CART).await? {
        Some(lines) => lines,
        None => state.guest_seed().to_vec(),
    };
    let store = SessionCartStore::new(state.store(), guest_lines)?;
    let mut view = CartView::new(store, RecordingNavigator::default(), view_state);
    view.refresh(CurrentUser::auth_snapshot(user))?;
    Ok(view)
}

/// Persist the view state and guest cart, then build the response.
async fn save_view(state: &AppState, session: &Session, view: StoreView) -> Result<Json<CartResponse>> {
    let page = view.page(state.config().currency)?;
    let guest_lines = view.store().guest_lines()?;
    let (view_state, navigator) = view.into_parts();
    session.insert(session_keys::GUEST_CART, &guest_lines).await?;
    session.insert(session_keys::CART_VIEW, &view_state).await?;
    Ok(Json(CartResponse {
        page,
        effects: navigator.into_effects(),
    }))
}

/// Load, apply `op`, save.
async fn apply(
    state: &AppState,
    session: &Session,
    user: Option<&CurrentUser>,
    op: impl FnOnce(&mut StoreView) -> std::result::Result<(), CartError> + Send,
) -> Result<Json<CartResponse>> {
    let mut view = load_view(state, session, user).await?;
    op(&mut view)?;
    save_view(state, session, view).await
}

// =============================================================================
// Handlers
// =============================================================================

/// Display the cart page.
#[instrument(skip(state, session, user))]
pub async fn show(
    State(state): State<AppState>,
    session: Session,
    OptionalAuth(user): OptionalAuth,
) -> Result<Json<CartResponse>> {
    apply(&state, &session, user.as_ref(), |_| Ok(())).await
}

/// Toggle one row's checkbox.
#[instrument(skip(state, session, user))]
pub async fn select(
    State(state): State<AppState>,
    session: Session,
    OptionalAuth(user): OptionalAuth,
    Form(form): Form<ItemForm>,
) -> Result<Json<CartResponse>> {
    apply(&state, &session, user.as_ref(), |view| {
        let key = form.key(view);
        view.toggle_selection(&key).map(|_| ())
    })
    .await
}

/// Select-all toggle over the current page.
#[instrument(skip(state, session, user))]
pub async fn select_all(
    State(state): State<AppState>,
    session: Session,
    OptionalAuth(user): OptionalAuth,
) -> Result<Json<CartResponse>> {
    apply(&state, &session, user.as_ref(), |view| {
        view.select_all();
        Ok(())
    })
    .await
}

/// Direct page click.
#[instrument(skip(state, session, user))]
pub async fn go_to_page(
    State(state): State<AppState>,
    session: Session,
    OptionalAuth(user): OptionalAuth,
    Path(page): Path<usize>,
) -> Result<Json<CartResponse>> {
    apply(&state, &session, user.as_ref(), |view| view.go_to_page(page)).await
}

/// Next page.
#[instrument(skip(state, session, user))]
pub async fn next_page(
    State(state): State<AppState>,
    session: Session,
    OptionalAuth(user): OptionalAuth,
) -> Result<Json<CartResponse>> {
    apply(&state, &session, user.as_ref(), |view| {
        view.next_page();
        Ok(())
    })
    .await
}

/// Previous page.
#[instrument(skip(state, session, user))]
pub async fn prev_page(
    State(state): State<AppState>,
    session: Session,
    OptionalAuth(user): OptionalAuth,
) -> Result<Json<CartResponse>> {
    apply(&state, &session, user.as_ref(), |view| {
        view.prev_page();
        Ok(())
    })
    .await
}

/// Open the product detail dialog.
#[instrument(skip(state, session, user))]
pub async fn open_detail(
    State(state): State<AppState>,
    session: Session,
    OptionalAuth(user): OptionalAuth,
    Form(form): Form<ItemForm>,
) -> Result<Json<CartResponse>> {
    apply(&state, &session, user.as_ref(), |view| {
        let key = form.key(view);
        view.open_detail(&key)
    })
    .await
}

/// Open the single-delete confirmation.
#[instrument(skip(state, session, user))]
pub async fn open_delete(
    State(state): State<AppState>,
    session: Session,
    OptionalAuth(user): OptionalAuth,
    Form(form): Form<ItemForm>,
) -> Result<Json<CartResponse>> {
    apply(&state, &session, user.as_ref(), |view| {
        let key = form.key(view);
        view.open_delete(&key)
    })
    .await
}

/// Open the bulk-delete confirmation.
#[instrument(skip(state, session, user))]
pub async fn open_bulk_delete(
    State(state): State<AppState>,
    session: Session,
    OptionalAuth(user): OptionalAuth,
) -> Result<Json<CartResponse>> {
    apply(&state, &session, user.as_ref(), |view| {
        view.open_bulk_delete();
        Ok(())
    })
    .await
}

/// Close or cancel whichever dialog is open.
#[instrument(skip(state, session, user))]
pub async fn close_modal(
    State(state): State<AppState>,
    session: Session,
    OptionalAuth(user): OptionalAuth,
) -> Result<Json<CartResponse>> {
    apply(&state, &session, user.as_ref(), |view| {
        view.close_modal();
        Ok(())
    })
    .await
}

/// Confirm the single-delete dialog.
#[instrument(skip(state, session, user))]
pub async fn confirm_delete(
    State(state): State<AppState>,
    session: Session,
    OptionalAuth(user): OptionalAuth,
) -> Result<Json<CartResponse>> {
    add_breadcrumb("cart", "Confirmed item delete", None);
    apply(&state, &session, user.as_ref(), StoreView::confirm_delete).await
}

/// Confirm the bulk-delete dialog.
#[instrument(skip(state, session, user))]
pub async fn confirm_bulk_delete(
    State(state): State<AppState>,
    session: Session,
    OptionalAuth(user): OptionalAuth,
) -> Result<Json<CartResponse>> {
    add_breadcrumb("cart", "Confirmed bulk delete", None);
    apply(&state, &session, user.as_ref(), StoreView::confirm_bulk_delete).await
}

/// Navigate back: redirect to the same-site referrer, or home.
#[instrument(skip(state, session, user, headers))]
pub async fn back(
    State(state): State<AppState>,
    session: Session,
    OptionalAuth(user): OptionalAuth,
    headers: HeaderMap,
) -> Result<Redirect> {
    apply(&state, &session, user.as_ref(), |view| {
        view.go_back();
        Ok(())
    })
    .await?;

    let target = headers
        .get(header::REFERER)
        .and_then(|h| h.to_str().ok())
        .and_then(|referer| same_site_path(referer, &state.config().base_url))
        .unwrap_or_else(|| "/".to_string());
    Ok(Redirect::to(&target))
}

/// Proceed to checkout.
#[instrument(skip(state, session, user))]
pub async fn checkout(
    State(state): State<AppState>,
    session: Session,
    OptionalAuth(user): OptionalAuth,
) -> Result<Redirect> {
    add_breadcrumb("cart", "Proceeded to checkout", None);
    apply(&state, &session, user.as_ref(), |view| {
        view.checkout();
        Ok(())
    })
    .await?;
    Ok(Redirect::to(CHECKOUT_ROUTE))
}

/// Reduce a referrer to a local path, refusing other origins.
fn same_site_path(referer: &str, base_url: &str) -> Option<String> {
    let path = referer
        .strip_prefix(base_url.trim_end_matches('/'))
        .unwrap_or(referer);
    (path.starts_with('/') && !path.starts_with("//")).then(|| path.to_string())
}
