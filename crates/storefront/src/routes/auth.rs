//! Session identity handlers.
//!
//! These attach or detach a shopper email to the session. Credential checks
//! belong to the account service in front of this one.

use axum::{Form, response::Redirect};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use tote_core::Email;

use crate::error::{AppError, Result, clear_sentry_user, set_sentry_user};
use crate::middleware::{clear_current_user, set_current_user};
use crate::models::CurrentUser;

/// Login form data.
#[derive(Debug, Deserialize)]
pub struct LoginForm {
    pub email: String,
}

/// Attach a shopper identity to the session.
///
/// The next cart render sees the login and migrates any guest lines.
#[instrument(skip(session, form))]
pub async fn login(session: Session, Form(form): Form<LoginForm>) -> Result<Redirect> {
    let email = Email::parse(&form.email)
        .map_err(|e| AppError::BadRequest(format!("invalid email: {e}")))?;

    session.cycle_id().await?;
    set_current_user(&session, &CurrentUser { email: email.clone() }).await?;
    set_sentry_user(email.as_str());
    tracing::info!(user = %email, "Shopper logged in");

    Ok(Redirect::to("/cart"))
}

/// Detach the shopper identity and start a fresh session.
#[instrument(skip(session))]
pub async fn logout(session: Session) -> Redirect {
    if let Err(e) = clear_current_user(&session).await {
        tracing::error!("Failed to clear session: {}", e);
    }

    if let Err(e) = session.flush().await {
        tracing::error!("Failed to flush session: {}", e);
    }
    clear_sentry_user();

    Redirect::to("/cart")
}
