//! Auth slice of the store and active-owner resolution.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use tote_core::{CartOwner, Email};

/// Inconsistent auth state.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    /// `is_login` is set but no user record is attached.
    #[error("invariant violation: logged in with no user record")]
    MissingLoginUser,
}

/// One entry of `auth.loginUser`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginUser {
    pub user_email: Email,
}

/// `{isLogin, loginUser}` as the store holds it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthSnapshot {
    pub is_login: bool,
    #[serde(default)]
    pub login_user: Vec<LoginUser>,
}

impl AuthSnapshot {
    /// Nobody logged in.
    #[must_use]
    pub const fn guest() -> Self {
        Self {
            is_login: false,
            login_user: Vec::new(),
        }
    }

    /// Logged in as `email`.
    #[must_use]
    pub fn logged_in(email: Email) -> Self {
        Self {
            is_login: true,
            login_user: vec![LoginUser { user_email: email }],
        }
    }

    /// The owner whose lines this render shows: `loginUser[0]` when logged
    /// in, the guest bucket otherwise.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::MissingLoginUser`] when logged in with an
    /// empty user list.
    pub fn active_owner(&self) -> Result<CartOwner, SessionError> {
        if !self.is_login {
            return Ok(CartOwner::Guest);
        }
        self.login_user
            .first()
            .map(|user| CartOwner::User(user.user_email.clone()))
            .ok_or(SessionError::MissingLoginUser)
    }

    /// Like [`active_owner`](Self::active_owner) but fails safe to the guest
    /// bucket, logging the violation.
    #[must_use]
    pub fn active_owner_or_guest(&self) -> CartOwner {
        self.active_owner().unwrap_or_else(|err| {
            tracing::warn!(error = %err, "Falling back to guest cart");
            CartOwner::Guest
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_guest_resolves_to_sentinel() {
        assert_eq!(AuthSnapshot::guest().active_owner().unwrap(), CartOwner::Guest);
    }

    #[test]
    fn test_logged_in_uses_first_user() {
        let mut auth = AuthSnapshot::logged_in(Email::parse("a@shop.kr").unwrap());
        auth.login_user.push(LoginUser {
            user_email: Email::parse("b@shop.kr").unwrap(),
        });
        assert_eq!(auth.active_owner().unwrap().as_str(), "a@shop.kr");
    }

    #[test]
    fn test_logged_in_without_user_is_violation() {
        let auth = AuthSnapshot {
            is_login: true,
            login_user: Vec::new(),
        };
        assert_eq!(auth.active_owner(), Err(SessionError::MissingLoginUser));
        assert_eq!(auth.active_owner_or_guest(), CartOwner::Guest);
    }

    #[test]
    fn test_deserialize_store_shape() {
        let auth: AuthSnapshot =
            serde_json::from_str(r#"{"isLogin": true, "loginUser": [{"userEmail": "a@shop.kr"}]}"#)
                .unwrap();
        assert_eq!(auth, AuthSnapshot::logged_in(Email::parse("a@shop.kr").unwrap()));
    }
}
