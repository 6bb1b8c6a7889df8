//! Shared state for the authentication middleware.

use std::sync::Arc;

use axum::http::{header::HOST, HeaderMap};
use decoded_auth_core::{resolve_callback_url, AuthOptions, IdentityProvider, Profile};
use serde_json::Value;
use tower_sessions::Session;
use url::Url;

use crate::error::AuthError;

/// Session key holding the serialized user.
pub(crate) const USER_KEY: &str = "auth.user";
/// Session key holding the pending OAuth `state` parameter.
pub(crate) const STATE_KEY: &str = "auth.state";

/// Frozen configuration plus the provider, shared by every registered layer.
///
/// The `initialize` middleware attaches a clone to each request, which is how
/// the login guard and handlers reach it.
#[derive(Clone)]
pub struct AuthState {
    options: Arc<AuthOptions>,
    provider: Arc<dyn IdentityProvider>,
}

impl AuthState {
    pub fn new(options: AuthOptions, provider: Arc<dyn IdentityProvider>) -> Self {
        Self {
            options: Arc::new(options),
            provider,
        }
    }

    pub fn options(&self) -> &AuthOptions {
        &self.options
    }

    pub fn provider(&self) -> &dyn IdentityProvider {
        self.provider.as_ref()
    }

    /// Configured callback path or URL, as given.
    pub fn callback_url(&self) -> &str {
        &self.options.auth0.callback_url
    }

    /// Absolute callback URL for the request carrying `headers`.
    pub fn callback_uri(&self, headers: &HeaderMap) -> Result<Url, AuthError> {
        Ok(resolve_callback_url(
            self.callback_url(),
            self.options.base_url.as_ref(),
            header_str(headers, HOST.as_str()),
            header_str(headers, "x-forwarded-proto"),
        )?)
    }

    /// Log `user` into `session`.
    ///
    /// The session id is cycled first so a pre-login id can't be reused.
    pub async fn log_in(&self, session: &Session, user: &Profile) -> Result<(), AuthError> {
        session.cycle_id().await?;
        let stored = self.options.serialize_user.serialize(user).await?;
        session.insert(USER_KEY, stored).await?;
        Ok(())
    }

    /// Remove the logged-in user from `session`.
    pub async fn log_out(&self, session: &Session) -> Result<(), AuthError> {
        session.remove::<Value>(USER_KEY).await?;
        Ok(())
    }

    /// Restore the logged-in user from `session`, if any.
    ///
    /// A stored user the deserialize hook no longer recognizes is dropped from
    /// the session.
    pub async fn restore_user(&self, session: &Session) -> Result<Option<Profile>, AuthError> {
        let Some(stored) = session.get::<Value>(USER_KEY).await? else {
            return Ok(None);
        };

        match self.options.deserialize_user.deserialize(stored).await? {
            Some(user) => Ok(Some(user)),
            None => {
                tracing::debug!("stored user no longer valid, clearing session");
                session.remove::<Value>(USER_KEY).await?;
                Ok(None)
            }
        }
    }
}

fn header_str<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers.get(name).and_then(|v| v.to_str().ok())
}
