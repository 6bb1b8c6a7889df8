//! One-time wiring of authentication onto an axum router.

use std::sync::Arc;

use axum::{middleware, Router};
use decoded_auth_core::{AuthOptions, AuthOverrides, IdentityProvider};
use sha2::{Digest, Sha512};
use tower::ServiceBuilder;
use tower_cookies::CookieManagerLayer;
use tower_sessions::{
    cookie::{Key, SameSite},
    Expiry, MemoryStore, SessionManagerLayer, SessionStore,
};
use url::Url;

use crate::error::AuthError;
use crate::handlers::callback_route;
use crate::middleware::{authenticate_session, initialize};
use crate::providers::Auth0Strategy;
use crate::AuthState;

/// Install Auth0 authentication on `app`.
///
/// Resolves the configuration (defaults, then `AUTH0_*` environment
/// variables for unset credentials, then `overrides`) and hands it to
/// [`init_with_options`].
///
/// Call this after the application's own routes are registered: layers only
/// wrap routes that already exist.
///
/// # Errors
///
/// Returns an error if the Auth0 domain, client ID or client secret is
/// missing. Nothing is registered in that case.
pub fn init<S>(app: Router<S>, overrides: Option<AuthOverrides>) -> Result<Router<S>, AuthError>
where
    S: Clone + Send + Sync + 'static,
{
    init_with_options(app, AuthOptions::resolve(overrides))
}

/// Install Auth0 authentication on `app` from an already resolved configuration.
///
/// Sessions are kept in a [`MemoryStore`]; use [`install`] to pick another store
/// or provider.
///
/// # Errors
///
/// Returns an error if the Auth0 strategy cannot be built from `options`.
pub fn init_with_options<S>(app: Router<S>, options: AuthOptions) -> Result<Router<S>, AuthError>
where
    S: Clone + Send + Sync + 'static,
{
    let strategy = Auth0Strategy::new(&options.auth0)?;

    tracing::debug!(
        domain = ?options.auth0.domain,
        callback = %options.auth0.callback_url,
        "Resolved Auth0 configuration"
    );

    Ok(install(
        app,
        options,
        Arc::new(strategy),
        MemoryStore::default(),
    ))
}

/// Register the callback route and the authentication middleware on `app`.
///
/// Middleware runs in this order on every request: cookie parsing, session,
/// authentication initialization, session user restore.
///
/// Not idempotent: installing twice on the same router registers the callback
/// route a second time, which axum rejects with a panic.
pub fn install<S, Store>(
    app: Router<S>,
    options: AuthOptions,
    provider: Arc<dyn IdentityProvider>,
    store: Store,
) -> Router<S>
where
    S: Clone + Send + Sync + 'static,
    Store: SessionStore + Clone,
{
    let callback_path = callback_path(&options.auth0.callback_url);

    let sessions = SessionManagerLayer::new(store)
        .with_name(options.cookie_name.clone())
        .with_secure(options.cookie_secure)
        .with_http_only(true)
        .with_same_site(SameSite::Lax)
        .with_expiry(Expiry::OnInactivity(
            options
                .session_ttl
                .try_into()
                .unwrap_or(time::Duration::MAX),
        ))
        .with_signed(signing_key(&options.cookie_secret));

    let state = AuthState::new(options, provider);

    tracing::info!(
        provider = state.provider().name(),
        callback = %callback_path,
        "Installing authentication middleware"
    );

    app.route(&callback_path, callback_route(state.clone()))
        .layer(
            ServiceBuilder::new()
                .layer(CookieManagerLayer::new())
                .layer(sessions)
                .layer(middleware::from_fn_with_state(state, initialize))
                .layer(middleware::from_fn(authenticate_session)),
        )
}

/// Route path for the configured callback, which may be a full URL.
fn callback_path(callback_url: &str) -> String {
    match Url::parse(callback_url) {
        Ok(url) => url.path().to_string(),
        Err(_) if callback_url.starts_with('/') => callback_url.to_string(),
        Err(_) => format!("/{callback_url}"),
    }
}

/// Stretch the configured secret to the 64 bytes a signing key needs.
fn signing_key(secret: &str) -> Key {
    Key::from(Sha512::digest(secret.as_bytes()).as_slice())
}
