//! Authentication middleware and the login guard.

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use decoded_auth_core::Profile;
use tower_sessions::Session;

use crate::error::AuthError;
use crate::AuthState;

/// Attach the shared [`AuthState`] to every request.
pub(crate) async fn initialize(
    State(state): State<AuthState>,
    mut request: Request,
    next: Next,
) -> Response {
    request.extensions_mut().insert(state);
    next.run(request).await
}

/// Restore the logged-in user from the session.
///
/// Must run inside the session layer and after [`initialize`].
pub(crate) async fn authenticate_session(
    session: Session,
    mut request: Request,
    next: Next,
) -> Result<Response, AuthError> {
    let state = request
        .extensions()
        .get::<AuthState>()
        .cloned()
        .ok_or(AuthError::NotInitialized)?;

    if let Some(user) = state.restore_user(&session).await? {
        request.extensions_mut().insert(user);
    }

    Ok(next.run(request).await)
}

/// Middleware to require a logged-in user.
///
/// Unauthenticated requests are redirected to the configured callback URL,
/// which starts the provider handshake; the wrapped handler is not called.
///
/// # Usage
/// ```ignore
/// let app = Router::new()
///     .route("/private", get(private))
///     .route_layer(middleware::from_fn(requires_login));
/// let app = decoded_auth::init(app, None)?;
/// ```
pub async fn requires_login(request: Request, next: Next) -> Result<Response, AuthError> {
    let state = request
        .extensions()
        .get::<AuthState>()
        .ok_or(AuthError::NotInitialized)?;

    if request.extensions().get::<Profile>().is_none() {
        tracing::debug!(path = %request.uri().path(), "login required, redirecting");
        return Ok(Redirect::to(state.callback_url()).into_response());
    }

    Ok(next.run(request).await)
}
