//! HTTP handler for the provider callback route.

use axum::{
    extract::{Query, State},
    http::HeaderMap,
    response::{IntoResponse, Redirect, Response},
    routing::{get, MethodRouter},
};
use decoded_auth_core::{generate_state, AuthOptions, Profile};
use serde::Deserialize;
use tower_sessions::Session;
use url::Url;

use crate::error::AuthError;
use crate::state::STATE_KEY;
use crate::AuthState;

/// Query parameters the provider sends back to the callback.
#[derive(Debug, Default, Deserialize)]
pub struct CallbackQuery {
    pub code: Option<String>,
    pub state: Option<String>,
    pub error: Option<String>,
    pub error_description: Option<String>,
}

/// `GET` method router for the callback path, bound to `state`.
pub(crate) fn callback_route<S>(state: AuthState) -> MethodRouter<S>
where
    S: Clone + Send + Sync + 'static,
{
    get(authenticate_callback).with_state(state)
}

/// Run the provider handshake.
///
/// Without a `code` this starts the flow and redirects to the provider. With
/// one it checks the stored `state`, exchanges the code, logs the user in and
/// hands over to [`redirect_after_login`].
async fn authenticate_callback(
    State(state): State<AuthState>,
    session: Session,
    headers: HeaderMap,
    Query(query): Query<CallbackQuery>,
) -> Result<Response, AuthError> {
    if let Some(error) = query.error {
        tracing::warn!(
            error = %error,
            description = ?query.error_description,
            "Provider rejected authentication"
        );
        return Ok(failure(state.options()));
    }

    let redirect_uri = state.callback_uri(&headers)?;

    let Some(code) = query.code else {
        return begin_login(&state, &session, &redirect_uri).await;
    };

    let expected = session.remove::<String>(STATE_KEY).await?;
    if expected.is_none() || expected != query.state {
        tracing::warn!("Unable to verify authorization request state");
        return Ok(failure(state.options()));
    }

    let user = state.provider().authenticate(&code, &redirect_uri).await?;
    state.log_in(&session, &user).await?;

    tracing::info!(provider = state.provider().name(), user = %user.id, "User logged in");

    Ok(redirect_after_login(Some(&user), state.options())?.into_response())
}

async fn begin_login(
    state: &AuthState,
    session: &Session,
    redirect_uri: &Url,
) -> Result<Response, AuthError> {
    let csrf_state = generate_state();
    session.insert(STATE_KEY, &csrf_state).await?;

    let auth_url = state
        .provider()
        .authorization_url(redirect_uri, &csrf_state)?;

    Ok(Redirect::to(auth_url.as_str()).into_response())
}

fn failure(options: &AuthOptions) -> Response {
    Redirect::to(&options.failure_redirect).into_response()
}

/// Finish a successful login by redirecting to the success URL.
///
/// # Errors
///
/// Returns `MissingUser` if no user is attached at this point. Authentication
/// guarantees one, so this signals a broken pipeline rather than a login
/// failure.
pub fn redirect_after_login(
    user: Option<&Profile>,
    options: &AuthOptions,
) -> Result<Redirect, AuthError> {
    user.ok_or(decoded_auth_core::AuthError::MissingUser)?;
    Ok(Redirect::to(&options.success_redirect))
}
