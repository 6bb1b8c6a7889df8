//! Demo page handlers.

use axum::{
    response::{Html, IntoResponse, Redirect},
    Extension, Json,
};
use decoded_auth::{AuthError, AuthState, CurrentUser, OptionalUser, Session};

/// Public landing page; greets the user when logged in.
pub async fn home(OptionalUser(user): OptionalUser) -> Html<String> {
    match user {
        Some(user) => {
            let name = user.display_name.as_deref().unwrap_or(&user.id);
            Html(format!(
                "<h1>Hello, {name}</h1><p><a href=\"/private\">Profile</a> | <a href=\"/logout\">Log out</a></p>"
            ))
        }
        None => Html(
            "<h1>Welcome</h1><p><a href=\"/private\">Log in to see your profile</a></p>"
                .to_string(),
        ),
    }
}

/// Protected page returning the logged-in profile.
pub async fn private(CurrentUser(user): CurrentUser) -> impl IntoResponse {
    Json(user)
}

/// Drop the user from the session and go back home.
pub async fn logout(
    Extension(state): Extension<AuthState>,
    session: Session,
) -> Result<Redirect, AuthError> {
    state.log_out(&session).await?;
    tracing::info!("User logged out");
    Ok(Redirect::to("/"))
}
