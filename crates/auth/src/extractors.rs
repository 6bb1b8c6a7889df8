//! Axum extractors for authentication.

use axum::{
    extract::FromRequestParts,
    http::{request::Parts, StatusCode},
};
use decoded_auth_core::Profile;

/// Extractor for authenticated user. Returns 401 if not authenticated.
///
/// Reads the profile restored by the session middleware; put
/// [`requires_login`](crate::requires_login) in front of the route to redirect
/// instead of rejecting.
pub struct CurrentUser(pub Profile);

impl<S> FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
{
    type Rejection = (StatusCode, &'static str);

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Profile>()
            .cloned()
            .map(CurrentUser)
            .ok_or((StatusCode::UNAUTHORIZED, "Not authenticated"))
    }
}

/// Extractor for optionally authenticated user. Returns None if not authenticated.
pub struct OptionalUser(pub Option<Profile>);

impl<S> FromRequestParts<S> for OptionalUser
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(OptionalUser(parts.extensions.get::<Profile>().cloned()))
    }
}
