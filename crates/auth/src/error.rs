use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

/// Auth errors for the decoded_auth crate.
///
/// This wraps the core `AuthError` and adds the variants that only exist once
/// the configuration is wired into a request pipeline.
#[derive(Debug, Error)]
pub enum AuthError {
    /// Error from the core crate (configuration, provider, hooks)
    #[error(transparent)]
    Core(#[from] decoded_auth_core::AuthError),

    /// Session store failure
    #[error("session error: {0}")]
    Session(#[from] tower_sessions::session::Error),

    /// A guard or extractor ran on a router that was never initialized
    #[error("authentication middleware is not installed on this router")]
    NotInitialized,
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        use decoded_auth_core::AuthError as CoreError;

        let (status, message) = match &self {
            AuthError::Core(core_err) => match core_err {
                CoreError::MissingHost => (StatusCode::BAD_REQUEST, self.to_string()),
                CoreError::MissingCredential(_) | CoreError::InvalidUrl(_) => {
                    tracing::error!("Config error: {}", self);
                    (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        "Server configuration error".to_string(),
                    )
                }
                CoreError::CodeExchange(_)
                | CoreError::Provider(_)
                | CoreError::InvalidProfile(_) => {
                    tracing::error!("Provider error during auth: {}", self);
                    (
                        StatusCode::BAD_GATEWAY,
                        "Authentication provider error".to_string(),
                    )
                }
                CoreError::MissingUser => {
                    tracing::error!(
                        "Invariant violated: {}; the authentication layer did not attach a user",
                        self
                    );
                    (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        "Internal server error".to_string(),
                    )
                }
                CoreError::Hook(_) => {
                    tracing::error!("Auth error: {}", self);
                    (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        "Internal server error".to_string(),
                    )
                }
            },
            AuthError::Session(_) | AuthError::NotInitialized => {
                tracing::error!("Auth error: {}", self);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
        };

        (status, message).into_response()
    }
}
