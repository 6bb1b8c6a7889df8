use thiserror::Error;

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("you must provide the {0} configuration value to use the Auth0 strategy")]
    MissingCredential(&'static str),

    #[error("invalid URL: {0}")]
    InvalidUrl(String),

    #[error("cannot resolve callback URL without a Host header or base URL")]
    MissingHost,

    #[error("authenticated callback reached without a user")]
    MissingUser,

    #[error("failed to exchange authorization code: {0}")]
    CodeExchange(String),

    #[error("provider error: {0}")]
    Provider(String),

    #[error("invalid user profile: {0}")]
    InvalidProfile(String),

    #[error("user hook failed: {0}")]
    Hook(String),
}
