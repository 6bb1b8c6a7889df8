//! Functional core for decoded_auth.
//!
//! Holds everything that does not touch the network or the request pipeline:
//! the typed configuration and its merge passes, the user profile model, the
//! serialize/deserialize hooks and the identity provider seam.

mod config;
mod error;
mod functions;
mod hooks;
mod traits;
mod types;

pub use config::{
    Auth0Config, Auth0Overrides, AuthOptions, AuthOverrides, AUTH0_CLIENT_ID, AUTH0_CLIENT_SECRET,
    AUTH0_DOMAIN, DEFAULT_CALLBACK_URL, DEFAULT_COOKIE_NAME, DEFAULT_SCOPE, DEFAULT_SESSION_TTL,
};
pub use error::AuthError;
pub use functions::{generate_cookie_secret, generate_state, resolve_callback_url};
pub use hooks::{DeserializeHook, DeserializeUser, SerializeHook, SerializeUser};
pub use traits::{IdentityProvider, Result};
pub use types::Profile;
