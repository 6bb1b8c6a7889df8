//! Auth0 session authentication for axum applications.
//!
//! This crate provides:
//! - One-call wiring of cookies, sessions and the Auth0 strategy onto a router
//! - The provider callback route and its post-login redirect
//! - A login guard plus extractors for the authenticated user
//!
//! ```ignore
//! let app = Router::new()
//!     .route("/private", get(private))
//!     .route_layer(middleware::from_fn(decoded_auth::requires_login))
//!     .route("/", get(home));
//! let app = decoded_auth::init(app, None)?;
//! ```

mod error;
mod extractors;
mod handlers;
mod init;
mod middleware;
mod providers;
mod state;

pub use error::AuthError;
pub use extractors::{CurrentUser, OptionalUser};
pub use handlers::{redirect_after_login, CallbackQuery};
pub use init::{init, init_with_options, install};
pub use middleware::requires_login;
pub use providers::Auth0Strategy;
#[cfg(any(test, feature = "mock"))]
pub use providers::{MockProvider, MOCK_CODE};
pub use state::AuthState;

pub use decoded_auth_core::{
    Auth0Overrides, AuthOptions, AuthOverrides, DeserializeHook, DeserializeUser,
    IdentityProvider, Profile, SerializeHook, SerializeUser,
};
pub use tower_sessions::{MemoryStore, Session, SessionStore};
