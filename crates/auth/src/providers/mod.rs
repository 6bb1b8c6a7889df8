//! Identity provider implementations.
//!
//! This module contains implementations of `IdentityProvider` for:
//! - Auth0 (authorization code flow)
//! - A mock provider for tests and local development

mod auth0;
#[cfg(any(test, feature = "mock"))]
mod mock;

pub use auth0::Auth0Strategy;
#[cfg(any(test, feature = "mock"))]
pub use mock::{MockProvider, MOCK_CODE};
