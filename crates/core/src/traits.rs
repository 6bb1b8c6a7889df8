use async_trait::async_trait;
use url::Url;

use super::{AuthError, Profile};

/// Result type for auth operations.
pub type Result<T> = std::result::Result<T, AuthError>;

/// Abstraction over OAuth-style identity providers.
///
/// A provider knows how to send the user to its login page and how to turn the
/// authorization code it hands back into a user profile.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Build the authorization URL the user is redirected to.
    fn authorization_url(&self, redirect_uri: &Url, state: &str) -> Result<Url>;

    /// Exchange an authorization code for the authenticated user's profile.
    async fn authenticate(&self, code: &str, redirect_uri: &Url) -> Result<Profile>;

    /// Short provider name, used in logs.
    fn name(&self) -> &'static str;
}
