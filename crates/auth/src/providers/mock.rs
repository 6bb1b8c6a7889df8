//! Mock identity provider for development and testing.
//!
//! The authorization URL points straight back at the callback with a fixed
//! code, so the whole login round trip can run in-process.

use async_trait::async_trait;
use decoded_auth_core::{AuthError, IdentityProvider, Profile, Result};
use url::Url;

/// Code handed out by [`MockProvider::authorization_url`].
pub const MOCK_CODE: &str = "mock-code";

/// Identity provider that always logs in the same profile.
pub struct MockProvider {
    profile: Profile,
}

impl MockProvider {
    pub fn new(profile: Profile) -> Self {
        Self { profile }
    }
}

impl Default for MockProvider {
    fn default() -> Self {
        Self::new(
            Profile::new("mock", "mock|test-user")
                .with_display_name("Test User")
                .with_email("test@example.com"),
        )
    }
}

#[async_trait]
impl IdentityProvider for MockProvider {
    fn authorization_url(&self, redirect_uri: &Url, state: &str) -> Result<Url> {
        let mut url = redirect_uri.clone();
        url.query_pairs_mut()
            .append_pair("code", MOCK_CODE)
            .append_pair("state", state);
        Ok(url)
    }

    async fn authenticate(&self, code: &str, _redirect_uri: &Url) -> Result<Profile> {
        if code != MOCK_CODE {
            return Err(AuthError::CodeExchange(format!("unknown mock code: {code}")));
        }
        Ok(self.profile.clone())
    }

    fn name(&self) -> &'static str {
        "mock"
    }
}
