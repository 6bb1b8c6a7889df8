//! Auth0 provider implementation.

use std::borrow::Cow;

use async_trait::async_trait;
use decoded_auth_core::{Auth0Config, AuthError, IdentityProvider, Profile, Result};
use oauth2::{
    basic::{BasicClient, BasicTokenResponse},
    reqwest::async_http_client,
    AuthType, AuthUrl, AuthorizationCode, ClientId, ClientSecret, CsrfToken, RedirectUrl, Scope,
    TokenResponse, TokenUrl,
};
use serde_json::Value;
use url::Url;

/// Auth0 authorization code strategy.
///
/// Construction is purely local: it validates the credentials and derives the
/// tenant endpoints, no network call is made until a user comes back with a
/// code.
pub struct Auth0Strategy {
    client: BasicClient,
    userinfo_url: Url,
    scopes: Vec<Scope>,
    http_client: reqwest::Client,
}

impl Auth0Strategy {
    /// Build the strategy from the provider settings.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The domain, client ID or client secret is missing or empty
    /// - The domain does not form a valid URL
    pub fn new(config: &Auth0Config) -> Result<Self> {
        let (domain, client_id, client_secret) = config.credentials()?;

        let tenant = tenant_url(domain)?;
        let endpoint = |path: &str| {
            tenant
                .join(path)
                .map_err(|e| AuthError::InvalidUrl(e.to_string()))
        };

        let client = BasicClient::new(
            ClientId::new(client_id.to_string()),
            Some(ClientSecret::new(client_secret.to_string())),
            AuthUrl::from_url(endpoint("/authorize")?),
            Some(TokenUrl::from_url(endpoint("/oauth/token")?)),
        )
        .set_auth_type(AuthType::RequestBody);

        // Build HTTP client without redirect following (security requirement)
        let http_client = reqwest::Client::builder()
            .redirect(reqwest::redirect::Policy::none())
            .build()
            .map_err(|e| AuthError::Provider(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            userinfo_url: endpoint("/userinfo")?,
            scopes: config
                .scope
                .split_whitespace()
                .map(|s| Scope::new(s.to_string()))
                .collect(),
            http_client,
        })
    }

    async fn fetch_userinfo(&self, access_token: &str) -> Result<Value> {
        let response = self
            .http_client
            .get(self.userinfo_url.clone())
            .bearer_auth(access_token)
            .send()
            .await
            .map_err(|e| AuthError::Provider(e.to_string()))?
            .error_for_status()
            .map_err(|e| AuthError::Provider(e.to_string()))?;

        response
            .json()
            .await
            .map_err(|e| AuthError::InvalidProfile(e.to_string()))
    }
}

/// Accept the profile returned by the provider as is. The access and refresh
/// tokens are not checked further and are not kept.
fn verify(_tokens: &BasicTokenResponse, profile: Profile) -> Profile {
    profile
}

/// Accepts either a bare tenant domain or a full URL.
fn tenant_url(domain: &str) -> Result<Url> {
    let raw = if domain.contains("://") {
        domain.to_string()
    } else {
        format!("https://{domain}")
    };
    Url::parse(&raw).map_err(|e| AuthError::InvalidUrl(e.to_string()))
}

#[async_trait]
impl IdentityProvider for Auth0Strategy {
    fn authorization_url(&self, redirect_uri: &Url, state: &str) -> Result<Url> {
        let state_owned = state.to_string();

        let (auth_url, _csrf_token) = self
            .client
            .authorize_url(move || CsrfToken::new(state_owned))
            .add_scopes(self.scopes.iter().cloned())
            .set_redirect_uri(Cow::Owned(RedirectUrl::from_url(redirect_uri.clone())))
            .url();

        Ok(auth_url)
    }

    async fn authenticate(&self, code: &str, redirect_uri: &Url) -> Result<Profile> {
        let tokens = self
            .client
            .exchange_code(AuthorizationCode::new(code.to_string()))
            .set_redirect_uri(Cow::Owned(RedirectUrl::from_url(redirect_uri.clone())))
            .request_async(async_http_client)
            .await
            .map_err(|e| AuthError::CodeExchange(e.to_string()))?;

        let userinfo = self.fetch_userinfo(tokens.access_token().secret()).await?;
        let profile = Profile::from_userinfo(self.name(), userinfo)?;

        Ok(verify(&tokens, profile))
    }

    fn name(&self) -> &'static str {
        "auth0"
    }
}
