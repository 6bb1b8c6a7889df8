use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::AuthError;

/// Normalized user profile returned by an identity provider.
///
/// Mirrors the shape Auth0 clients conventionally expose: a stable `id`, a few
/// display fields and the untouched userinfo document in `raw`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    /// Which provider issued this profile (e.g. `auth0`).
    pub provider: String,
    /// Provider's unique user identifier.
    pub id: String,
    pub display_name: Option<String>,
    pub nickname: Option<String>,
    pub given_name: Option<String>,
    pub family_name: Option<String>,
    #[serde(default)]
    pub emails: Vec<String>,
    pub picture: Option<String>,
    /// Full userinfo response as received.
    #[serde(default)]
    pub raw: Value,
}

impl Profile {
    /// Create a minimal profile with only a provider and an id.
    pub fn new(provider: impl Into<String>, id: impl Into<String>) -> Self {
        Self {
            provider: provider.into(),
            id: id.into(),
            display_name: None,
            nickname: None,
            given_name: None,
            family_name: None,
            emails: Vec::new(),
            picture: None,
            raw: Value::Null,
        }
    }

    pub fn with_display_name(mut self, name: impl Into<String>) -> Self {
        self.display_name = Some(name.into());
        self
    }

    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.emails.push(email.into());
        self
    }

    /// Build a profile from an OIDC userinfo document.
    ///
    /// The identifier is taken from `sub`, falling back to `user_id` for the
    /// legacy Auth0 profile format.
    ///
    /// # Errors
    ///
    /// Returns `InvalidProfile` if the document is not an object or carries no
    /// identifier.
    pub fn from_userinfo(provider: &str, userinfo: Value) -> Result<Self, AuthError> {
        let object = userinfo
            .as_object()
            .ok_or_else(|| AuthError::InvalidProfile("userinfo is not an object".to_string()))?;

        let text = |key: &str| object.get(key).and_then(Value::as_str).map(String::from);

        let id = text("sub")
            .or_else(|| text("user_id"))
            .ok_or_else(|| AuthError::InvalidProfile("missing `sub` claim".to_string()))?;

        Ok(Self {
            provider: provider.to_string(),
            id,
            display_name: text("name"),
            nickname: text("nickname"),
            given_name: text("given_name"),
            family_name: text("family_name"),
            emails: text("email").into_iter().collect(),
            picture: text("picture"),
            raw: userinfo,
        })
    }
}
