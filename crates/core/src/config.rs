use std::{env, fmt, time::Duration};

use url::Url;

use super::{
    generate_cookie_secret, AuthError, DeserializeHook, DeserializeUser, Result, SerializeHook,
    SerializeUser,
};

pub const AUTH0_DOMAIN: &str = "AUTH0_DOMAIN";
pub const AUTH0_CLIENT_ID: &str = "AUTH0_CLIENT_ID";
pub const AUTH0_CLIENT_SECRET: &str = "AUTH0_CLIENT_SECRET";

pub const DEFAULT_CALLBACK_URL: &str = "/auth/callback";
pub const DEFAULT_SCOPE: &str = "openid profile email";
pub const DEFAULT_COOKIE_NAME: &str = "session";
pub const DEFAULT_SESSION_TTL: Duration = Duration::from_secs(7 * 24 * 60 * 60);

/// Auth0 application settings.
#[derive(Clone)]
pub struct Auth0Config {
    pub domain: Option<String>,
    pub client_id: Option<String>,
    pub client_secret: Option<String>,
    /// Path or absolute URL of the callback route.
    pub callback_url: String,
    /// Space separated scopes requested at the authorize endpoint.
    pub scope: String,
}

impl Default for Auth0Config {
    fn default() -> Self {
        Self {
            domain: None,
            client_id: None,
            client_secret: None,
            callback_url: DEFAULT_CALLBACK_URL.to_string(),
            scope: DEFAULT_SCOPE.to_string(),
        }
    }
}

impl Auth0Config {
    /// Borrow the three provider credentials as `(domain, client_id, client_secret)`.
    ///
    /// # Errors
    ///
    /// Returns `MissingCredential` naming the first unset or empty field.
    pub fn credentials(&self) -> Result<(&str, &str, &str)> {
        Ok((
            required(&self.domain, "domain")?,
            required(&self.client_id, "client_id")?,
            required(&self.client_secret, "client_secret")?,
        ))
    }
}

impl fmt::Debug for Auth0Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Auth0Config")
            .field("domain", &self.domain)
            .field("client_id", &self.client_id)
            .field("client_secret", &self.client_secret.as_ref().map(|_| "[redacted]"))
            .field("callback_url", &self.callback_url)
            .field("scope", &self.scope)
            .finish()
    }
}

/// Complete authentication configuration.
///
/// Built in three ordered passes: defaults, then the environment fill, then
/// explicit caller overrides. See [`AuthOptions::resolve`].
#[derive(Clone)]
pub struct AuthOptions {
    pub auth0: Auth0Config,
    /// Secret used to sign the session cookie.
    pub cookie_secret: String,
    pub success_redirect: String,
    pub failure_redirect: String,
    pub serialize_user: SerializeHook,
    pub deserialize_user: DeserializeHook,
    pub cookie_name: String,
    pub cookie_secure: bool,
    /// Inactivity period after which a session expires.
    pub session_ttl: Duration,
    /// Base used to make a relative callback URL absolute.
    pub base_url: Option<Url>,
}

impl Default for AuthOptions {
    fn default() -> Self {
        Self {
            auth0: Auth0Config::default(),
            cookie_secret: generate_cookie_secret(),
            success_redirect: "/".to_string(),
            failure_redirect: "/".to_string(),
            serialize_user: SerializeHook::default(),
            deserialize_user: DeserializeHook::default(),
            cookie_name: DEFAULT_COOKIE_NAME.to_string(),
            cookie_secure: true,
            session_ttl: DEFAULT_SESSION_TTL,
            base_url: None,
        }
    }
}

impl fmt::Debug for AuthOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthOptions")
            .field("auth0", &self.auth0)
            .field("cookie_secret", &"[redacted]")
            .field("success_redirect", &self.success_redirect)
            .field("failure_redirect", &self.failure_redirect)
            .field("serialize_user", &self.serialize_user)
            .field("deserialize_user", &self.deserialize_user)
            .field("cookie_name", &self.cookie_name)
            .field("cookie_secure", &self.cookie_secure)
            .field("session_ttl", &self.session_ttl)
            .field("base_url", &self.base_url)
            .finish()
    }
}

impl AuthOptions {
    /// Resolve the effective configuration from the process environment.
    ///
    /// Starts from defaults, fills unset provider credentials from
    /// `AUTH0_DOMAIN`, `AUTH0_CLIENT_ID` and `AUTH0_CLIENT_SECRET`, then applies
    /// `overrides`. Caller values always win.
    pub fn resolve(overrides: Option<AuthOverrides>) -> Self {
        Self::resolve_from(overrides, |key| env::var(key).ok())
    }

    /// Same as [`AuthOptions::resolve`] with an explicit variable lookup.
    pub fn resolve_from<F>(overrides: Option<AuthOverrides>, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut options = Self::default();
        options.reload_config_from(false, lookup);
        if let Some(overrides) = overrides {
            options.merge(overrides);
        }
        options
    }

    /// Load the provider credentials from environment variables.
    ///
    /// With `overwrite` set, the three credentials are replaced by the current
    /// environment values (an absent variable clears the field). Otherwise a
    /// field is only filled in when it is currently unset or empty.
    pub fn reload_config(&mut self, overwrite: bool) {
        self.reload_config_from(overwrite, |key| env::var(key).ok());
    }

    /// Same as [`AuthOptions::reload_config`] with an explicit variable lookup.
    pub fn reload_config_from<F>(&mut self, overwrite: bool, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let auth0 = &mut self.auth0;
        let fields = [
            (&mut auth0.domain, AUTH0_DOMAIN),
            (&mut auth0.client_id, AUTH0_CLIENT_ID),
            (&mut auth0.client_secret, AUTH0_CLIENT_SECRET),
        ];

        for (field, key) in fields {
            let unset = field.as_deref().is_none_or(str::is_empty);
            if overwrite || unset {
                *field = lookup(key).filter(|v| !v.is_empty());
            }
        }
    }

    /// Apply caller overrides field by field. Fields left as `None` keep their
    /// current value; the nested `auth0` section is merged key by key.
    pub fn merge(&mut self, overrides: AuthOverrides) {
        let AuthOverrides {
            auth0,
            cookie_secret,
            success_redirect,
            failure_redirect,
            serialize_user,
            deserialize_user,
            cookie_name,
            cookie_secure,
            session_ttl,
            base_url,
        } = overrides;

        self.auth0.merge(auth0);
        replace(&mut self.cookie_secret, cookie_secret);
        replace(&mut self.success_redirect, success_redirect);
        replace(&mut self.failure_redirect, failure_redirect);
        replace(&mut self.serialize_user, serialize_user);
        replace(&mut self.deserialize_user, deserialize_user);
        replace(&mut self.cookie_name, cookie_name);
        replace(&mut self.cookie_secure, cookie_secure);
        replace(&mut self.session_ttl, session_ttl);
        if base_url.is_some() {
            self.base_url = base_url;
        }
    }
}

impl Auth0Config {
    fn merge(&mut self, overrides: Auth0Overrides) {
        let Auth0Overrides {
            domain,
            client_id,
            client_secret,
            callback_url,
            scope,
        } = overrides;

        if domain.is_some() {
            self.domain = domain;
        }
        if client_id.is_some() {
            self.client_id = client_id;
        }
        if client_secret.is_some() {
            self.client_secret = client_secret;
        }
        replace(&mut self.callback_url, callback_url);
        replace(&mut self.scope, scope);
    }
}

fn required<'a>(value: &'a Option<String>, name: &'static str) -> Result<&'a str> {
    value
        .as_deref()
        .filter(|v| !v.is_empty())
        .ok_or(AuthError::MissingCredential(name))
}

fn replace<T>(slot: &mut T, value: Option<T>) {
    if let Some(value) = value {
        *slot = value;
    }
}

/// Partial overlay for [`Auth0Config`].
#[derive(Debug, Clone, Default)]
pub struct Auth0Overrides {
    pub domain: Option<String>,
    pub client_id: Option<String>,
    pub client_secret: Option<String>,
    pub callback_url: Option<String>,
    pub scope: Option<String>,
}

/// Partial overlay for [`AuthOptions`], supplied by the caller at init time.
///
/// ```
/// use decoded_auth_core::AuthOverrides;
///
/// let overrides = AuthOverrides::default()
///     .domain("tenant.eu.auth0.com")
///     .success_redirect("/dashboard");
/// assert_eq!(overrides.auth0.domain.as_deref(), Some("tenant.eu.auth0.com"));
/// ```
#[derive(Debug, Clone, Default)]
pub struct AuthOverrides {
    pub auth0: Auth0Overrides,
    pub cookie_secret: Option<String>,
    pub success_redirect: Option<String>,
    pub failure_redirect: Option<String>,
    pub serialize_user: Option<SerializeHook>,
    pub deserialize_user: Option<DeserializeHook>,
    pub cookie_name: Option<String>,
    pub cookie_secure: Option<bool>,
    pub session_ttl: Option<Duration>,
    pub base_url: Option<Url>,
}

impl AuthOverrides {
    pub fn domain(mut self, domain: impl Into<String>) -> Self {
        self.auth0.domain = Some(domain.into());
        self
    }

    pub fn client_id(mut self, client_id: impl Into<String>) -> Self {
        self.auth0.client_id = Some(client_id.into());
        self
    }

    pub fn client_secret(mut self, client_secret: impl Into<String>) -> Self {
        self.auth0.client_secret = Some(client_secret.into());
        self
    }

    pub fn callback_url(mut self, callback_url: impl Into<String>) -> Self {
        self.auth0.callback_url = Some(callback_url.into());
        self
    }

    pub fn scope(mut self, scope: impl Into<String>) -> Self {
        self.auth0.scope = Some(scope.into());
        self
    }

    pub fn cookie_secret(mut self, secret: impl Into<String>) -> Self {
        self.cookie_secret = Some(secret.into());
        self
    }

    pub fn success_redirect(mut self, url: impl Into<String>) -> Self {
        self.success_redirect = Some(url.into());
        self
    }

    pub fn failure_redirect(mut self, url: impl Into<String>) -> Self {
        self.failure_redirect = Some(url.into());
        self
    }

    pub fn serialize_user(mut self, hook: impl SerializeUser + 'static) -> Self {
        self.serialize_user = Some(SerializeHook::custom(hook));
        self
    }

    pub fn deserialize_user(mut self, hook: impl DeserializeUser + 'static) -> Self {
        self.deserialize_user = Some(DeserializeHook::custom(hook));
        self
    }

    pub fn cookie_name(mut self, name: impl Into<String>) -> Self {
        self.cookie_name = Some(name.into());
        self
    }

    pub fn cookie_secure(mut self, secure: bool) -> Self {
        self.cookie_secure = Some(secure);
        self
    }

    pub fn session_ttl(mut self, ttl: Duration) -> Self {
        self.session_ttl = Some(ttl);
        self
    }

    pub fn base_url(mut self, url: Url) -> Self {
        self.base_url = Some(url);
        self
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn env_of(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    fn full_env() -> impl Fn(&str) -> Option<String> {
        env_of(&[
            (AUTH0_DOMAIN, "env.example.com"),
            (AUTH0_CLIENT_ID, "env-id"),
            (AUTH0_CLIENT_SECRET, "env-secret"),
        ])
    }

    fn preset() -> AuthOptions {
        let mut options = AuthOptions::default();
        options.auth0.domain = Some("set.example.com".to_string());
        options.auth0.client_id = Some("set-id".to_string());
        options.auth0.client_secret = Some("set-secret".to_string());
        options
    }

    #[test]
    fn defaults_match_documented_values() {
        let options = AuthOptions::default();
        assert_eq!(options.auth0.callback_url, "/auth/callback");
        assert_eq!(options.success_redirect, "/");
        assert_eq!(options.failure_redirect, "/");
        assert_eq!(options.cookie_name, "session");
        assert!(options.cookie_secure);
        assert!(matches!(options.serialize_user, SerializeHook::Passthrough));
        assert!(matches!(options.deserialize_user, DeserializeHook::Passthrough));
        assert!(!options.cookie_secret.is_empty());
    }

    #[test]
    fn default_cookie_secret_differs_per_instance() {
        assert_ne!(
            AuthOptions::default().cookie_secret,
            AuthOptions::default().cookie_secret
        );
    }

    #[test]
    fn fill_only_reload_keeps_existing_values() {
        let mut options = preset();
        options.reload_config_from(false, full_env());

        assert_eq!(options.auth0.domain.as_deref(), Some("set.example.com"));
        assert_eq!(options.auth0.client_id.as_deref(), Some("set-id"));
        assert_eq!(options.auth0.client_secret.as_deref(), Some("set-secret"));
    }

    #[test]
    fn fill_only_reload_fills_unset_and_empty_fields() {
        let mut options = AuthOptions::default();
        options.auth0.client_id = Some(String::new());
        options.reload_config_from(false, full_env());

        assert_eq!(options.auth0.domain.as_deref(), Some("env.example.com"));
        assert_eq!(options.auth0.client_id.as_deref(), Some("env-id"));
        assert_eq!(options.auth0.client_secret.as_deref(), Some("env-secret"));
    }

    #[test]
    fn overwriting_reload_replaces_every_field() {
        let mut options = preset();
        options.reload_config_from(true, full_env());

        assert_eq!(options.auth0.domain.as_deref(), Some("env.example.com"));
        assert_eq!(options.auth0.client_id.as_deref(), Some("env-id"));
        assert_eq!(options.auth0.client_secret.as_deref(), Some("env-secret"));
    }

    #[test]
    fn overwriting_reload_clears_fields_missing_from_env() {
        let mut options = preset();
        options.reload_config_from(true, env_of(&[(AUTH0_DOMAIN, "env.example.com")]));

        assert_eq!(options.auth0.domain.as_deref(), Some("env.example.com"));
        assert_eq!(options.auth0.client_id, None);
        assert_eq!(options.auth0.client_secret, None);
    }

    #[test]
    fn reload_leaves_other_settings_alone() {
        let mut options = AuthOptions::default();
        options.auth0.callback_url = "/login/done".to_string();
        options.reload_config_from(true, full_env());
        assert_eq!(options.auth0.callback_url, "/login/done");
    }

    #[test]
    fn reload_without_env_leaves_fields_unset() {
        let mut options = AuthOptions::default();
        options.reload_config_from(false, env_of(&[]));
        assert!(options.auth0.domain.is_none());
        assert!(matches!(
            options.auth0.credentials(),
            Err(AuthError::MissingCredential("domain"))
        ));
    }

    #[test]
    fn reload_reads_process_environment() {
        temp_env::with_vars(
            [
                (AUTH0_DOMAIN, Some("process.example.com")),
                (AUTH0_CLIENT_ID, Some("process-id")),
                (AUTH0_CLIENT_SECRET, None),
            ],
            || {
                let mut options = preset();
                options.reload_config(true);

                assert_eq!(options.auth0.domain.as_deref(), Some("process.example.com"));
                assert_eq!(options.auth0.client_id.as_deref(), Some("process-id"));
                assert_eq!(options.auth0.client_secret, None);
            },
        );
    }

    #[test]
    fn overrides_win_over_environment() {
        temp_env::with_vars(
            [
                (AUTH0_DOMAIN, Some("env.example.com")),
                (AUTH0_CLIENT_ID, Some("env-id")),
                (AUTH0_CLIENT_SECRET, Some("env-secret")),
            ],
            || {
                let options =
                    AuthOptions::resolve(Some(AuthOverrides::default().domain("override.example.com")));

                assert_eq!(options.auth0.domain.as_deref(), Some("override.example.com"));
                // Untouched nested keys still come from the environment.
                assert_eq!(options.auth0.client_id.as_deref(), Some("env-id"));
                assert_eq!(options.auth0.client_secret.as_deref(), Some("env-secret"));
            },
        );
    }

    #[test]
    fn merge_is_key_by_key() {
        let mut options = preset();
        options.merge(
            AuthOverrides::default()
                .callback_url("/cb")
                .success_redirect("/home")
                .cookie_secret("s3cret")
                .cookie_secure(false)
                .session_ttl(Duration::from_secs(60)),
        );

        assert_eq!(options.auth0.domain.as_deref(), Some("set.example.com"));
        assert_eq!(options.auth0.callback_url, "/cb");
        assert_eq!(options.auth0.scope, DEFAULT_SCOPE);
        assert_eq!(options.success_redirect, "/home");
        assert_eq!(options.failure_redirect, "/");
        assert_eq!(options.cookie_secret, "s3cret");
        assert!(!options.cookie_secure);
        assert_eq!(options.session_ttl, Duration::from_secs(60));
    }

    #[test]
    fn resolve_without_anything_has_no_credentials() {
        let options = AuthOptions::resolve_from(None, env_of(&[]));
        assert!(matches!(
            options.auth0.credentials(),
            Err(AuthError::MissingCredential("domain"))
        ));
    }

    #[test]
    fn credentials_report_first_missing_field() {
        let mut options = preset();
        options.auth0.client_secret = Some(String::new());
        assert!(matches!(
            options.auth0.credentials(),
            Err(AuthError::MissingCredential("client_secret"))
        ));

        options.auth0.client_secret = Some("x".to_string());
        assert_eq!(
            options.auth0.credentials().unwrap(),
            ("set.example.com", "set-id", "x")
        );
    }

    #[test]
    fn debug_redacts_secrets() {
        let mut options = preset();
        options.cookie_secret = "cookie-secret-value".to_string();
        let rendered = format!("{options:?}");
        assert!(!rendered.contains("set-secret"));
        assert!(!rendered.contains("cookie-secret-value"));
        assert!(rendered.contains("set.example.com"));
    }
}
