use rand::{distr::Alphanumeric, Rng};
use url::Url;

use super::{AuthError, Result};

/// Generate a random state parameter for CSRF protection.
pub fn generate_state() -> String {
    rand::rng()
        .sample_iter(&Alphanumeric)
        .take(32)
        .map(char::from)
        .collect()
}

/// Generate a fresh cookie signing secret.
pub fn generate_cookie_secret() -> String {
    uuid::Uuid::new_v4().to_string()
}

/// Resolve the absolute callback URL the provider should redirect back to.
///
/// An absolute `callback` is returned as is. A relative one is joined onto
/// `base_url` when configured, otherwise onto the request's host, using the
/// forwarded protocol if a proxy supplied one and `http` otherwise.
pub fn resolve_callback_url(
    callback: &str,
    base_url: Option<&Url>,
    host: Option<&str>,
    forwarded_proto: Option<&str>,
) -> Result<Url> {
    if let Ok(url) = Url::parse(callback) {
        return Ok(url);
    }

    let base = match base_url {
        Some(base) => base.clone(),
        None => {
            let host = host.ok_or(AuthError::MissingHost)?;
            let scheme = match forwarded_proto.map(|p| p.split(',').next().unwrap_or(p).trim()) {
                Some("https") => "https",
                _ => "http",
            };
            Url::parse(&format!("{scheme}://{host}"))
                .map_err(|e| AuthError::InvalidUrl(e.to_string()))?
        }
    };

    base.join(callback)
        .map_err(|e| AuthError::InvalidUrl(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generate_state_produces_32_char_alphanumeric() {
        let state = generate_state();
        assert_eq!(state.len(), 32);
        assert!(state.chars().all(|c| c.is_ascii_alphanumeric()));
    }

    #[test]
    fn generate_state_is_unique() {
        assert_ne!(generate_state(), generate_state());
    }

    #[test]
    fn generate_cookie_secret_is_unique() {
        let secret = generate_cookie_secret();
        assert_eq!(secret.len(), 36);
        assert_ne!(secret, generate_cookie_secret());
    }

    #[test]
    fn absolute_callback_is_kept() {
        let url = resolve_callback_url("https://app.example.com/cb", None, None, None).unwrap();
        assert_eq!(url.as_str(), "https://app.example.com/cb");
    }

    #[test]
    fn relative_callback_joins_base_url() {
        let base = Url::parse("https://app.example.com").unwrap();
        let url =
            resolve_callback_url("/auth/callback", Some(&base), Some("ignored"), None).unwrap();
        assert_eq!(url.as_str(), "https://app.example.com/auth/callback");
    }

    #[test]
    fn relative_callback_uses_host_header() {
        let url = resolve_callback_url("/auth/callback", None, Some("localhost:3000"), None).unwrap();
        assert_eq!(url.as_str(), "http://localhost:3000/auth/callback");
    }

    #[test]
    fn forwarded_proto_selects_https() {
        let url = resolve_callback_url(
            "/auth/callback",
            None,
            Some("app.example.com"),
            Some("https, http"),
        )
        .unwrap();
        assert_eq!(url.as_str(), "https://app.example.com/auth/callback");
    }

    #[test]
    fn relative_callback_without_host_fails() {
        let result = resolve_callback_url("/auth/callback", None, None, None);
        assert!(matches!(result, Err(AuthError::MissingHost)));
    }
}
