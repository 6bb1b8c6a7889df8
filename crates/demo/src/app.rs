use std::time::Duration;

use axum::{http::StatusCode, middleware, routing::get, Router};
use decoded_auth::{requires_login, AuthError, AuthOverrides};
use tower_http::{timeout::TimeoutLayer, trace::TraceLayer};

use crate::handlers::{home, logout, private};

/// Application routes, before authentication is installed.
fn routes() -> Router {
    Router::new()
        .route("/private", get(private))
        .route_layer(middleware::from_fn(requires_login))
        .route("/", get(home))
        .route("/logout", get(logout))
}

fn with_http_layers(app: Router) -> Router {
    app.layer(TraceLayer::new_for_http())
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            Duration::from_secs(10),
        ))
}

/// Create the application router with Auth0 authentication and middleware.
pub fn create_app(overrides: Option<AuthOverrides>) -> Result<Router, AuthError> {
    let app = decoded_auth::init(routes(), overrides)?;
    Ok(with_http_layers(app))
}

/// Create the application router logging in against the mock provider.
#[cfg(any(test, feature = "mock"))]
pub fn create_mock_app(options: decoded_auth::AuthOptions) -> Router {
    use std::sync::Arc;

    let app = decoded_auth::install(
        routes(),
        options,
        Arc::new(decoded_auth::MockProvider::default()),
        decoded_auth::MemoryStore::default(),
    );
    with_http_layers(app)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        body::Body,
        http::{
            header::{COOKIE, HOST, LOCATION, SET_COOKIE},
            Request, Response,
        },
    };
    use decoded_auth::AuthOptions;
    use http_body_util::BodyExt;
    use tower::ServiceExt;

    fn mock_app() -> Router {
        let mut options = AuthOptions::default();
        options.cookie_secure = false;
        create_mock_app(options)
    }

    fn get_request(uri: &str, cookie: Option<&str>) -> Request<Body> {
        let mut builder = Request::builder().uri(uri).header(HOST, "localhost:3000");
        if let Some(cookie) = cookie {
            builder = builder.header(COOKIE, cookie);
        }
        builder.body(Body::empty()).unwrap()
    }

    fn location(response: &Response<Body>) -> String {
        response.headers()[LOCATION].to_str().unwrap().to_string()
    }

    fn cookie(response: &Response<Body>) -> String {
        response.headers()[SET_COOKIE]
            .to_str()
            .unwrap()
            .split(';')
            .next()
            .unwrap()
            .to_string()
    }

    async fn body_text(response: Response<Body>) -> String {
        let body = response.into_body().collect().await.unwrap().to_bytes();
        String::from_utf8(body.to_vec()).unwrap()
    }

    async fn log_in(app: &Router) -> String {
        let start = app
            .clone()
            .oneshot(get_request("/auth/callback", None))
            .await
            .unwrap();
        let callback = location(&start).replace("http://localhost:3000", "");

        let done = app
            .clone()
            .oneshot(get_request(&callback, Some(&cookie(&start))))
            .await
            .unwrap();
        assert_eq!(location(&done), "/");
        cookie(&done)
    }

    #[tokio::test]
    async fn test_home_page_is_public() {
        let response = mock_app()
            .oneshot(get_request("/", None))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert!(body_text(response).await.contains("Welcome"));
    }

    #[tokio::test]
    async fn test_private_page_redirects_to_login() {
        let response = mock_app()
            .oneshot(get_request("/private", None))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(location(&response), "/auth/callback");
    }

    #[tokio::test]
    async fn test_login_then_profile_then_logout() {
        let app = mock_app();
        let session = log_in(&app).await;

        let response = app
            .clone()
            .oneshot(get_request("/", Some(&session)))
            .await
            .unwrap();
        assert!(body_text(response).await.contains("Hello, Test User"));

        let response = app
            .clone()
            .oneshot(get_request("/private", Some(&session)))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_text(response).await;
        let profile: serde_json::Value = serde_json::from_str(&body).unwrap();
        assert_eq!(profile["id"], "mock|test-user");
        assert_eq!(profile["emails"][0], "test@example.com");

        let response = app
            .clone()
            .oneshot(get_request("/logout", Some(&session)))
            .await
            .unwrap();
        assert_eq!(location(&response), "/");

        let response = app
            .oneshot(get_request("/private", Some(&session)))
            .await
            .unwrap();
        assert_eq!(location(&response), "/auth/callback");
    }

    #[tokio::test]
    async fn test_create_app_requires_credentials() {
        let overrides = AuthOverrides::default()
            .domain("")
            .client_id("")
            .client_secret("");

        assert!(create_app(Some(overrides)).is_err());
    }

    #[tokio::test]
    async fn test_create_app_with_credentials() {
        let overrides = AuthOverrides::default()
            .domain("tenant.auth0.com")
            .client_id("client")
            .client_secret("secret");

        assert!(create_app(Some(overrides)).is_ok());
    }
}
