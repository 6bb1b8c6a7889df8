mod app;
mod handlers;

use std::time::Duration;

use anyhow::Result;
use clap::Parser;
use decoded_auth::{Auth0Overrides, AuthOverrides};
use listenfd::ListenFd;
use tokio::{net::TcpListener, signal};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use url::Url;

/// decoded-auth-demo - A page protected by Auth0 login
#[derive(Parser, Debug)]
#[command(name = "decoded-auth-demo")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Host address to bind the server to
    #[arg(long, short = 'H', default_value = "0.0.0.0", env = "HOST")]
    host: String,

    /// Port to listen on
    #[arg(long, short, default_value = "3000", env = "PORT")]
    port: u16,

    /// Public origin used to build the absolute callback URL
    #[arg(long, env = "AUTH_BASE_URL")]
    base_url: Option<Url>,

    /// Callback path or URL registered with Auth0
    #[arg(long, env = "AUTH0_CALLBACK_URL")]
    callback_url: Option<String>,

    /// Where to send the user after logging in
    #[arg(long, env = "SUCCESS_REDIRECT")]
    success_redirect: Option<String>,

    /// Where to send the user when login fails
    #[arg(long, env = "FAILURE_REDIRECT")]
    failure_redirect: Option<String>,

    /// Only send the session cookie over HTTPS
    #[arg(long, env = "COOKIE_SECURE")]
    cookie_secure: Option<bool>,

    /// Days of inactivity before a session expires
    #[arg(long, env = "SESSION_TTL_DAYS")]
    session_ttl_days: Option<u64>,

    /// Log in against the in-process mock provider
    #[cfg(feature = "mock")]
    #[arg(long, env = "AUTH_MOCK")]
    mock: bool,
}

impl Cli {
    fn overrides(&self) -> AuthOverrides {
        AuthOverrides {
            base_url: self.base_url.clone(),
            success_redirect: self.success_redirect.clone(),
            failure_redirect: self.failure_redirect.clone(),
            cookie_secure: self.cookie_secure,
            session_ttl: self
                .session_ttl_days
                .map(|days| Duration::from_secs(days * 24 * 60 * 60)),
            auth0: Auth0Overrides {
                callback_url: self.callback_url.clone(),
                ..Auth0Overrides::default()
            },
            ..AuthOverrides::default()
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing subscriber
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "decoded_auth=debug,decoded_auth_demo=debug,tower_http=debug".into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Build the application router; configuration errors stop us before binding
    let app = build_app(&cli)?;

    // Auto-reload support via listenfd
    let mut listenfd = ListenFd::from_env();
    let listener = match listenfd.take_tcp_listener(0)? {
        // If we are given a tcp listener on listen fd 0, use that one
        Some(listener) => {
            listener.set_nonblocking(true)?;
            TcpListener::from_std(listener)?
        }
        // Otherwise fall back to CLI-specified host:port
        None => {
            let addr = format!("{}:{}", cli.host, cli.port);
            TcpListener::bind(&addr).await?
        }
    };

    tracing::info!("listening on {}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}

fn build_app(cli: &Cli) -> Result<axum::Router> {
    #[cfg(feature = "mock")]
    if cli.mock {
        tracing::warn!("Using the mock identity provider");
        let options = decoded_auth::AuthOptions::resolve(Some(cli.overrides()));
        return Ok(app::create_mock_app(options));
    }

    Ok(app::create_app(Some(cli.overrides()))?)
}

/// Wait for shutdown signals (Ctrl+C or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C, shutting down...");
        }
        _ = terminate => {
            tracing::info!("Received SIGTERM, shutting down...");
        }
    }
}
