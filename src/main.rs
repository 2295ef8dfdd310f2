use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use identity_insights_demo::{client::IdentityClient, config::Config, handlers::AppState};

/// Main entry point for the application.
///
/// Initializes tracing, loads configuration, selects the live or mock identity
/// client once, and starts the Axum server.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "identity_insights_demo=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = Config::from_env()?;

    // Credentials are read once; the client variant never changes afterwards
    let client = IdentityClient::from_config(&config)?;
    if client.is_live() {
        tracing::info!("Identity client running in LIVE mode");
    } else {
        tracing::info!("Identity client running in MOCK mode");
    }

    let port = config.port;
    let app_state = Arc::new(AppState { config, client });
    let app = identity_insights_demo::app(app_state)?;

    // Start server
    let addr = format!("0.0.0.0:{}", port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("App listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
