//! LCARS Console gateway. Serves the JSON API on `host:port` from config.

use lcars_core::LcarsConfig;
use lcars_gateway::{build_router, AppState};
use std::net::SocketAddr;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = LcarsConfig::load()?;
    let addr = config.bind_addr();
    tracing::info!(
        target: "lcars::gateway",
        app = %config.app_name,
        version = lcars_core::version(),
        claude = config.anthropic_key().is_some(),
        tomtom = config.tomtom_key().is_some(),
        "starting"
    );

    let state = Arc::new(AppState::new(config));
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(target: "lcars::gateway", %addr, "listening");
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;
    Ok(())
}
