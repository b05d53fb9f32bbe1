use std::sync::{Arc, Mutex};

use tracing_subscriber::EnvFilter;

use nearsalon::config::AppConfig;
use nearsalon::db;
use nearsalon::services::gateway::MockGateway;
use nearsalon::services::token::TokenIssuer;
use nearsalon::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let config = AppConfig::from_env();

    let conn = db::init_db(&config.database_url)?;

    let tokens = TokenIssuer::new(config.jwt_secret.clone(), config.token_ttl_hours);
    let gateway = MockGateway::new(config.gateway_delay_ms);

    let state = Arc::new(AppState {
        db: Arc::new(Mutex::new(conn)),
        config: config.clone(),
        gateway: Box::new(gateway),
        tokens,
    });

    let app = nearsalon::app(state);

    let addr = format!("0.0.0.0:{}", config.port);
    tracing::info!("starting server on {addr}");

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
