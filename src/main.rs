use tracing_subscriber::EnvFilter;

use agenda_api::config::AppConfig;
use agenda_api::{app, database, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present so cargo run picks up DATABASE_URL, JWT_SECRET, etc.
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("agenda_api=debug,tower_http=debug")),
        )
        .init();

    let config = AppConfig::from_env()?;

    let pool = database::manager::connect(&config.database).await?;
    let state = AppState::new(config.clone(), pool);

    let bind_addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    tracing::info!("Agenda API listening on http://{}", bind_addr);

    axum::serve(listener, app(state)).await?;
    Ok(())
}
