//! StockBox server: reads configuration from the environment, connects to PostgreSQL and serves the API.

use std::sync::Arc;
use stockbox::{app, AppConfig, AppState, CredentialOnly, CredentialPolicy, PgProcedures, Security};
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("stockbox=info,tower_http=info")),
        )
        .init();

    let config = AppConfig::from_env()?;
    let policy = config.credential_policy();
    if let CredentialPolicy::DevelopmentFallback(c) = policy {
        tracing::warn!(
            id_account = c.id_account,
            id_user = c.id_user,
            "development credentials enabled: requests without identity headers are accepted"
        );
    }

    let pool = sqlx::postgres::PgPoolOptions::new()
        .max_connections(config.db_max_connections)
        .connect(&config.database_url)
        .await?;

    let state = AppState {
        procedures: Arc::new(PgProcedures::new(pool)),
        security: Security {
            policy,
            authorizer: Arc::new(CredentialOnly),
        },
    };

    let listener = TcpListener::bind(config.bind_addr).await?;
    tracing::info!(environment = ?config.environment, "listening on {}", listener.local_addr()?);
    axum::serve(listener, app(state, &config)).await?;
    Ok(())
}
