use anyhow::Result;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

mod background;
mod config;
mod error;
mod managers;
mod middleware;
mod models;
mod repositories;
mod routes;
mod state;

use common::{
    cache::{RedisConfig, RedisPool},
    database::{self, DatabaseConfig},
    session::SessionStore,
    token::{TokenConfig, TokenSigner},
};

use crate::{
    config::ApiSettings, managers::ManagerRegistry, repositories::PgVideoStore, state::AppState,
};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;

    info!("Starting API service");

    let settings = ApiSettings::from_env()?;

    // Initialize database connection pool
    let db_config = DatabaseConfig::from_env()?;
    let pool = database::init_pool(&db_config).await?;
    database::migrate(&pool).await?;

    // Check database connectivity
    if database::health_check(&pool).await? {
        info!("Database connection successful");
    } else {
        anyhow::bail!("Failed to connect to database");
    }

    let session_store = SessionStore::new(RedisPool::new(&RedisConfig::from_env())?);
    if !session_store.health_check().await.unwrap_or(false) {
        warn!("Redis is not reachable yet; admin requests will fail until it is");
    }

    let token_signer = TokenSigner::new(&TokenConfig::from_env()?)?;

    let video_store = PgVideoStore::new(pool);
    let managers = ManagerRegistry::new(video_store.clone(), settings.manager_config());
    let _sweeper =
        background::start_session_sweep(managers.clone(), settings.sweep_interval()).await?;

    info!("API service initialized successfully");

    let app_state = AppState {
        video_store,
        managers,
        session_store,
        token_signer,
        showcase_layout: settings.showcase_layout(),
    };

    // Start the web server
    let app = routes::create_router(app_state);

    let listener = tokio::net::TcpListener::bind(&settings.bind_addr).await?;
    info!("API service listening on {}", settings.bind_addr);

    axum::serve(listener, app).await?;

    Ok(())
}
