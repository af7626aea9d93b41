use anyhow::Result;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

mod config;
mod error;
mod password;
mod repositories;
mod routes;

use common::{
    cache::{RedisConfig, RedisPool},
    database::{self, DatabaseConfig},
    session::SessionStore,
    token::{TokenConfig, TokenSigner},
};

use crate::{config::AuthSettings, repositories::AdminRepository};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub admin_repository: AdminRepository,
    pub session_store: SessionStore,
    pub token_signer: TokenSigner,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;

    info!("Starting authentication service");

    let settings = AuthSettings::from_env()?;

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

    let redis_pool = RedisPool::new(&RedisConfig::from_env())?;
    let session_store = SessionStore::new(redis_pool);
    if !session_store.health_check().await.unwrap_or(false) {
        warn!("Redis is not reachable yet; logins will fail until it is");
    }

    let token_signer = TokenSigner::new(&TokenConfig::from_env()?)?;

    let admin_repository = AdminRepository::new(pool);
    if let Some(password) = settings.bootstrap_password.as_deref() {
        let hash = password::hash_password(password)
            .map_err(|e| anyhow::anyhow!("Failed to hash bootstrap password: {}", e))?;
        if admin_repository.ensure_bootstrap(&hash).await?.is_none() {
            info!("Admin accounts already exist; bootstrap password ignored");
        }
    }

    info!("Authentication service initialized successfully");

    let app_state = AppState {
        admin_repository,
        session_store,
        token_signer,
    };

    // Start the web server
    let app = routes::create_router(app_state);

    let listener = tokio::net::TcpListener::bind(&settings.bind_addr).await?;
    info!("Authentication service listening on {}", settings.bind_addr);

    axum::serve(listener, app).await?;

    Ok(())
}
