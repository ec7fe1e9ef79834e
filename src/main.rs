//! Users Backend
//!
//! REST API for user management. Reads configuration from a TOML file
//! (`USERS_BACKEND_CONFIG`, else ~/.config/users-backend/config.toml).

use std::sync::Arc;

use sea_orm_migration::MigratorTrait;
use tracing::{error, info, warn};

use users_backend::application::UserService;
use users_backend::infrastructure::database::migrator::Migrator;
use users_backend::infrastructure::BcryptPasswordHasher;
use users_backend::shared::{AppError, InfraError};
use users_backend::{
    config_path, create_api_router, init_database, AppConfig, AppState, DatabaseConfig,
    SeaOrmTransactionManager,
};

#[tokio::main]
async fn main() -> Result<(), AppError> {
    // ── Load configuration ─────────────────────────────────────
    let config_path = config_path();
    let app_cfg = match AppConfig::load(&config_path) {
        Ok(cfg) => {
            tracing_subscriber::fmt()
                .with_env_filter(
                    tracing_subscriber::EnvFilter::try_from_default_env()
                        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&cfg.logging.level)),
                )
                .init();
            info!("Configuration loaded from {}", config_path.display());
            cfg
        }
        Err(e) => {
            tracing_subscriber::fmt()
                .with_env_filter(
                    tracing_subscriber::EnvFilter::try_from_default_env()
                        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
                )
                .init();
            error!("Failed to load config {}: {}. Using defaults.", config_path.display(), e);
            AppConfig::default()
        }
    };

    info!("Starting Users Backend...");

    // ── Database ───────────────────────────────────────────────
    let db_config = DatabaseConfig::from(&app_cfg.database);
    info!("Database: {}", db_config.url);

    let db = match init_database(&db_config).await {
        Ok(db) => db,
        Err(e) => {
            error!("Failed to connect to database: {}", e);
            return Err(e.into());
        }
    };

    info!("Running database migrations...");
    if let Err(e) = Migrator::up(&db, None).await {
        error!("Failed to run migrations: {}", e);
        return Err(InfraError::from(e).into());
    }
    info!("Migrations completed");

    // ── Services ───────────────────────────────────────────────
    let transactions = Arc::new(SeaOrmTransactionManager::new(db.clone()));
    let hasher = Arc::new(BcryptPasswordHasher::new(app_cfg.security.bcrypt_cost));
    let user_service = Arc::new(UserService::new(transactions, hasher));
    info!(cost = app_cfg.security.bcrypt_cost, "Password hasher configured");

    let api_router = create_api_router(AppState::new(user_service, db.clone()));

    // ── REST API ───────────────────────────────────────────────
    let api_addr = app_cfg.server.address();
    let listener = tokio::net::TcpListener::bind(&api_addr)
        .await
        .map_err(InfraError::from)?;
    info!("REST API server listening on http://{}", api_addr);
    info!("OpenAPI document at http://{}/api-docs/openapi.json", api_addr);

    let served = axum::serve(listener, api_router)
        .with_graceful_shutdown(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                error!("Failed to listen for Ctrl+C: {}", e);
            }
            info!("REST API server received shutdown signal");
        })
        .await;

    match served {
        Ok(()) => info!("REST API server stopped"),
        Err(e) => error!("REST API server error: {}", e),
    }

    if let Err(e) = db.close().await {
        warn!("Error closing database connection: {}", e);
    } else {
        info!("Database connection closed");
    }

    info!("Users Backend shutdown complete");
    Ok(())
}
