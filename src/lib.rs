//! Directory Admin API
//!
//! Administrative backend over two entities stored in PostgreSQL:
//! - end-users, with search/sort/paginate listing, soft-delete and daily
//!   registration statistics
//! - administrators, with unique emails and Argon2-hashed passwords

pub mod api;
pub mod cli;
pub mod config;
pub mod domain;
pub mod infrastructure;

pub use config::{AppConfig, StorageBackend};

use std::sync::Arc;

use anyhow::Context;
use sqlx::PgPool;
use tracing::{info, warn};

use api::state::AppState;
use infrastructure::{
    admin::{AdminService, Argon2Hasher, InMemoryAdminRepository, PostgresAdminRepository},
    storage::{connect_pool, run_directory_migrations, PostgresConfig},
    user::{InMemoryUserRepository, PostgresUserRepository, UserService},
};

/// Open the connection pool described by the configuration
pub async fn connect_database(config: &AppConfig) -> anyhow::Result<PgPool> {
    let url = config
        .database
        .resolve_url()
        .context("database.url or DATABASE_URL must be set")?;

    let pg_config = PostgresConfig::new(url)
        .with_max_connections(config.database.max_connections)
        .with_acquire_timeout(config.database.acquire_timeout_secs);

    Ok(connect_pool(&pg_config).await?)
}

fn create_hasher(config: &AppConfig) -> anyhow::Result<Arc<Argon2Hasher>> {
    let security = &config.security;
    let hasher =
        Argon2Hasher::with_params(security.memory_kib, security.iterations, security.parallelism)?;
    Ok(Arc::new(hasher))
}

/// Create the application state on the configured storage backend. For
/// PostgreSQL this connects the pool and applies pending migrations when
/// `database.run_migrations` is set.
pub async fn create_app_state_with_config(config: &AppConfig) -> anyhow::Result<AppState> {
    info!(backend = ?config.storage.backend, "Storage backend");

    match config.storage.backend {
        StorageBackend::Postgres => {
            let pool = connect_database(config).await?;

            if config.database.run_migrations {
                let applied = run_directory_migrations(&pool).await?;
                info!(applied, "Migrations up to date");
            }

            create_app_state(pool, config)
        }
        StorageBackend::Memory => {
            warn!("In-memory storage selected; data does not survive a restart");
            create_in_memory_app_state(config)
        }
    }
}

/// Create the application state on PostgreSQL repositories
pub fn create_app_state(pool: PgPool, config: &AppConfig) -> anyhow::Result<AppState> {
    info!("Using PostgreSQL repositories");

    let user_service = UserService::new(Arc::new(PostgresUserRepository::new(pool.clone())));
    let admin_service = AdminService::new(
        Arc::new(PostgresAdminRepository::new(pool.clone())),
        create_hasher(config)?,
    )
    .with_email_check_excludes_self(config.directory.admin_email_check_excludes_self);

    Ok(AppState::new(Arc::new(user_service), Arc::new(admin_service)).with_pool(pool))
}

/// Create the application state on in-memory repositories
pub fn create_in_memory_app_state(config: &AppConfig) -> anyhow::Result<AppState> {
    info!("Using in-memory repositories");

    let user_service = UserService::new(Arc::new(InMemoryUserRepository::new()));
    let admin_service = AdminService::new(
        Arc::new(InMemoryAdminRepository::new()),
        create_hasher(config)?,
    )
    .with_email_check_excludes_self(config.directory.admin_email_check_excludes_self);

    Ok(AppState::new(Arc::new(user_service), Arc::new(admin_service)))
}
