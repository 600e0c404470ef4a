//! Migrate command - applies or reverts schema migrations

use clap::Args;
use tracing::info;

use crate::config::AppConfig;
use crate::infrastructure::logging;
use crate::infrastructure::storage::{revert_latest_migration, run_directory_migrations};

#[derive(Debug, Args)]
pub struct MigrateArgs {
    /// Revert the most recently applied migration instead of applying
    #[arg(long)]
    pub revert: bool,
}

pub async fn run(args: MigrateArgs) -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let config = AppConfig::load()?;
    logging::init_logging(&config.logging);

    let pool = crate::connect_database(&config).await?;

    if args.revert {
        match revert_latest_migration(&pool).await? {
            Some(version) => info!(version, "Reverted migration"),
            None => info!("No migration to revert"),
        }
    } else {
        let applied = run_directory_migrations(&pool).await?;
        info!(applied, "Migrations applied");
    }

    pool.close().await;
    Ok(())
}
