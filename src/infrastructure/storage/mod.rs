//! Storage infrastructure - connection pool and schema migrations

pub mod migrations;
mod postgres;

pub use migrations::{
    directory_migrations, revert_latest_migration, run_directory_migrations, Migration,
    PostgresMigrator,
};
pub(crate) use postgres::map_write_error;
pub use postgres::{connect_pool, PostgresConfig};
