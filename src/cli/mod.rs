//! CLI module for the directory admin API
//!
//! - `serve`: run the HTTP API
//! - `migrate`: apply (or revert) schema migrations

pub mod migrate;
pub mod serve;

use clap::{Parser, Subcommand};

/// Directory admin API - users and administrators backed by PostgreSQL
#[derive(Parser)]
#[command(name = "directory-admin-api")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Run the HTTP API server
    Serve,

    /// Apply pending migrations
    Migrate(migrate::MigrateArgs),
}
