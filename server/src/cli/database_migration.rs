//! This module uses the embedded Diesel migration data to provide functions for checking the
//! database migration status and migrating the database schema to the current state.
//!
//! The functions provided functions are meant to be used directly from the command line interface
//! implementation.
use crate::cli_error::CliError;
use crate::setup::DatabaseConfig;
use diesel::migration::Migration;
use diesel::Connection;
use diesel_migrations::{embed_migrations, EmbeddedMigrations, MigrationHarness};
use log::info;

const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations/postgresql");

/// Migrate the database schema to the latest known migration for the current application version.
///
/// Information about the migration process is printed to stdout.
pub fn run_migrations(config: &DatabaseConfig) -> Result<(), CliError> {
    let mut connection = diesel::pg::PgConnection::establish(&config.database_url)?;
    let mut connection =
        diesel_migrations::HarnessWithOutput::new(&mut connection, std::io::stdout());
    let applied = connection
        .run_pending_migrations(MIGRATIONS)
        .map_err(|e| CliError::DatabaseMigrationError(e.to_string()))?;
    info!("Applied {} database migrations", applied.len());

    Ok(())
}

/// Check if the database schema has been migrated to the latest known migration for the current
/// application version. If not, return [CliError::DatabaseMigrationRequired], listing the missing
/// migrations.
pub fn check_migration_state(config: &DatabaseConfig) -> Result<(), CliError> {
    let mut connection = diesel::pg::PgConnection::establish(&config.database_url)?;
    let pending_migrations = connection
        .pending_migrations(MIGRATIONS)
        .map_err(|e| CliError::DatabaseMigrationError(e.to_string()))?;
    if !pending_migrations.is_empty() {
        return Err(CliError::DatabaseMigrationRequired {
            missing_migrations: pending_migrations
                .iter()
                .map(|m| m.name().to_string())
                .collect(),
        });
    }
    Ok(())
}
