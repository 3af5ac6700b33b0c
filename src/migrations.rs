//! Embedded schema migrations and the operations that apply them.
//!
//! Every script under `migrations/` is guarded by existence checks, so it can
//! be executed again against a database that already has its objects.

use diesel::migration::MigrationSource;
use diesel::pg::Pg;
use diesel::prelude::*;
use diesel_migrations::{EmbeddedMigrations, MigrationHarness, embed_migrations};
use thiserror::Error;

pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

/// Boxed error produced by the diesel migration harness.
pub type HarnessError = Box<dyn std::error::Error + Send + Sync>;

/// Failures while applying the schema.
#[derive(Debug, Error)]
pub enum MigrationError {
    #[error("failed to connect to the database: {0}")]
    Connection(#[from] ConnectionError),
    #[error("database error: {0}")]
    Database(#[from] diesel::result::Error),
    #[error("migration failed: {0}")]
    Harness(HarnessError),
}

/// Open a dedicated connection for running migrations.
pub fn connect(database_url: &str) -> Result<PgConnection, MigrationError> {
    Ok(PgConnection::establish(database_url)?)
}

/// Apply every migration missing from the ledger, in version order.
///
/// Each migration runs in its own transaction. The first failure stops the
/// run; later migrations are not attempted.
pub fn run_pending_migrations(conn: &mut PgConnection) -> Result<Vec<String>, MigrationError> {
    let applied = conn
        .run_pending_migrations(MIGRATIONS)
        .map_err(MigrationError::Harness)?;

    let applied: Vec<String> = applied.iter().map(ToString::to_string).collect();
    for version in &applied {
        log::info!("Applied migration {version}");
    }
    if applied.is_empty() {
        log::info!("Schema is up to date");
    }

    Ok(applied)
}

/// Names of the embedded migrations that the ledger has not recorded yet.
pub fn pending_migrations(conn: &mut PgConnection) -> Result<Vec<String>, MigrationError> {
    let pending = conn
        .pending_migrations(MIGRATIONS)
        .map_err(MigrationError::Harness)?;

    Ok(pending
        .iter()
        .map(|migration| migration.name().to_string())
        .collect())
}

/// Execute every embedded `up.sql` again, ignoring the ledger.
///
/// All scripts run inside one transaction: either the whole set applies or
/// nothing changes. Returns the number of scripts executed.
pub fn reapply_all(conn: &mut PgConnection) -> Result<usize, MigrationError> {
    let migrations =
        MigrationSource::<Pg>::migrations(&MIGRATIONS).map_err(MigrationError::Harness)?;

    conn.transaction::<usize, MigrationError, _>(|conn| {
        for migration in &migrations {
            log::info!("Re-applying migration {}", migration.name());
            migration.run(conn).map_err(MigrationError::Harness)?;
        }
        Ok(migrations.len())
    })
}

/// Names of all embedded migrations in the order they apply.
pub fn embedded_migration_names() -> Result<Vec<String>, MigrationError> {
    let migrations =
        MigrationSource::<Pg>::migrations(&MIGRATIONS).map_err(MigrationError::Harness)?;
    Ok(migrations
        .iter()
        .map(|migration| migration.name().to_string())
        .collect())
}
