// Embedded migration runner.
// diesel_migrations requires a sync connection, so this runs on a blocking
// task with its own short-lived connection.

use diesel::{Connection, PgConnection};
use diesel_migrations::MigrationHarness;
use std::error::Error;
use tracing::{debug, info};

use super::MIGRATIONS;

/// Run all pending migrations; returns the number applied.
pub async fn run_migrations(database_url: &str) -> Result<usize, Box<dyn Error + Send + Sync>> {
    let database_url = database_url.to_string();

    let applied = tokio::task::spawn_blocking(
        move || -> Result<usize, Box<dyn Error + Send + Sync>> {
            let mut conn = PgConnection::establish(&database_url)
                .map_err(|e| format!("failed to establish migration connection: {}", e))?;

            let pending = conn
                .pending_migrations(MIGRATIONS)
                .map_err(|e| format!("failed to check pending migrations: {}", e))?;

            if pending.is_empty() {
                debug!("No pending migrations");
                return Ok(0);
            }

            info!("Applying {} pending migrations", pending.len());

            let applied = conn
                .run_pending_migrations(MIGRATIONS)
                .map_err(|e| format!("failed to run migrations: {}", e))?;

            for migration in &applied {
                debug!("Applied migration: {}", migration);
            }

            Ok(applied.len())
        },
    )
    .await
    .map_err(|e| format!("migration task panicked: {}", e))??;

    Ok(applied)
}
