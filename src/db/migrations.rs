//! Embedded migration utilities.

use diesel::result::{Error as DieselError, QueryResult};
use diesel_migrations::MigrationHarness;
use tracing::info;

use super::connection::{DbConnection, MIGRATIONS};

/// Run any pending embedded migrations on the given connection.
///
/// # Errors
/// Returns a query error when the migration harness fails.
#[must_use = "handle the result"]
pub async fn run_migrations(conn: &mut DbConnection) -> QueryResult<()> {
    conn.spawn_blocking(|c| {
        c.run_pending_migrations(MIGRATIONS)
            .map(|applied| {
                if !applied.is_empty() {
                    info!(count = applied.len(), "applied database migrations");
                }
            })
            .map_err(|e| {
                DieselError::QueryBuilderError(Box::new(std::io::Error::other(e.to_string())))
            })
    })
    .await?;
    Ok(())
}
