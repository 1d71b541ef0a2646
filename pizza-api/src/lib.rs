use diesel::prelude::*;
use diesel::sqlite::SqliteConnection;
use diesel_migrations::{embed_migrations, EmbeddedMigrations, MigrationHarness};
use tracing::info;

pub mod error;
pub mod handlers;
pub mod models;
pub mod schema;
pub mod seed;
pub mod serializer;

#[cfg(test)]
mod test_support;

pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!("./migrations");

/// Opens a SQLite connection with foreign key enforcement turned on.
///
/// SQLite keeps `foreign_keys` off unless every connection asks for it, and
/// the `ON DELETE CASCADE` rules of `restaurant_pizzas` depend on it.
pub fn establish_connection(database_url: &str) -> ConnectionResult<SqliteConnection> {
    let mut conn = SqliteConnection::establish(database_url)?;
    diesel::sql_query("PRAGMA foreign_keys = ON")
        .execute(&mut conn)
        .map_err(ConnectionError::CouldntSetupConfiguration)?;
    diesel::sql_query("PRAGMA busy_timeout = 5000")
        .execute(&mut conn)
        .map_err(ConnectionError::CouldntSetupConfiguration)?;
    Ok(conn)
}

pub fn run_migrations(
    conn: &mut SqliteConnection,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let applied = conn.run_pending_migrations(MIGRATIONS)?;
    for version in applied {
        info!(%version, "applied migration");
    }
    Ok(())
}
