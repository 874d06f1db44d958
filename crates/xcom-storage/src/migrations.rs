//! Wrapper para correr migraciones embebidas.
//!
//! Se espera un directorio `migrations/` en este crate con las migraciones
//! Diesel. Al construir el pool se ejecutan una vez.

use diesel::pg::PgConnection;
use diesel_migrations::{embed_migrations, EmbeddedMigrations, MigrationHarness};

use crate::error::StorageError;

pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!();

pub fn run_pending_migrations(conn: &mut PgConnection) -> Result<(), StorageError> {
    conn.run_pending_migrations(MIGRATIONS)
        .map(|_| ())
        .map_err(|e| StorageError::Unknown(format!("migration error: {e}")))
}
