//! Implementación Postgres (Diesel) del `MetadataStore`.
//!
//! Objetivo del módulo:
//! - Proveer el fallback de desarrollo con paridad 1:1 respecto al backend
//!   in-memory de `metadata`.
//! - Aislar el mapeo payload ↔ filas de DB del resto del backend.
//!
//! Notas:
//! - Inserción idempotente por clave de contenido (`ON CONFLICT DO NOTHING`,
//!   PK = hash canónico del payload).
//! - Sin política de retries propia: los errores de IO se propagan tal cual;
//!   si corresponde reintentar, lo decide el mecanismo de retry de tasks del
//!   orquestador.

use chrono::{DateTime, Utc};
use diesel::prelude::*;
use diesel::r2d2::{self, ConnectionManager};
use log::debug;
use serde_json::Value;

use crate::config::DbConfig;
use crate::error::StorageError;
use crate::metadata::MetadataStore;
use crate::migrations::run_pending_migrations;
use crate::schema::xcom_rich_payloads;

/// Alias de tipo para el pool r2d2 de conexiones Postgres.
///
/// Al construirlo se corre automáticamente el set de migraciones pendientes
/// (una sola vez, en el primer checkout).
pub type PgPool = r2d2::Pool<ConnectionManager<PgConnection>>;

/// Proveedor abstracto de conexiones.
///
/// Permite inyectar un pool real (producción/tests de integración) o
/// simular en tests unitarios sin acoplar a r2d2.
pub trait ConnectionProvider: Send + Sync + 'static {
    /// Obtiene una conexión lista para ejecutar consultas Diesel.
    fn connection(&self) -> Result<r2d2::PooledConnection<ConnectionManager<PgConnection>>, StorageError>;
}

/// Implementación concreta de `ConnectionProvider` respaldada por un `PgPool`.
pub struct PoolProvider {
    pub pool: PgPool,
}

impl ConnectionProvider for PoolProvider {
    fn connection(&self) -> Result<r2d2::PooledConnection<ConnectionManager<PgConnection>>, StorageError> {
        self.pool
            .get()
            .map_err(|e| StorageError::TransientIo(format!("pool error: {e}")))
    }
}

/// Fila para insertar en `xcom_rich_payloads`.
///
/// - `payload_key` funge como PK para deduplicación (hash canónico, length=64
///   verificado por CHECK).
/// - `created_at` lo asigna la base (DEFAULT now()).
#[derive(Insertable, Debug)]
#[diesel(table_name = xcom_rich_payloads)]
pub struct NewPayloadRow<'a> {
    pub payload_key: &'a str,
    pub type_tag: &'a str,
    pub payload: &'a Value,
}

/// Fila mapeada de `xcom_rich_payloads` para lecturas.
#[derive(Queryable, Debug)]
pub struct PayloadRow {
    pub payload_key: String,
    pub type_tag: String,
    pub payload: Value,
    pub created_at: DateTime<Utc>,
}

/// `MetadataStore` sobre Postgres.
pub struct PgMetadataStore<P: ConnectionProvider> {
    pub provider: P,
}

impl<P: ConnectionProvider> PgMetadataStore<P> {
    pub fn new(provider: P) -> Self {
        Self { provider }
    }
}

impl PgMetadataStore<PoolProvider> {
    /// Helper de desarrollo: carga `.env`, lee `DATABASE_URL` y tamaños de
    /// pool, y construye el store ya migrado.
    pub fn from_env() -> Result<Self, StorageError> {
        let pool = build_dev_pool_from_env()?;
        Ok(Self::new(PoolProvider { pool }))
    }
}

impl<P: ConnectionProvider> MetadataStore for PgMetadataStore<P> {
    fn insert_payload(&self, payload_key: &str, type_tag: &str, payload: &Value) -> Result<(), StorageError> {
        debug!("insert_payload:start key={payload_key} type_tag={type_tag}");
        let mut conn = self.provider.connection()?;
        // Dedupe por PK (payload_key): mismo hash ⇒ mismo contenido.
        diesel::insert_into(xcom_rich_payloads::table)
            .values(NewPayloadRow { payload_key, type_tag, payload })
            .on_conflict_do_nothing()
            .execute(&mut conn)
            .map_err(StorageError::from)?;
        debug!("insert_payload:done key={payload_key}");
        Ok(())
    }

    fn fetch_payload(&self, payload_key: &str) -> Result<Value, StorageError> {
        debug!("fetch_payload:start key={payload_key}");
        let mut conn = self.provider.connection()?;
        let row: PayloadRow = xcom_rich_payloads::table.find(payload_key)
                                                       .first(&mut conn)
                                                       .map_err(|e| match e {
                                                           diesel::result::Error::NotFound => {
                                                               StorageError::NotFound(payload_key.to_string())
                                                           }
                                                           other => StorageError::from(other),
                                                       })?;
        debug!("fetch_payload:done key={payload_key} type_tag={}", row.type_tag);
        Ok(row.payload)
    }
}

/// Construye un pool Postgres r2d2 a partir de URL.
///
/// Comportamiento:
/// - Valida y ajusta tamaños (si `min_size > max_size`, usa `min_size =
///   max_size`).
/// - Ejecuta migraciones inmediatamente tras el primer `get()`.
/// - Devuelve `StorageError::TransientIo` ante errores del pool/manager.
pub fn build_pool(database_url: &str, min_size: u32, max_size: u32) -> Result<PgPool, StorageError> {
    let validated_min = if min_size == 0 { 1 } else { min_size };
    let validated_max = if max_size == 0 { 1 } else { max_size };
    let final_min = validated_min.min(validated_max);
    let manager = ConnectionManager::<PgConnection>::new(database_url);
    let pool = r2d2::Pool::builder().min_idle(Some(final_min))
                                    .max_size(validated_max)
                                    .build(manager)
                                    .map_err(|e| StorageError::TransientIo(format!("pool build: {e}")))?;
    // Migraciones una sola vez al construir (primer connection checkout).
    {
        let mut conn = pool.get()
                           .map_err(|e| StorageError::TransientIo(format!("pool get for migrations: {e}")))?;
        run_pending_migrations(&mut conn)?;
    }
    Ok(pool)
}

/// Helper de desarrollo: configuración desde el entorno + pool migrado.
pub fn build_dev_pool_from_env() -> Result<PgPool, StorageError> {
    crate::config::init_dotenv();
    let cfg = DbConfig::try_from_env()?;
    build_pool(&cfg.url, cfg.min_connections, cfg.max_connections)
}
