//! xcom-storage
//!
//! Resolución y acceso físico al storage de payloads ricos:
//! - `config`: superficie de configuración (env/.env) del backend.
//! - `resolver`: reglas de resolución del `StorageTarget` + cache process-wide.
//! - `object`: backends de object storage (`file://`, `mem://`) detrás del
//!   trait `ObjectStore`.
//! - `metadata`: fallback de desarrollo en la base de metadatos del
//!   orquestador (`MetadataStore`), con implementación Postgres (Diesel) y
//!   paridad in-memory para tests.
//! - `migrations`: runner embebido de migraciones Diesel.

pub mod config;
pub mod error;
pub mod metadata;
pub mod migrations;
pub mod object;
pub mod pg;
pub mod resolver;
pub mod schema;

pub use config::{init_dotenv, BackendConfig, DbConfig};
pub use error::StorageError;
pub use metadata::{InMemoryMetadataStore, MetadataStore};
pub use object::{open_object_store, FsObjectStore, InMemoryObjectStore, ObjectStore};
pub use pg::{build_dev_pool_from_env, ConnectionProvider, PgMetadataStore, PgPool, PoolProvider};
pub use resolver::{invalidate_resolved_target, resolve, resolved_target, StorageTarget};
