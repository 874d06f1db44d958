//! Errores de storage.
//! Mapea errores de Diesel / conexión a variantes semánticas, igual que los
//! errores de IO de object storage. Las variantes de configuración son
//! fatales en resolución y nunca se reintentan.

use diesel::result::{DatabaseErrorKind, Error as DieselError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("no storage target resolvable for rich constructs: set XCOM_STORAGE_URL or XCOM_STORE_DATA_LOCAL_DEV")]
    NoTarget,
    #[error("XCOM_STORAGE_URL is set but XCOM_STORAGE_CONN_ID is missing")]
    MissingConnId,
    #[error("missing configuration: {0}")]
    MissingConfig(String),
    #[error("unsupported storage scheme in '{0}'")]
    UnsupportedScheme(String),
    #[error("payload not found at {0}")]
    NotFound(String),
    #[error("corrupt payload at {location}: {reason}")]
    Corrupt { location: String, reason: String },
    #[error("hash mismatch for {location}: expected {expected}, computed {computed}")]
    HashMismatch {
        location: String,
        expected: String,
        computed: String,
    },
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("unique violation: {0}")]
    UniqueViolation(String),
    #[error("serialization conflict (retryable)")]
    SerializationConflict,
    #[error("transient IO / connection pool error: {0}")]
    TransientIo(String),
    #[error("unknown database error: {0}")]
    Unknown(String),
}

impl StorageError {
    /// Errores de configuración (taxonomía aparte de los de IO): se levantan
    /// antes de intentar cualquier operación contra el storage.
    pub fn is_configuration(&self) -> bool {
        matches!(self,
                 StorageError::NoTarget
                 | StorageError::MissingConnId
                 | StorageError::MissingConfig(_)
                 | StorageError::UnsupportedScheme(_))
    }
}

impl From<DieselError> for StorageError {
    fn from(err: DieselError) -> Self {
        match err {
            DieselError::NotFound => Self::NotFound("metadata row".to_string()),
            DieselError::DatabaseError(kind, info) => match kind {
                DatabaseErrorKind::UniqueViolation => Self::UniqueViolation(info.message().to_string()),
                DatabaseErrorKind::SerializationFailure => Self::SerializationConflict,
                other => Self::Unknown(format!("db error kind {:?}: {}", other, info.message())),
            },
            DieselError::DeserializationError(e) => Self::Unknown(format!("deser: {e}")),
            DieselError::SerializationError(e) => Self::Unknown(format!("ser: {e}")),
            DieselError::BrokenTransactionManager => Self::TransientIo("broken transaction manager".into()),
            DieselError::QueryBuilderError(e) => Self::Unknown(format!("query builder: {e}")),
            other => Self::Unknown(format!("unhandled diesel error: {other:?}")),
        }
    }
}
