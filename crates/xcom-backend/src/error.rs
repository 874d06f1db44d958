//! Error agregado del backend: todo se propaga sincrónico al call site del
//! orquestador, sin recovery silencioso.

use thiserror::Error;

use xcom_core::{ConstructDecodeError, TokenError};
use xcom_storage::StorageError;

#[derive(Debug, Error)]
pub enum BackendError {
    #[error("storage: {0}")]
    Storage(#[from] StorageError),
    #[error("token: {0}")]
    Token(#[from] TokenError),
    #[error("construct: {0}")]
    Construct(#[from] ConstructDecodeError),
    #[error("pickling-based XCom serialization must remain disabled for native mode")]
    PicklingEnabled,
    #[error("type tag '{0}' is not allow-listed for native deserialization")]
    TagNotAllowed(String),
}
