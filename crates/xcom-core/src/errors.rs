//! Errores de formato de token (fatales, nunca best-effort).

use thiserror::Error;

use crate::model::StorageKind;

#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum TokenError {
    #[error("unsupported token format version {found} (supported {min}..={max})")]
    VersionUnsupported { found: u32, min: u32, max: u32 },
    #[error("token written under {token:?} storage but resolved target is {target:?}")]
    StorageKindMismatch { token: StorageKind, target: StorageKind },
    #[error("malformed reference token: {0}")]
    Malformed(String),
}
