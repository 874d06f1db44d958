//! Token de referencia: el único artefacto que cruza al value store del
//! orquestador en lugar de un construct rico.
//!
//! Invariante: siempre JSON-safe y pequeño; el payload real vive en el
//! storage target resuelto. El campo `class` = `XComRef` permite detectar el
//! shape en el camino de lectura sin ambigüedad con envelopes de constructs.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::constants::{CLASS_KEY, MIN_TOKEN_FORMAT_VERSION, REFERENCE_CLASS, TOKEN_FORMAT_VERSION};
use crate::errors::TokenError;

/// Dónde vive físicamente el payload serializado.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StorageKind {
    /// Object storage externo (URL + identidad de conexión).
    External,
    /// Fallback de desarrollo: la base de metadatos del propio orquestador.
    LocalMetadata,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReferenceToken {
    pub storage: StorageKind,
    /// Descriptor de ubicación: URL del objeto (external) o clave de fila
    /// (local_metadata). En ambos casos el último segmento es el hash
    /// canónico del payload.
    pub location: String,
    /// Tag para seleccionar el codec de reconstrucción.
    pub type_tag: String,
    pub format_version: u32,
}

impl ReferenceToken {
    /// Serializa al objeto JSON que se delega al backend por defecto.
    pub fn to_value(&self) -> Value {
        let mut obj = serde_json::to_value(self).expect("serialize reference token");
        if let Value::Object(map) = &mut obj {
            map.insert(CLASS_KEY.to_string(), Value::String(REFERENCE_CLASS.to_string()));
        }
        obj
    }

    /// Detección de shape en el camino de lectura.
    ///
    /// - `None`: el value no es un token (se devuelve tal cual al caller).
    /// - `Some(Err(_))`: tiene el marcador de token pero no parsea; esto es
    ///   fatal, nunca passthrough (evita corrupción silenciosa).
    pub fn match_value(value: &Value) -> Option<Result<ReferenceToken, TokenError>> {
        let map = value.as_object()?;
        if map.get(CLASS_KEY).and_then(Value::as_str) != Some(REFERENCE_CLASS) {
            return None;
        }
        Some(serde_json::from_value(value.clone()).map_err(|e| TokenError::Malformed(e.to_string())))
    }

    /// Valida la versión contra la ventana soportada por este lector.
    pub fn check_version(&self) -> Result<(), TokenError> {
        if self.format_version < MIN_TOKEN_FORMAT_VERSION || self.format_version > TOKEN_FORMAT_VERSION {
            return Err(TokenError::VersionUnsupported { found: self.format_version,
                                                        min: MIN_TOKEN_FORMAT_VERSION,
                                                        max: TOKEN_FORMAT_VERSION });
        }
        Ok(())
    }

    /// Valida que el token fue escrito bajo el mismo kind de storage que el
    /// target resuelto actualmente (config cambiada entre write y read ⇒
    /// error explícito, no lectura cruzada).
    pub fn check_storage(&self, target: StorageKind) -> Result<(), TokenError> {
        if self.storage != target {
            return Err(TokenError::StorageKindMismatch { token: self.storage, target });
        }
        Ok(())
    }
}
