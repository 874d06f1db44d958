//! Capacidad de construct rico: par `into_envelope`/`from_envelope`.
//!
//! Un construct rico es un tipo del SDK que no puede viajar como JSON plano
//! sin codificación especial. En el wire se representa como un *envelope*:
//! un objeto JSON con `class` (tag de tipo), `schema_version` y los campos
//! propios del tipo al mismo nivel. El core no conoce la semántica de los
//! tipos; sólo el contrato de empaquetado/validación.

use serde::{de::DeserializeOwned, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

use crate::constants::{CLASS_KEY, REFERENCE_CLASS, SCHEMA_VERSION_KEY};

/// Errores posibles al decodificar un envelope hacia su tipo registrado.
#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum ConstructDecodeError {
    #[error("type tag mismatch: expected '{expected}', found '{found}'")]
    TagMismatch { expected: String, found: String },
    #[error("schema version mismatch: expected {expected}, found {found:?}")]
    VersionMismatch { expected: u32, found: Option<u32> },
    #[error("type tag '{0}' is not registered")]
    Unregistered(String),
    #[error("deserialize: {0}")]
    Deserialize(String),
    #[error("validation: {0}")]
    Validation(String),
}

/// Forma dinámica de un envelope ya separado en sus partes.
#[derive(Debug, Clone, PartialEq)]
pub struct ConstructEnvelope {
    pub type_tag: String,
    pub schema_version: Option<u32>,
    pub fields: Map<String, Value>,
}

impl ConstructEnvelope {
    /// Intenta interpretar un `Value` como envelope. Devuelve `None` si el
    /// shape no corresponde (no-objeto, sin `class`, o un token de
    /// referencia, que tiene su propio modelo).
    pub fn match_value(value: &Value) -> Option<ConstructEnvelope> {
        let map = value.as_object()?;
        let tag = map.get(CLASS_KEY)?.as_str()?;
        if tag == REFERENCE_CLASS {
            return None;
        }
        let schema_version = map.get(SCHEMA_VERSION_KEY).and_then(Value::as_u64).map(|v| v as u32);
        let mut fields = map.clone();
        fields.remove(CLASS_KEY);
        fields.remove(SCHEMA_VERSION_KEY);
        Some(ConstructEnvelope { type_tag: tag.to_string(),
                                 schema_version,
                                 fields })
    }

    /// Serializa de vuelta al objeto JSON plano (`class` + versión + campos).
    pub fn to_value(&self) -> Value {
        let mut map = self.fields.clone();
        map.insert(CLASS_KEY.to_string(), Value::String(self.type_tag.clone()));
        if let Some(v) = self.schema_version {
            map.insert(SCHEMA_VERSION_KEY.to_string(), Value::from(v));
        }
        Value::Object(map)
    }
}

/// Contrato que implementan los tipos ricos del SDK.
/// El registro en startup (ver `registry`) convierte este par de capacidades
/// en el allow-list efectivo de deserialización.
pub trait ConstructSpec: Sized + Serialize + DeserializeOwned + Clone {
    /// Tag estable que identifica el tipo en el wire.
    const TYPE_TAG: &'static str;
    /// Versión de esquema (incrementar en cambios incompatibles).
    const SCHEMA_VERSION: u32 = 1;

    /// Validación semántica ligera, sin efectos secundarios. Opcional.
    fn validate(&self) -> Result<(), String> {
        Ok(())
    }

    /// Empaqueta el tipo en su envelope wire.
    fn into_envelope(self) -> ConstructEnvelope {
        let value = serde_json::to_value(&self).expect("serialize construct");
        let fields = match value {
            Value::Object(map) => map,
            // Los constructs son structs con campos nombrados; cualquier otra
            // cosa es un bug del tipo, no un dato inválido.
            other => panic!("construct '{}' must serialize to an object, got {other:?}", Self::TYPE_TAG),
        };
        ConstructEnvelope { type_tag: Self::TYPE_TAG.to_string(),
                            schema_version: Some(Self::SCHEMA_VERSION),
                            fields }
    }

    /// Decodifica desde un envelope verificando tag, versión y validación.
    fn from_envelope(env: &ConstructEnvelope) -> Result<Self, ConstructDecodeError> {
        if env.type_tag != Self::TYPE_TAG {
            return Err(ConstructDecodeError::TagMismatch { expected: Self::TYPE_TAG.to_string(),
                                                           found: env.type_tag.clone() });
        }
        match env.schema_version {
            Some(v) if v == Self::SCHEMA_VERSION => {}
            found => {
                return Err(ConstructDecodeError::VersionMismatch { expected: Self::SCHEMA_VERSION, found })
            }
        }
        let decoded: Self = serde_json::from_value(Value::Object(env.fields.clone()))
            .map_err(|e| ConstructDecodeError::Deserialize(e.to_string()))?;
        decoded.validate().map_err(ConstructDecodeError::Validation)?;
        Ok(decoded)
    }

    /// Atajo: directamente a `Value` listo para el value store.
    fn into_value(self) -> Value {
        self.into_envelope().to_value()
    }

    /// Atajo inverso de `into_value`.
    fn from_value(value: &Value) -> Result<Self, ConstructDecodeError> {
        let env = ConstructEnvelope::match_value(value).ok_or_else(|| {
                      ConstructDecodeError::Deserialize("value is not a construct envelope".to_string())
                  })?;
        Self::from_envelope(&env)
    }
}
