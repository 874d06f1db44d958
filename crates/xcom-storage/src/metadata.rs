//! Fallback local: payloads ricos como filas en la base de metadatos.
//!
//! El trait mantiene paridad 1:1 entre la implementación Postgres (`pg`) y
//! la in-memory de tests. Las filas se deduplican por clave de contenido
//! (hash canónico del payload): re-escribir el mismo payload es idempotente.

use std::collections::HashMap;
use std::sync::RwLock;

use serde_json::Value;

use crate::error::StorageError;

pub trait MetadataStore: Send + Sync {
    /// Inserta el payload bajo su clave de contenido. Idempotente: una clave
    /// ya existente no se reescribe (mismo hash ⇒ mismo contenido).
    fn insert_payload(&self, payload_key: &str, type_tag: &str, payload: &Value) -> Result<(), StorageError>;

    /// Recupera el payload de una clave. `NotFound` si no existe.
    fn fetch_payload(&self, payload_key: &str) -> Result<Value, StorageError>;
}

#[derive(Default)]
pub struct InMemoryMetadataStore {
    rows: RwLock<HashMap<String, (String, Value)>>,
}

impl InMemoryMetadataStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.rows.read().expect("lock poisoned").len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl MetadataStore for InMemoryMetadataStore {
    fn insert_payload(&self, payload_key: &str, type_tag: &str, payload: &Value) -> Result<(), StorageError> {
        self.rows
            .write()
            .expect("lock poisoned")
            .entry(payload_key.to_string())
            .or_insert_with(|| (type_tag.to_string(), payload.clone()));
        Ok(())
    }

    fn fetch_payload(&self, payload_key: &str) -> Result<Value, StorageError> {
        self.rows
            .read()
            .expect("lock poisoned")
            .get(payload_key)
            .map(|(_, payload)| payload.clone())
            .ok_or_else(|| StorageError::NotFound(payload_key.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn insert_is_idempotent_by_content_key() {
        let store = InMemoryMetadataStore::new();
        store.insert_payload("k1", "Table", &json!({"a": 1})).unwrap();
        store.insert_payload("k1", "Table", &json!({"a": 1})).unwrap();
        assert_eq!(store.len(), 1);
        assert_eq!(store.fetch_payload("k1").unwrap(), json!({"a": 1}));
    }

    #[test]
    fn missing_key_is_not_found() {
        let store = InMemoryMetadataStore::new();
        assert!(matches!(store.fetch_payload("nope"), Err(StorageError::NotFound(_))));
    }
}
