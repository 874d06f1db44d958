//! Payload Codec: construct rico ↔ token de referencia.
//!
//! Escritura: el value completo (envelope top-level o estructura compuesta)
//! se canonicaliza, se direcciona por hash de contenido y se escribe vía el
//! target resuelto; el token devuelto lleva lo necesario para recuperar
//! exactamente ese payload desde cualquier proceso posterior.
//!
//! Lectura: valida versión de formato y kind de storage contra el target
//! actual (mismatch ⇒ error de token, nunca reconstrucción best-effort),
//! trae el payload, verifica integridad por hash y revalida cada envelope
//! contra el registro antes de devolver el value vivo.

use std::sync::Arc;

use log::debug;
use serde_json::Value;

use xcom_core::constants::TOKEN_FORMAT_VERSION;
use xcom_core::hashing::{hash_value, to_canonical_json};
use xcom_core::{primary_type_tag, validate_rich_value, ReferenceToken, StorageKind};
use xcom_storage::{open_object_store, MetadataStore, ObjectStore, PgMetadataStore, StorageError, StorageTarget};

use crate::error::BackendError;

enum PayloadStore {
    External(Arc<dyn ObjectStore>),
    Local(Arc<dyn MetadataStore>),
}

pub struct PayloadCodec {
    store: PayloadStore,
}

impl PayloadCodec {
    /// Abre el codec para el target resuelto. Para `LocalMetadata` la base de
    /// metadatos se toma del entorno (`DATABASE_URL`).
    pub fn open(target: &StorageTarget) -> Result<Self, StorageError> {
        match target {
            StorageTarget::External { url, conn_id } => {
                let store: Arc<dyn ObjectStore> = Arc::from(open_object_store(url, conn_id)?);
                Ok(Self { store: PayloadStore::External(store) })
            }
            StorageTarget::LocalMetadata => {
                let store: Arc<dyn MetadataStore> = Arc::new(PgMetadataStore::from_env()?);
                Ok(Self { store: PayloadStore::Local(store) })
            }
        }
    }

    /// Inyección directa de un object store (tests / embedding).
    pub fn with_object_store(store: Arc<dyn ObjectStore>) -> Self {
        Self { store: PayloadStore::External(store) }
    }

    /// Inyección directa de un metadata store (tests / embedding).
    pub fn with_metadata_store(store: Arc<dyn MetadataStore>) -> Self {
        Self { store: PayloadStore::Local(store) }
    }

    pub fn storage_kind(&self) -> StorageKind {
        match &self.store {
            PayloadStore::External(_) => StorageKind::External,
            PayloadStore::Local(_) => StorageKind::LocalMetadata,
        }
    }

    /// Serializa un value rico: escribe el payload y acuña su token.
    pub fn serialize_rich(&self, value: &Value) -> Result<ReferenceToken, BackendError> {
        let type_tag = primary_type_tag(value);
        let payload_key = hash_value(value);
        let location = match &self.store {
            PayloadStore::External(store) => {
                let bytes = to_canonical_json(value);
                store.put(&format!("{payload_key}.json"), bytes.as_bytes())?
            }
            PayloadStore::Local(store) => {
                store.insert_payload(&payload_key, type_tag, value)?;
                payload_key.clone()
            }
        };
        debug!("serialized rich value type_tag={type_tag} location={location}");
        Ok(ReferenceToken { storage: self.storage_kind(),
                            location,
                            type_tag: type_tag.to_string(),
                            format_version: TOKEN_FORMAT_VERSION })
    }

    /// Reconstruye el value original desde su token.
    pub fn deserialize_rich(&self, token: &ReferenceToken) -> Result<Value, BackendError> {
        token.check_version().map_err(|e| {
                                 log::error!("reference token rejected: {e}");
                                 e
                             })?;
        token.check_storage(self.storage_kind()).map_err(|e| {
                                                    log::error!("reference token rejected: {e}");
                                                    e
                                                })?;
        let (payload, expected_key) = match &self.store {
            PayloadStore::External(store) => {
                let bytes = store.get(&token.location)?;
                let payload: Value =
                    serde_json::from_slice(&bytes).map_err(|e| StorageError::Corrupt { location: token.location.clone(),
                                                                                       reason: e.to_string() })?;
                (payload, payload_key_from_location(&token.location))
            }
            PayloadStore::Local(store) => {
                let payload = store.fetch_payload(&token.location)?;
                (payload, Some(token.location.clone()))
            }
        };
        if let Some(expected) = expected_key {
            let computed = hash_value(&payload);
            if computed != expected {
                return Err(StorageError::HashMismatch { location: token.location.clone(),
                                                        expected,
                                                        computed }.into());
            }
        }
        validate_rich_value(&payload, &token.type_tag)?;
        debug!("deserialized rich value type_tag={} location={}", token.type_tag, token.location);
        Ok(payload)
    }
}

/// Clave de contenido embebida en la ubicación (`.../<hash>.json`). Los
/// tokens acuñados acá siempre la llevan; si falta, se omite el check de
/// integridad (la revalidación de envelopes sigue aplicando).
fn payload_key_from_location(location: &str) -> Option<String> {
    location.rsplit('/')
            .next()
            .and_then(|name| name.strip_suffix(".json"))
            .filter(|key| key.len() == 64)
            .map(str::to_string)
}
