//! Modo nativo (orquestador 2.5+): sin backend envolvente.
//!
//! Los hooks de (de)serialización nativos del orquestador invocan este
//! adaptador; la lógica de clasificación/codec es la misma que en el modo
//! wrapping. Precondiciones de activación: pickling deshabilitado y un
//! allow-list de prefijos de tags deserializables.

use std::sync::Arc;

use serde_json::Value;

use xcom_core::{classify, ReferenceToken, ValueClass};
use xcom_storage::{resolved_target, BackendConfig};

use crate::codec::PayloadCodec;
use crate::error::BackendError;

pub struct NativeXcomSerde {
    allowed_prefixes: Vec<String>,
    codec: Option<Arc<PayloadCodec>>,
}

impl NativeXcomSerde {
    /// Activa el modo nativo. Pickling habilitado es error de configuración:
    /// este backend existe precisamente para no necesitarlo.
    pub fn activate(config: &BackendConfig) -> Result<Self, BackendError> {
        if config.enable_pickling {
            return Err(BackendError::PicklingEnabled);
        }
        log::debug!("native XCom serde active; allowed prefixes: {:?}",
                    config.allowed_deserialization_prefixes);
        Ok(Self { allowed_prefixes: config.allowed_deserialization_prefixes.clone(),
                  codec: None })
    }

    /// Fija un codec ya construido (tests/embedding).
    pub fn with_codec(mut self, codec: Arc<PayloadCodec>) -> Self {
        self.codec = Some(codec);
        self
    }

    fn codec(&self) -> Result<Arc<PayloadCodec>, BackendError> {
        match &self.codec {
            Some(codec) => Ok(codec.clone()),
            None => {
                let target = resolved_target()?;
                Ok(Arc::new(PayloadCodec::open(&target)?))
            }
        }
    }

    fn tag_allowed(&self, tag: &str) -> bool {
        self.allowed_prefixes.iter().any(|p| tag.starts_with(p.as_str()))
    }

    /// Hook de serialización: el orquestador lo invoca con el value que un
    /// step devolvió, antes de persistirlo en su propio store.
    pub fn serialize_hook(&self, value: &Value) -> Result<Value, BackendError> {
        match classify(value) {
            ValueClass::Plain => Ok(value.clone()),
            ValueClass::Rich => Ok(self.codec()?.serialize_rich(value)?.to_value()),
        }
    }

    /// Hook de deserialización: el orquestador lo invoca con el value que
    /// leyó de su store. Tokens con tag fuera del allow-list son error, no
    /// passthrough (el dato referenciado existe pero este deployment decidió
    /// no reconstruirlo).
    pub fn deserialize_hook(&self, stored: &Value) -> Result<Value, BackendError> {
        match ReferenceToken::match_value(stored) {
            None => Ok(stored.clone()),
            Some(token) => {
                let token = token?;
                if !self.tag_allowed(&token.type_tag) {
                    return Err(BackendError::TagNotAllowed(token.type_tag));
                }
                self.codec()?.deserialize_rich(&token)
            }
        }
    }
}
