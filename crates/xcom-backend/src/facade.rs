//! Backend envolvente: superset estricto del value store por defecto.
//!
//! `store`: clasifica; plano ⇒ delega textual al backend interno (la
//! representación almacenada es idéntica a la del backend por defecto solo);
//! rico ⇒ resuelve target, serializa vía codec y delega el token como JSON
//! plano. `retrieve` invierte el camino: si el value guardado tiene shape de
//! token, reconstruye; si no, lo devuelve tal cual.

use std::sync::Arc;

use log::debug;
use serde_json::Value;

use xcom_core::{classify, ReferenceToken, ValueClass};
use xcom_storage::resolved_target;

use crate::codec::PayloadCodec;
use crate::error::BackendError;
use crate::store::{XcomKey, XcomStore};

pub struct RichXcomBackend<S: XcomStore> {
    inner: S,
    /// Codec fijado por inyección (tests/embedding); `None` ⇒ abrir desde el
    /// target resuelto del proceso en el primer value rico.
    codec: Option<Arc<PayloadCodec>>,
}

impl<S: XcomStore> RichXcomBackend<S> {
    /// Envuelve el backend por defecto; el storage de payloads se resuelve
    /// perezosamente desde la configuración del proceso.
    pub fn new(inner: S) -> Self {
        Self { inner, codec: None }
    }

    /// Envuelve con un codec ya construido.
    pub fn with_codec(inner: S, codec: Arc<PayloadCodec>) -> Self {
        Self { inner, codec: Some(codec) }
    }

    /// Acceso al backend envuelto (asserts de tests).
    pub fn inner(&self) -> &S {
        &self.inner
    }

    fn codec(&self) -> Result<Arc<PayloadCodec>, BackendError> {
        match &self.codec {
            Some(codec) => Ok(codec.clone()),
            None => {
                // La resolución (y su error de configuración, si aplica)
                // ocurre antes de intentar cualquier IO.
                let target = resolved_target()?;
                Ok(Arc::new(PayloadCodec::open(&target)?))
            }
        }
    }
}

impl<S: XcomStore> XcomStore for RichXcomBackend<S> {
    fn set(&mut self, key: &XcomKey, value: Value) -> Result<(), BackendError> {
        match classify(&value) {
            ValueClass::Plain => self.inner.set(key, value),
            ValueClass::Rich => {
                let token = self.codec()?.serialize_rich(&value)?;
                debug!("xcom set key={key} redirected to {}", token.location);
                self.inner.set(key, token.to_value())
            }
        }
    }

    fn get(&self, key: &XcomKey) -> Result<Option<Value>, BackendError> {
        let Some(stored) = self.inner.get(key)? else {
            return Ok(None);
        };
        match ReferenceToken::match_value(&stored) {
            None => Ok(Some(stored)),
            Some(token) => {
                let token = token?;
                debug!("xcom get key={key} resolving reference {}", token.location);
                Ok(Some(self.codec()?.deserialize_rich(&token)?))
            }
        }
    }
}
