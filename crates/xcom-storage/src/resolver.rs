//! Resolución del storage target para payloads ricos.
//!
//! Reglas, en orden de prioridad:
//! 1. URL externa configurada ⇒ `External` (la identidad de conexión es
//!    obligatoria junto con la URL; su ausencia es error de configuración).
//! 2. Flag de desarrollo local ⇒ `LocalMetadata`, marcado como no apto para
//!    producción vía `warn!` en el momento de resolución.
//! 3. Ninguna de las dos ⇒ error de configuración (los values planos no se
//!    ven afectados; la resolución sólo ocurre ante un construct rico).
//!
//! El resultado se cachea process-wide tras la primera resolución (estado de
//! sólo lectura para los workers); `invalidate_resolved_target` es el punto
//! de invalidación, disparado por `BackendConfig::reload`.

use std::sync::RwLock;

use log::{debug, warn};
use once_cell::sync::Lazy;

use xcom_core::StorageKind;

use crate::config::BackendConfig;
use crate::error::StorageError;

/// Configuración resuelta: exactamente un target activo por deployment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StorageTarget {
    External { url: String, conn_id: String },
    LocalMetadata,
}

impl StorageTarget {
    pub fn kind(&self) -> StorageKind {
        match self {
            StorageTarget::External { .. } => StorageKind::External,
            StorageTarget::LocalMetadata => StorageKind::LocalMetadata,
        }
    }
}

/// Resolución determinista a partir de la configuración dada. Sin efectos
/// sobre el cache (ver `resolved_target`).
pub fn resolve(config: &BackendConfig) -> Result<StorageTarget, StorageError> {
    if let Some(url) = &config.storage_url {
        let conn_id = config.storage_conn_id.clone().ok_or(StorageError::MissingConnId)?;
        if config.store_data_local_dev {
            // Política documentada: la URL externa gana cuando ambos están seteados.
            debug!("XCOM_STORE_DATA_LOCAL_DEV ignored: external storage URL takes precedence");
        }
        return Ok(StorageTarget::External { url: url.clone(), conn_id });
    }
    if config.store_data_local_dev {
        warn!("rich XCom payloads will be stored in the orchestrator metadata database; \
               not suitable for production use");
        return Ok(StorageTarget::LocalMetadata);
    }
    Err(StorageError::NoTarget)
}

static RESOLVED: Lazy<RwLock<Option<StorageTarget>>> = Lazy::new(|| RwLock::new(None));

/// Target cacheado del proceso; resuelve desde el entorno la primera vez.
/// Los errores de resolución no se cachean: una config corregida + reload
/// permite continuar sin reiniciar el worker.
pub fn resolved_target() -> Result<StorageTarget, StorageError> {
    if let Some(target) = RESOLVED.read().expect("storage target cache poisoned").as_ref() {
        return Ok(target.clone());
    }
    let target = resolve(&BackendConfig::from_env())?;
    *RESOLVED.write().expect("storage target cache poisoned") = Some(target.clone());
    Ok(target)
}

/// Punto de invalidación: la próxima llamada a `resolved_target` re-resuelve.
pub fn invalidate_resolved_target() {
    *RESOLVED.write().expect("storage target cache poisoned") = None;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cfg(url: Option<&str>, conn: Option<&str>, local: bool) -> BackendConfig {
        BackendConfig { storage_url: url.map(str::to_string),
                        storage_conn_id: conn.map(str::to_string),
                        store_data_local_dev: local,
                        ..BackendConfig::default() }
    }

    #[test]
    fn external_url_wins_over_local_dev_flag() {
        let target = resolve(&cfg(Some("file:///tmp/xcom"), Some("local_fs"), true)).unwrap();
        assert_eq!(target,
                   StorageTarget::External { url: "file:///tmp/xcom".into(),
                                             conn_id: "local_fs".into() });
    }

    #[test]
    fn url_without_conn_id_is_a_configuration_error() {
        let err = resolve(&cfg(Some("file:///tmp/xcom"), None, false)).unwrap_err();
        assert!(matches!(err, StorageError::MissingConnId));
        assert!(err.is_configuration());
    }

    #[test]
    fn local_dev_flag_alone_resolves_metadata_fallback() {
        let target = resolve(&cfg(None, None, true)).unwrap();
        assert_eq!(target, StorageTarget::LocalMetadata);
        assert_eq!(target.kind(), StorageKind::LocalMetadata);
    }

    #[test]
    fn nothing_configured_is_a_configuration_error() {
        let err = resolve(&cfg(None, None, false)).unwrap_err();
        assert!(matches!(err, StorageError::NoTarget));
        assert!(err.is_configuration());
    }
}
