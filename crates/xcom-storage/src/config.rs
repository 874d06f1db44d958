//! Carga de configuración desde variables de entorno.
//! Reconoce las opciones del backend XCom y la conexión a la base de
//! metadatos (convención `DATABASE_URL` + parámetros opcionales de pool).

use std::env;

use dotenvy::dotenv;
use once_cell::sync::Lazy;

use crate::error::StorageError;

// Carga perezosa del archivo .env una sola vez.
static DOTENV_LOADED: Lazy<()> = Lazy::new(|| {
    let _ = dotenv(); // ignora error si no existe .env
});

/// Forzar carga temprana de .env desde aplicaciones externas si se desea.
pub fn init_dotenv() {
    Lazy::force(&DOTENV_LOADED);
}

fn env_flag(name: &str) -> bool {
    env::var(name).map(|v| matches!(v.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes"))
                  .unwrap_or(false)
}

/// Opciones reconocidas del backend (superficie consumida del subsistema de
/// configuración del orquestador).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BackendConfig {
    /// Identificador fully-qualified del backend a activar (modo wrapping).
    pub xcom_backend: Option<String>,
    /// URL de object storage externo (`file://...`, `mem://...`).
    pub storage_url: Option<String>,
    /// Identidad de conexión para la URL externa; requerida junto con ella.
    pub storage_conn_id: Option<String>,
    /// Fallback de desarrollo: payloads en la base de metadatos. Default false.
    pub store_data_local_dev: bool,
    /// Debe permanecer en false para activar el modo nativo.
    pub enable_pickling: bool,
    /// Prefijos de tags deserializables en modo nativo (separados por coma).
    pub allowed_deserialization_prefixes: Vec<String>,
}

impl BackendConfig {
    pub fn from_env() -> Self {
        Lazy::force(&DOTENV_LOADED);
        let prefixes = env::var("XCOM_ALLOWED_DESERIALIZATION_PREFIXES").map(|raw| {
                                                                            raw.split(',')
                                                                               .map(str::trim)
                                                                               .filter(|p| !p.is_empty())
                                                                               .map(str::to_string)
                                                                               .collect()
                                                                        })
                                                                        .unwrap_or_default();
        Self { xcom_backend: env::var("XCOM_BACKEND").ok(),
               storage_url: env::var("XCOM_STORAGE_URL").ok(),
               storage_conn_id: env::var("XCOM_STORAGE_CONN_ID").ok(),
               store_data_local_dev: env_flag("XCOM_STORE_DATA_LOCAL_DEV"),
               enable_pickling: env_flag("XCOM_ENABLE_PICKLING"),
               allowed_deserialization_prefixes: prefixes }
    }

    /// Punto de invalidación documentado: re-lee el entorno y descarta el
    /// `StorageTarget` cacheado para que la próxima operación re-resuelva.
    pub fn reload() -> Self {
        crate::resolver::invalidate_resolved_target();
        Self::from_env()
    }
}

/// Conexión a la base de metadatos del orquestador (fallback local).
#[derive(Debug, Clone)]
pub struct DbConfig {
    pub url: String,
    pub min_connections: u32,
    pub max_connections: u32,
}

impl DbConfig {
    pub fn try_from_env() -> Result<Self, StorageError> {
        // asegura que .env se haya cargado
        Lazy::force(&DOTENV_LOADED);
        let url = env::var("DATABASE_URL").map_err(|_| StorageError::MissingConfig("DATABASE_URL".to_string()))?;
        let min_connections = env::var("DATABASE_MIN_CONNECTIONS").ok().and_then(|v| v.parse().ok()).unwrap_or(2);
        let max_connections = env::var("DATABASE_MAX_CONNECTIONS").ok().and_then(|v| v.parse().ok()).unwrap_or(16);
        Ok(Self { url, min_connections, max_connections })
    }
}
