//! Object storage externo detrás de un trait neutro.
//!
//! El codec escribe payloads como objetos inmutables nombrados por su hash
//! de contenido; el store nunca interpreta el contenido. Los errores de IO se
//! propagan tal cual (el timeout/bloqueo es del store subyacente, esta capa
//! no impone el suyo).

pub mod fs;
pub mod memory;

pub use fs::FsObjectStore;
pub use memory::InMemoryObjectStore;

use crate::error::StorageError;

pub trait ObjectStore: Send + Sync {
    /// Escribe `bytes` bajo `name` (relativo a la base del store) y devuelve
    /// la URL completa del objeto escrito.
    fn put(&self, name: &str, bytes: &[u8]) -> Result<String, StorageError>;

    /// Lee el objeto en `location` (URL completa, como la devolvió `put`).
    fn get(&self, location: &str) -> Result<Vec<u8>, StorageError>;
}

/// Abre el backend apropiado para la URL configurada.
///
/// `conn_id` es la identidad de conexión suministrada por configuración; los
/// schemes locales no requieren credenciales pero la identidad se conserva
/// para trazabilidad. Schemes no soportados son error de configuración.
pub fn open_object_store(url: &str, conn_id: &str) -> Result<Box<dyn ObjectStore>, StorageError> {
    match url.split_once("://").map(|(scheme, _)| scheme) {
        Some("file") => {
            log::debug!("opening filesystem object store url={url} conn_id={conn_id}");
            Ok(Box::new(FsObjectStore::open(url)?))
        }
        Some("mem") => {
            log::debug!("opening in-memory object store url={url} conn_id={conn_id}");
            Ok(Box::new(InMemoryObjectStore::open(url)))
        }
        _ => Err(StorageError::UnsupportedScheme(url.to_string())),
    }
}
