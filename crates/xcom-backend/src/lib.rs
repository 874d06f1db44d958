//! xcom-backend: adaptadores de call-site hacia el orquestador.
//!
//! Dos modos de integración incompatibles entre versiones del orquestador,
//! compartiendo el mismo núcleo (clasificador/resolver/codec) para que un
//! token escrito bajo un modo sea legible — o falle explícito — bajo el otro:
//! - `facade`: backend envolvente (`store`/`retrieve`), superset estricto
//!   del backend por defecto (versiones pre-2.5).
//! - `native`: hooks de (de)serialización allow-listada invocados por el
//!   mecanismo nativo del orquestador (2.5+); sin facade.

pub mod codec;
pub mod error;
pub mod facade;
pub mod native;
pub mod store;

pub use codec::PayloadCodec;
pub use error::BackendError;
pub use facade::RichXcomBackend;
pub use native::NativeXcomSerde;
pub use store::{InMemoryXcomStore, XcomKey, XcomStore};

/// Identificador fully-qualified del facade; es el valor que la opción
/// `XCOM_BACKEND` del orquestador debe llevar para activar el modo wrapping.
pub const BACKEND_ID: &str = "xcom_backend::RichXcomBackend";

/// ¿La configuración activa el modo wrapping?
pub fn wrapping_mode_enabled(config: &xcom_storage::BackendConfig) -> bool {
    config.xcom_backend.as_deref() == Some(BACKEND_ID)
}
