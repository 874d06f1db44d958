//! Constantes de formato compartidas entre modos de integración.
//!
//! Estos valores participan en la compatibilidad de datos escritos por
//! procesos distintos (y por versiones distintas del orquestador): un token
//! persistido hoy debe seguir siendo legible mientras su versión caiga dentro
//! de la ventana soportada.

/// Versión actual del formato de `ReferenceToken`. Se incrementa ante
/// cambios incompatibles del shape serializado.
pub const TOKEN_FORMAT_VERSION: u32 = 1;

/// Versión mínima que este lector acepta. Política explícita: fuera de la
/// ventana `MIN..=ACTUAL` la lectura falla con `TokenError::VersionUnsupported`.
pub const MIN_TOKEN_FORMAT_VERSION: u32 = 1;

/// Valor del campo `class` que identifica un token de referencia dentro del
/// value store del orquestador.
pub const REFERENCE_CLASS: &str = "XComRef";

/// Clave JSON que lleva el tag de tipo en envelopes y tokens.
pub const CLASS_KEY: &str = "class";

/// Clave JSON de la versión de esquema dentro de un envelope.
pub const SCHEMA_VERSION_KEY: &str = "schema_version";

/// Tag reservado para values ricos compuestos (handles anidados en
/// listas/mapas): la reconstrucción revalida cada envelope interno.
pub const COMPOSITE_TAG: &str = "composite";
