// xcom-constructs library entry point
pub mod error;
pub mod file;
pub mod table;

pub use error::ConstructError;
pub use file::{FileHandle, FileType};
pub use table::TableHandle;

use xcom_core::register_construct;

/// Registra los handles del SDK en el registro global. Llamar una vez en
/// startup del worker; es el punto que convierte estos tipos en
/// deserializables (allow-list por capacidad, no por nombre).
pub fn register_sdk_constructs() {
    register_construct::<TableHandle>();
    register_construct::<FileHandle>();
}
