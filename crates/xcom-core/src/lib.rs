//! xcom-core: núcleo neutral del backend XCom (clasificación + formatos)
pub mod classify;
pub mod constants;
pub mod errors;
pub mod hashing;
pub mod model;
pub mod registry;

mod macros;

pub use classify::{classify, primary_type_tag, ValueClass};
pub use errors::TokenError;
pub use model::{ConstructDecodeError, ConstructEnvelope, ConstructSpec, ReferenceToken, StorageKind};
pub use registry::{register_construct, registered_tags, validate_envelope, validate_rich_value};
