//! Registro process-wide de constructs ricos.
//!
//! Los tipos se registran en startup (capability check polimórfico, nunca
//! allow-list de nombres de steps). El registro es la fuente de verdad para:
//! - el clasificador (un envelope es "rico" si su tag está registrado);
//! - la reconstrucción en lectura (revalidar que el payload decodifica al
//!   tipo registrado antes de devolverlo).

use std::collections::HashMap;
use std::sync::RwLock;

use once_cell::sync::Lazy;
use serde_json::Value;

use crate::constants::COMPOSITE_TAG;
use crate::model::{ConstructDecodeError, ConstructEnvelope, ConstructSpec};

type ReviveFn = fn(&ConstructEnvelope) -> Result<(), ConstructDecodeError>;

/// Entrada de registro por tipo.
pub struct RegisteredConstruct {
    pub type_tag: &'static str,
    pub schema_version: u32,
    revive: ReviveFn,
}

#[derive(Default)]
pub struct ConstructRegistry {
    entries: HashMap<&'static str, RegisteredConstruct>,
}

impl ConstructRegistry {
    /// Registra un tipo. Idempotente; registrar dos veces reemplaza la
    /// entrada (mismo tag ⇒ misma capacidad).
    pub fn register<T: ConstructSpec>(&mut self) {
        fn revive_as<T: ConstructSpec>(env: &ConstructEnvelope) -> Result<(), ConstructDecodeError> {
            T::from_envelope(env).map(|_| ())
        }
        self.entries.insert(T::TYPE_TAG,
                            RegisteredConstruct { type_tag: T::TYPE_TAG,
                                                  schema_version: T::SCHEMA_VERSION,
                                                  revive: revive_as::<T> });
    }

    pub fn is_registered(&self, tag: &str) -> bool {
        self.entries.contains_key(tag)
    }

    pub fn tags(&self) -> Vec<&'static str> {
        let mut tags: Vec<&'static str> = self.entries.keys().copied().collect();
        tags.sort_unstable();
        tags
    }

    /// Revalida un envelope contra su tipo registrado.
    pub fn validate(&self, env: &ConstructEnvelope) -> Result<(), ConstructDecodeError> {
        let entry = self.entries
                        .get(env.type_tag.as_str())
                        .ok_or_else(|| ConstructDecodeError::Unregistered(env.type_tag.clone()))?;
        (entry.revive)(env)
    }
}

// Singleton perezoso; la registración ocurre una vez en startup y las
// lecturas concurrentes de workers sólo toman el lock de lectura.
static REGISTRY: Lazy<RwLock<ConstructRegistry>> = Lazy::new(|| RwLock::new(ConstructRegistry::default()));

/// Registra un tipo en el registro global.
pub fn register_construct<T: ConstructSpec>() {
    REGISTRY.write().expect("construct registry poisoned").register::<T>();
    log::debug!("registered construct type '{}' (schema v{})", T::TYPE_TAG, T::SCHEMA_VERSION);
}

pub fn is_registered(tag: &str) -> bool {
    REGISTRY.read().expect("construct registry poisoned").is_registered(tag)
}

pub fn registered_tags() -> Vec<&'static str> {
    REGISTRY.read().expect("construct registry poisoned").tags()
}

/// Revalida un envelope suelto contra el registro global.
pub fn validate_envelope(env: &ConstructEnvelope) -> Result<(), ConstructDecodeError> {
    REGISTRY.read().expect("construct registry poisoned").validate(env)
}

/// Revalida un value rico completo: cada envelope contenido (a cualquier
/// profundidad) debe decodificar limpio a su tipo registrado. Se usa en el
/// camino de lectura del codec — la reconstrucción nunca es best-effort.
///
/// `expected_tag` es el tag que anuncia el token; para `composite` sólo se
/// exige que los envelopes internos validen.
pub fn validate_rich_value(value: &Value, expected_tag: &str) -> Result<(), ConstructDecodeError> {
    if expected_tag != COMPOSITE_TAG {
        let env = ConstructEnvelope::match_value(value).ok_or_else(|| {
                      ConstructDecodeError::Deserialize(format!("payload does not carry a '{expected_tag}' envelope"))
                  })?;
        if env.type_tag != expected_tag {
            return Err(ConstructDecodeError::TagMismatch { expected: expected_tag.to_string(),
                                                           found: env.type_tag });
        }
        return validate_envelope(&env);
    }
    validate_nested(value)
}

fn validate_nested(value: &Value) -> Result<(), ConstructDecodeError> {
    match value {
        Value::Object(map) => {
            if let Some(env) = ConstructEnvelope::match_value(value) {
                // Tags no registrados dentro de un composite pasan de largo
                // (fail-open, igual que en clasificación).
                if is_registered(&env.type_tag) {
                    validate_envelope(&env)?;
                    return Ok(());
                }
            }
            for v in map.values() {
                validate_nested(v)?;
            }
            Ok(())
        }
        Value::Array(items) => {
            for v in items {
                validate_nested(v)?;
            }
            Ok(())
        }
        _ => Ok(()),
    }
}
