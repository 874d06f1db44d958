//! Clasificador estructural: plano vs. rico.
//!
//! La clasificación es total y fail-open: todo value cae en exactamente una
//! categoría y los objetos complejos cuyo tag no está registrado se tratan
//! como planos (comportamiento idéntico al backend por defecto).

use serde_json::Value;

use crate::constants::{CLASS_KEY, COMPOSITE_TAG, REFERENCE_CLASS};
use crate::registry;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueClass {
    /// JSON-safe; se delega tal cual al backend por defecto.
    Plain,
    /// Contiene al menos un construct registrado; requiere redirección.
    Rich,
}

/// Inspección estructural pura (sin efectos): un value es rico si es, o
/// contiene recursivamente, un envelope con tag registrado.
pub fn classify(value: &Value) -> ValueClass {
    if contains_registered(value) {
        ValueClass::Rich
    } else {
        ValueClass::Plain
    }
}

/// Tag que anuncia el token para un value ya clasificado como rico: el tag
/// del envelope top-level, o `composite` para estructuras anidadas.
pub fn primary_type_tag(value: &Value) -> &'static str {
    if let Some(tag) = top_level_tag(value) {
        // Recuperar el &'static str del registro evita clonar el tag en el
        // caso común de un handle suelto.
        if let Some(registered) = registry::registered_tags().into_iter().find(|t| *t == tag) {
            return registered;
        }
    }
    COMPOSITE_TAG
}

fn top_level_tag(value: &Value) -> Option<&str> {
    let map = value.as_object()?;
    let tag = map.get(CLASS_KEY)?.as_str()?;
    if tag == REFERENCE_CLASS {
        return None;
    }
    Some(tag)
}

fn contains_registered(value: &Value) -> bool {
    match value {
        Value::Object(map) => {
            if let Some(tag) = map.get(CLASS_KEY).and_then(Value::as_str) {
                if tag != REFERENCE_CLASS && registry::is_registered(tag) {
                    return true;
                }
            }
            map.values().any(contains_registered)
        }
        Value::Array(items) => items.iter().any(contains_registered),
        _ => false,
    }
}
