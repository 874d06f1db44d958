//! Interfaz del value store por defecto del orquestador.
//!
//! El orquestador es un colaborador externo: acá sólo se modela el contrato
//! que su mecanismo de paso de values expone (set/get JSON por clave). La
//! implementación in-memory sirve para tests y embedding; en producción el
//! orquestador provee la suya.

use std::collections::HashMap;
use std::fmt;

use serde_json::Value;
use uuid::Uuid;

use crate::error::BackendError;

/// Coordenadas de un value dentro del run de un pipeline.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct XcomKey {
    pub run_id: Uuid,
    pub task_id: String,
    pub key: String,
}

impl XcomKey {
    pub fn new(run_id: Uuid, task_id: &str, key: &str) -> Self {
        Self { run_id,
               task_id: task_id.to_string(),
               key: key.to_string() }
    }
}

impl fmt::Display for XcomKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}/{}", self.run_id, self.task_id, self.key)
    }
}

/// Contrato del value store (backend por defecto y cualquier wrapper).
/// Escrituras concurrentes a la misma clave: last-write-wins, heredado del
/// store subyacente.
pub trait XcomStore {
    fn set(&mut self, key: &XcomKey, value: Value) -> Result<(), BackendError>;
    fn get(&self, key: &XcomKey) -> Result<Option<Value>, BackendError>;
}

#[derive(Default)]
pub struct InMemoryXcomStore {
    pub inner: HashMap<XcomKey, Value>,
}

impl InMemoryXcomStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Representación cruda almacenada (para asserts de tests: los values
    /// planos no deben llevar wrapping alguno).
    pub fn raw(&self, key: &XcomKey) -> Option<&Value> {
        self.inner.get(key)
    }
}

impl XcomStore for InMemoryXcomStore {
    fn set(&mut self, key: &XcomKey, value: Value) -> Result<(), BackendError> {
        self.inner.insert(key.clone(), value);
        Ok(())
    }

    fn get(&self, key: &XcomKey) -> Result<Option<Value>, BackendError> {
        Ok(self.inner.get(key).cloned())
    }
}
