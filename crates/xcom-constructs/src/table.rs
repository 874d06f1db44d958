//! Handle de tabla del SDK: referencia a una tabla en un warehouse externo.
//! La identidad (nombre + conexión + namespace) debe sobrevivir intacta un
//! round trip serialize→persist→fetch→deserialize.

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use xcom_core::ConstructSpec;

use crate::ConstructError;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableHandle {
    name: String,
    conn_id: Option<String>,
    /// Schema/namespace dentro del warehouse (opcional).
    namespace: Option<String>,
    database: Option<String>,
    /// Tablas temporales: nombre generado, el SDK puede reciclarlas.
    temp: bool,
}

impl TableHandle {
    pub fn new(name: &str, conn_id: Option<&str>) -> Result<Self, ConstructError> {
        if name.trim().is_empty() {
            return Err(ConstructError::ValidationError("table name must not be empty".to_string()));
        }
        Ok(TableHandle { name: name.to_string(),
                         conn_id: conn_id.map(str::to_string),
                         namespace: None,
                         database: None,
                         temp: false })
    }

    /// Tabla temporal con nombre generado (estable dentro del handle).
    pub fn temp(conn_id: Option<&str>) -> Self {
        let generated = format!("_tmp_{}", Uuid::new_v4().simple());
        TableHandle { name: generated,
                      conn_id: conn_id.map(str::to_string),
                      namespace: None,
                      database: None,
                      temp: true }
    }

    pub fn with_namespace(mut self, namespace: &str) -> Self {
        self.namespace = Some(namespace.to_string());
        self
    }

    pub fn with_database(mut self, database: &str) -> Self {
        self.database = Some(database.to_string());
        self
    }

    pub fn name(&self) -> &str { &self.name }
    pub fn conn_id(&self) -> Option<&str> { self.conn_id.as_deref() }
    pub fn namespace(&self) -> Option<&str> { self.namespace.as_deref() }
    pub fn database(&self) -> Option<&str> { self.database.as_deref() }
    pub fn is_temp(&self) -> bool { self.temp }

    /// Nombre calificado `namespace.name` cuando hay namespace.
    pub fn fully_qualified_name(&self) -> String {
        match &self.namespace {
            Some(ns) => format!("{}.{}", ns, self.name),
            None => self.name.clone(),
        }
    }
}

impl ConstructSpec for TableHandle {
    const TYPE_TAG: &'static str = "Table";

    fn validate(&self) -> Result<(), String> {
        if self.name.trim().is_empty() {
            return Err("table name must not be empty".to_string());
        }
        Ok(())
    }
}

impl fmt::Display for TableHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Table(name={}, namespace={:?}, conn_id={:?}, temp={})",
               self.name, self.namespace, self.conn_id, self.temp)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use xcom_core::ConstructSpec;

    #[test]
    fn rejects_empty_name() {
        assert!(TableHandle::new("", Some("wh")).is_err());
        assert!(TableHandle::new("   ", None).is_err());
    }

    #[test]
    fn temp_tables_get_generated_names() {
        let a = TableHandle::temp(Some("wh"));
        let b = TableHandle::temp(Some("wh"));
        assert!(a.is_temp());
        assert_ne!(a.name(), b.name());
    }

    #[test]
    fn envelope_roundtrip_keeps_identity() {
        let t = TableHandle::new("ventas", Some("warehouse"))
            .unwrap()
            .with_namespace("reporting");
        let v = t.clone().into_value();
        assert_eq!(v["class"], "Table");
        let back = TableHandle::from_value(&v).expect("decode");
        assert_eq!(back, t);
        assert_eq!(back.fully_qualified_name(), "reporting.ventas");
    }
}
