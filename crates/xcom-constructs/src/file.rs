//! Handle de archivo/dataset del SDK: ubicación externa + tipo de contenido.

use serde::{Deserialize, Serialize};
use std::fmt;

use xcom_core::ConstructSpec;

use crate::ConstructError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FileType {
    Csv,
    Json,
    Ndjson,
    Parquet,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileHandle {
    /// URI completa (`s3://bucket/path`, `gs://...`, `file:///...`) o path local.
    location: String,
    conn_id: Option<String>,
    filetype: Option<FileType>,
}

impl FileHandle {
    pub fn new(location: &str, conn_id: Option<&str>) -> Result<Self, ConstructError> {
        if location.trim().is_empty() {
            return Err(ConstructError::ValidationError("file location must not be empty".to_string()));
        }
        Ok(FileHandle { location: location.to_string(),
                        conn_id: conn_id.map(str::to_string),
                        filetype: None })
    }

    pub fn with_filetype(mut self, filetype: FileType) -> Self {
        self.filetype = Some(filetype);
        self
    }

    pub fn location(&self) -> &str { &self.location }
    pub fn conn_id(&self) -> Option<&str> { self.conn_id.as_deref() }
    pub fn filetype(&self) -> Option<FileType> { self.filetype }

    /// Scheme de la URI (`s3`, `gs`, `file`), o `None` para paths locales.
    pub fn scheme(&self) -> Option<&str> {
        self.location.split_once("://").map(|(scheme, _)| scheme)
    }
}

impl ConstructSpec for FileHandle {
    const TYPE_TAG: &'static str = "File";

    fn validate(&self) -> Result<(), String> {
        if self.location.trim().is_empty() {
            return Err("file location must not be empty".to_string());
        }
        Ok(())
    }
}

impl fmt::Display for FileHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "File(location={}, conn_id={:?})", self.location, self.conn_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use xcom_core::ConstructSpec;

    #[test]
    fn scheme_extraction() {
        let f = FileHandle::new("s3://bucket/path", Some("aws")).unwrap();
        assert_eq!(f.scheme(), Some("s3"));
        let local = FileHandle::new("/tmp/data.csv", None).unwrap();
        assert_eq!(local.scheme(), None);
    }

    #[test]
    fn envelope_roundtrip_keeps_location() {
        let f = FileHandle::new("s3://bucket/path", Some("aws_default"))
            .unwrap()
            .with_filetype(FileType::Parquet);
        let v = f.clone().into_value();
        assert_eq!(v["class"], "File");
        let back = FileHandle::from_value(&v).expect("decode");
        assert_eq!(back.location(), "s3://bucket/path");
        assert_eq!(back, f);
    }
}
