//! Backend de object storage sobre filesystem local (`file://`).
//! Pensado para desarrollo y tests end-to-end; el layout es plano: un objeto
//! por archivo bajo el directorio base.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use crate::error::StorageError;
use crate::object::ObjectStore;

pub struct FsObjectStore {
    base_url: String,
    base_dir: PathBuf,
}

impl FsObjectStore {
    /// `url` con forma `file:///ruta/absoluta`. El directorio se crea en el
    /// primer `put`, no acá (abrir el store no debe tener efectos).
    pub fn open(url: &str) -> Result<Self, StorageError> {
        let path = url.strip_prefix("file://")
                      .ok_or_else(|| StorageError::UnsupportedScheme(url.to_string()))?;
        if path.is_empty() || !Path::new(path).is_absolute() {
            return Err(StorageError::UnsupportedScheme(url.to_string()));
        }
        Ok(Self { base_url: url.trim_end_matches('/').to_string(),
                  base_dir: PathBuf::from(path) })
    }

    fn path_for_location(location: &str) -> Result<PathBuf, StorageError> {
        let path = location.strip_prefix("file://")
                           .ok_or_else(|| StorageError::UnsupportedScheme(location.to_string()))?;
        Ok(PathBuf::from(path))
    }
}

impl ObjectStore for FsObjectStore {
    fn put(&self, name: &str, bytes: &[u8]) -> Result<String, StorageError> {
        fs::create_dir_all(&self.base_dir)?;
        let path = self.base_dir.join(name);
        fs::write(&path, bytes)?;
        Ok(format!("{}/{}", self.base_url, name))
    }

    fn get(&self, location: &str) -> Result<Vec<u8>, StorageError> {
        let path = Self::path_for_location(location)?;
        fs::read(&path).map_err(|e| {
                           if e.kind() == ErrorKind::NotFound {
                               StorageError::NotFound(location.to_string())
                           } else {
                               StorageError::Io(e)
                           }
                       })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn put_then_get_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let url = format!("file://{}", dir.path().display());
        let store = FsObjectStore::open(&url).unwrap();
        let location = store.put("abc.json", b"{\"a\":1}").unwrap();
        assert!(location.starts_with("file://"));
        assert_eq!(store.get(&location).unwrap(), b"{\"a\":1}");
    }

    #[test]
    fn missing_object_maps_to_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let url = format!("file://{}", dir.path().display());
        let store = FsObjectStore::open(&url).unwrap();
        let err = store.get(&format!("{url}/nope.json")).unwrap_err();
        assert!(matches!(err, StorageError::NotFound(_)));
    }

    #[test]
    fn relative_paths_are_rejected() {
        assert!(FsObjectStore::open("file://relative/path").is_err());
    }
}
