//! Object store in-memory (`mem://`), para tests y embedding.
//!
//! Los buckets viven en estado global del proceso, compartido entre todas
//! las instancias abiertas sobre la misma URL: dos backends construidos de
//! forma independiente ven los mismos objetos, igual que dos workers contra
//! un bucket real.

use std::collections::HashMap;
use std::sync::RwLock;

use once_cell::sync::Lazy;

use crate::error::StorageError;
use crate::object::ObjectStore;

type Bucket = HashMap<String, Vec<u8>>;

static BUCKETS: Lazy<RwLock<HashMap<String, Bucket>>> = Lazy::new(|| RwLock::new(HashMap::new()));

pub struct InMemoryObjectStore {
    base_url: String,
}

impl InMemoryObjectStore {
    pub fn open(url: &str) -> Self {
        Self { base_url: url.trim_end_matches('/').to_string() }
    }

    /// Cantidad de objetos en este bucket.
    pub fn len(&self) -> usize {
        BUCKETS.read()
               .expect("lock poisoned")
               .get(&self.base_url)
               .map(Bucket::len)
               .unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Vacía el bucket (aislamiento entre tests).
    pub fn clear(&self) {
        BUCKETS.write().expect("lock poisoned").remove(&self.base_url);
    }
}

impl ObjectStore for InMemoryObjectStore {
    fn put(&self, name: &str, bytes: &[u8]) -> Result<String, StorageError> {
        let mut buckets = BUCKETS.write().expect("lock poisoned");
        buckets.entry(self.base_url.clone())
               .or_default()
               .insert(name.to_string(), bytes.to_vec());
        Ok(format!("{}/{}", self.base_url, name))
    }

    fn get(&self, location: &str) -> Result<Vec<u8>, StorageError> {
        let (bucket, name) = location.rsplit_once('/')
                                     .ok_or_else(|| StorageError::NotFound(location.to_string()))?;
        BUCKETS.read()
               .expect("lock poisoned")
               .get(bucket)
               .and_then(|b| b.get(name))
               .cloned()
               .ok_or_else(|| StorageError::NotFound(location.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn independent_instances_share_the_bucket() {
        let a = InMemoryObjectStore::open("mem://shared-bucket-test");
        a.clear();
        let location = a.put("x.json", b"payload").unwrap();
        let b = InMemoryObjectStore::open("mem://shared-bucket-test");
        assert_eq!(b.get(&location).unwrap(), b"payload");
        assert_eq!(b.len(), 1);
        a.clear();
    }
}
