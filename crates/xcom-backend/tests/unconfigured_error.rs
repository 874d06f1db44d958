//! Sin target configurado, almacenar un construct rico es error de
//! configuración antes de intentar IO; los values planos no se ven
//! afectados. Un solo #[test] en este binario: muta el entorno del proceso.

use serde_json::json;
use uuid::Uuid;

use xcom_backend::{BackendError, InMemoryXcomStore, RichXcomBackend, XcomKey, XcomStore};
use xcom_constructs::{register_sdk_constructs, TableHandle};
use xcom_core::ConstructSpec;
use xcom_storage::{invalidate_resolved_target, StorageError};

#[test]
fn storing_rich_without_target_is_a_configuration_error() {
    register_sdk_constructs();
    std::env::remove_var("XCOM_STORAGE_URL");
    std::env::remove_var("XCOM_STORAGE_CONN_ID");
    std::env::remove_var("XCOM_STORE_DATA_LOCAL_DEV");
    invalidate_resolved_target();

    let mut backend = RichXcomBackend::new(InMemoryXcomStore::new());

    // Plano: sin target igual funciona (la resolución no participa).
    let plain_key = XcomKey::new(Uuid::new_v4(), "compute", "n");
    backend.set(&plain_key, json!(7)).unwrap();
    assert_eq!(backend.get(&plain_key).unwrap(), Some(json!(7)));

    // Rico: falla en resolución, nada llegó al value store.
    let rich_key = XcomKey::new(Uuid::new_v4(), "load", "table");
    let value = TableHandle::new("t", Some("wh")).unwrap().into_value();
    let err = backend.set(&rich_key, value).unwrap_err();
    assert!(matches!(err, BackendError::Storage(StorageError::NoTarget)));
    assert!(backend.inner().raw(&rich_key).is_none());
}
