//! End-to-end contra `file://` resolviendo el target desde el entorno, como
//! en un deployment real. Un solo #[test] en este binario: muta variables de
//! entorno del proceso.

use serde_json::json;
use uuid::Uuid;

use xcom_backend::{wrapping_mode_enabled, InMemoryXcomStore, RichXcomBackend, XcomKey, XcomStore, BACKEND_ID};
use xcom_constructs::{register_sdk_constructs, FileHandle};
use xcom_core::ConstructSpec;
use xcom_storage::{invalidate_resolved_target, resolved_target, BackendConfig, StorageTarget};

#[test]
fn file_url_end_to_end_across_two_workers() {
    register_sdk_constructs();
    let dir = tempfile::tempdir().unwrap();
    std::env::set_var("XCOM_BACKEND", BACKEND_ID);
    std::env::set_var("XCOM_STORAGE_URL", format!("file://{}", dir.path().display()));
    std::env::set_var("XCOM_STORAGE_CONN_ID", "local_fs");
    // El flag local-dev presente no debe cambiar el target: la URL gana.
    std::env::set_var("XCOM_STORE_DATA_LOCAL_DEV", "true");
    invalidate_resolved_target();

    let config = BackendConfig::from_env();
    assert!(wrapping_mode_enabled(&config));
    let target = resolved_target().unwrap();
    assert!(matches!(target, StorageTarget::External { .. }));

    // Worker 1 escribe el handle.
    let run_id = Uuid::new_v4();
    let k = XcomKey::new(run_id, "extract", "dataset");
    let handle = FileHandle::new("s3://bucket/path", Some("aws_default")).unwrap();
    let mut writer = RichXcomBackend::new(InMemoryXcomStore::new());
    writer.set(&k, handle.clone().into_value()).unwrap();

    // El value store del orquestador es compartido; el payload quedó afuera.
    let delegated = writer.inner().raw(&k).unwrap().clone();
    assert_eq!(delegated["class"], json!("XComRef"));

    // Worker 2 (otro proceso con la misma config): backend construido desde
    // cero sobre el mismo value store delegado.
    let mut shared = InMemoryXcomStore::new();
    shared.set(&k, delegated).unwrap();
    let reader = RichXcomBackend::new(shared);
    let retrieved = reader.get(&k).unwrap().unwrap();
    let back = FileHandle::from_value(&retrieved).unwrap();
    assert_eq!(back.location(), "s3://bucket/path");

    std::env::remove_var("XCOM_BACKEND");
    std::env::remove_var("XCOM_STORAGE_URL");
    std::env::remove_var("XCOM_STORAGE_CONN_ID");
    std::env::remove_var("XCOM_STORE_DATA_LOCAL_DEV");
    invalidate_resolved_target();
}
