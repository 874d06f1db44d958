//! Modo wrapping contra object storage externo (mem://).

use std::sync::Arc;

use serde_json::json;
use uuid::Uuid;

use xcom_backend::{BackendError, InMemoryXcomStore, PayloadCodec, RichXcomBackend, XcomKey, XcomStore};
use xcom_constructs::{register_sdk_constructs, TableHandle};
use xcom_core::{ConstructSpec, ReferenceToken, StorageKind, TokenError};
use xcom_storage::InMemoryObjectStore;

fn key(task: &str, name: &str) -> XcomKey {
    XcomKey::new(Uuid::new_v4(), task, name)
}

fn mem_codec(bucket: &str) -> Arc<PayloadCodec> {
    Arc::new(PayloadCodec::with_object_store(Arc::new(InMemoryObjectStore::open(bucket))))
}

#[test]
fn plain_values_delegate_verbatim() {
    register_sdk_constructs();
    let mut backend = RichXcomBackend::with_codec(InMemoryXcomStore::new(), mem_codec("mem://wr-plain"));
    let k = key("extract", "row_count");
    let v = json!({"rows": 1280, "tags": ["a", "b"]});

    backend.set(&k, v.clone()).unwrap();
    // Representación subyacente idéntica a la del backend por defecto solo.
    assert_eq!(backend.inner().raw(&k), Some(&v));
    assert_eq!(backend.get(&k).unwrap(), Some(v));
}

#[test]
fn rich_value_roundtrip_stores_a_token_underneath() {
    register_sdk_constructs();
    let mut backend = RichXcomBackend::with_codec(InMemoryXcomStore::new(), mem_codec("mem://wr-rich"));
    let k = key("load", "output_table");
    let table = TableHandle::new("ventas", Some("warehouse")).unwrap().with_namespace("reporting");
    let value = table.clone().into_value();

    backend.set(&k, value.clone()).unwrap();

    // Lo delegado al store por defecto es un token JSON-safe, no el handle.
    let stored = backend.inner().raw(&k).unwrap();
    let token = ReferenceToken::match_value(stored).expect("token shape").expect("parse");
    assert_eq!(token.storage, StorageKind::External);
    assert_eq!(token.type_tag, "Table");

    // La lectura reconstruye el value original.
    let retrieved = backend.get(&k).unwrap().unwrap();
    assert_eq!(retrieved, value);
    assert_eq!(TableHandle::from_value(&retrieved).unwrap(), table);
}

#[test]
fn composite_values_with_nested_handles_roundtrip() {
    register_sdk_constructs();
    let mut backend = RichXcomBackend::with_codec(InMemoryXcomStore::new(), mem_codec("mem://wr-composite"));
    let k = key("split", "partitions");
    let t1 = TableHandle::new("p1", Some("wh")).unwrap().into_value();
    let t2 = TableHandle::new("p2", Some("wh")).unwrap().into_value();
    let value = json!({"partitions": [t1, t2], "total": 2});

    backend.set(&k, value.clone()).unwrap();
    let stored = backend.inner().raw(&k).unwrap();
    let token = ReferenceToken::match_value(stored).expect("token shape").expect("parse");
    assert_eq!(token.type_tag, "composite");
    assert_eq!(backend.get(&k).unwrap(), Some(value));
}

#[test]
fn token_from_external_fails_under_local_metadata_codec() {
    register_sdk_constructs();
    let external = mem_codec("mem://wr-cross");
    let value = TableHandle::new("t", Some("wh")).unwrap().into_value();
    let token = external.serialize_rich(&value).unwrap();

    // Config cambiada entre write y read: el target ahora es la base local.
    let local = PayloadCodec::with_metadata_store(Arc::new(xcom_storage::InMemoryMetadataStore::new()));
    let err = local.deserialize_rich(&token).unwrap_err();
    assert!(matches!(err,
                     BackendError::Token(TokenError::StorageKindMismatch { token: StorageKind::External,
                                                                           target: StorageKind::LocalMetadata })));
}

#[test]
fn unsupported_format_version_is_fatal() {
    register_sdk_constructs();
    let codec = mem_codec("mem://wr-version");
    let value = TableHandle::new("t", Some("wh")).unwrap().into_value();
    let mut token = codec.serialize_rich(&value).unwrap();
    token.format_version = 99;
    let err = codec.deserialize_rich(&token).unwrap_err();
    assert!(matches!(err, BackendError::Token(TokenError::VersionUnsupported { found: 99, .. })));
}

#[test]
fn malformed_token_shape_is_an_error_not_passthrough() {
    register_sdk_constructs();
    let mut backend = RichXcomBackend::with_codec(InMemoryXcomStore::new(), mem_codec("mem://wr-malformed"));
    let k = key("legacy", "bad_ref");
    // Un token truncado (sin location/type_tag) llega desde un store viejo.
    backend.set(&k, json!({"class": "XComRef", "storage": "external"})).unwrap();
    let err = backend.get(&k).unwrap_err();
    assert!(matches!(err, BackendError::Token(TokenError::Malformed(_))));
}
