use serde_json::json;
use xcom_storage::config::DbConfig;
use xcom_storage::pg::{build_pool, PgMetadataStore, PoolProvider};
use xcom_storage::MetadataStore;

#[test]
fn pg_payload_roundtrip_and_dedup() {
    if std::env::var("DATABASE_URL").is_err() {
        eprintln!("skip (no DATABASE_URL)");
        return;
    }
    let cfg = DbConfig::try_from_env().expect("db config");
    // Pool 1x1 para aislar el test de issues de destrucción de conexiones.
    let pool = build_pool(&cfg.url, 1, 1).expect("pool");
    let store = PgMetadataStore::new(PoolProvider { pool });

    let payload = json!({"class": "Table", "schema_version": 1, "name": "pg_rt", "nonce": 42});
    // Clave sintética con el largo del hash canónico (CHECK length=64).
    let key = format!("{:0>64}", "abc123");

    store.insert_payload(&key, "Table", &payload).expect("insert");
    // Re-insertar la misma clave debe ser un no-op, no un error.
    store.insert_payload(&key, "Table", &payload).expect("idempotent insert");

    let fetched = store.fetch_payload(&key).expect("fetch");
    assert_eq!(fetched, payload, "payload JSONB debe ser idéntico tras roundtrip");
}
