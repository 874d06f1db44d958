//! Esquema Diesel (generado manualmente). Reemplazable con `diesel print-schema`.

diesel::table! {
    xcom_rich_payloads (payload_key) {
        payload_key -> Text,
        type_tag -> Text,
        payload -> Jsonb,
        created_at -> Timestamptz,
    }
}
