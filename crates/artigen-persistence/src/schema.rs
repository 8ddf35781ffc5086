//! Esquema Diesel (escrito a mano). Reemplazable con `diesel print-schema`.

diesel::table! {
    records (id) {
        id -> Text,
        seq -> BigInt,
        content -> Nullable<Text>,
        metadata -> Text,
    }
}
