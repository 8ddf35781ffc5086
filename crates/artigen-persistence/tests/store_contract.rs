//! Contrato `RecordStore` ejecutado contra ambos backends del factory.
//!
//! Verifica:
//! - Asignación de ids y reemplazo in situ.
//! - "No encontrado" sin errores.
//! - Orden de inserción estable en `get_all`.
//! - `find_by` exige coincidencia en todos los pares.


use artigen_core::{Criteria, Record, RepositoryError};
use serde_json::json;
use test_support::{for_each_backend, record};

#[test]
fn save_assigns_id_and_load_roundtrips() {
    for_each_backend(|kind, store| {
        let r = record(json!({"texto": "hola", "n": [1, 2, 3]}), json!({"type": "stakeholder", "autor": "ana"}));
        let id = store.save(r.clone()).unwrap();
        let loaded = store.load(&id).unwrap().unwrap_or_else(|| panic!("{kind}: record missing"));
        assert_eq!(loaded.id.as_deref(), Some(id.as_str()), "{kind}");
        assert_eq!(loaded.content, r.content, "{kind}");
        assert_eq!(loaded.metadata, r.metadata, "{kind}");
    });
}

#[test]
fn generated_ids_are_unique() {
    for_each_backend(|kind, store| {
        let a = store.save(record(json!(1), json!({}))).unwrap();
        let b = store.save(record(json!(1), json!({}))).unwrap();
        assert_ne!(a, b, "{kind}");
    });
}

#[test]
fn missing_ids_are_not_errors() {
    for_each_backend(|kind, store| {
        assert_eq!(store.load("no-existe").unwrap(), None, "{kind}");
        assert!(!store.delete("no-existe").unwrap(), "{kind}");
    });
}

#[test]
fn delete_reports_whether_it_removed() {
    for_each_backend(|kind, store| {
        let id = store.save(record(json!("x"), json!({}))).unwrap();
        assert!(store.delete(&id).unwrap(), "{kind}");
        assert!(!store.delete(&id).unwrap(), "{kind}");
        assert_eq!(store.load(&id).unwrap(), None, "{kind}");
    });
}

#[test]
fn get_all_keeps_insertion_order_across_replacements() {
    for_each_backend(|kind, store| {
        for id in ["c", "a", "b"] {
            store.save(record(json!(id), json!({})).with_id(id)).unwrap();
        }
        store.save(record(json!("a2"), json!({})).with_id("a")).unwrap();
        let all = store.get_all().unwrap();
        let ids: Vec<_> = all.iter().map(|r| r.id.clone().unwrap()).collect();
        assert_eq!(ids, vec!["c", "a", "b"], "{kind}");
        assert_eq!(all[1].content, Some(json!("a2")), "{kind}");
    });
}

#[test]
fn find_by_matches_all_pairs_exactly() {
    for_each_backend(|kind, store| {
        store.save(record(json!("ambos"), json!({"k1": "v1", "k2": "v2"}))).unwrap();
        store.save(record(json!("solo-k1"), json!({"k1": "v1", "k2": "otro"}))).unwrap();
        store.save(record(json!("solo-k2"), json!({"k2": "v2"}))).unwrap();

        let found = store.find_by(&Criteria::new().with("k1", "v1").with("k2", "v2")).unwrap();
        let contents: Vec<_> = found.iter().map(|r| r.content.clone().unwrap()).collect();
        assert_eq!(contents, vec![json!("ambos")], "{kind}");

        let k1 = store.find_by(&Criteria::new().with("k1", "v1")).unwrap();
        assert_eq!(k1.len(), 2, "{kind}");
    });
}

#[test]
fn find_by_with_empty_criteria_is_rejected() {
    for_each_backend(|kind, store| {
        assert_eq!(store.find_by(&Criteria::new()), Err(RepositoryError::EmptyCriteria), "{kind}");
    });
}

#[test]
fn metadata_only_records_are_stored() {
    for_each_backend(|kind, store| {
        let id = store.save(Record::default().with_id("m")).unwrap();
        let loaded = store.load(&id).unwrap().unwrap();
        assert_eq!(loaded.content, None, "{kind}");
    });
}

#[test]
fn replace_where_swaps_the_selection_in_one_step() {
    for_each_backend(|kind, store| {
        store.save(record(json!("s1"), json!({"type": "stakeholder"})).with_id("s1")).unwrap();
        store.save(record(json!("u1"), json!({"type": "use_case"})).with_id("u1")).unwrap();
        store.save(record(json!("s2"), json!({"type": "stakeholder"})).with_id("s2")).unwrap();

        let ids = store.replace_where(&Criteria::new().with("type", "stakeholder"),
                                      vec![record(json!("s3"), json!({"type": "stakeholder"})).with_id("s3"),
                                           record(json!("s4"), json!({"type": "stakeholder"}))])
                       .unwrap();
        assert_eq!(ids.len(), 2, "{kind}");
        assert_eq!(ids[0], "s3", "{kind}");

        let all: Vec<_> = store.get_all().unwrap().into_iter().map(|r| r.content.unwrap()).collect();
        assert_eq!(all, vec![json!("u1"), json!("s3"), json!("s4")], "{kind}");
    });
}

#[test]
fn replace_where_rejects_empty_criteria() {
    for_each_backend(|kind, store| {
        store.save(record(json!("keep"), json!({}))).unwrap();
        assert_eq!(store.replace_where(&Criteria::new(), vec![]), Err(RepositoryError::EmptyCriteria), "{kind}");
        assert_eq!(store.get_all().unwrap().len(), 1, "{kind}");
    });
}
