use std::sync::{Arc, Mutex, MutexGuard};

use uuid::Uuid;

use super::{Criteria, Record};
use crate::errors::RepositoryError;

/// Contrato del almacenamiento de registros, idéntico para todos los backends.
///
/// - `save`: asigna un id único si el registro no trae uno; si el id ya
///   existe reemplaza el registro conservando su posición. Devuelve el id.
/// - `load`: `None` si el id no existe.
/// - `delete`: `true` si existía y se borró.
/// - `get_all`: orden estable (inserción) durante la vida del proceso.
/// - `find_by`: igualdad sobre todos los pares; criterios vacíos son inválidos.
/// - `replace_where`: quita los registros que cumplen `criteria` y guarda
///   `records` como una sola operación; si falla, el store queda como estaba.
pub trait RecordStore: Send + Sync {
    fn save(&self, record: Record) -> Result<String, RepositoryError>;
    fn load(&self, id: &str) -> Result<Option<Record>, RepositoryError>;
    fn delete(&self, id: &str) -> Result<bool, RepositoryError>;
    fn get_all(&self) -> Result<Vec<Record>, RepositoryError>;
    fn find_by(&self, criteria: &Criteria) -> Result<Vec<Record>, RepositoryError>;

    /// Versión genérica: inserta primero y borra lo viejo sólo si todas las
    /// inserciones tuvieron éxito; ante un fallo deshace lo insertado. Los
    /// backends con escritura atómica la reemplazan.
    fn replace_where(&self, criteria: &Criteria, records: Vec<Record>) -> Result<Vec<String>, RepositoryError> {
        ensure_criteria(criteria)?;
        let stale: Vec<String> = self.find_by(criteria)?.into_iter().filter_map(|r| r.id).collect();
        if let Some(clash) = records.iter().filter_map(|r| r.id.as_deref()).find(|id| stale.iter().any(|s| s == id)) {
            return Err(RepositoryError::InvalidRecord(format!("replacement reuses stale id {clash}")));
        }
        let mut ids = Vec::with_capacity(records.len());
        for record in records {
            match self.save(record) {
                Ok(id) => ids.push(id),
                Err(e) => {
                    for id in &ids {
                        let _ = self.delete(id);
                    }
                    return Err(e);
                }
            }
        }
        for id in &stale {
            self.delete(id)?;
        }
        Ok(ids)
    }
}

impl<T: RecordStore + ?Sized> RecordStore for Box<T> {
    fn save(&self, record: Record) -> Result<String, RepositoryError> {
        (**self).save(record)
    }
    fn load(&self, id: &str) -> Result<Option<Record>, RepositoryError> {
        (**self).load(id)
    }
    fn delete(&self, id: &str) -> Result<bool, RepositoryError> {
        (**self).delete(id)
    }
    fn get_all(&self) -> Result<Vec<Record>, RepositoryError> {
        (**self).get_all()
    }
    fn find_by(&self, criteria: &Criteria) -> Result<Vec<Record>, RepositoryError> {
        (**self).find_by(criteria)
    }
    fn replace_where(&self, criteria: &Criteria, records: Vec<Record>) -> Result<Vec<String>, RepositoryError> {
        (**self).replace_where(criteria, records)
    }
}

impl<T: RecordStore + ?Sized> RecordStore for Arc<T> {
    fn save(&self, record: Record) -> Result<String, RepositoryError> {
        (**self).save(record)
    }
    fn load(&self, id: &str) -> Result<Option<Record>, RepositoryError> {
        (**self).load(id)
    }
    fn delete(&self, id: &str) -> Result<bool, RepositoryError> {
        (**self).delete(id)
    }
    fn get_all(&self) -> Result<Vec<Record>, RepositoryError> {
        (**self).get_all()
    }
    fn find_by(&self, criteria: &Criteria) -> Result<Vec<Record>, RepositoryError> {
        (**self).find_by(criteria)
    }
    fn replace_where(&self, criteria: &Criteria, records: Vec<Record>) -> Result<Vec<String>, RepositoryError> {
        (**self).replace_where(criteria, records)
    }
}

/// Rechaza criterios vacíos (para eso existe `get_all`).
pub fn ensure_criteria(criteria: &Criteria) -> Result<(), RepositoryError> {
    if criteria.is_empty() {
        return Err(RepositoryError::EmptyCriteria);
    }
    Ok(())
}

/// Id asignado por el store cuando el registro no trae uno.
pub fn generate_record_id() -> String {
    Uuid::new_v4().to_string()
}

/// Reemplazo sobre una lista en memoria: quita lo que cumple `criteria` y
/// agrega `fresh` (asignando ids). Un id que ya existe fuera de la selección
/// se reemplaza en su posición.
pub fn apply_replace(records: &mut Vec<Record>, criteria: &Criteria, fresh: Vec<Record>) -> Vec<String> {
    records.retain(|r| !r.matches(criteria));
    let mut ids = Vec::with_capacity(fresh.len());
    for mut record in fresh {
        let id = record.id.get_or_insert_with(generate_record_id).clone();
        match records.iter_mut().find(|r| r.id.as_deref() == Some(id.as_str())) {
            Some(slot) => *slot = record,
            None => records.push(record),
        }
        ids.push(id);
    }
    ids
}

/// Backend en memoria: vector en orden de inserción tras un mutex.
#[derive(Default)]
pub struct InMemoryRecordStore {
    inner: Mutex<Vec<Record>>,
}

impl InMemoryRecordStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn records(&self) -> Result<MutexGuard<'_, Vec<Record>>, RepositoryError> {
        self.inner
            .lock()
            .map_err(|_| RepositoryError::Backend("in-memory store lock poisoned".into()))
    }
}

impl RecordStore for InMemoryRecordStore {
    fn save(&self, mut record: Record) -> Result<String, RepositoryError> {
        let id = record.id.get_or_insert_with(generate_record_id).clone();
        let mut records = self.records()?;
        match records.iter_mut().find(|r| r.id.as_deref() == Some(id.as_str())) {
            Some(slot) => *slot = record,
            None => records.push(record),
        }
        Ok(id)
    }

    fn load(&self, id: &str) -> Result<Option<Record>, RepositoryError> {
        Ok(self.records()?.iter().find(|r| r.id.as_deref() == Some(id)).cloned())
    }

    fn delete(&self, id: &str) -> Result<bool, RepositoryError> {
        let mut records = self.records()?;
        let before = records.len();
        records.retain(|r| r.id.as_deref() != Some(id));
        Ok(records.len() != before)
    }

    fn get_all(&self) -> Result<Vec<Record>, RepositoryError> {
        Ok(self.records()?.clone())
    }

    fn find_by(&self, criteria: &Criteria) -> Result<Vec<Record>, RepositoryError> {
        ensure_criteria(criteria)?;
        Ok(self.records()?.iter().filter(|r| r.matches(criteria)).cloned().collect())
    }

    fn replace_where(&self, criteria: &Criteria, records: Vec<Record>) -> Result<Vec<String>, RepositoryError> {
        ensure_criteria(criteria)?;
        Ok(apply_replace(&mut *self.records()?, criteria, records))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Map};

    #[test]
    fn save_assigns_unique_ids() {
        let store = InMemoryRecordStore::new();
        let a = store.save(Record::new(Some(json!(1)), Map::new())).unwrap();
        let b = store.save(Record::new(Some(json!(2)), Map::new())).unwrap();
        assert_ne!(a, b);
        assert_eq!(store.get_all().unwrap().len(), 2);
    }

    #[test]
    fn save_with_existing_id_replaces_in_place() {
        let store = InMemoryRecordStore::new();
        store.save(Record::default().with_id("a")).unwrap();
        store.save(Record::default().with_id("b")).unwrap();
        store.save(Record::new(Some(json!("nuevo")), Map::new()).with_id("a")).unwrap();
        let all = store.get_all().unwrap();
        assert_eq!(all.len(), 2);
        assert_eq!(all[0].id.as_deref(), Some("a"));
        assert_eq!(all[0].content, Some(json!("nuevo")));
    }

    #[test]
    fn missing_ids_are_not_errors() {
        let store = InMemoryRecordStore::new();
        assert_eq!(store.load("nope").unwrap(), None);
        assert!(!store.delete("nope").unwrap());
    }

    #[test]
    fn replace_where_swaps_only_the_selection() {
        let store = InMemoryRecordStore::new();
        store.save(Record::new(Some(json!("a")), Map::new()).with_id("a")).unwrap();
        let mut tagged = Map::new();
        tagged.insert("type".into(), json!("x"));
        store.save(Record::new(Some(json!("x1")), tagged.clone()).with_id("x1")).unwrap();

        let ids = store.replace_where(&Criteria::new().with("type", "x"),
                                      vec![Record::new(Some(json!("x2")), tagged)])
                       .unwrap();
        let all = store.get_all().unwrap();
        assert_eq!(all.len(), 2);
        assert_eq!(all[0].id.as_deref(), Some("a"));
        assert_eq!(all[1].id.as_deref(), Some(ids[0].as_str()));
        assert_eq!(all[1].content, Some(json!("x2")));
    }

    #[test]
    fn find_by_rejects_empty_criteria() {
        let store = InMemoryRecordStore::new();
        assert_eq!(store.find_by(&Criteria::new()), Err(RepositoryError::EmptyCriteria));
    }
}
