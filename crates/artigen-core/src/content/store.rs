//! `ContentStore`: contenido de artifacts particionado por `ArtifactType`.
//!
//! Cada registro es un payload (`content`) más metadata con el tag de tipo
//! bajo la clave `type`. `update_content` reemplaza la colección completa de
//! un tipo; no hace merge ni compare-and-swap, gana el último escritor.
//!
//! Con `IdStrategy::Sequential` el id es `content_<n>` con el primer `n` libre a
//! partir de `cantidad + 1`. Dentro del proceso las escrituras pasan por el
//! mismo gate, pero dos procesos sobre el mismo store pueden calcular el mismo
//! id y el segundo pisa al primero. Por eso el default es `IdStrategy::Uuid`.
use std::collections::HashSet;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use artigen_domain::ArtifactType;
use indexmap::IndexMap;
use log::debug;
use serde_json::{Map, Value};
use uuid::Uuid;

use crate::errors::RepositoryError;
use crate::repo::{Criteria, Record, RecordStore};

/// Clave de metadata con el tag de tipo.
pub const TYPE_KEY: &str = "type";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum IdStrategy {
    /// `content_<uuid>`
    #[default]
    Uuid,
    /// `content_<n>`, primer número libre desde registros actuales + 1
    Sequential,
}

pub struct ContentStore {
    repo: Box<dyn RecordStore>,
    ids: IdStrategy,
    // Serializa reemplazos de colección frente a lecturas del mismo proceso.
    gate: RwLock<()>,
}

impl ContentStore {
    pub fn new(repo: Box<dyn RecordStore>) -> Self {
        Self { repo, ids: IdStrategy::default(), gate: RwLock::new(()) }
    }

    pub fn with_id_strategy(mut self, ids: IdStrategy) -> Self {
        self.ids = ids;
        self
    }

    pub fn id_strategy(&self) -> IdStrategy {
        self.ids
    }

    fn read_gate(&self) -> Result<RwLockReadGuard<'_, ()>, RepositoryError> {
        self.gate.read().map_err(|_| RepositoryError::Backend("content store lock poisoned".into()))
    }

    fn write_gate(&self) -> Result<RwLockWriteGuard<'_, ()>, RepositoryError> {
        self.gate.write().map_err(|_| RepositoryError::Backend("content store lock poisoned".into()))
    }

    /// Guarda `content` junto con su metadata y devuelve el id.
    pub fn save(&self, content: Value, metadata: Map<String, Value>) -> Result<String, RepositoryError> {
        let _guard = self.write_gate()?;
        let mut record = typed_record(content, metadata)?;
        if record.id.is_none() {
            record.id = self.fresh_ids(1)?.pop();
        }
        self.repo.save(record)
    }

    /// `count` ids libres. En modo secuencial se saltan los ids que ya
    /// existen, así un número nunca pisa un registro vigente.
    fn fresh_ids(&self, count: usize) -> Result<Vec<String>, RepositoryError> {
        Ok(match self.ids {
            IdStrategy::Uuid => (0..count).map(|_| format!("content_{}", Uuid::new_v4().simple())).collect(),
            IdStrategy::Sequential => {
                let taken: HashSet<String> = self.repo.get_all()?.into_iter().filter_map(|r| r.id).collect();
                (taken.len() + 1..).map(|n| format!("content_{n}"))
                                   .filter(|id| !taken.contains(id))
                                   .take(count)
                                   .collect()
            }
        })
    }

    pub fn load(&self, id: &str) -> Result<Option<Value>, RepositoryError> {
        let _guard = self.read_gate()?;
        Ok(self.repo.load(id)?.and_then(|r| r.content))
    }

    pub fn delete(&self, id: &str) -> Result<bool, RepositoryError> {
        let _guard = self.write_gate()?;
        self.repo.delete(id)
    }

    /// Todos los contenidos (id → content) en el orden del store. Los
    /// registros sin `content` se omiten.
    pub fn get_all(&self) -> Result<IndexMap<String, Value>, RepositoryError> {
        let _guard = self.read_gate()?;
        Ok(with_content(self.repo.get_all()?))
    }

    pub fn find_by(&self, criteria: &Criteria) -> Result<IndexMap<String, Value>, RepositoryError> {
        let _guard = self.read_gate()?;
        Ok(with_content(self.repo.find_by(criteria)?))
    }

    /// Colección completa de un tipo, en el orden del store.
    pub fn get_content(&self, kind: ArtifactType) -> Result<Vec<Value>, RepositoryError> {
        self.get_content_where(kind, &Criteria::new())
    }

    /// Igual que `get_content` con filtros adicionales; el filtro de tipo
    /// siempre prevalece sobre un `type` provisto por el llamador.
    pub fn get_content_where(&self, kind: ArtifactType, criteria: &Criteria) -> Result<Vec<Value>, RepositoryError> {
        let mut scoped = criteria.clone();
        scoped.insert(TYPE_KEY, kind.as_str());
        Ok(self.find_by(&scoped)?.into_values().collect())
    }

    /// Reemplaza la colección completa de `kind` por `items`. Devuelve los ids
    /// de los registros nuevos, en el mismo orden que `items`. El reemplazo es
    /// una sola operación del store: si falla, la colección anterior queda
    /// intacta.
    pub fn update_content(&self, kind: ArtifactType, items: Vec<Value>) -> Result<Vec<String>, RepositoryError> {
        let _guard = self.write_gate()?;
        let ids = self.fresh_ids(items.len())?;
        let records: Vec<Record> = items.into_iter()
                                        .zip(ids)
                                        .map(|(item, id)| {
                                            let mut metadata = Map::new();
                                            metadata.insert(TYPE_KEY.to_string(), Value::from(kind.as_str()));
                                            Record::new(Some(item), metadata).with_id(id)
                                        })
                                        .collect();
        let ids = self.repo.replace_where(&Criteria::new().with(TYPE_KEY, kind.as_str()), records)?;
        debug!("update_content:done type={kind} inserted={}", ids.len());
        Ok(ids)
    }
}

/// Registro con el tag de tipo validado: debe ser un string y nombrar un
/// `ArtifactType` conocido.
fn typed_record(content: Value, metadata: Map<String, Value>) -> Result<Record, RepositoryError> {
    if let Some(tag) = metadata.get(TYPE_KEY) {
        let tag = tag.as_str()
                     .ok_or_else(|| RepositoryError::InvalidRecord(format!("type tag must be a string, got {tag}")))?;
        tag.parse::<ArtifactType>()?;
    }
    Ok(Record::new(Some(content), metadata))
}

fn with_content(records: Vec<Record>) -> IndexMap<String, Value> {
    records.into_iter()
           .filter_map(|r| match (r.id, r.content) {
               (Some(id), Some(content)) => Some((id, content)),
               _ => None,
           })
           .collect()
}
