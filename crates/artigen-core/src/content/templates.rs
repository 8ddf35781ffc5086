//! Store de plantillas: cada registro guarda el `PromptTemplate` serializado
//! como `content` y el tipo de artifact que genera en `artifact_type`.
use artigen_domain::{ArtifactType, PromptTemplate};
use serde_json::{Map, Value};

use crate::errors::RepositoryError;
use crate::repo::{Criteria, Record, RecordStore};

pub const ARTIFACT_TYPE_KEY: &str = "artifact_type";

pub struct PromptTemplateStore {
    repo: Box<dyn RecordStore>,
}

impl PromptTemplateStore {
    pub fn new(repo: Box<dyn RecordStore>) -> Self {
        Self { repo }
    }

    /// Registra una plantilla para `kind` y devuelve el id asignado.
    pub fn register(&self, kind: ArtifactType, template: &PromptTemplate) -> Result<String, RepositoryError> {
        let mut metadata = Map::new();
        metadata.insert(ARTIFACT_TYPE_KEY.to_string(), Value::from(kind.as_str()));
        self.repo.save(Record::new(Some(template.to_value()?), metadata))
    }

    pub fn load(&self, id: &str) -> Result<Option<PromptTemplate>, RepositoryError> {
        match self.repo.load(id)?.and_then(|r| r.content) {
            Some(v) => Ok(Some(PromptTemplate::from_value(v)?)),
            None => Ok(None),
        }
    }

    pub fn find_for(&self, kind: ArtifactType) -> Result<Vec<PromptTemplate>, RepositoryError> {
        self.find_by(&Criteria::new().with(ARTIFACT_TYPE_KEY, kind.as_str()))
    }

    pub fn find_by(&self, criteria: &Criteria) -> Result<Vec<PromptTemplate>, RepositoryError> {
        decode_all(self.repo.find_by(criteria)?)
    }

    pub fn all(&self) -> Result<Vec<PromptTemplate>, RepositoryError> {
        decode_all(self.repo.get_all()?)
    }
}

fn decode_all(records: Vec<Record>) -> Result<Vec<PromptTemplate>, RepositoryError> {
    records.into_iter()
           .filter_map(|r| r.content)
           .map(|v| PromptTemplate::from_value(v).map_err(RepositoryError::from))
           .collect()
}
