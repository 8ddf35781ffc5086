use std::sync::Arc;

use artigen_domain::ArtifactType;
use serde_json::Value;
use uuid::Uuid;

use crate::content::ContentStore;
use crate::errors::RepositoryError;
use crate::model::Artifact;

/// Proyecto: agrupa artifacts sobre un mismo `ContentStore`.
pub struct Project {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    store: Arc<ContentStore>,
}

impl Project {
    pub fn new(name: &str, description: &str, store: Arc<ContentStore>) -> Self {
        Self { id: Uuid::new_v4(),
               name: name.to_string(),
               description: description.to_string(),
               store }
    }

    /// Siembra el proyecto con el cuestionario completado (colección de un
    /// único ítem; reemplaza cualquier cuestionario previo).
    pub fn initialize_with_questionnaire(&self, questionnaire: Value) -> Result<(), RepositoryError> {
        self.store.update_content(ArtifactType::Questionnaire, vec![questionnaire])?;
        Ok(())
    }

    pub fn artifact(&self, kind: ArtifactType) -> Artifact {
        Artifact::new(self.id.to_string(), kind, self.store.clone())
    }

    pub fn store(&self) -> Arc<ContentStore> {
        self.store.clone()
    }
}
