//! `Artifact`: instancia de un tipo para un proyecto, ligada a un
//! `ContentStore`.
//!
//! No se persiste; es un handle en memoria creado por invocación del pipeline.
//! Lo durable es el contenido que lee y escribe a través del store.
use std::sync::Arc;

use artigen_domain::{ArtifactType, Prompt, PromptTemplate};
use chrono::{DateTime, Utc};
use rayon::prelude::*;
use serde_json::Value;
use uuid::Uuid;

use crate::content::ContentStore;
use crate::errors::RepositoryError;

#[derive(Clone)]
pub struct Artifact {
    pub id: Uuid,
    pub project_id: String,
    pub kind: ArtifactType,
    pub created_at: DateTime<Utc>,
    store: Arc<ContentStore>,
}

impl Artifact {
    pub fn new(project_id: impl Into<String>, kind: ArtifactType, store: Arc<ContentStore>) -> Self {
        Self { id: Uuid::new_v4(),
               project_id: project_id.into(),
               kind,
               created_at: Utc::now(),
               store }
    }

    pub fn store(&self) -> &ContentStore {
        &self.store
    }

    /// Contexto para `template`: el contenido de cada tipo de `objects`, en el
    /// orden declarado, concatenado respetando el orden interno del store.
    ///
    /// Las lecturas por tipo se hacen en paralelo; `collect` sobre un iterador
    /// indexado conserva el orden de `objects`, así que el resultado no depende
    /// del orden en que terminen. Un tipo sin contenido aporta cero ítems.
    pub fn get_context(&self, template: &PromptTemplate) -> Result<Vec<Value>, RepositoryError> {
        let per_type: Vec<Vec<Value>> = template.objects
                                                .par_iter()
                                                .map(|kind| self.store.get_content(*kind))
                                                .collect::<Result<_, _>>()?;
        Ok(per_type.into_iter().flatten().collect())
    }

    /// Un `Prompt` por ítem de contexto (fan-out 1 a 1, nunca producto
    /// cruzado). El payload de plantilla es el mismo para todos y no lleva
    /// `objects`.
    pub fn create_prompt(&self, template: &PromptTemplate) -> Result<Vec<Prompt>, RepositoryError> {
        let contexts = self.get_context(template)?;
        Ok(Self::fan_out(template, contexts))
    }

    /// Fan-out sobre un contexto ya resuelto.
    pub fn fan_out(template: &PromptTemplate, contexts: Vec<Value>) -> Vec<Prompt> {
        let payload = template.payload();
        contexts.into_iter().map(|ctx| Prompt::new(payload.clone(), ctx)).collect()
    }

    /// Reemplaza todo el contenido de este tipo (sin merge).
    pub fn update_content(&self, content: Vec<Value>) -> Result<Vec<String>, RepositoryError> {
        self.store.update_content(self.kind, content)
    }

    pub fn content(&self) -> Result<Vec<Value>, RepositoryError> {
        self.store.get_content(self.kind)
    }
}

impl std::fmt::Debug for Artifact {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Artifact")
         .field("id", &self.id)
         .field("project_id", &self.project_id)
         .field("kind", &self.kind)
         .field("created_at", &self.created_at)
         .finish_non_exhaustive()
    }
}
