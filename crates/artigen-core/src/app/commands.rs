use artigen_domain::{Prompt, PromptTemplate};
use serde_json::Value;

use crate::errors::RepositoryError;
use crate::model::Artifact;

/// Resuelve el contexto de las dependencias declaradas por la plantilla.
pub struct GetContextCommand<'a> {
    pub artifact: &'a Artifact,
    pub template: &'a PromptTemplate,
}

impl GetContextCommand<'_> {
    pub fn execute(&self) -> Result<Vec<Value>, RepositoryError> {
        self.artifact.get_context(self.template)
    }
}

/// Genera los prompts (uno por ítem de contexto). Si `context` ya viene
/// resuelto se usa tal cual; si no, se resuelve contra el store.
pub struct GeneratePromptCommand<'a> {
    pub artifact: &'a Artifact,
    pub template: &'a PromptTemplate,
    pub context: Option<Vec<Value>>,
}

impl GeneratePromptCommand<'_> {
    pub fn execute(self) -> Result<Vec<Prompt>, RepositoryError> {
        match self.context {
            Some(ctx) => Ok(Artifact::fan_out(self.template, ctx)),
            None => self.artifact.create_prompt(self.template),
        }
    }
}

/// Reemplaza el contenido del artifact en el store.
pub struct UpdateContentCommand<'a> {
    pub artifact: &'a Artifact,
    pub content: Vec<Value>,
}

impl UpdateContentCommand<'_> {
    pub fn execute(self) -> Result<Vec<String>, RepositoryError> {
        self.artifact.update_content(self.content)
    }
}
