//! Unidad de generación: una plantilla resuelta + exactamente un ítem de
//! contexto. Se crea en el fan-out y se consume de inmediato; nunca se
//! persiste.
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use uuid::Uuid;

use crate::TemplatePayload;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Prompt {
    pub id: Uuid,
    pub template: TemplatePayload,
    pub context: Value,
}

impl Prompt {
    pub fn new(template: TemplatePayload, context: Value) -> Self {
        Self { id: Uuid::new_v4(), template, context }
    }
}

/// Contenido producido por el puerto de generación, indexado por el id del
/// `Prompt` que lo originó.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneratedContent {
    pub prompt_id: Uuid,
    pub content: Value,
}

impl GeneratedContent {
    pub fn new(prompt_id: Uuid, content: Value) -> Self {
        Self { prompt_id, content }
    }

    /// Forma persistida: `{"id": <prompt id>, "content": ...}`.
    pub fn to_value(&self) -> Value {
        json!({ "id": self.prompt_id.to_string(), "content": self.content })
    }
}
