//! Plantillas de generación.
//!
//! Un `PromptTemplate` es inmutable una vez cargado. `objects` declara, en
//! orden, qué tipos de artifact deben resolverse como contexto antes de
//! generar; no forma parte de la entrada de generación (ver `payload`).
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{ArtifactType, DomainError};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PromptTemplate {
    pub subject: String,
    pub description: String,
    pub instructions: String,
    #[serde(default)]
    pub objects: Vec<ArtifactType>,
    #[serde(default)]
    pub template: Value,
}

/// Plantilla sin la lista de dependencias: lo que viaja en cada `Prompt`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TemplatePayload {
    pub subject: String,
    pub description: String,
    pub instructions: String,
    pub template: Value,
}

impl PromptTemplate {
    pub fn new(subject: &str, description: &str, instructions: &str, objects: Vec<ArtifactType>, template: Value) -> Self {
        Self { subject: subject.to_string(),
               description: description.to_string(),
               instructions: instructions.to_string(),
               objects,
               template }
    }

    /// Decodifica una plantilla almacenada. Un tag desconocido en `objects`
    /// invalida la plantilla completa.
    pub fn from_value(value: Value) -> Result<Self, DomainError> {
        serde_json::from_value(value).map_err(|e| DomainError::InvalidTemplate(e.to_string()))
    }

    pub fn to_value(&self) -> Result<Value, DomainError> {
        Ok(serde_json::to_value(self)?)
    }

    pub fn payload(&self) -> TemplatePayload {
        TemplatePayload { subject: self.subject.clone(),
                          description: self.description.clone(),
                          instructions: self.instructions.clone(),
                          template: self.template.clone() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn payload_drops_objects() {
        let t = PromptTemplate::new("s", "d", "i", vec![ArtifactType::Stakeholder], json!({"k": 1}));
        let v = serde_json::to_value(t.payload()).unwrap();
        assert!(v.get("objects").is_none());
        assert_eq!(v["template"], json!({"k": 1}));
    }

    #[test]
    fn unknown_object_tag_invalidates_template() {
        let raw = json!({
            "subject": "s", "description": "d", "instructions": "i",
            "objects": ["stakeholder", "persona"], "template": {}
        });
        assert!(matches!(PromptTemplate::from_value(raw), Err(DomainError::InvalidTemplate(_))));
    }

    #[test]
    fn missing_objects_defaults_to_empty() {
        let raw = json!({"subject": "s", "description": "d", "instructions": "i"});
        let t = PromptTemplate::from_value(raw).unwrap();
        assert!(t.objects.is_empty());
        assert_eq!(t.template, Value::Null);
    }
}
