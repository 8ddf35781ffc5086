//! Implementaciones de `GenerationPort`.
use artigen_core::{GenerationError, GenerationPort};
use artigen_domain::{GeneratedContent, Prompt};
use log::debug;
use serde_json::{json, Value};

use crate::services::{RequestMethod, ServiceIntegrator};

/// Generador simulado: no llama a ningún servicio.
#[derive(Debug, Clone, Copy, Default)]
pub struct EchoGenerator;

impl GenerationPort for EchoGenerator {
    fn generate(&self, prompt: &Prompt) -> Result<GeneratedContent, GenerationError> {
        Ok(GeneratedContent::new(prompt.id,
                                 Value::String(format!("Generated content for {}", prompt.template.subject))))
    }
}

/// Generador respaldado por un servicio HTTP.
///
/// Envía `{"template": ..., "context": ...}` por POST a `endpoint`. El
/// contenido generado es `data.content` si la respuesta lo trae, o el cuerpo
/// completo en caso contrario.
#[derive(Debug)]
pub struct ServiceGenerator {
    integrator: ServiceIntegrator,
    endpoint: String,
}

impl ServiceGenerator {
    pub fn new(integrator: ServiceIntegrator, endpoint: impl Into<String>) -> Self {
        Self { integrator, endpoint: endpoint.into() }
    }

    pub fn integrator(&self) -> &ServiceIntegrator {
        &self.integrator
    }
}

impl GenerationPort for ServiceGenerator {
    fn generate(&self, prompt: &Prompt) -> Result<GeneratedContent, GenerationError> {
        let body = json!({ "template": prompt.template, "context": prompt.context });
        let response = self.integrator
                           .make_request(&self.endpoint, RequestMethod::Post, &[], Some(&body), &[])
                           .map_err(|e| GenerationError::new(e.to_string()))?;
        let data = response.data
                           .ok_or_else(|| GenerationError::new(format!("empty response from {}", self.endpoint)))?;
        let content = match data {
            Value::Object(mut map) if map.contains_key("content") => map.remove("content").unwrap_or(Value::Null),
            other => other,
        };
        debug!("service_generator:done prompt_id={}", prompt.id);
        Ok(GeneratedContent::new(prompt.id, content))
    }
}
