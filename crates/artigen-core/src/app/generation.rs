use artigen_domain::{GeneratedContent, Prompt};

use crate::errors::GenerationError;

/// Puerto hacia el paso de generación externo (LLM o simulación).
///
/// Recibe una unidad `{template, context}` y devuelve el contenido generado
/// indexado por el id de la unidad. Llamada síncrona y opaca: el core no
/// reintenta ni aplica timeouts; eso es responsabilidad de la implementación.
pub trait GenerationPort: Send + Sync {
    fn generate(&self, prompt: &Prompt) -> Result<GeneratedContent, GenerationError>;
}

impl<F> GenerationPort for F where F: Fn(&Prompt) -> Result<GeneratedContent, GenerationError> + Send + Sync
{
    fn generate(&self, prompt: &Prompt) -> Result<GeneratedContent, GenerationError> {
        self(prompt)
    }
}
