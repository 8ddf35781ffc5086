//! Servicio de aplicación: orquesta la generación de contenido de un artifact.
//!
//! Máquina de estados lineal:
//! `LookupTemplate → ConstructArtifact → ResolveContext → FanoutPrompts →
//! GenerateContent → PersistContent → Done`.
//!
//! Cualquier error lleva al estado terminal `Failed` desde la etapa en curso.
//! Sin reintentos ni commit parcial: la única escritura ocurre en
//! `PersistContent`, así que cualquier fallo previo aborta sin tocar el store.
use std::fmt;
use std::sync::Arc;

use artigen_domain::{ArtifactType, GeneratedContent};
use log::{debug, error};
use serde_json::Value;
use uuid::Uuid;

use super::commands::{GeneratePromptCommand, GetContextCommand, UpdateContentCommand};
use super::generation::GenerationPort;
use super::queries::GetPromptTemplateQuery;
use crate::content::{ContentStore, PromptTemplateStore};
use crate::errors::PipelineError;
use crate::model::Artifact;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineStage {
    LookupTemplate,
    ConstructArtifact,
    ResolveContext,
    FanoutPrompts,
    GenerateContent,
    PersistContent,
    Done,
    Failed,
}

impl fmt::Display for PipelineStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            PipelineStage::LookupTemplate => "lookup_template",
            PipelineStage::ConstructArtifact => "construct_artifact",
            PipelineStage::ResolveContext => "resolve_context",
            PipelineStage::FanoutPrompts => "fanout_prompts",
            PipelineStage::GenerateContent => "generate_content",
            PipelineStage::PersistContent => "persist_content",
            PipelineStage::Done => "done",
            PipelineStage::Failed => "failed",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationRequest {
    pub project_id: String,
    pub artifact_type: ArtifactType,
}

impl GenerationRequest {
    pub fn new(project_id: impl Into<String>, artifact_type: ArtifactType) -> Self {
        Self { project_id: project_id.into(), artifact_type }
    }
}

/// Resultado de una ejecución completa.
#[derive(Debug, Clone)]
pub struct PipelineOutcome {
    pub artifact_id: Uuid,
    pub artifact_type: ArtifactType,
    pub context_items: usize,
    pub generated: Vec<GeneratedContent>,
    pub persisted_ids: Vec<String>,
}

pub struct ArtifactContentService<G: GenerationPort> {
    templates: Arc<PromptTemplateStore>,
    content: Arc<ContentStore>,
    generator: G,
}

impl<G: GenerationPort> ArtifactContentService<G> {
    pub fn new(templates: Arc<PromptTemplateStore>, content: Arc<ContentStore>, generator: G) -> Self {
        Self { templates, content, generator }
    }

    pub fn content_store(&self) -> &Arc<ContentStore> {
        &self.content
    }

    pub fn generate_artifact_content(&self, request: &GenerationRequest) -> Result<PipelineOutcome, PipelineError> {
        self.generate_traced(request).1
    }

    /// Igual que `generate_artifact_content`, devolviendo además las etapas
    /// recorridas; la última es siempre `Done` o `Failed`.
    pub fn generate_traced(&self,
                           request: &GenerationRequest)
                           -> (Vec<PipelineStage>, Result<PipelineOutcome, PipelineError>) {
        let mut trace = vec![PipelineStage::LookupTemplate];
        let result = self.run(request, &mut trace);
        if let Err(e) = &result {
            let failed_at = current(&trace);
            error!("pipeline:transition type={} project={} {failed_at} -> {} err={e}",
                   request.artifact_type,
                   request.project_id,
                   PipelineStage::Failed);
            trace.push(PipelineStage::Failed);
        }
        (trace, result)
    }

    fn run(&self, request: &GenerationRequest, trace: &mut Vec<PipelineStage>) -> Result<PipelineOutcome, PipelineError> {
        let kind = request.artifact_type;
        debug!("pipeline:start type={kind} project={}", request.project_id);

        // Primera plantilla registrada para el tipo; sin plantilla no se arranca.
        let template = GetPromptTemplateQuery::by_artifact_type(kind).execute(&self.templates)?
                                                                      .into_iter()
                                                                      .next()
                                                                      .ok_or(PipelineError::NoTemplate(kind))?;

        advance(trace, PipelineStage::ConstructArtifact, kind);
        let artifact = Artifact::new(request.project_id.clone(), kind, self.content.clone());

        advance(trace, PipelineStage::ResolveContext, kind);
        let contexts = GetContextCommand { artifact: &artifact, template: &template }.execute()?;
        let context_items = contexts.len();

        advance(trace, PipelineStage::FanoutPrompts, kind);
        let prompts = GeneratePromptCommand { artifact: &artifact,
                                              template: &template,
                                              context: Some(contexts) }.execute()?;

        advance(trace, PipelineStage::GenerateContent, kind);
        let generated = prompts.iter()
                               .map(|p| self.generator.generate(p))
                               .collect::<Result<Vec<_>, _>>()?;

        advance(trace, PipelineStage::PersistContent, kind);
        let content: Vec<Value> = generated.iter().map(GeneratedContent::to_value).collect();
        let persisted_ids = UpdateContentCommand { artifact: &artifact, content }.execute()?;

        advance(trace, PipelineStage::Done, kind);
        debug!("pipeline:done type={kind} artifact={} context={context_items} generated={}",
               artifact.id,
               generated.len());
        Ok(PipelineOutcome { artifact_id: artifact.id,
                             artifact_type: kind,
                             context_items,
                             generated,
                             persisted_ids })
    }
}

fn current(trace: &[PipelineStage]) -> PipelineStage {
    trace.last().copied().unwrap_or(PipelineStage::LookupTemplate)
}

fn advance(trace: &mut Vec<PipelineStage>, next: PipelineStage, kind: ArtifactType) {
    debug!("pipeline:transition type={kind} {} -> {next}", current(trace));
    trace.push(next);
}
