//! Artigen Rust Library
//!
//! Fachada del workspace: generación de artifacts de ingeniería de requisitos
//! a partir de plantillas y del contenido ya producido por otros artifacts.
//!
//! - `artigen-domain`: value objects (`ArtifactType`, `PromptTemplate`, `Prompt`).
//! - `artigen-core`: contrato de stores, `ContentStore`, `Artifact` y el pipeline.
//! - `artigen-persistence`: backends JSON y SQLite, factory y configuración.
//! - `artigen-adapters`: integración HTTP y generadores.
//!
//! Aquí se re-exportan los tipos de uso más frecuente.

pub use artigen_adapters::{EchoGenerator, ServiceGenerator, ServiceIntegrator};
pub use artigen_core::{ArtifactContentService, ContentStore, Criteria, GenerationPort, GenerationRequest, PipelineError,
                       PipelineOutcome, Project, PromptTemplateStore, RecordStore};
pub use artigen_domain::{ArtifactType, Prompt, PromptTemplate};
pub use artigen_persistence::{BackendKind, RepositoryFactory, StoreConfig, Stores};

/// Servicio armado sobre `stores` con el generador dado.
pub fn content_service<G: GenerationPort>(stores: &Stores, generator: G) -> ArtifactContentService<G> {
    ArtifactContentService::new(stores.templates.clone(), stores.content.clone(), generator)
}
