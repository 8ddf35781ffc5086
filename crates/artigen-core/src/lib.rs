//! artigen-core: repositorio de contenido + pipeline de resolución de contexto
//! y fan-out de prompts.
//!
//! Capas:
//! - `repo`: contrato `RecordStore` (save/load/delete/get_all/find_by) y un
//!   backend en memoria. Los backends durables viven en `artigen-persistence`.
//! - `content`: fachadas tipadas sobre un `RecordStore` (`ContentStore`,
//!   `PromptTemplateStore`).
//! - `model`: entidades `Artifact` y `Project`.
//! - `app`: queries, commands, puerto de generación y el servicio orquestador.
pub mod app;
pub mod content;
pub mod errors;
pub mod model;
pub mod repo;

pub use app::{ArtifactContentService, GenerationPort, GenerationRequest, PipelineOutcome, PipelineStage};
pub use content::{ContentStore, IdStrategy, PromptTemplateStore};
pub use errors::{GenerationError, PipelineError, RepositoryError};
pub use model::{Artifact, Project};
pub use repo::{Criteria, InMemoryRecordStore, Record, RecordStore};
