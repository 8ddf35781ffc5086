//! Capa de aplicación: queries, commands, puerto de generación y el servicio
//! que orquesta el pipeline.
pub mod commands;
pub mod generation;
pub mod queries;
pub mod service;

pub use commands::{GeneratePromptCommand, GetContextCommand, UpdateContentCommand};
pub use generation::GenerationPort;
pub use queries::{GetContextQuery, GetPromptTemplateQuery};
pub use service::{ArtifactContentService, GenerationRequest, PipelineOutcome, PipelineStage};
