//! Errores del core.
//!
//! Ningún store falla por "no encontrado": eso se expresa con `Option`,
//! `false` o colecciones vacías. Los errores aquí son de I/O, serialización o
//! backend, más la única guarda fail-fast del orquestador (`NoTemplate`).

use artigen_domain::{ArtifactType, DomainError};
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum RepositoryError {
    #[error("find_by requires at least one criterion (use get_all)")] EmptyCriteria,
    #[error("invalid record: {0}")] InvalidRecord(String),
    #[error("io: {0}")] Io(String),
    #[error("serialization: {0}")] Serialization(String),
    #[error("backend: {0}")] Backend(String),
    #[error(transparent)] Domain(#[from] DomainError),
}

impl From<serde_json::Error> for RepositoryError {
    fn from(e: serde_json::Error) -> Self {
        Self::Serialization(e.to_string())
    }
}

impl From<std::io::Error> for RepositoryError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e.to_string())
    }
}

/// Fallo del puerto de generación externo. El core no reintenta.
#[derive(Debug, Error, PartialEq, Eq, Clone)]
#[error("generation failed: {0}")]
pub struct GenerationError(pub String);

impl GenerationError {
    pub fn new(msg: impl Into<String>) -> Self {
        Self(msg.into())
    }
}

#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum PipelineError {
    #[error("no template found for artifact type: {0}")] NoTemplate(ArtifactType),
    #[error(transparent)] Repository(#[from] RepositoryError),
    #[error(transparent)] Domain(#[from] DomainError),
    #[error(transparent)] Generation(#[from] GenerationError),
}
