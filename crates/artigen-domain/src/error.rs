use thiserror::Error;

/// Error personalizado del dominio de artifacts.
#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum DomainError {
    #[error("Tipo de artifact desconocido: {0}")]
    UnknownArtifactType(String),

    #[error("Plantilla inválida: {0}")]
    InvalidTemplate(String),

    #[error("Error de serialización: {0}")]
    SerializationError(String),
}

impl From<serde_json::Error> for DomainError {
    fn from(e: serde_json::Error) -> Self {
        DomainError::SerializationError(e.to_string())
    }
}
