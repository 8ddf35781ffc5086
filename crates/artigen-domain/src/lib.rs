// artigen-domain library entry point
pub mod artifact_type;
pub mod error;
pub mod prompt;
pub mod prompt_template;

pub use artifact_type::ArtifactType;
pub use error::DomainError;
pub use prompt::{GeneratedContent, Prompt};
pub use prompt_template::{PromptTemplate, TemplatePayload};
