//! Entidades de coordinación (no persistidas): `Artifact` y `Project`.

pub mod artifact;
pub mod project;

pub use artifact::Artifact;
pub use project::Project;
