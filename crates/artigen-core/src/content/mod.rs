//! Fachadas tipadas sobre un `RecordStore`.
pub mod store;
pub mod templates;

pub use store::{ContentStore, IdStrategy, TYPE_KEY};
pub use templates::{PromptTemplateStore, ARTIFACT_TYPE_KEY};
