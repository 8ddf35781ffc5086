//! Construcción explícita de los stores de una aplicación.
//!
//! En lugar de singletons a nivel de módulo, el llamador obtiene un `Stores`
//! y lo inyecta en el `ArtifactContentService`; su vida útil la decide él.
use std::sync::Arc;

use artigen_core::{ContentStore, InMemoryRecordStore, PromptTemplateStore};
use log::debug;

use crate::config::StoreConfig;
use crate::factory::RepositoryFactory;
use crate::PersistenceError;

pub struct Stores {
    pub templates: Arc<PromptTemplateStore>,
    pub content: Arc<ContentStore>,
}

impl Stores {
    pub fn open(config: &StoreConfig) -> Result<Self, PersistenceError> {
        debug!("stores:open backend={} dir={}", config.backend, config.db_dir.display());
        let templates = RepositoryFactory::create_kind(config.backend, config.template_location(), config.max_connections)?;
        let content = RepositoryFactory::create_kind(config.backend, config.content_location(), config.max_connections)?;
        Ok(Self { templates: Arc::new(PromptTemplateStore::new(templates)),
                  content: Arc::new(ContentStore::new(content).with_id_strategy(config.content_ids)) })
    }

    /// Lee `StoreConfig` del entorno y abre ambos stores.
    pub fn from_env() -> Result<Self, PersistenceError> {
        Self::open(&StoreConfig::from_env()?)
    }

    /// Stores efímeros (sin disco), útiles en tests y corridas de prueba.
    pub fn in_memory() -> Self {
        Self { templates: Arc::new(PromptTemplateStore::new(Box::new(InMemoryRecordStore::new()))),
               content: Arc::new(ContentStore::new(Box::new(InMemoryRecordStore::new()))) }
    }
}
