//! Selección del backend de `RecordStore`.
//!
//! Conjunto cerrado: `json` (documento en archivo) y `sql` (tabla SQLite).
//! El llamador sólo recibe `Box<dyn RecordStore>`.
use std::fmt;
use std::path::Path;
use std::str::FromStr;

use artigen_core::RecordStore;
use log::debug;

use crate::json::JsonRecordStore;
use crate::sql::SqlRecordStore;
use crate::PersistenceError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BackendKind {
    Json,
    Sql,
}

impl FromStr for BackendKind {
    type Err = PersistenceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "json" => Ok(BackendKind::Json),
            "sql" | "sqlite" => Ok(BackendKind::Sql),
            _ => Err(PersistenceError::UnknownBackend(s.to_string())),
        }
    }
}

impl fmt::Display for BackendKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BackendKind::Json => f.write_str("json"),
            BackendKind::Sql => f.write_str("sql"),
        }
    }
}

pub struct RepositoryFactory;

impl RepositoryFactory {
    /// Construye el backend `kind` en `location`. Un `kind` fuera del conjunto
    /// falla con `UnknownBackend` antes de tocar el disco.
    pub fn create(kind: &str, location: impl AsRef<Path>) -> Result<Box<dyn RecordStore>, PersistenceError> {
        let kind: BackendKind = kind.parse()?;
        Self::create_kind(kind, location, crate::config::DEFAULT_MAX_CONNECTIONS)
    }

    pub fn create_kind(kind: BackendKind,
                       location: impl AsRef<Path>,
                       max_connections: u32)
                       -> Result<Box<dyn RecordStore>, PersistenceError> {
        let location = location.as_ref();
        debug!("create_repo kind={kind} location={}", location.display());
        Ok(match kind {
            BackendKind::Json => Box::new(JsonRecordStore::open(location)?),
            BackendKind::Sql => Box::new(SqlRecordStore::open(location, max_connections)?),
        })
    }
}
