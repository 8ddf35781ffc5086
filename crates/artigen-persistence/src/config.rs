//! Configuración de los stores desde variables de entorno.
//!
//! - `ARTIGEN_STORE_BACKEND`: `json` (default) o `sql`.
//! - `ARTIGEN_DB_DIR`: directorio de los stores (default `db`).
//! - `ARTIGEN_SQL_MAX_CONNECTIONS`: tamaño máximo del pool (default 4).
//! - `ARTIGEN_CONTENT_IDS`: `uuid` (default) o `sequential` (`content_<n+1>`).

use std::env;
use std::path::{Path, PathBuf};

use artigen_core::IdStrategy;
use dotenvy::dotenv;
use once_cell::sync::Lazy;

use crate::factory::BackendKind;
use crate::PersistenceError;

// Carga perezosa del archivo .env una sola vez.
static DOTENV_LOADED: Lazy<()> = Lazy::new(|| {
    let _ = dotenv(); // ignora error si no existe .env
});

pub const DEFAULT_DB_DIR: &str = "db";
pub const DEFAULT_MAX_CONNECTIONS: u32 = 4;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    pub backend: BackendKind,
    pub db_dir: PathBuf,
    pub max_connections: u32,
    pub content_ids: IdStrategy,
}

impl StoreConfig {
    pub fn new(backend: BackendKind, db_dir: impl Into<PathBuf>) -> Self {
        Self { backend,
               db_dir: db_dir.into(),
               max_connections: DEFAULT_MAX_CONNECTIONS,
               content_ids: IdStrategy::default() }
    }

    /// Lee la configuración del entorno (previa carga de `.env`). Un backend
    /// desconocido es un error de configuración.
    pub fn from_env() -> Result<Self, PersistenceError> {
        Lazy::force(&DOTENV_LOADED);
        let backend = match env::var("ARTIGEN_STORE_BACKEND") {
            Ok(v) => v.parse()?,
            Err(_) => BackendKind::Json,
        };
        let db_dir = env::var("ARTIGEN_DB_DIR").map(PathBuf::from)
                                               .unwrap_or_else(|_| PathBuf::from(DEFAULT_DB_DIR));
        let max_connections = env::var("ARTIGEN_SQL_MAX_CONNECTIONS").ok()
                                                                     .and_then(|v| v.parse().ok())
                                                                     .unwrap_or(DEFAULT_MAX_CONNECTIONS);
        let content_ids = match env::var("ARTIGEN_CONTENT_IDS").as_deref() {
            Ok("sequential") => IdStrategy::Sequential,
            Ok("uuid") | Err(_) => IdStrategy::Uuid,
            Ok(other) => return Err(PersistenceError::Config(format!("unknown ARTIGEN_CONTENT_IDS: {other}"))),
        };
        Ok(Self { backend, db_dir, max_connections, content_ids })
    }

    /// Ubicación del store de plantillas.
    pub fn template_location(&self) -> PathBuf {
        self.location_for("prompts")
    }

    /// Ubicación del store de contenido.
    pub fn content_location(&self) -> PathBuf {
        self.location_for("contents")
    }

    fn location_for(&self, name: &str) -> PathBuf {
        let file = match self.backend {
            BackendKind::Json => format!("{name}.json"),
            BackendKind::Sql => format!("{name}.db"),
        };
        Path::new(&self.db_dir).join(file)
    }
}

/// Forzar carga temprana de .env desde aplicaciones externas si se desea.
pub fn init_dotenv() {
    Lazy::force(&DOTENV_LOADED);
}
