//! artigen-persistence
//!
//! Backends durables del contrato `RecordStore` definido en `artigen-core`.
//!
//! Módulos:
//! - `json`: un documento JSON por store lógico (lista de registros).
//! - `sql`: tabla `records` en SQLite vía Diesel + pool r2d2.
//! - `factory`: selección del backend por nombre, sin filtrar tipos concretos.
//! - `stores`: construcción explícita de los stores de plantillas y contenido.
//! - `config`: carga de configuración desde `.env` / variables de entorno.
//! - `migrations`: runner embebido de migraciones Diesel.
//! - `schema`: tablas Diesel declaradas para compilar queries.

pub mod config;
pub mod error;
pub mod factory;
pub mod json;
pub mod migrations;
pub mod schema;
pub mod sql;
pub mod stores;

pub use config::{init_dotenv, StoreConfig};
pub use error::PersistenceError;
pub use factory::{BackendKind, RepositoryFactory};
pub use json::JsonRecordStore;
pub use sql::{build_pool, ConnectionProvider, PoolProvider, SqlRecordStore, SqlitePool};
pub use stores::Stores;
