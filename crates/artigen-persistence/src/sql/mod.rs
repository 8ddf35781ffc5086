//! Backend relacional (SQLite vía Diesel) del contrato `RecordStore`.
//!
//! - Tabla `records` con `id` como clave primaria; `seq` fija el orden de
//!   inserción (se conserva al reemplazar un registro existente).
//! - `content` y `metadata` se guardan como JSON textual. `find_by` compara en
//!   proceso con la misma regla que el backend JSON, así ambos backends
//!   responden idéntico para los mismos datos.
//! - Cada escritura corre en una transacción `IMMEDIATE`; errores transitorios
//!   (`database is locked`, pool) se reintentan con backoff corto.

use std::path::Path;

use artigen_core::repo::{ensure_criteria, generate_record_id};
use artigen_core::{Criteria, Record, RecordStore, RepositoryError};
use diesel::connection::SimpleConnection;
use diesel::prelude::*;
use diesel::r2d2::{self, ConnectionManager};
use diesel::sqlite::SqliteConnection;
use log::{debug, warn};
use serde_json::{Map, Value};

use crate::error::PersistenceError;
use crate::migrations::run_pending_migrations;
use crate::schema::records;

/// Alias de tipo para el pool r2d2 de conexiones SQLite.
pub type SqlitePool = r2d2::Pool<ConnectionManager<SqliteConnection>>;

/// Proveedor abstracto de conexiones.
///
/// Permite inyectar un pool real o uno armado a mano en tests sin acoplar el
/// store a r2d2.
pub trait ConnectionProvider: Send + Sync + 'static {
    fn connection(&self) -> Result<r2d2::PooledConnection<ConnectionManager<SqliteConnection>>, PersistenceError>;
}

/// Implementación concreta de `ConnectionProvider` respaldada por un `SqlitePool`.
pub struct PoolProvider {
    pub pool: SqlitePool,
}

impl ConnectionProvider for PoolProvider {
    fn connection(&self) -> Result<r2d2::PooledConnection<ConnectionManager<SqliteConnection>>, PersistenceError> {
        self.pool
            .get()
            .map_err(|e| PersistenceError::TransientIo(format!("pool error: {e}")))
    }
}

/// Fila mapeada de la tabla `records`.
#[derive(Queryable, Selectable, Debug)]
#[diesel(table_name = records)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct RecordRow {
    pub id: String,
    pub seq: i64,
    pub content: Option<String>,
    pub metadata: String,
}

/// Fila para insertar en `records`.
#[derive(Insertable, Debug)]
#[diesel(table_name = records)]
pub struct NewRecordRow<'a> {
    pub id: &'a str,
    pub seq: i64,
    pub content: Option<&'a str>,
    pub metadata: &'a str,
}

impl RecordRow {
    fn into_record(self) -> Result<Record, PersistenceError> {
        let content = self.content.as_deref().map(serde_json::from_str::<Value>).transpose()?;
        let metadata: Map<String, Value> = serde_json::from_str(&self.metadata)?;
        Ok(Record { id: Some(self.id), content, metadata })
    }
}

/// `content` y `metadata` serializados para las columnas de texto.
struct EncodedRecord {
    content: Option<String>,
    metadata: String,
}

fn encode(record: &Record) -> Result<EncodedRecord, PersistenceError> {
    let content = record.content.as_ref().map(serde_json::to_string).transpose()?;
    let metadata = serde_json::to_string(&record.metadata)?;
    Ok(EncodedRecord { content, metadata })
}

/// Reemplazo in situ (conserva `seq`) o inserción al final.
fn upsert(tx: &mut SqliteConnection, id: &str, row: &EncodedRecord) -> QueryResult<()> {
    let updated = diesel::update(records::table.find(id))
        .set((records::content.eq(row.content.as_deref()), records::metadata.eq(row.metadata.as_str())))
        .execute(tx)?;
    if updated == 0 {
        let last: Option<i64> = records::table.select(diesel::dsl::max(records::seq)).first(tx)?;
        diesel::insert_into(records::table)
            .values(NewRecordRow { id,
                                   seq: last.unwrap_or(0) + 1,
                                   content: row.content.as_deref(),
                                   metadata: &row.metadata })
            .execute(tx)?;
    }
    Ok(())
}

/// Determina si un error es transitorio (conviene reintentar).
fn is_retryable(e: &PersistenceError) -> bool {
    match e {
        PersistenceError::TransientIo(_) => true,
        PersistenceError::Unknown(msg) => {
            let m = msg.to_lowercase();
            m.contains("database is locked") || m.contains("database table is locked") || m.contains("busy")
        }
        _ => false,
    }
}

/// Retry simple con backoff lineal (hasta 3 reintentos: 15ms, 30ms, 45ms).
fn with_retry<F, T>(mut f: F) -> Result<T, PersistenceError>
    where F: FnMut() -> Result<T, PersistenceError>
{
    let mut attempts = 0;
    loop {
        match f() {
            Err(e) if is_retryable(&e) && attempts < 3 => {
                let delay_ms = 15 * ((attempts + 1) as u64);
                warn!("retryable error (attempt {}): {:?} -> sleeping {}ms", attempts + 1, e, delay_ms);
                std::thread::sleep(std::time::Duration::from_millis(delay_ms));
                attempts += 1;
            }
            r => return r,
        }
    }
}

/// Pragmas por conexión: esperar al lock en vez de fallar de inmediato.
#[derive(Debug)]
struct SqlitePragmas;

impl r2d2::CustomizeConnection<SqliteConnection, r2d2::Error> for SqlitePragmas {
    fn on_acquire(&self, conn: &mut SqliteConnection) -> Result<(), r2d2::Error> {
        conn.batch_execute("PRAGMA busy_timeout = 5000;").map_err(r2d2::Error::QueryError)
    }
}

/// Construye un pool SQLite y corre las migraciones pendientes.
///
/// `:memory:` fuerza un pool de una sola conexión que nunca se recicla (cada
/// conexión nueva sería una base distinta).
pub fn build_pool(database_url: &str, max_size: u32) -> Result<SqlitePool, PersistenceError> {
    let in_memory = database_url == ":memory:";
    let max_size = if max_size == 0 || in_memory { 1 } else { max_size };
    let manager = ConnectionManager::<SqliteConnection>::new(database_url);
    let mut builder = r2d2::Pool::builder().max_size(max_size)
                                           .connection_customizer(Box::new(SqlitePragmas));
    if in_memory {
        builder = builder.min_idle(Some(1)).idle_timeout(None).max_lifetime(None);
    }
    let pool = builder.build(manager)
                      .map_err(|e| PersistenceError::TransientIo(format!("pool build: {e}")))?;
    {
        let mut conn = pool.get()
                           .map_err(|e| PersistenceError::TransientIo(format!("pool get for migrations: {e}")))?;
        run_pending_migrations(&mut conn)?;
    }
    Ok(pool)
}

pub struct SqlRecordStore<P: ConnectionProvider = PoolProvider> {
    provider: P,
}

impl<P: ConnectionProvider> SqlRecordStore<P> {
    pub fn new(provider: P) -> Self {
        Self { provider }
    }

    fn load_rows(&self) -> Result<Vec<RecordRow>, PersistenceError> {
        with_retry(|| {
            let mut conn = self.provider.connection()?;
            records::table.order(records::seq.asc())
                          .select(RecordRow::as_select())
                          .load(&mut conn)
                          .map_err(PersistenceError::from)
        })
    }

    fn load_records(&self) -> Result<Vec<Record>, PersistenceError> {
        self.load_rows()?.into_iter().map(RecordRow::into_record).collect()
    }
}

impl SqlRecordStore<PoolProvider> {
    /// Abre (o crea) la base en `location`, creando directorios padre.
    pub fn open(location: impl AsRef<Path>, max_connections: u32) -> Result<Self, PersistenceError> {
        let location = location.as_ref();
        let url = location.to_str()
                          .ok_or_else(|| PersistenceError::Config(format!("non UTF-8 database path: {}", location.display())))?;
        if url != ":memory:" {
            if let Some(parent) = location.parent().filter(|p| !p.as_os_str().is_empty()) {
                std::fs::create_dir_all(parent)?;
            }
        }
        debug!("sql_store:open url={url} max_connections={max_connections}");
        let pool = build_pool(url, max_connections)?;
        Ok(Self::new(PoolProvider { pool }))
    }
}

impl<P: ConnectionProvider> RecordStore for SqlRecordStore<P> {
    fn save(&self, mut record: Record) -> Result<String, RepositoryError> {
        let id = record.id.get_or_insert_with(generate_record_id).clone();
        let row = encode(&record)?;
        with_retry(|| {
            let mut conn = self.provider.connection()?;
            conn.immediate_transaction(|tx| upsert(tx, &id, &row))
                .map_err(PersistenceError::from)
        })?;
        debug!("sql_store:save id={id}");
        Ok(id)
    }

    // Borrado de la selección e inserciones en la misma transacción.
    fn replace_where(&self, criteria: &Criteria, replacement: Vec<Record>) -> Result<Vec<String>, RepositoryError> {
        ensure_criteria(criteria)?;
        let mut fresh = Vec::with_capacity(replacement.len());
        for mut record in replacement {
            let id = record.id.get_or_insert_with(generate_record_id).clone();
            fresh.push((id, encode(&record)?));
        }
        let removed = with_retry(|| {
            let mut conn = self.provider.connection()?;
            conn.immediate_transaction(|tx| {
                    let rows: Vec<RecordRow> = records::table.order(records::seq.asc())
                                                             .select(RecordRow::as_select())
                                                             .load(tx)?;
                    let mut stale = Vec::new();
                    for row in rows {
                        // Una fila ilegible no se toca: no puede cumplir los criterios.
                        if let Ok(record) = row.into_record() {
                            if record.matches(criteria) {
                                stale.extend(record.id);
                            }
                        }
                    }
                    let removed = stale.len();
                    if removed > 0 {
                        diesel::delete(records::table.filter(records::id.eq_any(stale))).execute(tx)?;
                    }
                    for (id, row) in &fresh {
                        upsert(tx, id, row)?;
                    }
                    Ok::<usize, diesel::result::Error>(removed)
                })
                .map_err(PersistenceError::from)
        })?;
        debug!("sql_store:replace_where removed={removed} inserted={}", fresh.len());
        Ok(fresh.into_iter().map(|(id, _)| id).collect())
    }

    fn load(&self, id: &str) -> Result<Option<Record>, RepositoryError> {
        let row = with_retry(|| {
            let mut conn = self.provider.connection()?;
            records::table.find(id)
                          .select(RecordRow::as_select())
                          .first(&mut conn)
                          .optional()
                          .map_err(PersistenceError::from)
        })?;
        Ok(row.map(RecordRow::into_record).transpose()?)
    }

    fn delete(&self, id: &str) -> Result<bool, RepositoryError> {
        let deleted = with_retry(|| {
            let mut conn = self.provider.connection()?;
            diesel::delete(records::table.find(id)).execute(&mut conn)
                                                   .map_err(PersistenceError::from)
        })?;
        Ok(deleted > 0)
    }

    fn get_all(&self) -> Result<Vec<Record>, RepositoryError> {
        Ok(self.load_records()?)
    }

    fn find_by(&self, criteria: &Criteria) -> Result<Vec<Record>, RepositoryError> {
        ensure_criteria(criteria)?;
        Ok(self.load_records()?.into_iter().filter(|r| r.matches(criteria)).collect())
    }
}
