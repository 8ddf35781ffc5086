//! Backend de archivo: un único documento JSON (lista de registros) por store.
//!
//! - El documento se carga al abrir y se mantiene en memoria tras un mutex,
//!   que también serializa a los escritores del proceso. Se asume una sola
//!   instancia por ruta dentro del proceso.
//! - Cada escritura reescribe el documento completo en un archivo temporal
//!   del mismo directorio y lo renombra sobre el original, así un lector nunca
//!   ve un documento a medio escribir.
//! - La caché sólo se actualiza si la escritura en disco tuvo éxito.
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

use artigen_core::repo::{apply_replace, ensure_criteria, generate_record_id};
use artigen_core::{Criteria, Record, RecordStore, RepositoryError};
use log::debug;
use uuid::Uuid;

use crate::PersistenceError;

pub struct JsonRecordStore {
    path: PathBuf,
    records: Mutex<Vec<Record>>,
}

impl JsonRecordStore {
    /// Abre (o prepara) el documento en `path`. Un archivo inexistente o
    /// vacío es un store vacío; los directorios padre se crean.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, PersistenceError> {
        let path = path.as_ref().to_path_buf();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        let records = if path.exists() {
            let raw = fs::read_to_string(&path)?;
            if raw.trim().is_empty() {
                Vec::new()
            } else {
                serde_json::from_str(&raw)?
            }
        } else {
            Vec::new()
        };
        debug!("json_store:open path={} records={}", path.display(), records.len());
        Ok(Self { path, records: Mutex::new(records) })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn lock(&self) -> Result<MutexGuard<'_, Vec<Record>>, RepositoryError> {
        self.records
            .lock()
            .map_err(|_| RepositoryError::Backend(format!("json store lock poisoned: {}", self.path.display())))
    }

    fn write_document(&self, records: &[Record]) -> Result<(), PersistenceError> {
        let body = serde_json::to_string_pretty(records)?;
        let file_name = self.path
                            .file_name()
                            .map(|n| n.to_string_lossy().into_owned())
                            .unwrap_or_else(|| "store.json".to_string());
        let tmp = self.path.with_file_name(format!(".{file_name}.{}.tmp", Uuid::new_v4().simple()));
        fs::write(&tmp, body)?;
        if let Err(e) = fs::rename(&tmp, &self.path) {
            let _ = fs::remove_file(&tmp);
            return Err(e.into());
        }
        Ok(())
    }

    /// Aplica `f` sobre una copia, persiste y sólo entonces publica la copia.
    fn mutate<T>(&self, f: impl FnOnce(&mut Vec<Record>) -> T) -> Result<T, RepositoryError> {
        let mut guard = self.lock()?;
        let mut next = guard.clone();
        let out = f(&mut next);
        self.write_document(&next)?;
        *guard = next;
        Ok(out)
    }
}

impl RecordStore for JsonRecordStore {
    fn save(&self, mut record: Record) -> Result<String, RepositoryError> {
        let id = record.id.get_or_insert_with(generate_record_id).clone();
        self.mutate(|records| match records.iter_mut().find(|r| r.id.as_deref() == Some(id.as_str())) {
                Some(slot) => *slot = record,
                None => records.push(record),
            })?;
        Ok(id)
    }

    fn load(&self, id: &str) -> Result<Option<Record>, RepositoryError> {
        Ok(self.lock()?.iter().find(|r| r.id.as_deref() == Some(id)).cloned())
    }

    fn delete(&self, id: &str) -> Result<bool, RepositoryError> {
        if !self.lock()?.iter().any(|r| r.id.as_deref() == Some(id)) {
            return Ok(false);
        }
        self.mutate(|records| {
                let before = records.len();
                records.retain(|r| r.id.as_deref() != Some(id));
                records.len() != before
            })
    }

    fn get_all(&self) -> Result<Vec<Record>, RepositoryError> {
        Ok(self.lock()?.clone())
    }

    fn find_by(&self, criteria: &Criteria) -> Result<Vec<Record>, RepositoryError> {
        ensure_criteria(criteria)?;
        Ok(self.lock()?.iter().filter(|r| r.matches(criteria)).cloned().collect())
    }

    // Un único `mutate`: una sola reescritura del documento.
    fn replace_where(&self, criteria: &Criteria, records: Vec<Record>) -> Result<Vec<String>, RepositoryError> {
        ensure_criteria(criteria)?;
        self.mutate(|current| apply_replace(current, criteria, records))
    }
}
