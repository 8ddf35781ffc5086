//! Configuración de servicios externos: un documento JSON plano
//! `{ "<servicio>": { "base_url": ..., "auth_type": ... } }`.
use std::collections::HashMap;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use super::ServiceError;

/// Esquema de autenticación. Cualquier valor distinto de `bearer`/`basic`
/// envía la clave en el header `api-key`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum AuthScheme {
    Bearer,
    Basic,
    ApiKey,
}

impl From<String> for AuthScheme {
    fn from(s: String) -> Self {
        match s.to_ascii_lowercase().as_str() {
            "bearer" => AuthScheme::Bearer,
            "basic" => AuthScheme::Basic,
            _ => AuthScheme::ApiKey,
        }
    }
}

impl From<AuthScheme> for String {
    fn from(a: AuthScheme) -> Self {
        match a {
            AuthScheme::Bearer => "bearer".into(),
            AuthScheme::Basic => "basic".into(),
            AuthScheme::ApiKey => "api_key".into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceConfig {
    pub base_url: String,
    #[serde(default)]
    pub auth_type: Option<AuthScheme>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ServiceConfigs(HashMap<String, ServiceConfig>);

impl ServiceConfigs {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: &str, config: ServiceConfig) {
        self.0.insert(name.to_lowercase(), config);
    }

    /// Búsqueda sin distinguir mayúsculas.
    pub fn get(&self, name: &str) -> Option<&ServiceConfig> {
        self.0
            .get(&name.to_lowercase())
            .or_else(|| self.0.iter().find(|(k, _)| k.eq_ignore_ascii_case(name)).map(|(_, v)| v))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

pub fn load_service_configs(path: impl AsRef<Path>) -> Result<ServiceConfigs, ServiceError> {
    let raw = fs::read_to_string(path.as_ref())?;
    Ok(serde_json::from_str(&raw)?)
}
