//! Cliente HTTP genérico para servicios externos.
//!
//! - La URL final es `base_url` (sin `/` final) + `/` + `endpoint` (sin `/`
//!   inicial).
//! - Los headers por defecto incluyen la autenticación; los headers de cada
//!   llamada los pisan por nombre (sin distinguir mayúsculas).
//! - Un status fuera de 2xx y los errores de transporte se loguean y se
//!   devuelven al llamador; no hay reintentos.
use std::collections::BTreeMap;
use std::fmt;
use std::time::Duration;

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use log::{debug, error};
use serde_json::Value;

use super::{AuthScheme, ServiceError};

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RequestMethod {
    Get,
    Post,
    Put,
    Delete,
    Patch,
}

impl RequestMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            RequestMethod::Get => "GET",
            RequestMethod::Post => "POST",
            RequestMethod::Put => "PUT",
            RequestMethod::Delete => "DELETE",
            RequestMethod::Patch => "PATCH",
        }
    }
}

impl fmt::Display for RequestMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Respuesta normalizada. `data` es `None` cuando el cuerpo viene vacío.
#[derive(Debug, Clone, PartialEq)]
pub struct ServiceResponse {
    pub status: u16,
    pub headers: BTreeMap<String, String>,
    pub data: Option<Value>,
}

pub struct ServiceIntegrator {
    base_url: String,
    timeout: Duration,
    default_headers: Vec<(String, String)>,
    agent: ureq::Agent,
}

impl fmt::Debug for ServiceIntegrator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Sin headers: contienen la clave.
        f.debug_struct("ServiceIntegrator")
         .field("base_url", &self.base_url)
         .field("timeout", &self.timeout)
         .finish()
    }
}

impl ServiceIntegrator {
    pub fn new(base_url: &str, api_key: Option<String>, auth_type: Option<AuthScheme>) -> Self {
        Self::with_timeout(base_url, api_key, auth_type, DEFAULT_TIMEOUT)
    }

    pub fn with_timeout(base_url: &str,
                        api_key: Option<String>,
                        auth_type: Option<AuthScheme>,
                        timeout: Duration)
                        -> Self {
        let mut default_headers = Vec::new();
        if let Some(key) = api_key {
            default_headers.push(match auth_type {
                                     Some(AuthScheme::Bearer) => ("Authorization".to_string(), format!("Bearer {key}")),
                                     Some(AuthScheme::Basic) => {
                                         ("Authorization".to_string(), format!("Basic {}", STANDARD.encode(format!("{key}:"))))
                                     }
                                     Some(AuthScheme::ApiKey) | None => ("api-key".to_string(), key),
                                 });
        }
        let agent = ureq::AgentBuilder::new().timeout(timeout).build();
        Self { base_url: base_url.trim_end_matches('/').to_string(), timeout, default_headers, agent }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub fn default_header(&self, name: &str) -> Option<&str> {
        self.default_headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    pub fn url_for(&self, endpoint: &str) -> String {
        format!("{}/{}", self.base_url, endpoint.trim_start_matches('/'))
    }

    /// Ejecuta una llamada. `body`, si está presente, se envía como JSON.
    pub fn make_request(&self,
                        endpoint: &str,
                        method: RequestMethod,
                        params: &[(&str, &str)],
                        body: Option<&Value>,
                        headers: &[(&str, &str)])
                        -> Result<ServiceResponse, ServiceError> {
        let url = self.url_for(endpoint);
        debug!("service_request method={method} url={url}");

        let mut merged: Vec<(String, String)> = self.default_headers.clone();
        for (name, value) in headers {
            merged.retain(|(k, _)| !k.eq_ignore_ascii_case(name));
            merged.push((name.to_string(), value.to_string()));
        }

        let mut request = self.agent.request(method.as_str(), &url);
        for (k, v) in params {
            request = request.query(k, v);
        }
        for (k, v) in &merged {
            request = request.set(k, v);
        }

        let result = match body {
            Some(b) => request.send_json(b),
            None => request.call(),
        };
        let response = match result {
            Ok(resp) => resp,
            Err(ureq::Error::Status(status, resp)) => {
                let body = resp.into_string().unwrap_or_default();
                error!("service_request failed: HTTP {status} url={url}");
                return Err(ServiceError::Status { status, url, body });
            }
            Err(ureq::Error::Transport(t)) => {
                error!("service_request failed: transport url={url} err={t}");
                return Err(ServiceError::Transport { url, message: t.to_string() });
            }
        };

        let status = response.status();
        let headers = response.headers_names()
                              .into_iter()
                              .filter_map(|name| response.header(&name).map(|v| (name.clone(), v.to_string())))
                              .collect();
        let raw = response.into_string().map_err(|e| invalid_body(&url, e))?;
        let data = if raw.trim().is_empty() {
            None
        } else {
            Some(serde_json::from_str(&raw).map_err(|e| invalid_body(&url, e))?)
        };
        Ok(ServiceResponse { status, headers, data })
    }
}

fn invalid_body(url: &str, err: impl fmt::Display) -> ServiceError {
    error!("service_request failed: invalid body url={url} err={err}");
    ServiceError::InvalidBody { url: url.to_string(), message: err.to_string() }
}
