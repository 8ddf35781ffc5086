use log::debug;

use super::{ServiceConfigs, ServiceError, ServiceIntegrator};

/// Nombre de la variable de entorno con la clave del servicio.
pub fn api_key_var(service_name: &str) -> String {
    format!("{}_API_KEY", service_name.to_uppercase())
}

/// Crea el integrador de `service_name` con la clave tomada de
/// `<SERVICE_NAME>_API_KEY`.
pub fn create_service_integrator(service_name: &str, configs: &ServiceConfigs) -> Result<ServiceIntegrator, ServiceError> {
    create_service_integrator_with(service_name, configs, |var| std::env::var(var).ok())
}

/// Igual que `create_service_integrator` con una fuente de claves arbitraria.
pub fn create_service_integrator_with<F>(service_name: &str,
                                         configs: &ServiceConfigs,
                                         lookup: F)
                                         -> Result<ServiceIntegrator, ServiceError>
    where F: Fn(&str) -> Option<String>
{
    let config = configs.get(service_name)
                        .ok_or_else(|| ServiceError::UnsupportedService(service_name.to_string()))?;
    let api_key = lookup(&api_key_var(service_name)).filter(|k| !k.is_empty())
                                                    .ok_or_else(|| ServiceError::MissingApiKey(service_name.to_string()))?;
    debug!("service_integrator:create service={service_name} base_url={}", config.base_url);
    Ok(ServiceIntegrator::new(&config.base_url, Some(api_key), config.auth_type.clone()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::{AuthScheme, ServiceConfig};

    fn configs() -> ServiceConfigs {
        let mut c = ServiceConfigs::new();
        c.insert("openai",
                 ServiceConfig { base_url: "https://api.example.com/v1/".into(), auth_type: Some(AuthScheme::Bearer) });
        c
    }

    #[test]
    fn unknown_service_is_unsupported() {
        let err = create_service_integrator_with("nope", &configs(), |_| Some("k".into())).unwrap_err();
        assert!(matches!(err, ServiceError::UnsupportedService(ref s) if s == "nope"));
    }

    #[test]
    fn missing_key_is_reported() {
        let err = create_service_integrator_with("openai", &configs(), |_| None).unwrap_err();
        assert!(matches!(err, ServiceError::MissingApiKey(_)));
    }

    #[test]
    fn key_is_read_from_upper_case_variable() {
        let integrator = create_service_integrator_with("OpenAI", &configs(), |var| {
                             (var == "OPENAI_API_KEY").then(|| "sk-1".to_string())
                         }).unwrap();
        assert_eq!(integrator.base_url(), "https://api.example.com/v1");
        assert_eq!(integrator.default_header("Authorization"), Some("Bearer sk-1"));
    }
}
