mod config;
mod error;
mod factory;
mod integrator;

pub use config::{load_service_configs, AuthScheme, ServiceConfig, ServiceConfigs};
pub use error::ServiceError;
pub use factory::{api_key_var, create_service_integrator, create_service_integrator_with};
pub use integrator::{RequestMethod, ServiceIntegrator, ServiceResponse, DEFAULT_TIMEOUT};
