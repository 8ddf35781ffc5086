//! artigen-adapters
//!
//! Implementaciones del puerto de generación y la integración con servicios
//! HTTP externos (LLMs u otros proveedores de contenido).
//!
//! - `services`: configuración por servicio, `ServiceIntegrator` y factory.
//! - `generation`: `EchoGenerator` (simulado) y `ServiceGenerator` (HTTP).
pub mod generation;
pub mod services;

pub use generation::{EchoGenerator, ServiceGenerator};
pub use services::{create_service_integrator, create_service_integrator_with, load_service_configs, AuthScheme,
                   RequestMethod, ServiceConfig, ServiceConfigs, ServiceError, ServiceIntegrator, ServiceResponse};
