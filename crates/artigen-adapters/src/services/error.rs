use thiserror::Error;

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("Unsupported service: {0}")]
    UnsupportedService(String),
    #[error("No API key found for {0}")]
    MissingApiKey(String),
    #[error("Config error: {0}")]
    Config(String),
    #[error("HTTP {status} from {url}")]
    Status { status: u16, url: String, body: String },
    #[error("Transport error calling {url}: {message}")]
    Transport { url: String, message: String },
    #[error("Invalid response body from {url}: {message}")]
    InvalidBody { url: String, message: String },
}

impl From<std::io::Error> for ServiceError {
    fn from(e: std::io::Error) -> Self {
        ServiceError::Config(e.to_string())
    }
}

impl From<serde_json::Error> for ServiceError {
    fn from(e: serde_json::Error) -> Self {
        ServiceError::Config(e.to_string())
    }
}
