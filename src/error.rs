use thiserror::Error;

#[derive(Error, Debug)]
pub enum ScraperError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON deserialization failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML deserialization failed: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("CSV serialization failed: {0}")]
    Csv(#[from] csv::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Unexpected status {status} from {url}")]
    Status { url: String, status: u16 },

    #[error("API error: {message}")]
    Api { message: String },
}

impl ScraperError {
    /// Network, timeout, non-2xx and unreadable-body failures of an upstream call.
    /// These degrade to "no data" instead of aborting a run.
    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            ScraperError::Http(_) | ScraperError::Status { .. } | ScraperError::Json(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, ScraperError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transport_classification() {
        let body = serde_json::from_str::<serde_json::Value>("<html>").unwrap_err();
        assert!(ScraperError::Json(body).is_transport());
        assert!(ScraperError::Status { url: "u".into(), status: 503 }.is_transport());
        assert!(!ScraperError::Config("missing key".into()).is_transport());
        assert!(!ScraperError::Api { message: "x".into() }.is_transport());
    }
}
