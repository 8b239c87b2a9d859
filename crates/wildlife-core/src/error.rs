//! Error types for the wildlife sighting logger

use thiserror::Error;

pub type Result<T> = std::result::Result<T, WildlifeError>;

#[derive(Error, Debug)]
pub enum WildlifeError {
    /// Missing or malformed client input; the message is shown to the caller as is
    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    NotFound(String),

    #[error("Database not available after {attempts} attempt(s): {reason}")]
    StoreUnavailable { attempts: u32, reason: String },

    #[error("Database error: {0}")]
    Store(String),

    #[error("Operation timed out: {0}")]
    Timeout(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Config error: {0}")]
    Config(String),
}

impl WildlifeError {
    pub fn validation(message: impl Into<String>) -> Self {
        WildlifeError::Validation(message.into())
    }

    /// True for errors caused by the caller rather than by the infrastructure
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            WildlifeError::Validation(_) | WildlifeError::NotFound(_)
        )
    }
}

impl From<serde_json::Error> for WildlifeError {
    fn from(e: serde_json::Error) -> Self {
        WildlifeError::Serialization(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_errors() {
        assert!(WildlifeError::validation("bad").is_client_error());
        assert!(WildlifeError::NotFound("gone".into()).is_client_error());
        assert!(!WildlifeError::Store("down".into()).is_client_error());
    }

    #[test]
    fn test_unavailable_message() {
        let err = WildlifeError::StoreUnavailable {
            attempts: 3,
            reason: "connection refused".into(),
        };
        assert_eq!(
            err.to_string(),
            "Database not available after 3 attempt(s): connection refused"
        );
        assert_eq!(
            WildlifeError::validation("Sighting data is required").to_string(),
            "Sighting data is required"
        );
    }
}
