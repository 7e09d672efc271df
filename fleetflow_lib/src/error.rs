//! Error types for the library layer.

use std::fmt;

/// Errors produced by the library layer, wrapping API errors and adding
/// decoding, input and configuration failures.
#[derive(Debug)]
pub enum FleetError {
    /// An error from the underlying API client.
    Api(fleetflow_api::Error),
    /// A payload did not decode into the requested record type, or a
    /// request body could not be encoded.
    Serialization(serde_json::Error),
    /// Caller-provided input, or a server answer, that cannot be used.
    InvalidInput(String),
    /// The configuration file or an override could not be read.
    Config(String),
    /// Local filesystem failure (token file, upload source).
    Io(std::io::Error),
}

impl FleetError {
    /// True when the server rejected the session and the login redirect was issued.
    pub fn is_session_expired(&self) -> bool {
        matches!(self, Self::Api(fleetflow_api::Error::SessionExpired))
    }
}

impl fmt::Display for FleetError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            // Server messages are shown to users as they are.
            Self::Api(e) => write!(f, "{}", e),
            Self::Serialization(e) => write!(f, "Serialization error: {}", e),
            Self::InvalidInput(msg) => write!(f, "{}", msg),
            Self::Config(msg) => write!(f, "Configuration error: {}", msg),
            Self::Io(e) => write!(f, "I/O error: {}", e),
        }
    }
}

impl std::error::Error for FleetError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Api(e) => Some(e),
            Self::Serialization(e) => Some(e),
            Self::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<fleetflow_api::Error> for FleetError {
    fn from(e: fleetflow_api::Error) -> Self {
        Self::Api(e)
    }
}

impl From<serde_json::Error> for FleetError {
    fn from(e: serde_json::Error) -> Self {
        Self::Serialization(e)
    }
}

impl From<std::io::Error> for FleetError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn api_messages_pass_through() {
        let err = FleetError::from(fleetflow_api::Error::HttpStatus {
            status: 422,
            message: "The code has already been taken.".into(),
        });
        assert_eq!(err.to_string(), "The code has already been taken.");
        assert!(!err.is_session_expired());
        assert!(FleetError::from(fleetflow_api::Error::SessionExpired).is_session_expired());
    }
}
