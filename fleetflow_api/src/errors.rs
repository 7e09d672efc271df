//! Error types for the API client.

/// Errors that can occur when making API requests.
///
/// Every variant carries owned strings so the error can be cloned into
/// resource state snapshots and compared in tests.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// The request never reached the server or the response never came back.
    #[error("Request failed: {0}")]
    Transport(String),
    /// The server answered with a body that is not valid JSON, or the
    /// request body could not be encoded.
    #[error("Invalid response: {0}")]
    Protocol(String),
    /// The server answered with a non-success status. `message` is the
    /// `message` field of the error envelope when the server sent one.
    #[error("{message}")]
    HttpStatus { status: u16, message: String },
    /// The server rejected the session token. The token has already been
    /// cleared and the login redirect issued when this is returned.
    #[error("Session expired. Redirecting to login.")]
    SessionExpired,
    /// A base URL or request path could not be turned into a URL.
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),
}

impl Error {
    /// The HTTP status behind this error, if the server answered at all.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::HttpStatus { status, .. } => Some(*status),
            Self::SessionExpired => Some(401),
            _ => None,
        }
    }
}
