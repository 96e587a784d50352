//! Error types for remote store calls
//!
//! Separates the two ways a call can fail:
//! - the server answered with a non-success status
//! - the request never produced a usable answer (transport, decoding)

/// Remote store error
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RemoteError {
    /// Server answered with a non-success status
    #[error("server rejected request with status {status}: {}", message.as_deref().unwrap_or("no details"))]
    Rejected {
        /// HTTP status code
        status: u16,
        /// Server-provided error title, if any
        message: Option<String>,
    },

    /// Request could not be sent or no response arrived
    #[error("transport failure: {0}")]
    Transport(String),

    /// Response body could not be decoded
    #[error("undecodable response: {0}")]
    Decode(String),

    /// Base URL or endpoint is unusable
    #[error("invalid url: {0}")]
    InvalidUrl(String),
}

impl RemoteError {
    /// Create rejection error
    #[inline]
    pub fn rejected(status: u16, message: Option<String>) -> Self {
        Self::Rejected { status, message }
    }

    /// Check if the server reported the resource missing
    #[inline]
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::Rejected { status: 404, .. })
    }

    /// Check if the server answered at all
    #[inline]
    #[must_use]
    pub fn is_server_answer(&self) -> bool {
        matches!(self, Self::Rejected { .. })
    }

    /// Check if error is retryable
    #[inline]
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Transport(_) => true,
            Self::Rejected { status, .. } => *status >= 500 || *status == 429,
            Self::Decode(_) | Self::InvalidUrl(_) => false,
        }
    }

    /// Server-provided message, if any
    #[inline]
    #[must_use]
    pub fn server_message(&self) -> Option<&str> {
        match self {
            Self::Rejected { message, .. } => message.as_deref(),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for RemoteError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            Self::Decode(err.to_string())
        } else {
            Self::Transport(err.to_string())
        }
    }
}
