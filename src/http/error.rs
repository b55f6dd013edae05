use std::fmt;

/// Why a release could not be fetched.
///
/// Both variants are recoverable: the caller logs them and keeps whatever
/// state it already had.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchError {
    /// Network failure, timeout, or a server-side (5xx) error
    Transport(String),
    /// Response that is not a usable release payload
    InvalidResponse(String),
}

impl FetchError {
    pub(crate) fn from_reqwest(error: reqwest::Error) -> Self {
        if error.is_timeout() {
            FetchError::Transport(format!("Request timed out: {}", error))
        } else {
            FetchError::Transport(format!("Failed to send request: {}", error))
        }
    }

    pub fn is_transport(&self) -> bool {
        matches!(self, FetchError::Transport(_))
    }
}

impl fmt::Display for FetchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FetchError::Transport(msg) => write!(f, "Transport error: {}", msg),
            FetchError::InvalidResponse(msg) => write!(f, "Invalid response: {}", msg),
        }
    }
}

impl std::error::Error for FetchError {}
