//! Classification of non-success HTTP statuses returned by the releases API.

use reqwest::StatusCode;

use super::FetchError;

/// A non-success HTTP status, classified by what the caller can do about it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StatusError {
    /// Rate limit exceeded (HTTP 403 with rate limit message or 429)
    RateLimitExceeded,
    /// Authentication failed (HTTP 401)
    AuthenticationFailed,
    /// Repository or release not found (HTTP 404)
    NotFound,
    /// Forbidden access (HTTP 403 non-rate-limit)
    Forbidden,
    /// Other 4xx errors
    ClientError(u16),
    /// 5xx errors; the request itself may succeed later
    ServerError(u16),
}

impl std::fmt::Display for StatusError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StatusError::RateLimitExceeded => {
                write!(
                    f,
                    "Rate limit exceeded. Try again later or set GITHUB_TOKEN environment variable."
                )
            }
            StatusError::AuthenticationFailed => {
                write!(f, "Authentication failed. Check your GITHUB_TOKEN.")
            }
            StatusError::NotFound => {
                write!(f, "Not found: the repository has no published release")
            }
            StatusError::Forbidden => {
                write!(f, "Access forbidden. You may need authentication.")
            }
            StatusError::ClientError(code) => write!(f, "Request error: HTTP {}", code),
            StatusError::ServerError(code) => write!(f, "Server error: HTTP {}", code),
        }
    }
}

impl std::error::Error for StatusError {}

impl From<StatusError> for FetchError {
    fn from(error: StatusError) -> Self {
        match error {
            StatusError::ServerError(_) => FetchError::Transport(error.to_string()),
            _ => FetchError::InvalidResponse(error.to_string()),
        }
    }
}

/// Classifies a non-success status. `body` is only inspected to tell a
/// rate-limit 403 apart from a plain permission 403.
pub fn classify_status(status: StatusCode, body: &str) -> StatusError {
    match status {
        StatusCode::UNAUTHORIZED => StatusError::AuthenticationFailed,
        StatusCode::FORBIDDEN => {
            if body.to_lowercase().contains("rate limit") {
                StatusError::RateLimitExceeded
            } else {
                StatusError::Forbidden
            }
        }
        StatusCode::TOO_MANY_REQUESTS => StatusError::RateLimitExceeded,
        StatusCode::NOT_FOUND => StatusError::NotFound,
        s if s.is_client_error() => StatusError::ClientError(s.as_u16()),
        s => StatusError::ServerError(s.as_u16()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_unauthorized() {
        assert_eq!(
            classify_status(StatusCode::UNAUTHORIZED, ""),
            StatusError::AuthenticationFailed
        );
    }

    #[test]
    fn test_classify_forbidden_vs_rate_limit() {
        assert_eq!(
            classify_status(StatusCode::FORBIDDEN, r#"{"message":"Resource not accessible"}"#),
            StatusError::Forbidden
        );
        assert_eq!(
            classify_status(
                StatusCode::FORBIDDEN,
                r#"{"message":"API rate limit exceeded for 1.2.3.4."}"#
            ),
            StatusError::RateLimitExceeded
        );
    }

    #[test]
    fn test_classify_too_many_requests() {
        assert_eq!(
            classify_status(StatusCode::TOO_MANY_REQUESTS, ""),
            StatusError::RateLimitExceeded
        );
    }

    #[test]
    fn test_classify_not_found_and_other_client_error() {
        assert_eq!(classify_status(StatusCode::NOT_FOUND, ""), StatusError::NotFound);
        assert_eq!(
            classify_status(StatusCode::UNPROCESSABLE_ENTITY, ""),
            StatusError::ClientError(422)
        );
    }

    #[test]
    fn test_classify_server_error() {
        assert_eq!(
            classify_status(StatusCode::BAD_GATEWAY, ""),
            StatusError::ServerError(502)
        );
    }

    #[test]
    fn test_status_error_display() {
        assert!(StatusError::RateLimitExceeded.to_string().contains("GITHUB_TOKEN"));
        assert!(StatusError::AuthenticationFailed.to_string().contains("Authentication"));
        assert!(StatusError::Forbidden.to_string().contains("forbidden"));
        assert!(StatusError::ClientError(400).to_string().contains("HTTP 400"));
    }

    #[test]
    fn test_server_errors_map_to_transport() {
        let err: FetchError = StatusError::ServerError(503).into();
        assert!(err.is_transport());

        let err: FetchError = StatusError::NotFound.into();
        assert!(matches!(err, FetchError::InvalidResponse(_)));
    }
}
