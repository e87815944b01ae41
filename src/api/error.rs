use thiserror::Error;

/// Failures talking to the game's HTTP API.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Connection to {url} failed: {message}")]
    Connection { url: String, message: String },

    #[error("Request to {url} timed out")]
    Timeout { url: String },

    #[error("{url} returned HTTP {status}")]
    HttpStatus { url: String, status: u16 },

    #[error("Failed to decode response from {url}: {message}")]
    Decode { url: String, message: String },

    #[error("{0}")]
    CommKey(String),

    #[error("Failed to build HTTP client: {0}")]
    Client(String),
}

impl ApiError {
    /// Classify a transport error from `reqwest`
    pub fn from_reqwest(url: &str, err: reqwest::Error) -> Self {
        let url = url.to_string();
        if err.is_timeout() {
            ApiError::Timeout { url }
        } else if let Some(status) = err.status() {
            ApiError::HttpStatus { url, status: status.as_u16() }
        } else if err.is_decode() {
            ApiError::Decode { url, message: err.to_string() }
        } else {
            ApiError::Connection { url, message: err.to_string() }
        }
    }

    /// Errors the poll loop rides out: the game may be paused, loading or
    /// not yet listening.
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            ApiError::Connection { .. } | ApiError::Timeout { .. } | ApiError::HttpStatus { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transient_classification() {
        let url = "http://127.0.0.1:31270/subscription/".to_string();
        assert!(ApiError::Timeout { url: url.clone() }.is_transient());
        assert!(ApiError::HttpStatus { url: url.clone(), status: 503 }.is_transient());
        assert!(ApiError::Connection { url: url.clone(), message: "refused".into() }.is_transient());
        assert!(!ApiError::Decode { url, message: "eof".into() }.is_transient());
        assert!(!ApiError::CommKey("missing".into()).is_transient());
    }

    #[test]
    fn test_status_message() {
        let err = ApiError::HttpStatus { url: "http://x/get/DriverAid.Data".into(), status: 403 };
        assert_eq!(err.to_string(), "http://x/get/DriverAid.Data returned HTTP 403");
    }
}
