//! Error types for stream domain discovery
//!
//! Most failures in the discovery pipeline are absorbed where they happen
//! (a dead source, a dead candidate, an unreadable cache). The variants here
//! describe what went wrong so the absorbing layer can log it.

use thiserror::Error;

/// Error type for all streamscout operations
#[derive(Error, Debug)]
pub enum ScoutError {
    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    /// Server answered with a non-success status
    #[error("Unexpected HTTP status {status} from {url}")]
    Status { status: u16, url: String },

    /// Rate limited by server (HTTP 429)
    #[error("Rate limited - too many requests")]
    RateLimited,

    /// Response body was not the JSON we expected
    #[error("Failed to decode JSON: {0}")]
    JsonError(#[from] serde_json::Error),

    /// Local file could not be read or written
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// Failed to parse page content or a pattern
    #[error("Failed to parse: {0}")]
    ParseError(String),

    /// Configuration rejected at construction
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Headless browser could not be started
    #[error("Renderer unavailable: {0}")]
    RenderUnavailable(String),

    /// Headless browser failed on a single page
    #[error("Render failed: {0}")]
    RenderError(String),
}

impl ScoutError {
    /// Whether the fetch helper should try the request again
    pub fn is_retryable(&self) -> bool {
        match self {
            ScoutError::RateLimited => true,
            ScoutError::Status { status, .. } => *status >= 500,
            ScoutError::HttpError(e) => {
                e.is_timeout()
                    || e.is_connect()
                    || e.status().map(|s| s.is_server_error()).unwrap_or(false)
            }
            _ => false,
        }
    }
}

/// Result type alias for streamscout operations
pub type Result<T> = std::result::Result<T, ScoutError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_status() {
        let error = ScoutError::Status {
            status: 503,
            url: "https://crt.sh/".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Unexpected HTTP status 503 from https://crt.sh/"
        );
    }

    #[test]
    fn test_error_display_parse_error() {
        let error = ScoutError::ParseError("bad pattern".to_string());
        assert_eq!(error.to_string(), "Failed to parse: bad pattern");
    }

    #[test]
    fn test_error_display_invalid_config() {
        let error = ScoutError::InvalidConfig("concurrency_limit must be positive".to_string());
        assert_eq!(
            error.to_string(),
            "Invalid configuration: concurrency_limit must be positive"
        );
    }

    #[test]
    fn test_error_display_rate_limited() {
        assert_eq!(
            ScoutError::RateLimited.to_string(),
            "Rate limited - too many requests"
        );
    }

    #[test]
    fn test_error_display_render_unavailable() {
        let error = ScoutError::RenderUnavailable("no chrome".to_string());
        assert_eq!(error.to_string(), "Renderer unavailable: no chrome");
    }

    #[test]
    fn test_error_from_json() {
        let json_err = serde_json::from_str::<Vec<String>>("{").unwrap_err();
        let error = ScoutError::from(json_err);
        assert!(error.to_string().starts_with("Failed to decode JSON"));
    }

    #[test]
    fn test_retryable_classification() {
        assert!(ScoutError::RateLimited.is_retryable());
        assert!(
            ScoutError::Status {
                status: 502,
                url: String::new()
            }
            .is_retryable()
        );
        assert!(
            !ScoutError::Status {
                status: 404,
                url: String::new()
            }
            .is_retryable()
        );
        assert!(!ScoutError::ParseError("x".to_string()).is_retryable());
    }
}
