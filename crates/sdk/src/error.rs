//! Error types for the Perplexity SDK.

use serde::Deserialize;

/// Result type for SDK operations.
pub type PerplexityResult<T> = Result<T, PerplexityError>;

/// Error types that can occur when using the Perplexity SDK.
#[derive(Debug, thiserror::Error)]
pub enum PerplexityError {
    /// HTTP request failed before a response was received.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// API returned a non-success status.
    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    /// Invalid configuration.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Response body could not be decoded.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// The completion carried no choices.
    #[error("Perplexity response contained no choices")]
    EmptyChoices,
}

impl PerplexityError {
    /// Whether this error came from the network or an HTTP status,
    /// as opposed to a malformed reply or local misconfiguration.
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Http(_) | Self::Api { .. })
    }

    /// The upstream-facing message, without the variant prefix.
    pub fn upstream_message(&self) -> String {
        match self {
            Self::Api { message, .. } => message.clone(),
            Self::Http(e) => e.to_string(),
            other => other.to_string(),
        }
    }

    /// Create an API error from a status code and response body.
    ///
    /// Prefers the body's `error` field, either as a plain string or as an
    /// object with a `message`. Falls back to a generic status message.
    pub fn from_response(status: u16, body: &str) -> Self {
        let message = serde_json::from_str::<ErrorResponse>(body)
            .ok()
            .and_then(|response| response.error.into_message())
            .unwrap_or_else(|| format!("Request failed with status code {}", status));

        Self::Api { status, message }
    }
}

/// Error response from the Perplexity API.
#[derive(Debug, Deserialize)]
pub struct ErrorResponse {
    pub error: ErrorBody,
}

/// The `error` field comes back either as a bare string or as an object.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum ErrorBody {
    Message(String),
    Detailed {
        message: Option<String>,
        #[serde(rename = "type")]
        kind: Option<String>,
    },
    Other(serde_json::Value),
}

impl ErrorBody {
    fn into_message(self) -> Option<String> {
        match self {
            Self::Message(message) if message.is_empty() => None,
            Self::Message(message) => Some(message),
            Self::Detailed { message, kind } => message.filter(|m| !m.is_empty()).or(kind),
            Self::Other(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_string_error_field() {
        let err = PerplexityError::from_response(401, r#"{"error":"unauthorized"}"#);
        match err {
            PerplexityError::Api { status, message } => {
                assert_eq!(status, 401);
                assert_eq!(message, "unauthorized");
            }
            other => panic!("Expected Api error, got {:?}", other),
        }
    }

    #[test]
    fn test_object_error_field() {
        let body = r#"{"error":{"message":"Invalid model","type":"invalid_model","code":400}}"#;
        let err = PerplexityError::from_response(400, body);
        assert_eq!(err.upstream_message(), "Invalid model");
    }

    #[test]
    fn test_empty_error_string_falls_back_to_status() {
        let err = PerplexityError::from_response(401, r#"{"error":""}"#);
        assert_eq!(err.upstream_message(), "Request failed with status code 401");

        let err = PerplexityError::from_response(400, r#"{"error":{"message":""}}"#);
        assert_eq!(err.upstream_message(), "Request failed with status code 400");
    }

    #[test]
    fn test_non_json_body_falls_back_to_status() {
        let err = PerplexityError::from_response(502, "<html>Bad Gateway</html>");
        assert_eq!(err.upstream_message(), "Request failed with status code 502");
    }

    #[test]
    fn test_unusable_error_field_falls_back_to_status() {
        let err = PerplexityError::from_response(500, r#"{"error":42}"#);
        assert_eq!(err.upstream_message(), "Request failed with status code 500");

        let err = PerplexityError::from_response(500, r#"{"detail":"boom"}"#);
        assert_eq!(err.upstream_message(), "Request failed with status code 500");
    }

    #[test]
    fn test_is_transport() {
        assert!(PerplexityError::from_response(401, "").is_transport());
        assert!(!PerplexityError::EmptyChoices.is_transport());
        assert!(!PerplexityError::Config("missing".to_string()).is_transport());
    }
}
