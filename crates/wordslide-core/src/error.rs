//! Word source error types.
//!
//! These error types represent failures when talking to the experiment
//! backend. Defined in `wordslide-core` so the session drivers can downcast
//! and classify failures when logging them without string matching.

use thiserror::Error;

/// Errors that can occur when fetching words or posting ratings.
#[derive(Debug, Error)]
pub enum SourceError {
    /// The backend has no experiment with this identifier.
    #[error("experiment not found: {0}")]
    NotFound(String),

    /// The backend returned an error response.
    #[error("API error (HTTP {status}): {message}")]
    Api { status: u16, message: String },

    /// The response body could not be decoded.
    #[error("invalid response: {0}")]
    Decode(String),

    /// The request timed out after this many milliseconds.
    #[error("request timed out after {0}ms")]
    Timeout(u64),

    /// A network error occurred.
    #[error("network error: {0}")]
    Network(String),
}

/// Short classification of an error for log fields.
pub fn classify(err: &anyhow::Error) -> &'static str {
    match err.downcast_ref::<SourceError>() {
        Some(SourceError::NotFound(_)) => "not_found",
        Some(SourceError::Api { .. }) => "api",
        Some(SourceError::Decode(_)) => "decode",
        Some(SourceError::Timeout(_)) => "timeout",
        Some(SourceError::Network(_)) => "network",
        None => "other",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classifies_downcast_errors() {
        let err: anyhow::Error = SourceError::NotFound("e1".into()).into();
        assert_eq!(classify(&err), "not_found");
        assert_eq!(err.to_string(), "experiment not found: e1");

        let err: anyhow::Error = SourceError::Timeout(200).into();
        assert_eq!(classify(&err), "timeout");
        assert_eq!(err.to_string(), "request timed out after 200ms");

        assert_eq!(classify(&anyhow::anyhow!("boom")), "other");
    }
}
