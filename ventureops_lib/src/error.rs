//! Library-level error type.

use std::fmt;

/// Everything the derivation layer can fail with. Transport and HTTP
/// failures arrive wrapped from the API crate; the cache and store
/// layers report through `Cache`, and `InvalidInput` covers caller
/// mistakes caught before any request goes out.
#[derive(Debug)]
pub enum VentureOpsError {
    Api(attio_api::Error),
    Cache(String),
    Serialization(serde_json::Error),
    InvalidInput(String),
}

impl fmt::Display for VentureOpsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Api(e) => write!(f, "API error: {}", e),
            Self::Cache(msg) => write!(f, "Cache error: {}", msg),
            Self::Serialization(e) => write!(f, "Serialization error: {}", e),
            Self::InvalidInput(msg) => write!(f, "Invalid input: {}", msg),
        }
    }
}

impl std::error::Error for VentureOpsError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Api(e) => Some(e),
            Self::Serialization(e) => Some(e),
            Self::Cache(_) | Self::InvalidInput(_) => None,
        }
    }
}

impl From<attio_api::Error> for VentureOpsError {
    fn from(e: attio_api::Error) -> Self {
        Self::Api(e)
    }
}

impl From<serde_json::Error> for VentureOpsError {
    fn from(e: serde_json::Error) -> Self {
        Self::Serialization(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn api_errors_keep_their_source() {
        let err: VentureOpsError = attio_api::Error::MissingApiKey.into();
        assert!(err.to_string().contains("ATTIO_API_KEY"));
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn input_errors_carry_the_message() {
        let err = VentureOpsError::InvalidInput("entry id must not be empty".to_string());
        assert_eq!(err.to_string(), "Invalid input: entry id must not be empty");
        assert!(std::error::Error::source(&err).is_none());
    }
}
