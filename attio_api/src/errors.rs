//! Error types for the API client.

/// Errors that can occur when talking to the CRM.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// `ATTIO_API_KEY` is not set. Fatal configuration error, never retried.
    #[error("ATTIO_API_KEY is not set")]
    MissingApiKey,
    /// An HTTP request failed (network error, timeout, or unparseable response).
    #[error("Request failed")]
    RequestFailed,
    /// The API returned a non-success status with a body snippet.
    #[error("Request failed with status {status}")]
    HttpStatus { status: u16, body: String },
}
