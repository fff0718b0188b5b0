use thiserror::Error;

/// Everything that can stop a generation from producing a [`GenerationResult`].
///
/// A backend that reports `FAILED` is not an error; see
/// [`GenerationResult::failed`].
///
/// [`GenerationResult`]: tryon_core::GenerationResult
/// [`GenerationResult::failed`]: tryon_core::GenerationResult::failed
#[derive(Debug, Error)]
pub enum GenerationError {
    /// The request was rejected before any network call.
    #[error("invalid generation request: {0}")]
    InvalidInput(#[from] tryon_core::CoreError),

    /// Network or TLS failure from the underlying HTTP client.
    #[error("HTTP error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The backend answered the submission with a non-2xx status.
    #[error("backend rejected submission with status {status}: {body}")]
    BackendRejected { status: u16, body: String },

    /// The response body could not be deserialized into the expected type.
    #[error("malformed response from {context}: {source}")]
    MalformedResponse {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    /// A well-formed submission response carried neither a job ticket nor an image.
    #[error("no image in backend response")]
    NoImageInResponse,

    /// Every status poll came back pending.
    #[error("generation {request_id} still pending after {attempts} status checks")]
    PollTimeout { request_id: String, attempts: u32 },

    #[error("invalid endpoint URL '{url}': {reason}")]
    InvalidEndpoint { url: String, reason: String },
}
