use thiserror::Error;

/// Failures raised while translating a platform event into a request.
///
/// These never become HTTP responses: the invocation itself fails so the
/// platform records the error.
#[derive(Debug, Error)]
pub enum AdapterError {
    #[error("Malformed event: {0}")]
    MalformedEvent(String),

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Failed to serialize response: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Failure returned by a route handler. Dispatch turns it into a 500.
#[derive(Debug, Error)]
#[error("Handler failed: {0}")]
pub struct HandlerError(pub String);

impl From<base64::DecodeError> for AdapterError {
    fn from(error: base64::DecodeError) -> Self {
        AdapterError::MalformedEvent(format!("body is not valid base64: {}", error))
    }
}
