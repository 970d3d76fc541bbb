use thiserror::Error;

/// Failure taxonomy for the catalog client.
///
/// `Transport` means no usable response arrived and a retry may help;
/// `Service` carries the server's own explanation for a rejected request.
/// Malformed payloads are split by format: `Decode` for the binary search
/// response, `Payload` for JSON replies.
#[derive(Error, Debug)]
pub enum ClientError {
    #[error("schema load failed: {0}")]
    SchemaLoad(String),
    #[error("malformed search payload: {0}")]
    Decode(#[from] prost::DecodeError),
    #[error("malformed server reply: {0}")]
    Payload(#[from] serde_json::Error),
    #[error("network error: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("{0}")]
    Service(String),
    #[error("search term must not be empty")]
    EmptyQuery,
}
