use thiserror::Error;

pub type Result<T> = std::result::Result<T, ClientError>;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("unable to parse the address: {0}")]
    UrlParseError(#[from] url::ParseError),

    #[error("unable to load the certificate: {0}")]
    IoError(#[from] std::io::Error),

    #[error("invalid header {name}: {reason}")]
    InvalidHeader { name: String, reason: String },

    #[error("unable to decode response: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("prometheus error ({error_type}): {message}")]
    Api { error_type: String, message: String },

    #[error("unexpected http status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("response is missing the data payload")]
    MissingData,

    #[error("invalid configuration: {0}")]
    Config(String),
}

impl ClientError {
    /// Returns the Prometheus error type when the server rejected the request.
    pub fn api_error_type(&self) -> Option<&str> {
        match self {
            ClientError::Api { error_type, .. } => Some(error_type),
            _ => None,
        }
    }
}
