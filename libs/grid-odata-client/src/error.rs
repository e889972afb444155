use thiserror::Error;

/// Fetch-side error types.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum ClientError {
    /// Translation error from the protocol core.
    #[error(transparent)]
    Grid(#[from] grid_odata::Error),

    /// Invalid service URL.
    #[error("invalid service URL '{url}': {reason}")]
    InvalidUri { url: String, reason: String },

    /// Request building failed.
    #[error("failed to build request: {0}")]
    RequestBuild(#[from] http::Error),

    /// Invalid header name in pass-through options.
    #[error("invalid header name: {0}")]
    InvalidHeaderName(#[from] http::header::InvalidHeaderName),

    /// Invalid header value in pass-through options.
    #[error("invalid header value: {0}")]
    InvalidHeaderValue(#[from] http::header::InvalidHeaderValue),

    /// Transport error (network, connection, etc).
    #[error("transport error: {0}")]
    Transport(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// TLS initialization error.
    #[error("TLS error: {0}")]
    Tls(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// HTTP non-2xx status.
    #[error("HTTP {status}: {body_preview}")]
    HttpStatus {
        status: http::StatusCode,
        body_preview: String,
    },

    /// Response body is not valid UTF-8 or not valid JSON.
    #[error("JSON parsing failed: {0}")]
    Json(#[from] serde_json::Error),

    /// JSONP response did not carry the expected callback wrapper.
    #[error("malformed JSONP response: {0}")]
    Jsonp(String),
}

impl From<hyper::Error> for ClientError {
    fn from(err: hyper::Error) -> Self {
        ClientError::Transport(Box::new(err))
    }
}

impl From<hyper_util::client::legacy::Error> for ClientError {
    fn from(err: hyper_util::client::legacy::Error) -> Self {
        ClientError::Transport(Box::new(err))
    }
}
