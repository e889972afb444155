use thiserror::Error;

/// Unified error type for grid-to-`OData` translation.
#[derive(Error, Debug, Clone)]
pub enum Error {
    /// A grid request parameter failed to decode.
    #[error("invalid request parameter {name}: {value:?}")]
    InvalidParameter { name: String, value: String },

    /// A protocol version outside 2..=4 was configured.
    #[error("unsupported OData protocol version: {0}")]
    UnsupportedVersion(u8),

    /// A date column filter bound could not be parsed as a date.
    #[error("invalid date bound in column filter: {0:?}")]
    InvalidDateBound(String),

    /// The response payload matched none of the known row-array shapes.
    #[error("response payload has no recognizable row array")]
    UnrecognizedPayload,

    /// The response carried a count field that is not a non-negative integer.
    #[error("response count is not a non-negative integer: {0}")]
    InvalidCount(String),
}
