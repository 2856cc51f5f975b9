use thiserror::Error;

#[derive(Error, Debug)]
pub enum LifiError {
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("JSON parsing failed: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("API error: {message}")]
    ApiError { message: String },

    #[error("Rate limit exceeded")]
    RateLimit,

    #[error("Malformed page: {message}")]
    MalformedPage { message: String },

    #[error("Malformed record: {message}")]
    MalformedRecord { message: String },

    #[error("Chain metadata unavailable: {reason}")]
    MetadataUnavailable { reason: String },

    #[error("Invalid wallet address: {address}")]
    InvalidAddress { address: String },
}
