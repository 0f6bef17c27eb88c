use thiserror::Error;

pub type Result<T> = std::result::Result<T, AppError>;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid URL: {0}")]
    Url(#[from] url::ParseError),

    #[error("Search API returned HTTP {0}")]
    Status(u16),

    /// HTTP 507 from the search API. Retried after a cooldown, never counted as a failure.
    #[error("Search API is temporarily overloaded")]
    Overloaded,

    #[error("Malformed search response: {0}")]
    MalformedResponse(String),

    #[error("Giving up on page {page} after {attempts} consecutive failures")]
    RetriesExhausted { page: u32, attempts: u32 },
}
