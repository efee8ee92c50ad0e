use thiserror::Error;

/// Transport-level failures talking to the lottery site.
#[derive(Debug, Error)]
pub enum ScraperError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("malformed JSON from {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("{url} answered 429, retry after {retry_after_secs}s")]
    RateLimited { url: String, retry_after_secs: u64 },

    #[error("{url} answered HTTP {status}")]
    UnexpectedStatus { status: u16, url: String },

    #[error("cannot use \"{base_url}\" as a base URL: {reason}")]
    InvalidBaseUrl { base_url: String, reason: String },
}
