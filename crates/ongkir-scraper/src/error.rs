use thiserror::Error;

#[derive(Debug, Error)]
pub enum ScraperError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("unexpected HTTP status {status} from {url}")]
    UnexpectedStatus { status: u16, url: String },

    #[error("invalid carrier URL \"{url}\": {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("page at {url} is not a recognized quote page")]
    UnrecognizedPage { url: String },

    #[error("politeness gate is closed")]
    GateClosed,
}

/// Failure of a single fee fetch.
///
/// On the fan-out path both variants are logged and dropped; on the
/// single-pair path `LabelsNotFound` gets its own user-facing message.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("fee fetch failed: {0}")]
    FetchFailed(#[from] ScraperError),

    #[error("origin or destination label not found on {url}")]
    LabelsNotFound { url: String },
}
