use thiserror::Error;

/// Why the price feed produced no items.
#[derive(Error, Debug)]
pub enum FetchError {
    #[error("price feed request failed: {0}")]
    Transport(String),

    #[error("price feed returned HTTP {0}")]
    Status(u16),

    #[error("price feed response could not be decoded: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("price snapshot database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("price fetch was aborted")]
    Aborted,
}

impl From<ureq::Error> for FetchError {
    fn from(err: ureq::Error) -> Self {
        match err {
            ureq::Error::Status(code, _) => FetchError::Status(code),
            other => FetchError::Transport(other.to_string()),
        }
    }
}

/// A raw feed record that cannot be normalized at all.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum MalformedItem {
    #[error("item has no market hash name")]
    MissingName,

    #[error("item has no usable suggested price")]
    InvalidPrice,
}

/// Per-item outcome when an item does not make it into the catalog.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    #[error(transparent)]
    Malformed(#[from] MalformedItem),

    #[error("resale price below the buy floor")]
    ResaleBelowFloor,

    #[error("market price above the listing ceiling")]
    MarketAboveCeiling,
}
