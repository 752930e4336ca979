use thiserror::Error;

#[derive(Debug, Error)]
pub enum ElementsError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("cache IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("cache parse error: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("no element sets available from any source or the cache")]
    Unavailable,
}
