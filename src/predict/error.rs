use chrono::{DateTime, Utc};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PredictError {
    #[error("invalid elements for {name}: {message}")]
    InvalidElements { name: String, message: String },
    #[error("no element set available for {0}")]
    MissingElements(String),
    #[error("propagation error: {0}")]
    Propagation(String),
    #[error("elevation function returned a non-finite value at {0}")]
    NonFinite(DateTime<Utc>),
}
