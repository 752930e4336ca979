use thiserror::Error;

#[derive(Debug, Error)]
pub enum SubmitError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("job sink rejected {name}: {status}")]
    Rejected {
        name: String,
        status: reqwest::StatusCode,
    },
}
