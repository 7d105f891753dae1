//! Error Taxonomy
//!
//! Every failure the loader and the contact form can hit is one of these
//! variants. None of them escape the page boundary: the web layer turns them
//! into an inline message.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum DirectoryError {
    /// The remote endpoint was never configured.
    #[error("endpoint is not configured")]
    Configuration,

    /// Network failure or a non-success HTTP status.
    #[error("transport error: {0}")]
    Transport(String),

    /// The response body is not the `{ ok, rows }` envelope we expect.
    #[error("invalid envelope: {0}")]
    InvalidEnvelope(String),

    #[error("callback {0} was not invoked before the timeout")]
    CallbackTimeout(String),

    /// The pending callback was removed without ever being invoked.
    #[error("callback {0} was abandoned")]
    CallbackAbandoned(String),

    /// The endpoint answered with an explicit `ok: false`.
    #[error("submission rejected by endpoint")]
    Rejected,
}

impl From<reqwest::Error> for DirectoryError {
    fn from(err: reqwest::Error) -> Self {
        DirectoryError::Transport(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, DirectoryError>;
