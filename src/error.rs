use thiserror::Error;
use uuid::Uuid;

/// Error taxonomy for store operations.
///
/// `Validation` and `NotFound` are recoverable caller mistakes; `Persistence`
/// means the durable backend rejected a commit or query and the last committed
/// state is still intact.
#[derive(Error, Debug)]
pub enum Error {
    /// Invalid input, e.g. an empty or whitespace-only description
    #[error("invalid activity: {0}")]
    Validation(String),

    /// Operation referenced a record id that is no longer present
    #[error("no activity with id {0}")]
    NotFound(Uuid),

    /// The underlying record store failed a commit, delete, or query
    #[error("persistence failure: {0}")]
    Persistence(String),
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::Persistence(err.to_string())
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Persistence(err.to_string())
    }
}

/// Result type alias for dayline
pub type Result<T> = std::result::Result<T, Error>;
