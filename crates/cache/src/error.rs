//! Result and Error types for artistools-cache

/// Type alias for Result<T, cache::Error>
pub type Result<T> = core::result::Result<T, Error>;

/// The error type for the `artistools-cache` crate
#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("failed input/output stream")]
    IOError(#[from] std::io::Error),

    #[error("failed to (de)serialise cached value")]
    BincodeError(#[from] bincode::Error),

    #[error("failed to move cache entry into place")]
    PersistError(#[from] tempfile::PersistError),

    #[error("cache file {path:?} has version \"{found}\" (expected \"{expected}\")")]
    VersionMismatch {
        path: String,
        found: String,
        expected: String,
    },
}
