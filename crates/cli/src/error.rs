//! Result and Error types for the command line interface

/// Type alias for `Result<T, cli::Error>`
pub type Result<T> = core::result::Result<T, Error>;

#[derive(thiserror::Error, Debug)]
/// The error type for `artistools-cli`
pub enum Error {
    /// Underlying file I/O error
    #[error("failure in file I/O")]
    IOError(#[from] std::io::Error),

    #[error("failed to write table")]
    CsvError(#[from] csv::Error),

    #[error("failed to write JSON")]
    JsonError(#[from] serde_json::Error),

    #[error(transparent)]
    UtilsError(#[from] artistools_utils::Error),

    #[error(transparent)]
    CacheError(#[from] artistools_cache::Error),

    #[error(transparent)]
    ModelError(#[from] artistools_model::Error),

    #[error(transparent)]
    InputModelError(#[from] artistools_inputmodel::Error),

    #[error(transparent)]
    AtomicError(#[from] artistools_atomic::Error),

    #[error(transparent)]
    EstimatorsError(#[from] artistools_estimators::Error),

    #[error(transparent)]
    SpectraError(#[from] artistools_spectra::Error),

    #[error(transparent)]
    CodeComparisonError(#[from] artistools_codecomparison::Error),

    /// Arguments rejected by the parser, with the usage message
    #[error("{0}")]
    Usage(String),

    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// The requested times lie outside of the simulation
    #[error("no timesteps in the requested time range")]
    NoTimesteps,
}

impl Error {
    /// Process exit code for the error
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Usage(_) | Self::InvalidArgument(_) => 2,
            _ => 1,
        }
    }
}
