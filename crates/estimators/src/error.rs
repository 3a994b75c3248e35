//! Result and Error types for the estimators module

/// Type alias for `Result<T, estimators::Error>`
pub type Result<T> = core::result::Result<T, Error>;

#[derive(thiserror::Error, Debug)]
/// The error type for `artistools-estimators`
pub enum Error {
    /// Underlying file I/O error
    #[error("failure in file I/O")]
    IOError(#[from] std::io::Error),

    #[error(transparent)]
    UtilsError(#[from] artistools_utils::Error),

    #[error(transparent)]
    ModelError(#[from] artistools_model::Error),

    #[error(transparent)]
    AtomicError(#[from] artistools_atomic::Error),

    #[error(transparent)]
    CacheError(#[from] artistools_cache::Error),

    /// Worker pool for reading rank files could not start
    #[error("failed to build thread pool")]
    ThreadPoolError(#[from] rayon::ThreadPoolBuildError),

    #[error("invalid regular expression")]
    RegexError(#[from] regex::Error),

    #[error("failed to parse {0}")]
    ParseError(String),

    /// Nothing matched the requested timesteps and cells
    #[error("no {0} data found")]
    NoData(String),

    /// Mass fractions need the atomic mass of every element with a population
    #[error("no atomic mass for Z={0} in the composition data")]
    MissingElementMass(usize),

    #[error("cell {modelgridindex} is empty at timestep {timestep}")]
    EmptyCell {
        timestep: usize,
        modelgridindex: usize,
    },
}
