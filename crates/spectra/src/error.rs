//! Result and Error types for the spectra module

/// Type alias for `Result<T, spectra::Error>`
pub type Result<T> = core::result::Result<T, Error>;

#[derive(thiserror::Error, Debug)]
/// The error type for `artistools-spectra`
pub enum Error {
    /// Underlying file I/O error
    #[error("failure in file I/O")]
    IOError(#[from] std::io::Error),

    #[error(transparent)]
    UtilsError(#[from] artistools_utils::Error),

    #[error(transparent)]
    ModelError(#[from] artistools_model::Error),

    #[error(transparent)]
    InputModelError(#[from] artistools_inputmodel::Error),

    #[error("failed to parse float")]
    ParseFloatError(#[from] std::num::ParseFloatError),

    #[error("parser failed: {0}")]
    ParseError(String),

    #[error("{0} contains no data")]
    EmptyFile(String),

    #[error("expected {expected} values for {what} (found {found})")]
    WrongNumberOfValues {
        what: String,
        expected: usize,
        found: usize,
    },

    #[error("timestep {timestep} is not in the spectrum file ({ntimesteps} timesteps)")]
    TimestepOutOfRange { timestep: usize, ntimesteps: usize },

    #[error("timestep range {tsmin}-{tsmax} is reversed")]
    BadTimestepRange { tsmin: usize, tsmax: usize },

    #[error("model has no {0} mass fraction column")]
    MissingIsotope(String),

    /// Decay chains are only evolved forwards in time
    #[error("decay time must be positive (found {0} days)")]
    NonPositiveDecayTime(f64),
}

// nom errors hold a reference to the input, so keep only the message
impl From<nom::Err<nom::error::Error<&str>>> for Error {
    fn from(err: nom::Err<nom::error::Error<&str>>) -> Self {
        Self::ParseError(format!("{err:?}"))
    }
}
