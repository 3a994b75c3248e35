//! Result and Error types for the atomic module

/// Type alias for `Result<T, atomic::Error>`
pub type Result<T> = core::result::Result<T, Error>;

#[derive(thiserror::Error, Debug)]
/// The error type for `artistools-atomic`
pub enum Error {
    /// Underlying file I/O error
    #[error("failed input/output stream")]
    IOError(#[from] std::io::Error),

    #[error(transparent)]
    UtilsError(#[from] artistools_utils::Error),

    #[error("failed to parse {0}")]
    ParseError(String),

    #[error("invalid regular expression")]
    RegexError(#[from] regex::Error),

    #[error("unexpected end of {0}")]
    UnexpectedEndOfFile(String),

    /// Levels in adata.txt are numbered consecutively from one
    #[error("level {found} of Z={atomic_number} ion stage {ion_stage} should be {expected}")]
    LevelNumbering {
        atomic_number: usize,
        ion_stage: usize,
        expected: usize,
        found: usize,
    },

    /// Photoionisation always goes to the next ion stage
    #[error("photoionisation from ion stage {lower} to {upper}")]
    IonStageMismatch { lower: usize, upper: usize },

    #[error("no levels for Z={atomic_number} ion stage {ion_stage}")]
    IonNotFound { atomic_number: usize, ion_stage: usize },

    #[error("level {level} out of range for an ion with {nlevels} levels")]
    LevelOutOfRange { level: usize, nlevels: usize },

    #[error("no ground state population for Z={atomic_number} ion stage {ion_stage}")]
    MissingGroundState { atomic_number: usize, ion_stage: usize },
}

impl From<nom::Err<nom::error::Error<&str>>> for Error {
    fn from(err: nom::Err<nom::error::Error<&str>>) -> Self {
        Error::ParseError(format!("{err:?}"))
    }
}
