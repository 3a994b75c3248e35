//! Result and Error types for artistools-model

/// Type alias for Result<T, model::Error>
pub type Result<T> = core::result::Result<T, Error>;

/// The error type for the `artistools-model` crate
#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("failed input/output stream")]
    IOError(#[from] std::io::Error),

    #[error(transparent)]
    UtilsError(#[from] artistools_utils::Error),

    #[error("failed to parse integer")]
    ParseIntError(#[from] std::num::ParseIntError),

    #[error("failed to parse float")]
    ParseFloatError(#[from] std::num::ParseFloatError),

    #[error("parser failed: {0}")]
    ParseError(String),

    #[error("invalid regular expression")]
    RegexError(#[from] regex::Error),

    #[error("unexpected end of file while reading {0}")]
    UnexpectedEndOfFile(String),

    #[error("expected {expected} values for {what} (found {found})")]
    WrongNumberOfValues {
        what: String,
        expected: usize,
        found: usize,
    },

    #[error("unexpected content \"{0}\"")]
    UnexpectedContent(String),

    #[error("number of MPI processes must be at least one")]
    NoProcesses,

    #[error("MPI rank {rank} must be less than the number of processes {nprocs}")]
    RankOutOfRange { rank: usize, nprocs: usize },

    #[error("model grid index {cell} must be less than the number of model cells {npts}")]
    CellOutOfRange { cell: usize, npts: usize },

    #[error("model grid index {cell} is not handled by rank {rank}")]
    CellNotInRank { cell: usize, rank: usize },

    #[error("could not find timestep bracketing time {0}")]
    TimeNotBracketed(f64),

    #[error("time min {timemin} is greater than all timesteps ({first} to {last})")]
    TimeMinAfterTimesteps { timemin: f64, first: f64, last: f64 },

    #[error("specified time range does not include any full timesteps")]
    EmptyTimeRange,

    #[error("either time or timesteps must be specified")]
    NoTimeRange,

    #[error("timestep {timestep} does not exist (last timestep is {last})")]
    TimestepOutOfRange { timestep: usize, last: usize },

    #[error("location must be one of 'mid', 'start', 'end', or 'delta' (found \"{0}\")")]
    UnknownTimeLoc(String),

    #[error("no timesteps available")]
    NoTimesteps,

    #[error("deposition.out time {time} does not match timestep {timestep} at {expected}")]
    DepositionTimeMismatch {
        timestep: usize,
        time: f64,
        expected: f64,
    },

    #[error("composition data has no element at index {0}")]
    ElementIndexOutOfRange(usize),

    #[error("expected timestep {expected} in {path} (found {found})")]
    UnexpectedTimestep {
        path: String,
        expected: usize,
        found: usize,
    },

    #[error("either a model path or a source path is required")]
    MissingSourcePath,
}

// nom errors hold a reference to the input, so keep only the message
impl From<nom::Err<nom::error::Error<&str>>> for Error {
    fn from(err: nom::Err<nom::error::Error<&str>>) -> Self {
        Self::ParseError(format!("{err:?}"))
    }
}
