//! Result and Error types for the codecomparison module

/// Type alias for `Result<T, codecomparison::Error>`
pub type Result<T> = core::result::Result<T, Error>;

#[derive(thiserror::Error, Debug)]
/// The error type for `artistools-codecomparison`
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

    #[error(transparent)]
    EstimatorsError(#[from] artistools_estimators::Error),

    #[error(transparent)]
    SpectraError(#[from] artistools_spectra::Error),

    #[error("failed to parse integer")]
    ParseIntError(#[from] std::num::ParseIntError),

    #[error("failed to parse float")]
    ParseFloatError(#[from] std::num::ParseFloatError),

    /// Virtual paths look like `codecomparison/<model>/<code>`
    #[error("'{0}' is not a code comparison path")]
    NotCodeComparisonPath(String),

    #[error("{path} is missing the {header} header")]
    MissingHeader { path: String, header: String },

    #[error("expected {expected} values for {what} (found {found})")]
    WrongNumberOfValues {
        what: String,
        expected: usize,
        found: usize,
    },

    #[error("time {found} in {path} does not match {expected}")]
    TimeMismatch {
        path: String,
        expected: f64,
        found: f64,
    },

    #[error("velocity {found} of cell {modelgridindex} at timestep {timestep} does not match {expected}")]
    VelocityMismatch {
        timestep: usize,
        modelgridindex: usize,
        expected: f64,
        found: f64,
    },

    #[error("{path} has data for cell {modelgridindex} at timestep {timestep} missing from the phys file")]
    UnknownCell {
        path: String,
        timestep: usize,
        modelgridindex: usize,
    },

    #[error("unknown ion '{0}'")]
    UnknownIon(String),

    #[error("no spectrum near {requested} days (closest is {closest} days)")]
    TimeNotFound { requested: f64, closest: f64 },

    #[error("no {key} estimator for cell {modelgridindex} at timestep {timestep} or its neighbours")]
    MissingEstimator {
        timestep: usize,
        modelgridindex: usize,
        key: String,
    },

    #[error("at least one timestep must be selected")]
    NoTimesteps,
}
