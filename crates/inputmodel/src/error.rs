//! Result and Error types for the inputmodel module

/// Type alias for `Result<T, inputmodel::Error>`
pub type Result<T> = core::result::Result<T, Error>;

#[derive(thiserror::Error, Debug)]
/// The error type for `artistools-inputmodel`
pub enum Error {
    /// Underlying file I/O error
    #[error("failure in file I/O")]
    IOError(#[from] std::io::Error),

    #[error(transparent)]
    UtilsError(#[from] artistools_utils::Error),

    #[error(transparent)]
    ModelError(#[from] artistools_model::Error),

    #[error("failed to parse integer")]
    ParseIntError(#[from] std::num::ParseIntError),

    #[error("failed to parse float")]
    ParseFloatError(#[from] std::num::ParseFloatError),

    /// Failure writing the TARDIS YAML header
    #[error("failed to serialise YAML")]
    YamlError(#[from] serde_yaml::Error),

    /// Failure writing the TARDIS CSV rows
    #[error("failed to write CSV")]
    CsvError(#[from] csv::Error),

    #[error("unexpected end of {0}")]
    UnexpectedEndOfFile(String),

    /// Model rows must have the same number of columns throughout
    #[error("model row for cell {cell} has {found} columns, expected {expected}")]
    WrongNumberOfColumns {
        cell: usize,
        expected: usize,
        found: usize,
    },

    /// A 1D model row must have at least the isotopes up to Cr48
    #[error("model rows have {0} columns, expected 8 or 10")]
    UnsupportedModelColumns(usize),

    /// The first line of model.txt disagrees with the rows that follow
    #[error("model.txt declares {declared} cells but contains {found}")]
    CellCountMismatch { declared: usize, found: usize },

    /// Abundance rows must line up with the model cells
    #[error("abundances have {abundances} rows for {cells} model cells")]
    AbundanceCountMismatch { cells: usize, abundances: usize },

    /// Exactly one of the velocity or kinetic energy factors is needed
    #[error("scale factor must be positive, found {0}")]
    InvalidScaleFactor(f64),

    #[error("cell {cell} not found in a model of {ncells} cells")]
    CellNotFound { cell: usize, ncells: usize },
}
