//! Result and Error types for the utils module

/// Type alias for `Result<T, utils::Error>`
pub type Result<T> = core::result::Result<T, Error>;

#[derive(Debug)]
/// The error type for `artistools_utils`
pub enum Error {
    /// Underlying file I/O error
    Io(std::io::Error),

    /// None of the candidate files exist
    FileNotFound { candidates: Vec<String> },

    /// Failure to deserialise a configuration file
    Json(serde_json::Error),

    /// An empty slice of floats for SliceExt
    SliceContainsNoValues,

    /// The slice of float values contains things like NAN or INFINITY
    SliceContainsUndefinedValues,

    /// A catch-all for functions returning errors that should be unreachable
    UncapturedErrorCondition,

    /// Value that is searched for outside of the min/max of the array
    ValueOutsideOfBounds {
        value: f64,
        lower_bound: f64,
        upper_bound: f64,
    },

    /// For when a slice has fewer than the minimum required values
    BelowMinimumSliceLength {
        length: usize,
        minimum_required: usize,
    },

    /// Two slices that must be paired have different lengths
    MismatchedSliceLengths { left: usize, right: usize },

    /// A range string such as "3-7" could not be interpreted
    BadRange { range: String },

    /// Symbol is not a known chemical element
    UnknownElement { symbol: String },

    /// Atomic number outside of the element table
    AtomicNumberOutOfRange { atomic_number: usize },

    /// Ion stage outside of the roman numeral table
    IonStageOutOfRange { ion_stage: usize },

    /// Whitespace table has no header row
    MissingHeader,

    /// Whitespace table does not contain a required column
    MissingColumn { name: String },

    /// Reached the end of a file while more lines were expected
    UnexpectedEndOfFile,
}

// error boilerplate
impl core::fmt::Display for Error {
    fn fmt(&self, fmt: &mut core::fmt::Formatter) -> core::result::Result<(), core::fmt::Error> {
        write!(fmt, "{self:?}")
    }
}

// implement standard error trait to use with ? operator
impl std::error::Error for Error {}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Self::Json(err)
    }
}

impl PartialEq for Error {
    fn eq(&self, other: &Self) -> bool {
        use Error::*;
        // io and json errors are never comparable
        match (self, other) {
            (FileNotFound { candidates: a }, FileNotFound { candidates: b }) => a == b,
            (SliceContainsNoValues, SliceContainsNoValues)
            | (SliceContainsUndefinedValues, SliceContainsUndefinedValues)
            | (UncapturedErrorCondition, UncapturedErrorCondition)
            | (MissingHeader, MissingHeader)
            | (UnexpectedEndOfFile, UnexpectedEndOfFile) => true,
            (
                ValueOutsideOfBounds {
                    value: a,
                    lower_bound: al,
                    upper_bound: au,
                },
                ValueOutsideOfBounds {
                    value: b,
                    lower_bound: bl,
                    upper_bound: bu,
                },
            ) => a == b && al == bl && au == bu,
            (
                BelowMinimumSliceLength {
                    length: a,
                    minimum_required: am,
                },
                BelowMinimumSliceLength {
                    length: b,
                    minimum_required: bm,
                },
            ) => a == b && am == bm,
            (
                MismatchedSliceLengths { left: al, right: ar },
                MismatchedSliceLengths { left: bl, right: br },
            ) => al == bl && ar == br,
            (BadRange { range: a }, BadRange { range: b }) => a == b,
            (UnknownElement { symbol: a }, UnknownElement { symbol: b }) => a == b,
            (
                AtomicNumberOutOfRange { atomic_number: a },
                AtomicNumberOutOfRange { atomic_number: b },
            ) => a == b,
            (IonStageOutOfRange { ion_stage: a }, IonStageOutOfRange { ion_stage: b }) => a == b,
            (MissingColumn { name: a }, MissingColumn { name: b }) => a == b,
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn compares_by_variant_and_value() {
        assert_eq!(Error::MissingHeader, Error::MissingHeader);
        assert_eq!(
            Error::BadRange { range: "3-".into() },
            Error::BadRange { range: "3-".into() }
        );
        assert_ne!(
            Error::BadRange { range: "3-".into() },
            Error::BadRange { range: "-3".into() }
        );
        assert_ne!(Error::MissingHeader, Error::UnexpectedEndOfFile);
    }

    #[test]
    fn io_errors_are_never_equal() {
        let io = || Error::Io(std::io::Error::other("closed"));
        assert_ne!(io(), io());
    }
}
