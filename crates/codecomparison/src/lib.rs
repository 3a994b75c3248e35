//! Code comparison workshop data for ARTIS models
#![doc = include_str!("../readme.md")]

// Split into subfiles for development, but anything important is re-exported
mod error;
mod paths;
mod reader;
mod writer;

// Inline the important types and readers for a nice public API
#[doc(inline)]
pub use paths::{CodeComparisonPath, VIRTUAL_FOLDER};

#[doc(inline)]
pub use reader::{
    get_spectra, get_timestep_times, get_timestep_times_float, parse_ion_columns,
    read_reference_estimators, read_times, ReferenceSpectra,
};

#[doc(inline)]
pub use writer::{
    write_ionfracts, write_phys, write_single_estimator, write_spectra, writecomparisondata,
    ComparisonData, SingleEstimator,
};

#[doc(inline)]
pub use error::{Error, Result};
