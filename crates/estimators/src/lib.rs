//! Readers for the per-rank outputs of ARTIS runs
#![doc = include_str!("../readme.md")]

// Split into subfiles for development, but anything important is re-exported
mod error;
mod estimators;
mod estimfile;
mod files;
mod massfractions;

pub mod macroatom;
pub mod nltepops;
pub mod nonthermal;

// Inline the important types and readers for a nice public API
#[doc(inline)]
pub use estimators::{get_cell_estimators, read_estimators, EstimatorMap};

#[doc(inline)]
pub use estimfile::{parse_artis_float, parse_estimfile, Estimators};

#[doc(inline)]
pub use massfractions::{exportmassfractions, get_massfractions};

#[doc(inline)]
pub use error::{Error, Result};
