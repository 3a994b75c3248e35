//! Spectra, light curves and magnitudes of ARTIS models
#![doc = include_str!("../readme.md")]

// Split into subfiles for development, but anything important is re-exported
mod deposition;
mod error;
mod magnitudes;
mod parsers;
mod specdata;

pub mod lightcurve;

// Inline the important types and readers for a nice public API
#[doc(inline)]
pub use specdata::{
    get_spectrum, get_spectrum_at_time, parse_specdata, read_specdata, SpecData, Spectrum,
};

#[doc(inline)]
pub use lightcurve::{get_lightcurve, LightCurvePoint};

#[doc(inline)]
pub use magnitudes::{
    bolometric_magnitude, evaluate_magnitudes, filter_magnitude, get_filter_data,
    get_magnitudes, get_spectrum_in_filter_range, FilterData, FilterMagnitudes, BOLOMETRIC,
};

#[doc(inline)]
pub use deposition::{
    analytical_positron_deposition, forward_doubledecay, PositronDeposition, ZoneDeposition,
    MEANLIFE_CO56_DAYS, MEANLIFE_NI56_DAYS,
};

#[doc(inline)]
pub use error::{Error, Result};
