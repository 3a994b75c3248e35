//! Atomic data and level populations for ARTIS models
#![doc = include_str!("../readme.md")]

// Split into subfiles for development, but anything important is re-exported
mod error;
mod levels;
mod parsers;
mod populations;
mod recombrates;
mod spectrum;
mod texify;

// Inline the important types and readers for a nice public API
#[doc(inline)]
pub use levels::{
    find_ion, get_levels, parse_adata, parse_phixsdata, parse_transitiondata, Ion, IonList, Level,
    Photoionisation, Transition,
};

#[doc(inline)]
pub use populations::{add_lte_pops, ltepop, partition_function, LevelPopulation, SUPERLEVEL};

#[doc(inline)]
pub use recombrates::{get_ionrecombratecalibration, parse_recombratefile, RecombRates};

#[doc(inline)]
pub use spectrum::{
    add_upper_lte_pop, generate_ion_spectrum, get_line_transitions, upper_pop_lte_column,
    upper_pops_from_levels, LineSpectrumOptions, LineTransition,
};

#[doc(inline)]
pub use texify::{texifyconfiguration, texifyterm};

#[doc(inline)]
pub use error::{Error, Result};
