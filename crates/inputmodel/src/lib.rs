//! ARTIS input models
#![doc = include_str!("../readme.md")]

// Split into subfiles for development, but anything important is re-exported
mod abundances;
mod describe;
mod error;
mod gridwidth;
mod modeldata;
mod operations;
mod tardis;

// Inline anything important for a nice public API
#[doc(inline)]
pub use modeldata::{
    get_modeldata, model_file_path, parse_modeldata, save_modeldata, InputModel, ModelCell,
};

#[doc(inline)]
pub use abundances::{
    get_initialabundances, save_initialabundances, AbundanceRow, InitialAbundances,
};

#[doc(inline)]
pub use operations::{fully_mix, scale_velocity, VelocityScale};

#[doc(inline)]
pub use tardis::{write_tardis_csvy, AbundanceType, TardisOptions};

#[doc(inline)]
pub use describe::{describe, DescribeOptions, ModelDescription, SpeciesMass};

#[doc(inline)]
pub use gridwidth::{get_wid_init_at_tmin, get_wid_init_at_tmodel};

#[doc(inline)]
pub use error::{Error, Result};
