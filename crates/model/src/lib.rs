//! Run folder bookkeeping for ARTIS models
#![doc = include_str!("../readme.md")]

// Split into subfiles for development, but anything important is re-exported
mod cdefines;
mod composition;
mod deposition;
mod error;
mod grid;
mod inputparams;
mod linelist;
mod modelname;
mod mpi;
mod parsers;
mod runfolders;
mod specfile;
mod stats;
mod vpkt;

pub mod timesteps;

// Inline the important types and readers for a nice public API
#[doc(inline)]
pub use timesteps::{
    get_time_range, get_timestep_of_timedays, get_timestep_time, get_timestep_times,
    get_timestep_times_float, parse_timedays, showtimesteptimes, TimeLoc, TimeRange,
    TimeSelection, TimestepTimes,
};

#[doc(inline)]
pub use mpi::{get_cellsofmpirank, get_mpiranklist, get_mpirankofcell, RankPartition};

#[doc(inline)]
pub use grid::{get_grid_mapping, GridMapping};

#[doc(inline)]
pub use inputparams::{get_inputparams, get_nprocs, get_npts_model, parse_inputparams, InputParams};

#[doc(inline)]
pub use runfolders::{get_runfolder_timesteps, get_runfolders};

#[doc(inline)]
pub use composition::{
    find_element, get_composition_data, get_composition_data_from_outputfile, CompositionEntry,
};

#[doc(inline)]
pub use linelist::{get_bflist, get_linelist, BoundFreeContinuum, Line};

#[doc(inline)]
pub use specfile::{get_nu_grid, get_spec_path, get_spec_time_labels, SPEC_FILE_NAMES};

#[doc(inline)]
pub use deposition::{get_deposition, parse_deposition, DepositionRow};

#[doc(inline)]
pub use cdefines::{get_artis_constants, parse_cdefines, parse_cdefines_str};

#[doc(inline)]
pub use modelname::{get_model_name, is_codecomparison_path};

#[doc(inline)]
pub use stats::{parse_run_stats, read_run_stats, RunStats};

#[doc(inline)]
pub use vpkt::{get_vpkt_config, VpktConfig};

#[doc(inline)]
pub use error::{Error, Result};
