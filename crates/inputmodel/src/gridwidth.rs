// standard library
use std::path::Path;

// crate modules
use crate::error::Result;
use crate::modeldata::get_modeldata;

// external crates
use artistools_model::{get_timestep_times_float, TimeLoc};
use artistools_utils::constants::DAY_S;
use log::debug;

/// Number of propagation grid cells along each axis of a 1D run
const NCOORDGRID: f64 = 50.0;

/// Propagation cell width in cm at the start of the first timestep
pub fn get_wid_init_at_tmin<P: AsRef<Path>>(modelpath: P) -> Result<f64> {
    let modelpath = modelpath.as_ref();
    let tstarts = get_timestep_times_float(modelpath, TimeLoc::Start)?;
    let tmin = tstarts.first().copied().unwrap_or_default() * DAY_S;
    let vmax = get_modeldata(modelpath, false)?.vmax_cmps();

    Ok(2.0 * vmax * tmin / NCOORDGRID)
}

/// Cell width in cm at the model time for a cubic grid of `ngridpoints`
///
/// Without an explicit grid the cell count, time and extent are taken from
/// the model.
pub fn get_wid_init_at_tmodel<P: AsRef<Path>>(
    modelpath: P,
    grid: Option<(usize, f64, f64)>,
) -> Result<f64> {
    let (ngridpoints, t_model_days, xmax) = match grid {
        Some(grid) => grid,
        None => {
            let model = get_modeldata(modelpath, false)?;
            let t_model = model.t_model_init_days;
            (
                model.cells.len(),
                t_model,
                model.vmax_cmps() * t_model * DAY_S,
            )
        }
    };

    let ncoordgridx = (ngridpoints as f64).cbrt().round();
    let wid_init = 2.0 * xmax / ncoordgridx;
    debug!("xmax {xmax} t_model {t_model_days} wid_init {wid_init}");

    Ok(wid_init)
}
