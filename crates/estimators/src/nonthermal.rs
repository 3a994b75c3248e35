//! Nonthermal electron spectra from `nonthermalspec_????.out`

// standard library
use std::path::Path;

// crate modules
use crate::error::Result;
use crate::files::rank_file_paths;

// external crates
use artistools_utils::{f, WhitespaceTable};
use log::info;

/// Read the nonthermal spectra of a model at a timestep and cell
///
/// The table has the columns of the ARTIS output, including `energy_ev`
/// and the spectrum `y`. When both a timestep and a cell are given, reading
/// stops at the first file containing them.
pub fn read_files<P: AsRef<Path>>(
    modelpath: P,
    timestep: Option<usize>,
    modelgridindex: Option<usize>,
) -> Result<WhitespaceTable> {
    let modelpath = modelpath.as_ref();
    let timesteps = timestep.map(|t| vec![t]).unwrap_or_default();
    let cells = modelgridindex.map(|m| vec![m as i64]).unwrap_or_default();

    let paths = rank_file_paths(
        modelpath,
        |mpirank| f!("nonthermalspec_{mpirank:04}.out"),
        &timesteps,
        &cells,
    )?;

    let mut nonthermaldata = WhitespaceTable::default();
    for path in paths {
        info!("Reading {}", path.display());
        let mut table = WhitespaceTable::read(&path)?;

        if let Some(timestep) = timestep {
            table = table.filter_eq("timestep", timestep as f64)?;
        }
        if let Some(modelgridindex) = modelgridindex {
            table = table.filter_eq("modelgridindex", modelgridindex as f64)?;
        }

        if table.is_empty() {
            continue;
        }
        if timestep.is_some() && modelgridindex.is_some() {
            return Ok(table);
        }
        nonthermaldata.extend(table)?;
    }

    Ok(nonthermaldata)
}
