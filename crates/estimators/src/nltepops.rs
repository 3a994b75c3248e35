//! NLTE level populations from `nlte_????.out`

// standard library
use std::collections::BTreeMap;
use std::path::Path;

// crate modules
use crate::error::{Error, Result};
use crate::files::{rank_file_paths, read_parallel};

// external crates
use artistools_atomic::LevelPopulation;
use artistools_cache::{CacheArg, DiskCache};
use artistools_utils::{f, file_size_mib, zexists, Config, WhitespaceTable};
use log::info;

/// Read the level populations of one NLTE file
///
/// A missing or empty file gives no rows.
pub fn read_file<P: AsRef<Path>>(nltefilepath: P) -> Result<Vec<LevelPopulation>> {
    let path = nltefilepath.as_ref();
    if !zexists(path) {
        return Ok(Vec::new());
    }

    info!("Reading {} ({:.2} MiB)", path.display(), file_size_mib(path));
    populations_from_table(&WhitespaceTable::read(path)?)
}

/// Convert rows of an NLTE table, optional columns default to NaN
pub fn populations_from_table(table: &WhitespaceTable) -> Result<Vec<LevelPopulation>> {
    if table.is_empty() {
        return Ok(Vec::new());
    }

    let column = |name: &str| table.column_index(name);
    let (timestep, modelgridindex, z, ion_stage, level) = (
        column("timestep")?,
        column("modelgridindex")?,
        column("Z")?,
        column("ion_stage")?,
        column("level")?,
    );

    let optional = |name: &str| table.column_index(name).ok();
    let (energy_ev, n_lte, n_nlte, ion_popfrac) = (
        optional("energy_ev"),
        optional("n_LTE"),
        optional("n_NLTE"),
        optional("ion_popfrac"),
    );

    let as_index = |value: f64, what: &str| -> Result<usize> {
        match value >= 0.0 && value.fract() == 0.0 {
            true => Ok(value as usize),
            false => Err(Error::ParseError(f!("{what} {value} in NLTE file"))),
        }
    };

    table
        .rows
        .iter()
        .map(|row| {
            let value = |column: Option<usize>| column.map_or(f64::NAN, |i| row[i]);
            Ok(LevelPopulation {
                timestep: as_index(row[timestep], "timestep")?,
                modelgridindex: as_index(row[modelgridindex], "modelgridindex")?,
                atomic_number: as_index(row[z], "Z")?,
                ion_stage: as_index(row[ion_stage], "ion_stage")?,
                level: row[level] as i64,
                energy_ev: value(energy_ev),
                n_lte: value(n_lte),
                n_nlte: value(n_nlte),
                ion_popfrac: value(ion_popfrac),
                lte: BTreeMap::new(),
            })
        })
        .collect()
}

/// Read the NLTE populations of a model at a timestep and cell
///
/// `None` for either selects everything. Only the run folder containing
/// the timestep and the ranks holding the cell are read.
pub fn read_files<P: AsRef<Path>>(
    modelpath: P,
    timestep: Option<usize>,
    modelgridindex: Option<usize>,
    config: &Config,
) -> Result<Vec<LevelPopulation>> {
    let modelpath = modelpath.as_ref();

    let cache = DiskCache::new("nltepops", "read_files")
        .version("2020-07-03.1327")
        .gzip(true)
        .enabled(config.enable_diskcache);

    let args = [
        CacheArg::from(modelpath),
        CacheArg::from(timestep),
        CacheArg::from(modelgridindex),
    ];

    cache.call::<_, Error, _>(&args, &[], || {
        let timesteps = timestep.map(|t| vec![t]).unwrap_or_default();
        let cells = modelgridindex.map(|m| vec![m as i64]).unwrap_or_default();
        let paths = rank_file_paths(
            modelpath,
            |mpirank| f!("nlte_{mpirank:04}.out"),
            &timesteps,
            &cells,
        )?;

        let wanted = |pop: &LevelPopulation| {
            timestep.map_or(true, |t| pop.timestep == t)
                && modelgridindex.map_or(true, |m| pop.modelgridindex == m)
        };

        let per_file = read_parallel(&paths, config, |path| {
            Ok(read_file(path)?.into_iter().filter(&wanted).collect::<Vec<_>>())
        })?;

        Ok(per_file.into_iter().flatten().collect())
    })
}

/// Total population of each ion, summed over levels
pub fn ion_populations(pops: &[LevelPopulation]) -> BTreeMap<(usize, usize), f64> {
    let mut ionpops = BTreeMap::new();
    for pop in pops {
        *ionpops.entry((pop.atomic_number, pop.ion_stage)).or_insert(0.0) += pop.n_nlte;
    }
    ionpops
}
