//! Cached reading of the estimators of a model

// standard library
use std::collections::BTreeMap;
use std::path::Path;

// crate modules
use crate::error::{Error, Result};
use crate::estimfile::{parse_estimfile, Estimators};
use crate::files::{rank_file_paths, read_parallel};

// external crates
use artistools_cache::{CacheArg, DiskCache};
use artistools_model::TimestepTimes;
use artistools_utils::{f, zopen, Config};
use log::{info, warn};

/// Estimators keyed by (timestep, modelgridindex)
pub type EstimatorMap = BTreeMap<(usize, usize), Estimators>;

/// Read the estimators of a model for the given timesteps and cells
///
/// Empty `timesteps` reads every timestep, and empty (or negative)
/// `modelgridindices` every cell. Files are read from every run folder
/// holding the timesteps, and later run folders take precedence for
/// duplicated timesteps. Results are cached in the model folder.
///
/// ```rust, no_run
/// # use artistools_estimators::read_estimators;
/// # use artistools_utils::Config;
/// let estimators = read_estimators("/path/to/model", &[30], &[0], &Config::default()).unwrap();
/// println!("Te = {:?}", estimators[&(30, 0)].get("Te"));
/// ```
pub fn read_estimators<P: AsRef<Path>>(
    modelpath: P,
    timesteps: &[usize],
    modelgridindices: &[i64],
    config: &Config,
) -> Result<EstimatorMap> {
    let modelpath = modelpath.as_ref();

    let cache = DiskCache::new("estimators", "read_estimators")
        .version("1")
        .gzip(true)
        .enabled(config.enable_diskcache);

    let args = [
        CacheArg::from(modelpath),
        CacheArg::from(timesteps),
        CacheArg::from(modelgridindices),
    ];

    cache.call::<_, Error, _>(&args, &[], || {
        read_estimators_uncached(modelpath, timesteps, modelgridindices, config)
    })
}

fn read_estimators_uncached(
    modelpath: &Path,
    timesteps: &[usize],
    modelgridindices: &[i64],
    config: &Config,
) -> Result<EstimatorMap> {
    let paths = rank_file_paths(
        modelpath,
        |mpirank| f!("estimators_{mpirank:04}.out"),
        timesteps,
        modelgridindices,
    )?;

    if paths.is_empty() {
        warn!("No estimator files found in {}", modelpath.display());
        return Ok(EstimatorMap::new());
    }
    info!("Reading {} estimator files from {}", paths.len(), modelpath.display());

    let all_cells = modelgridindices.is_empty() || modelgridindices.iter().any(|&m| m < 0);
    let wanted = |block: &Estimators| {
        (timesteps.is_empty() || timesteps.contains(&block.timestep))
            && (all_cells || modelgridindices.contains(&(block.modelgridindex as i64)))
    };

    let blocks_per_file = read_parallel(&paths, config, |path| {
        let blocks = parse_estimfile(zopen(path)?, false)?;
        Ok(blocks.into_iter().filter(&wanted).collect::<Vec<Estimators>>())
    })?;

    let tmids = match TimestepTimes::read(modelpath) {
        Ok(times) => times.tmids,
        Err(e) => {
            warn!("Timestep times unavailable, tdays not set: {e}");
            Vec::new()
        }
    };

    let mut estimators = EstimatorMap::new();
    for mut block in blocks_per_file.into_iter().flatten() {
        block.tdays = tmids.get(block.timestep).copied();
        estimators.insert((block.timestep, block.modelgridindex), block);
    }

    Ok(estimators)
}

/// Estimators of one cell and timestep, failing if the cell is empty
pub fn get_cell_estimators(
    estimators: &EstimatorMap,
    timestep: usize,
    modelgridindex: usize,
) -> Result<&Estimators> {
    let block = estimators
        .get(&(timestep, modelgridindex))
        .ok_or_else(|| Error::NoData(f!("estimator (timestep {timestep}, cell {modelgridindex})")))?;

    match block.emptycell {
        true => Err(Error::EmptyCell {
            timestep,
            modelgridindex,
        }),
        false => Ok(block),
    }
}
