//! Locating and reading the per-rank output files of a model

// standard library
use std::path::{Path, PathBuf};

// crate modules
use crate::error::Result;

// external crates
use artistools_model::{get_mpiranklist, get_runfolders};
use artistools_utils::{zexists, Config};
use kdam::par_tqdm;
use log::debug;
use rayon::prelude::*;

/// Existing per-rank files in every run folder holding the timesteps
///
/// `filename` gives the base file name of a rank, compressed variants are
/// found by the readers. Ranks are limited to those holding the requested
/// cells, or every rank with cells when none are given.
pub(crate) fn rank_file_paths<F>(
    modelpath: &Path,
    filename: F,
    timesteps: &[usize],
    modelgridindices: &[i64],
) -> Result<Vec<PathBuf>>
where
    F: Fn(usize) -> String,
{
    let runfolders = match timesteps {
        [] => get_runfolders(modelpath, None, None)?,
        [timestep] => get_runfolders(modelpath, Some(*timestep), None)?,
        _ => get_runfolders(modelpath, None, Some(timesteps))?,
    };
    let mpiranks = get_mpiranklist(modelpath, modelgridindices, true)?;

    let mut paths = Vec::new();
    for folder in &runfolders {
        for &mpirank in &mpiranks {
            let path = folder.join(filename(mpirank));
            match zexists(&path) {
                true => paths.push(path),
                false => debug!("No file {}", path.display()),
            }
        }
    }
    Ok(paths)
}

/// Read files in parallel on a pool sized from the configuration
///
/// Results are returned in the order of `paths`.
pub(crate) fn read_parallel<T, F>(paths: &[PathBuf], config: &Config, read: F) -> Result<Vec<T>>
where
    T: Send,
    F: Fn(&Path) -> Result<T> + Sync + Send,
{
    if config.num_processes <= 1 || paths.len() <= 1 {
        return paths.iter().map(|p| read(p.as_path())).collect();
    }

    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(config.thread_pool_size())
        .build()?;

    let results = pool.install(|| {
        par_tqdm!(
            paths.par_iter().map(|p| read(p.as_path())),
            bar_format = "Reading files: {count}/{total} [{rate:.2} files/s]  ",
            disable = config.disable_progress
        )
        .collect::<Result<Vec<T>>>()
    });

    if !config.disable_progress {
        eprintln!();
    }
    results
}
