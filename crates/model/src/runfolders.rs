//! Discovery of run folders, including restarted runs in subfolders

// standard library
use std::collections::BTreeSet;
use std::io::BufRead;
use std::path::{Path, PathBuf};

// crate modules
use crate::error::Result;

// external crates
use artistools_utils::{zexists, zopen};
use log::trace;

/// Timesteps covered by the estimator output of a run folder
///
/// The first timestep of a restarted run repeats the last of the previous
/// run and is skipped. A folder without `estimators_0000.out` has none.
pub fn get_runfolder_timesteps<P: AsRef<Path>>(folderpath: P) -> Result<BTreeSet<usize>> {
    let path = folderpath.as_ref().join("estimators_0000.out");
    let mut folder_timesteps = BTreeSet::new();

    if !zexists(&path) {
        trace!("No estimators in {}", folderpath.as_ref().display());
        return Ok(folder_timesteps);
    }

    let mut restart_timestep = None;
    for line in zopen(&path)?.lines() {
        let line = line?;
        let Some(rest) = line.strip_prefix("timestep ") else {
            continue;
        };

        let Some(timestep) = rest
            .split_whitespace()
            .next()
            .and_then(|t| t.parse::<usize>().ok())
        else {
            continue;
        };

        if restart_timestep.is_none() && timestep != 0 && !folder_timesteps.contains(&0) {
            restart_timestep = Some(timestep);
        }

        if Some(timestep) != restart_timestep {
            folder_timesteps.insert(timestep);
        }
    }

    Ok(folder_timesteps)
}

/// Folders containing ARTIS output within a model folder
///
/// With a `timestep`, only the first folder containing it is returned. With a
/// list of `timesteps`, every folder containing any of them. Otherwise every
/// folder with estimator output, sorted with the model folder itself last.
pub fn get_runfolders<P: AsRef<Path>>(
    modelpath: P,
    timestep: Option<usize>,
    timesteps: Option<&[usize]>,
) -> Result<Vec<PathBuf>> {
    let modelpath = modelpath.as_ref();

    let mut folderlist_all = std::fs::read_dir(modelpath)?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|p| p.is_dir())
        .collect::<Vec<PathBuf>>();
    folderlist_all.sort();
    folderlist_all.push(modelpath.to_path_buf());

    match (timestep, timesteps) {
        (_, Some(timesteps)) if !timesteps.is_empty() => {
            let mut matching = Vec::new();
            for folder in folderlist_all {
                let folder_timesteps = get_runfolder_timesteps(&folder)?;
                if timesteps.iter().any(|ts| folder_timesteps.contains(ts)) {
                    matching.push(folder);
                }
            }
            Ok(matching)
        }
        (Some(timestep), None) => {
            for folder in folderlist_all {
                if get_runfolder_timesteps(&folder)?.contains(&timestep) {
                    return Ok(vec![folder]);
                }
            }
            Ok(Vec::new())
        }
        _ => {
            let mut folders = Vec::new();
            for folder in folderlist_all {
                if !get_runfolder_timesteps(&folder)?.is_empty() {
                    folders.push(folder);
                }
            }
            Ok(folders)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write_estimators(dir: &Path, timesteps: &[usize]) {
        std::fs::create_dir_all(dir).unwrap();
        let text = timesteps
            .iter()
            .map(|ts| format!("timestep {ts} modelgridindex 0 titeration 0 TR 5000\n\n"))
            .collect::<String>();
        std::fs::write(dir.join("estimators_0000.out"), text).unwrap();
    }

    #[test]
    fn restarted_run_skips_duplicate() {
        let dir = tempfile::tempdir().unwrap();
        write_estimators(dir.path(), &[5, 5, 6, 7]);
        let timesteps = get_runfolder_timesteps(dir.path()).unwrap();
        assert_eq!(timesteps.into_iter().collect::<Vec<_>>(), vec![6, 7]);
    }

    #[test]
    fn fresh_run_keeps_all() {
        let dir = tempfile::tempdir().unwrap();
        write_estimators(dir.path(), &[0, 1, 2]);
        assert_eq!(get_runfolder_timesteps(dir.path()).unwrap().len(), 3);
    }

    #[test]
    fn folders_by_timestep() {
        let dir = tempfile::tempdir().unwrap();
        write_estimators(&dir.path().join("run1"), &[0, 1, 2]);
        write_estimators(&dir.path().join("run2"), &[2, 3, 4]);
        std::fs::create_dir(dir.path().join("plots")).unwrap();

        let all = get_runfolders(dir.path(), None, None).unwrap();
        assert_eq!(all, vec![dir.path().join("run1"), dir.path().join("run2")]);

        let one = get_runfolders(dir.path(), Some(4), None).unwrap();
        assert_eq!(one, vec![dir.path().join("run2")]);

        let some = get_runfolders(dir.path(), None, Some(&[1, 3][..])).unwrap();
        assert_eq!(some.len(), 2);
    }
}
