//! Listing and clearing the cache folder of a model

// standard library
use std::path::{Path, PathBuf};

// crate modules
use crate::cache::CACHE_FOLDER_NAME;
use crate::error::Result;

// external crates
use artistools_utils::file_size_mib;
use log::info;
use serde::Serialize;

/// A stored cache file
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CacheEntry {
    pub path: PathBuf,
    pub size_mib: f64,
}

fn is_entry(path: &Path) -> bool {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_default();
    path.is_file()
        && name.starts_with("cached-")
        && (name.ends_with(".tmp") || name.ends_with(".tmp.gz"))
}

/// Entry files in the cache folder of `modelpath`, sorted by name
///
/// ```rust
/// # use artistools_cache::cache_entries;
/// let dir = tempfile::tempdir().unwrap();
/// assert!(cache_entries(dir.path()).unwrap().is_empty());
/// ```
pub fn cache_entries<P: AsRef<Path>>(modelpath: P) -> Result<Vec<CacheEntry>> {
    let folder = modelpath.as_ref().join(CACHE_FOLDER_NAME);
    if !folder.is_dir() {
        return Ok(Vec::new());
    }

    let mut paths = std::fs::read_dir(&folder)?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|p| is_entry(p))
        .collect::<Vec<PathBuf>>();
    paths.sort();

    Ok(paths
        .into_iter()
        .map(|path| CacheEntry {
            size_mib: file_size_mib(&path),
            path,
        })
        .collect())
}

/// Delete every entry in the cache folder of `modelpath`
///
/// Other files in the folder are left alone. Returns the number of entries
/// removed.
pub fn clear_cache<P: AsRef<Path>>(modelpath: P) -> Result<usize> {
    let entries = cache_entries(&modelpath)?;
    for entry in &entries {
        std::fs::remove_file(&entry.path)?;
        info!("Deleted {}", entry.path.display());
    }
    Ok(entries.len())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_cache_files_are_entries() {
        let dir = tempfile::tempdir().unwrap();
        let folder = dir.path().join(CACHE_FOLDER_NAME);
        std::fs::create_dir(&folder).unwrap();

        std::fs::write(folder.join("cached-a.read-00ff.tmp"), b"abc").unwrap();
        std::fs::write(folder.join("cached-b.read-11ee.tmp.gz"), b"abc").unwrap();
        std::fs::write(folder.join("notes.txt"), b"keep").unwrap();

        let entries = cache_entries(dir.path()).unwrap();
        assert_eq!(entries.len(), 2);
        assert!(entries[0].path.ends_with("cached-a.read-00ff.tmp"));

        assert_eq!(clear_cache(dir.path()).unwrap(), 2);
        assert!(cache_entries(dir.path()).unwrap().is_empty());
        assert!(folder.join("notes.txt").exists());
    }
}
