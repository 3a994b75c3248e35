//! Mapping between propagation cells and model grid cells from `grid.out`

// standard library
use std::collections::{BTreeMap, HashMap};
use std::io::BufRead;
use std::path::Path;

// crate modules
use crate::error::Result;
use crate::parsers::{index, ints};

// external crates
use artistools_utils::{compression_variants, firstexisting, zopen};
use log::debug;

/// Many-to-one association of propagation cells to model grid cells
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GridMapping {
    /// Propagation cells belonging to each model grid cell, in file order
    pub assoc_cells: BTreeMap<usize, Vec<usize>>,
    /// Model grid cell of each propagation cell
    pub mgi_of_propcells: HashMap<usize, usize>,
}

impl GridMapping {
    /// Model grid cell of a propagation cell
    pub fn mgi_of_propcell(&self, propcellid: usize) -> Option<usize> {
        self.mgi_of_propcells.get(&propcellid).copied()
    }

    /// Propagation cells of a model grid cell
    pub fn propcells_of_mgi(&self, modelgridindex: usize) -> &[usize] {
        self.assoc_cells
            .get(&modelgridindex)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }
}

/// Read the grid mapping from a model folder or directly from a file
///
/// For a folder, the first of `grid.out.xz`, `grid.out.gz` or `grid.out` is
/// used.
pub fn get_grid_mapping<P: AsRef<Path>>(path: P) -> Result<GridMapping> {
    let path = path.as_ref();
    let filename = match path.is_dir() {
        true => firstexisting(&compression_variants("grid.out"), path)?,
        false => path.to_path_buf(),
    };

    debug!("Reading {}", filename.display());

    let mut mapping = GridMapping::default();
    for line in zopen(&filename)?.lines() {
        let row = ints(&line?)?;
        if row.len() < 2 {
            continue;
        }

        let propcellid = index(row[0], "propagation cell")?;
        let mgi = index(row[1], "model grid index")?;
        mapping.assoc_cells.entry(mgi).or_default().push(propcellid);
        mapping.mgi_of_propcells.insert(propcellid, mgi);
    }

    Ok(mapping)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn many_to_one_mapping() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("grid.out"), "0 0\n1 0\n2 1\n3 0\n").unwrap();

        let mapping = get_grid_mapping(dir.path()).unwrap();
        assert_eq!(mapping.propcells_of_mgi(0), &[0, 1, 3]);
        assert_eq!(mapping.mgi_of_propcell(2), Some(1));
        assert!(mapping.propcells_of_mgi(7).is_empty());
    }

    #[test]
    fn missing_grid_file() {
        let dir = tempfile::tempdir().unwrap();
        assert!(get_grid_mapping(dir.path()).is_err());
    }
}
