//! Macroatom transition records from `macroatom_????.out`

// standard library
use std::path::{Path, PathBuf};

// crate modules
use crate::error::Result;

// external crates
use artistools_utils::constants::C_ANGSTROM_PER_S;
use artistools_utils::WhitespaceTable;
use log::{info, warn};
use regex::Regex;

/// Selection of macroatom records, `None` fields match everything
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct MacroatomFilter {
    /// Only this cell
    pub modelgridindex: Option<usize>,
    /// First timestep
    pub timestepmin: Option<usize>,
    /// Last timestep
    pub timestepmax: Option<usize>,
    /// Only this element
    pub atomic_number: Option<usize>,
}

/// Macroatom files in a model folder and its direct subfolders
pub fn find_macroatom_files<P: AsRef<Path>>(modelpath: P) -> Result<Vec<PathBuf>> {
    let modelpath = modelpath.as_ref();
    let re = Regex::new(r"^macroatom_\d{4}\.out")?;

    let matching = |dir: &Path| -> Result<Vec<PathBuf>> {
        let mut files = std::fs::read_dir(dir)?
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .filter(|p| p.is_file())
            .filter(|p| {
                p.file_name()
                    .and_then(|n| n.to_str())
                    .is_some_and(|n| re.is_match(n))
            })
            .collect::<Vec<PathBuf>>();
        files.sort();
        Ok(files)
    };

    let mut files = matching(modelpath)?;
    let mut subdirs = std::fs::read_dir(modelpath)?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|p| p.is_dir())
        .collect::<Vec<PathBuf>>();
    subdirs.sort();
    for subdir in subdirs {
        files.extend(matching(&subdir)?);
    }

    Ok(files)
}

/// Read and filter macroatom records from a list of files
pub fn read_files(files: &[PathBuf], filter: &MacroatomFilter) -> Result<WhitespaceTable> {
    let mut dfall = WhitespaceTable::default();

    for path in files {
        info!("Loading {}...", path.display());
        let table = WhitespaceTable::read(path)?;
        if table.is_empty() {
            continue;
        }

        let mgi = table.column_index("modelgridindex")?;
        let ts = table.column_index("timestep")?;
        let z = table.column_index("Z")?;

        let selected = table.filter(|row| {
            filter.modelgridindex.map_or(true, |m| row[mgi] == m as f64)
                && filter.timestepmin.map_or(true, |t| row[ts] >= t as f64)
                && filter.timestepmax.map_or(true, |t| row[ts] <= t as f64)
                && filter.atomic_number.map_or(true, |a| row[z] == a as f64)
        });

        if !selected.is_empty() {
            dfall.extend(selected)?;
        }
    }

    if dfall.is_empty() {
        warn!("No macroatom data found");
    }
    Ok(dfall)
}

/// Comoving frame wavelengths in Angstroms of absorbed and emitted packets
pub fn transition_wavelengths(table: &WhitespaceTable) -> Result<Vec<(f64, f64)>> {
    let nu_in = table.column("nu_cmf_in")?;
    let nu_out = table.column("nu_cmf_out")?;
    Ok(nu_in
        .iter()
        .zip(&nu_out)
        .map(|(nu_in, nu_out)| (C_ANGSTROM_PER_S / nu_in, C_ANGSTROM_PER_S / nu_out))
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    const MACROATOM: &str = "\
modelgridindex timestep Z ion_stage level nu_cmf_in nu_cmf_out
0 10 26 2 5 5e14 6e14
1 10 26 2 5 5e14 6e14
0 12 27 3 1 4e14 3e14
0 20 26 3 2 7e14 8e14
";

    #[test]
    fn files_in_subfolders() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join("run2")).unwrap();
        std::fs::write(dir.path().join("macroatom_0000.out"), MACROATOM).unwrap();
        std::fs::write(dir.path().join("run2/macroatom_0001.out.gz"), "").unwrap();
        std::fs::write(dir.path().join("macroatom_all.out"), "").unwrap();

        let files = find_macroatom_files(dir.path()).unwrap();
        assert_eq!(files.len(), 2);
        assert!(files[1].ends_with("run2/macroatom_0001.out.gz"));
    }

    #[test]
    fn filtered_records() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("macroatom_0000.out");
        std::fs::write(&path, MACROATOM).unwrap();

        let filter = MacroatomFilter {
            modelgridindex: Some(0),
            timestepmin: Some(10),
            timestepmax: Some(12),
            atomic_number: Some(26),
        };
        let table = read_files(&[path], &filter).unwrap();
        assert_eq!(table.len(), 1);

        let wavelengths = transition_wavelengths(&table).unwrap();
        assert!((wavelengths[0].0 - C_ANGSTROM_PER_S / 5e14).abs() < 1e-9);
    }
}
