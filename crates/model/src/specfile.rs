//! Header and frequency grid of the `spec.out` spectrum file

// standard library
use std::io::BufRead;
use std::path::{Path, PathBuf};

// crate modules
use crate::error::{Error, Result};
use crate::parsers::floats;

// external crates
use artistools_utils::{firstexisting, zopen};

/// Candidate spectrum files in order of preference
pub const SPEC_FILE_NAMES: [&str; 4] = ["spec.out.xz", "spec.out.gz", "spec.out", "specpol.out"];

/// Path to the spectrum file of a model folder
pub fn get_spec_path<P: AsRef<Path>>(modelpath: P) -> Result<PathBuf> {
    Ok(firstexisting(&SPEC_FILE_NAMES, modelpath)?)
}

/// Timestep time labels from the first row of `spec.out`
pub fn get_spec_time_labels<P: AsRef<Path>>(modelpath: P) -> Result<Vec<String>> {
    let path = get_spec_path(modelpath)?;
    let mut header = String::new();
    zopen(&path)?.read_line(&mut header)?;

    if header.trim().is_empty() {
        return Err(Error::UnexpectedEndOfFile(path.display().to_string()));
    }

    Ok(header
        .split_whitespace()
        .skip(1)
        .map(String::from)
        .collect())
}

/// Frequencies in Hz at which exspec bins the spectra
pub fn get_nu_grid<P: AsRef<Path>>(modelpath: P) -> Result<Vec<f64>> {
    let path = get_spec_path(modelpath)?;
    let reader = zopen(&path)?;

    let mut nu = Vec::new();
    for line in reader.lines().skip(1) {
        let line = line?;
        if let Some(first) = floats(&line)?.first() {
            nu.push(*first);
        }
    }
    Ok(nu)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn spec_header_and_grid() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("spec.out"),
            "0 1.1 1.2\n1e15 0.0 1.0\n2e15 3.0 4.0\n",
        )
        .unwrap();

        assert_eq!(get_spec_time_labels(dir.path()).unwrap(), vec!["1.1", "1.2"]);
        assert_eq!(get_nu_grid(dir.path()).unwrap(), vec![1e15, 2e15]);
    }
}
