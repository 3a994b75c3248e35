//! Bound-free continua from `bflist.dat` and bound-bound lines from `linestat.out`

// standard library
use std::collections::BTreeMap;
use std::io::BufRead;
use std::path::Path;

// crate modules
use crate::composition::get_composition_data;
use crate::error::{Error, Result};
use crate::parsers::{floats, index, ints};

// external crates
use artistools_utils::zopen;
use serde::{Deserialize, Serialize};

/// A photoionisation continuum
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoundFreeContinuum {
    /// Atomic number
    pub atomic_number: usize,
    /// Ion stage of the lower level
    pub ion_stage: usize,
    /// Level index within the ion
    pub level: usize,
    /// Target level in the upper ion, or -1 when not given
    pub upperionlevel: i64,
}

/// A bound-bound transition
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Line {
    /// Wavelength in Angstroms
    pub lambda_angstroms: f64,
    /// Atomic number
    pub atomic_number: usize,
    /// Ion stage
    pub ion_stage: usize,
    /// Zero-based index of the upper level
    pub upperlevelindex: usize,
    /// Zero-based index of the lower level
    pub lowerlevelindex: usize,
}

/// Read the bound-free continua of a model, keyed by continuum index
pub fn get_bflist<P: AsRef<Path>>(modelpath: P) -> Result<BTreeMap<usize, BoundFreeContinuum>> {
    let modelpath = modelpath.as_ref();
    let composition = get_composition_data(modelpath)?;
    let path = modelpath.join("bflist.dat");

    let mut lines = zopen(&path)?.lines();
    let eof = || Error::UnexpectedEndOfFile(path.display().to_string());

    let bflistcount = lines.next().ok_or_else(eof)??.trim().parse::<usize>()?;

    let mut bflist = BTreeMap::new();
    for _ in 0..bflistcount {
        let rowints = ints(&lines.next().ok_or_else(eof)??)?;
        if rowints.len() < 4 {
            return Err(Error::WrongNumberOfValues {
                what: "bflist row".to_string(),
                expected: 4,
                found: rowints.len(),
            });
        }

        let i = index(rowints[0], "continuum index")?;
        let elementindex = index(rowints[1], "element index")?;
        let ionindex = index(rowints[2], "ion index")?;
        let level = index(rowints[3], "level")?;
        let upperionlevel = rowints.get(4).copied().unwrap_or(-1);

        let element = composition
            .get(elementindex)
            .ok_or(Error::ElementIndexOutOfRange(elementindex))?;

        bflist.insert(
            i,
            BoundFreeContinuum {
                atomic_number: element.atomic_number,
                ion_stage: ionindex + element.lowermost_ionstage,
                level,
                upperionlevel,
            },
        );
    }

    Ok(bflist)
}

/// Read `linestat.out`, indexed by line number
///
/// The file holds five rows: wavelengths in cm, atomic numbers, ion stages,
/// then upper and lower level indices counted from one.
pub fn get_linelist<P: AsRef<Path>>(modelpath: P) -> Result<Vec<Line>> {
    let path = modelpath.as_ref().join("linestat.out");
    let mut lines = zopen(&path)?.lines();
    let eof = || Error::UnexpectedEndOfFile(path.display().to_string());

    let lambda_angstroms = floats(&lines.next().ok_or_else(eof)??)?
        .into_iter()
        .map(|wl| wl * 1e8)
        .collect::<Vec<f64>>();
    let nlines = lambda_angstroms.len();

    let mut next_row = |what: &str, offset: i64| -> Result<Vec<usize>> {
        let values = ints(&lines.next().ok_or_else(eof)??)?;
        if values.len() != nlines {
            return Err(Error::WrongNumberOfValues {
                what: what.to_string(),
                expected: nlines,
                found: values.len(),
            });
        }
        values.into_iter().map(|v| index(v - offset, what)).collect()
    };

    let atomic_numbers = next_row("atomic numbers", 0)?;
    let ion_stages = next_row("ion stages", 0)?;
    let upper_levels = next_row("upper levels", 1)?;
    let lower_levels = next_row("lower levels", 1)?;

    Ok((0..nlines)
        .map(|i| Line {
            lambda_angstroms: lambda_angstroms[i],
            atomic_number: atomic_numbers[i],
            ion_stage: ion_stages[i],
            upperlevelindex: upper_levels[i],
            lowerlevelindex: lower_levels[i],
        })
        .collect())
}
