//! Ions, levels and transitions from `adata.txt`, `transitiondata.txt` and
//! `phixsdata_v2.txt`
//!
//! Level numbers are one-based in the files and zero-based here.

// standard library
use std::collections::HashMap;
use std::io::BufRead;
use std::path::Path;

// crate modules
use crate::error::{Error, Result};
use crate::parsers::{field, floats, ints, level_row};

// external crates
use artistools_utils::{f, zopen};
use log::{debug, info};
use serde::{Deserialize, Serialize};

/// Ions to read, as (atomic number, ion stage), or every ion when empty
pub type IonList<'a> = &'a [(usize, usize)];

/// An atomic level of an ion
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Level {
    /// Energy above the ground state in eV
    pub energy_ev: f64,
    /// Statistical weight
    pub g: f64,
    /// Number of bound-bound transitions from the level
    pub transition_count: usize,
    /// Configuration and term, e.g. `3d6(5D)4s_a6Dd[7/2]`
    pub levelname: String,
    /// Photoionisation targets in the upper ion as (level, probability)
    pub phixstargetlist: Vec<(usize, f64)>,
    /// Photoionisation cross section in cm^2 against nu / nu_threshold
    pub phixstable: Vec<(f64, f64)>,
}

/// A bound-bound transition between two levels of an ion
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transition {
    /// Zero-based lower level
    pub lower: usize,
    /// Zero-based upper level
    pub upper: usize,
    /// Einstein A coefficient in s^-1
    #[serde(rename = "A")]
    pub a: f64,
    /// Effective collision strength, negative when not known
    pub collstr: f64,
    /// Magnetic dipole or electric quadrupole transition
    pub forbidden: bool,
}

/// All the atomic data of one ion
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ion {
    /// Atomic number
    #[serde(rename = "Z")]
    pub atomic_number: usize,
    /// Ion stage, 1 for neutral
    pub ion_stage: usize,
    /// Number of levels in the file
    pub level_count: usize,
    /// Ionisation potential in eV
    pub ion_pot: f64,
    /// Levels in order of energy
    pub levels: Vec<Level>,
    /// Transitions, empty unless requested
    pub transitions: Vec<Transition>,
}

impl Ion {
    /// Identifier as (atomic number, ion stage)
    pub fn id(&self) -> (usize, usize) {
        (self.atomic_number, self.ion_stage)
    }

    /// Level by zero-based index
    pub fn level(&self, index: usize) -> Result<&Level> {
        self.levels.get(index).ok_or(Error::LevelOutOfRange {
            level: index,
            nlevels: self.levels.len(),
        })
    }
}

/// Photoionisation data of one lower level, as read from `phixsdata_v2.txt`
#[derive(Debug, Clone, PartialEq)]
pub struct Photoionisation {
    /// Atomic number
    pub atomic_number: usize,
    /// Ion stage of the level being ionised
    pub lowerionstage: usize,
    /// Zero-based level being ionised
    pub lowerionlevel: usize,
    /// Ion stage after ionisation
    pub upperionstage: usize,
    /// Target levels in the upper ion as (level, probability)
    pub targetlist: Vec<(usize, f64)>,
    /// Cross section in cm^2 at each multiple of the threshold frequency
    pub table: Vec<(f64, f64)>,
}

fn selected(ionlist: IonList, atomic_number: usize, ion_stage: usize) -> bool {
    ionlist.is_empty() || ionlist.contains(&(atomic_number, ion_stage))
}

/// Next non-blank line, or None at the end
fn next_content<I: Iterator<Item = std::io::Result<String>>>(lines: &mut I) -> Result<Option<String>> {
    for line in lines.by_ref() {
        let line = line?;
        if !line.trim().is_empty() {
            return Ok(Some(line));
        }
    }
    Ok(None)
}

/// Next line, which must exist
fn next_line<I: Iterator<Item = std::io::Result<String>>>(lines: &mut I, what: &str) -> Result<String> {
    match lines.next() {
        Some(line) => Ok(line?),
        None => Err(Error::UnexpectedEndOfFile(what.to_string())),
    }
}

/// Parse `adata.txt`, attaching photoionisation data keyed by
/// (Z, ion stage, zero-based level)
pub fn parse_adata<R: BufRead>(
    reader: R,
    phixsdict: &HashMap<(usize, usize, usize), Photoionisation>,
    ionlist: IonList,
) -> Result<Vec<Ion>> {
    let mut lines = reader.lines();
    let mut ions = Vec::new();

    while let Some(line) = next_content(&mut lines)? {
        let (_, header) = crate::parsers::vector_of_f64(&line)?;
        let [z, ion_stage, level_count, ion_pot] = header[..] else {
            return Err(Error::ParseError(f!("adata ion header '{line}'")));
        };
        let (atomic_number, ion_stage, level_count) =
            (z as usize, ion_stage as usize, level_count as usize);

        if !selected(ionlist, atomic_number, ion_stage) {
            for _ in 0..level_count {
                next_line(&mut lines, "adata.txt")?;
            }
            continue;
        }

        let mut levels = Vec::with_capacity(level_count);
        for levelindex in 0..level_count {
            let line = next_line(&mut lines, "adata.txt")?;
            let (_, row) = level_row(&line)?;
            if row.number != levelindex + 1 {
                return Err(Error::LevelNumbering {
                    atomic_number,
                    ion_stage,
                    expected: levelindex + 1,
                    found: row.number,
                });
            }

            let (phixstargetlist, phixstable) = phixsdict
                .get(&(atomic_number, ion_stage, levelindex))
                .map(|p| (p.targetlist.clone(), p.table.clone()))
                .unwrap_or_default();

            levels.push(Level {
                energy_ev: row.energy_ev,
                g: row.g,
                transition_count: row.transition_count,
                levelname: row.levelname,
                phixstargetlist,
                phixstable,
            });
        }

        ions.push(Ion {
            atomic_number,
            ion_stage,
            level_count,
            ion_pot,
            levels,
            transitions: Vec::new(),
        });
    }

    Ok(ions)
}

/// Parse `transitiondata.txt` into transitions keyed by (Z, ion stage)
pub fn parse_transitiondata<R: BufRead>(
    reader: R,
    ionlist: IonList,
) -> Result<HashMap<(usize, usize), Vec<Transition>>> {
    let mut lines = reader.lines();
    let mut transitions = HashMap::new();

    while let Some(line) = next_content(&mut lines)? {
        let header = ints(&line)?;
        let atomic_number = field(&header, 0, "transitiondata Z")?;
        let ion_stage = field(&header, 1, "transitiondata ion stage")?;
        let transition_count = field(&header, 2, "transitiondata count")?;

        if !selected(ionlist, atomic_number, ion_stage) {
            for _ in 0..transition_count {
                next_line(&mut lines, "transitiondata.txt")?;
            }
            continue;
        }

        let mut translist = Vec::with_capacity(transition_count);
        for _ in 0..transition_count {
            let line = next_line(&mut lines, "transitiondata.txt")?;
            let row = floats(&line)?;
            let [lower, upper, a, collstr, forbidden] = row[..] else {
                return Err(Error::ParseError(f!("transition '{line}'")));
            };
            translist.push(Transition {
                lower: (lower as usize).saturating_sub(1),
                upper: (upper as usize).saturating_sub(1),
                a,
                collstr,
                forbidden: forbidden == 1.0,
            });
        }

        transitions.insert((atomic_number, ion_stage), translist);
    }

    Ok(transitions)
}

/// Parse `phixsdata_v2.txt`
///
/// The header gives the number of points and the increment of the frequency
/// grid in units of the threshold frequency, so point `i` is at
/// `1 + i * nuincrement`. Cross sections are stored in Mb.
pub fn parse_phixsdata<R: BufRead>(reader: R, ionlist: IonList) -> Result<Vec<Photoionisation>> {
    let mut lines = reader.lines();
    let nphixspoints = next_line(&mut lines, "phixsdata header")?
        .trim()
        .parse::<usize>()
        .map_err(|_| Error::ParseError("phixsdata point count".into()))?;
    let nuincrement = next_line(&mut lines, "phixsdata header")?
        .trim()
        .parse::<f64>()
        .map_err(|_| Error::ParseError("phixsdata increment".into()))?;

    let xgrid = (0..nphixspoints)
        .map(|i| 1.0 + nuincrement * i as f64)
        .collect::<Vec<f64>>();

    let mut phixs = Vec::new();
    while let Some(line) = next_content(&mut lines)? {
        let (_, header) = crate::parsers::vector_of_f64(&line)?;
        if header.len() < 5 {
            return Err(Error::ParseError(f!("phixsdata header '{line}'")));
        }
        let atomic_number = header[0] as usize;
        let upperionstage = header[1] as usize;
        let upperionlevel = header[2] as i64 - 1;
        let lowerionstage = header[3] as usize;
        let lowerionlevel = (header[4] as usize).saturating_sub(1);

        if upperionstage != lowerionstage + 1 {
            return Err(Error::IonStageMismatch {
                lower: lowerionstage,
                upper: upperionstage,
            });
        }

        let targetlist = match usize::try_from(upperionlevel) {
            Ok(level) => vec![(level, 1.0)],
            Err(_) => {
                let ntargets = next_line(&mut lines, "phixsdata targets")?
                    .trim()
                    .parse::<usize>()
                    .map_err(|_| Error::ParseError("phixsdata target count".into()))?;
                let mut targets = Vec::with_capacity(ntargets);
                for _ in 0..ntargets {
                    let line = next_line(&mut lines, "phixsdata targets")?;
                    let row = floats(&line)?;
                    let [level, fraction] = row[..] else {
                        return Err(Error::ParseError(f!("phixs target '{line}'")));
                    };
                    targets.push(((level as usize).saturating_sub(1), fraction));
                }
                targets
            }
        };

        if !selected(ionlist, atomic_number, lowerionstage) {
            for _ in 0..nphixspoints {
                next_line(&mut lines, "phixsdata table")?;
            }
            continue;
        }

        let mut table = Vec::with_capacity(nphixspoints);
        for x in &xgrid {
            let line = next_line(&mut lines, "phixsdata table")?;
            let sigma_mb = line
                .trim()
                .parse::<f64>()
                .map_err(|_| Error::ParseError(f!("phixs value '{line}'")))?;
            table.push((*x, sigma_mb * 1e-18));
        }

        phixs.push(Photoionisation {
            atomic_number,
            lowerionstage,
            lowerionlevel,
            upperionstage,
            targetlist,
            table,
        });
    }

    Ok(phixs)
}

/// Levels of every ion in a model folder, optionally with transitions and
/// photoionisation cross sections
///
/// ```rust, no_run
/// # use artistools_atomic::get_levels;
/// let ions = get_levels("/path/to/model", &[(26, 2)], true, false).unwrap();
/// println!("Fe II has {} transitions", ions[0].transitions.len());
/// ```
pub fn get_levels<P: AsRef<Path>>(
    modelpath: P,
    ionlist: IonList,
    get_transitions: bool,
    get_photoionisations: bool,
) -> Result<Vec<Ion>> {
    let modelpath = modelpath.as_ref();

    let mut transitionsdict = HashMap::new();
    if get_transitions {
        let path = modelpath.join("transitiondata.txt");
        info!("Reading {}", path.display());
        transitionsdict = parse_transitiondata(zopen(&path)?, ionlist)?;
    }

    let mut phixsdict = HashMap::new();
    if get_photoionisations {
        let path = modelpath.join("phixsdata_v2.txt");
        info!("Reading {}", path.display());
        for p in parse_phixsdata(zopen(&path)?, ionlist)? {
            phixsdict.insert((p.atomic_number, p.lowerionstage, p.lowerionlevel), p);
        }
    }

    let path = modelpath.join("adata.txt");
    info!("Reading {}", path.display());
    let mut ions = parse_adata(zopen(&path)?, &phixsdict, ionlist)?;
    for ion in &mut ions {
        if let Some(transitions) = transitionsdict.remove(&ion.id()) {
            ion.transitions = transitions;
        }
    }
    debug!("{} ions", ions.len());

    Ok(ions)
}

/// Find an ion in a list of levels
pub fn find_ion(ions: &[Ion], atomic_number: usize, ion_stage: usize) -> Result<&Ion> {
    ions.iter()
        .find(|ion| ion.id() == (atomic_number, ion_stage))
        .ok_or(Error::IonNotFound {
            atomic_number,
            ion_stage,
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    const PHIXS: &str = "\
3
0.1
26 3 1 2 1 16.2
1.0
0.5
0.25
26 3 -1 2 2 16.0
2
1 0.75
2 0.25
2.0
1.0
0.5
";

    #[test]
    fn phixs_grid_and_targets() {
        let phixs = parse_phixsdata(PHIXS.as_bytes(), &[]).unwrap();
        assert_eq!(phixs.len(), 2);

        assert_eq!(phixs[0].targetlist, vec![(0, 1.0)]);
        assert_eq!(phixs[0].table[2].1, 0.25e-18);
        assert!((phixs[0].table[2].0 - 1.2).abs() < 1e-12);

        assert_eq!(phixs[1].lowerionlevel, 1);
        assert_eq!(phixs[1].targetlist, vec![(0, 0.75), (1, 0.25)]);
    }

    #[test]
    fn unselected_ions_are_skipped() {
        let phixs = parse_phixsdata(PHIXS.as_bytes(), &[(27, 2)]).unwrap();
        assert!(phixs.is_empty());
    }
}
