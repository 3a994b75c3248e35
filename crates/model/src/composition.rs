//! Elements and ions included in a simulation

// standard library
use std::io::BufRead;
use std::path::Path;

// crate modules
use crate::error::{Error, Result};
use crate::parsers::{floats, index, ints};

// external crates
use artistools_utils::zopen;
use serde::{Deserialize, Serialize};

/// One element from `compositiondata.txt`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompositionEntry {
    /// Atomic number
    #[serde(rename = "Z")]
    pub atomic_number: usize,
    /// Number of ion stages included
    pub nions: usize,
    /// Lowest ion stage included
    pub lowermost_ionstage: usize,
    /// Highest ion stage included
    pub uppermost_ionstage: usize,
    /// Maximum number of levels read per ion
    pub nlevelsmax_readin: i64,
    /// Abundance used with homogeneous abundances
    pub abundance: f64,
    /// Atomic mass in atomic mass units
    pub mass: f64,
    /// Index of the first ion of this element in the flat ion list
    pub startindex: usize,
}

/// Read `compositiondata.txt` from a model folder or a direct file path
pub fn get_composition_data<P: AsRef<Path>>(path: P) -> Result<Vec<CompositionEntry>> {
    let path = path.as_ref();
    let filename = match path.is_dir() {
        true => path.join("compositiondata.txt"),
        false => path.to_path_buf(),
    };

    let mut lines = zopen(&filename)?.lines();
    let mut next = || -> Result<String> {
        lines
            .next()
            .ok_or_else(|| Error::UnexpectedEndOfFile(filename.display().to_string()))?
            .map_err(Error::from)
    };

    let nelements = next()?.trim().parse::<usize>()?;
    next()?; // T_preset
    next()?; // homogeneous_abundances

    let mut composition = Vec::with_capacity(nelements);
    let mut startindex = 0;
    for _ in 0..nelements {
        let line = next()?;
        let fields = line.split_whitespace().collect::<Vec<&str>>();
        if fields.len() < 7 {
            return Err(Error::WrongNumberOfValues {
                what: "composition row".to_string(),
                expected: 7,
                found: fields.len(),
            });
        }

        let intvalues = ints(&fields[..5].join(" "))?;
        let floatvalues = floats(&fields[5..7].join(" "))?;

        let entry = CompositionEntry {
            atomic_number: index(intvalues[0], "Z")?,
            nions: index(intvalues[1], "nions")?,
            lowermost_ionstage: index(intvalues[2], "lowermost_ionstage")?,
            uppermost_ionstage: index(intvalues[3], "uppermost_ionstage")?,
            nlevelsmax_readin: intvalues[4],
            abundance: floatvalues[0],
            mass: floatvalues[1],
            startindex,
        };

        startindex += entry.nions;
        composition.push(entry);
    }

    Ok(composition)
}

/// Ion list as reported in the `output_0-0.txt` log of a run
///
/// Only the element and ion counts are known this way, so every element
/// starts at the neutral stage and the remaining fields are zero.
pub fn get_composition_data_from_outputfile<P: AsRef<Path>>(
    modelpath: P,
) -> Result<Vec<CompositionEntry>> {
    let text = std::fs::read_to_string(modelpath.as_ref().join("output_0-0.txt"))?;

    let mut ioncounts: Vec<(usize, usize)> = Vec::new();
    let mut current = None;
    for row in text.lines() {
        let split_row = row.split_whitespace().collect::<Vec<&str>>();
        if split_row.first() != Some(&"[input.c]") {
            continue;
        }

        match split_row.get(1) {
            Some(&"element") => {
                let z = split_row
                    .get(4)
                    .ok_or_else(|| Error::UnexpectedContent(row.to_string()))?
                    .parse::<usize>()?;
                current = Some(z);
                if !ioncounts.iter().any(|(atomic_number, _)| *atomic_number == z) {
                    ioncounts.push((z, 0));
                }
            }
            Some(&"ion") => {
                if let Some((_, count)) = ioncounts
                    .iter_mut()
                    .find(|(atomic_number, _)| Some(*atomic_number) == current)
                {
                    *count += 1;
                }
            }
            _ => {}
        }
    }

    let mut startindex = 0;
    Ok(ioncounts
        .into_iter()
        .map(|(atomic_number, nions)| {
            let entry = CompositionEntry {
                atomic_number,
                nions,
                lowermost_ionstage: 1,
                uppermost_ionstage: nions,
                nlevelsmax_readin: 0,
                abundance: 0.0,
                mass: 0.0,
                startindex,
            };
            startindex += nions;
            entry
        })
        .collect())
}

/// Find the element entry for an atomic number
pub fn find_element(composition: &[CompositionEntry], atomic_number: usize) -> Option<&CompositionEntry> {
    composition.iter().find(|e| e.atomic_number == atomic_number)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn startindex_accumulates() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("compositiondata.txt"),
            "2\n0\n0\n26 5 1 5 -1 0.0 55.845\n28 4 2 5 100 0.0 58.693\n",
        )
        .unwrap();

        let composition = get_composition_data(dir.path()).unwrap();
        assert_eq!(composition.len(), 2);
        assert_eq!(composition[1].startindex, 5);
        assert_eq!(composition[1].lowermost_ionstage, 2);
        assert_eq!(composition[0].nlevelsmax_readin, -1);
        assert_eq!(find_element(&composition, 28).unwrap().mass, 58.693);
    }

    #[test]
    fn ions_from_output_log() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("output_0-0.txt"),
            "[input.c] element 0 Z 26\n\
             [input.c] ion 0\n\
             [input.c] ion 1\n\
             something else\n\n\
             [input.c] element 1 Z 27\n\
             [input.c] ion 0\n",
        )
        .unwrap();

        let composition = get_composition_data_from_outputfile(dir.path()).unwrap();
        assert_eq!(composition.len(), 2);
        assert_eq!((composition[0].atomic_number, composition[0].nions), (26, 2));
        assert_eq!(composition[1].uppermost_ionstage, 1);
        assert_eq!(composition[1].startindex, 2);
    }
}
