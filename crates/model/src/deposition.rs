//! Energy deposition rates written by ARTIS in `deposition.out`

// standard library
use std::path::Path;

// crate modules
use crate::error::{Error, Result};
use crate::parsers::floats;
use crate::timesteps::TimestepTimes;

// external crates
use serde::{Deserialize, Serialize};

/// Deposition rates for one timestep, in solar luminosities
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DepositionRow {
    /// Timestep number, the row index in the file
    pub timestep: usize,
    /// Time in days
    pub time: f64,
    /// Gamma-ray deposition
    pub gammadep_over_lsun: f64,
    /// Positron deposition
    pub posdep_over_lsun: f64,
    /// Total deposition
    pub total_dep_over_lsun: f64,
}

/// Read `deposition.out` and check it against the timestep midpoints
///
/// No timesteps are given in the file, so every row time must lie within 1%
/// of the midpoint of the timestep it is assumed to be.
pub fn get_deposition<P: AsRef<Path>>(modelpath: P) -> Result<Vec<DepositionRow>> {
    let modelpath = modelpath.as_ref();
    let times = TimestepTimes::read(modelpath)?;
    let text = std::fs::read_to_string(modelpath.join("deposition.out"))?;
    parse_deposition(&text, &times.tmids)
}

/// Parse deposition rows given the timestep midpoint times in days
pub fn parse_deposition(text: &str, tmids: &[f64]) -> Result<Vec<DepositionRow>> {
    let mut rows = Vec::new();
    for line in text.lines().filter(|l| !l.trim().is_empty()) {
        let values = floats(line)?;
        if values.len() < 4 {
            return Err(Error::WrongNumberOfValues {
                what: "deposition row".to_string(),
                expected: 4,
                found: values.len(),
            });
        }

        let timestep = rows.len();
        let expected = tmids.get(timestep).copied().ok_or(Error::TimestepOutOfRange {
            timestep,
            last: tmids.len().saturating_sub(1),
        })?;

        let time = values[0];
        if (expected / time - 1.0).abs() >= 0.01 {
            return Err(Error::DepositionTimeMismatch {
                timestep,
                time,
                expected,
            });
        }

        rows.push(DepositionRow {
            timestep,
            time,
            gammadep_over_lsun: values[1],
            posdep_over_lsun: values[2],
            total_dep_over_lsun: values[3],
        });
    }

    Ok(rows)
}
