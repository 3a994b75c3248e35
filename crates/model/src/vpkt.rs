//! Virtual packet observer configuration from `vpkt.txt`

// standard library
use std::path::Path;

// crate modules
use crate::error::{Error, Result};
use crate::parsers::{exact, floats, index, ints};

// external crates
use serde::{Deserialize, Serialize};

/// Observer directions and time limits for virtual packet spectra
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VpktConfig {
    /// Number of observer directions
    pub nobsdirections: usize,
    /// Cosine of the polar angle of each direction
    pub cos_theta: Vec<f64>,
    /// Azimuthal angle of each direction
    pub phi: Vec<f64>,
    /// Number of spectra per observer
    pub nspectraperobs: usize,
    /// Whether the time limits below are applied
    pub time_limits_enabled: bool,
    /// First timestep for virtual packets
    pub initial_time: i64,
    /// Last timestep for virtual packets
    pub final_time: i64,
}

/// Read `vpkt.txt` from a model folder
pub fn get_vpkt_config<P: AsRef<Path>>(modelpath: P) -> Result<VpktConfig> {
    let path = modelpath.as_ref().join("vpkt.txt");
    let text = std::fs::read_to_string(&path)?;
    let mut lines = text.lines();
    let mut next = || {
        lines
            .next()
            .ok_or_else(|| Error::UnexpectedEndOfFile(path.display().to_string()))
    };

    let [nobsdirections] = exact(ints(next()?)?, "nobsdirections")?;
    let cos_theta = floats(next()?)?;
    let phi = floats(next()?)?;
    let [nspecflag] = exact(ints(next()?)?, "nspecflag")?;

    let nspectraperobs = match nspecflag {
        1 => {
            let [n] = exact(ints(next()?)?, "nspectraperobs")?;
            let n = index(n, "nspectraperobs")?;
            for _ in 0..n {
                next()?;
            }
            n
        }
        _ => 1,
    };

    let [time_limits_enabled, initial_time, final_time] =
        exact(ints(next()?)?, "time_limits_enabled initial_time final_time")?;

    Ok(VpktConfig {
        nobsdirections: index(nobsdirections, "nobsdirections")?,
        cos_theta,
        phi,
        nspectraperobs,
        time_limits_enabled: time_limits_enabled != 0,
        initial_time,
        final_time,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn spectra_lines_are_skipped() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("vpkt.txt"),
            "2\n1 -1\n0 0\n1\n2\n0\n1\n1 10 80\n",
        )
        .unwrap();

        let config = get_vpkt_config(dir.path()).unwrap();
        assert_eq!(config.nobsdirections, 2);
        assert_eq!(config.cos_theta, vec![1.0, -1.0]);
        assert_eq!(config.nspectraperobs, 2);
        assert!(config.time_limits_enabled);
        assert_eq!((config.initial_time, config.final_time), (10, 80));
    }
}
