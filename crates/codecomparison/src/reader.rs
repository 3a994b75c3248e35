//! Readers for the reference files of other codes
//!
//! Every file starts with `#KEY: value` header lines, followed by blocks of
//! rows for each time. Some codes leave out the colons, so both forms are
//! accepted.

// standard library
use std::collections::BTreeMap;
use std::io::BufRead;
use std::path::Path;

// crate modules
use crate::error::{Error, Result};
use crate::paths::CodeComparisonPath;

// external crates
use artistools_estimators::{EstimatorMap, Estimators};
use artistools_model::{TimeLoc, TimestepTimes};
use artistools_spectra::Spectrum;
use artistools_utils::constants::MPC_CM;
use artistools_utils::{f, get_atomic_number, Config, SliceExt, SortExt};
use log::{debug, info};
use serde::{Deserialize, Serialize};

/// Ion populations below this are left out
const MIN_ION_POPULATION: f64 = 1e-80;

/// Spectra of one code at every time
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ReferenceSpectra {
    /// Times in days
    pub times: Vec<f64>,
    /// Wavelengths in Angstroms
    pub lambda: Vec<f64>,
    /// Luminosity in erg/s/Angstrom, indexed by wavelength then time
    pub luminosity: Vec<Vec<f64>>,
}

impl ReferenceSpectra {
    /// Flux at 1 Mpc of the spectrum closest in time
    ///
    /// The closest time must be within 10% of the requested time. Returns the
    /// time found along with the spectrum.
    pub fn closest_spectrum(&self, timedays: f64) -> Result<(f64, Spectrum)> {
        let distances = self
            .times
            .iter()
            .map(|t| (t - timedays).abs())
            .collect::<Vec<f64>>();
        let timeindex = *distances
            .argsort()
            .first()
            .ok_or(Error::TimeNotFound {
                requested: timedays,
                closest: f64::NAN,
            })?;

        let closest = self.times[timeindex];
        if !isclose(timedays, closest, 0.1) {
            return Err(Error::TimeNotFound {
                requested: timedays,
                closest,
            });
        }

        let area = 4.0 * std::f64::consts::PI * MPC_CM.powi(2);
        let mut lambda_angstroms = self.lambda.clone();
        let mut f_lambda = self
            .luminosity
            .iter()
            .map(|row| row[timeindex] / area)
            .collect::<Vec<f64>>();

        let mut order = lambda_angstroms.argsort();
        f_lambda.sort_by_index(&mut order.clone());
        lambda_angstroms.sort_by_index(&mut order);

        Ok((
            closest,
            Spectrum {
                lambda_angstroms,
                f_lambda,
            },
        ))
    }
}

/// Relative closeness in the manner of `numpy.isclose` without an absolute term
fn isclose(a: f64, b: f64, rtol: f64) -> bool {
    (a - b).abs() <= rtol * b.abs()
}

/// Value of a header line such as `#NTIMES: 5` or `#NTIMES 5`
fn header_value<'a>(line: &'a str, header: &str) -> Option<&'a str> {
    let rest = line.trim().strip_prefix(header)?;
    Some(rest.strip_prefix(':').unwrap_or(rest).trim())
}

/// Next line of a file, which must carry the given header
fn expect_header<I>(lines: &mut I, header: &str, path: &Path) -> Result<String>
where
    I: Iterator<Item = std::io::Result<String>>,
{
    let missing = || Error::MissingHeader {
        path: path.display().to_string(),
        header: header.to_string(),
    };

    let line = lines.next().ok_or_else(missing)??;
    header_value(&line, header)
        .map(String::from)
        .ok_or_else(missing)
}

fn parse_floats(text: &str) -> Result<Vec<f64>> {
    Ok(text
        .split_whitespace()
        .map(str::parse::<f64>)
        .collect::<core::result::Result<Vec<f64>, _>>()?)
}

/// Midpoint times in days from the phys file of a code
pub fn read_times(path: &CodeComparisonPath, config: &Config) -> Result<Vec<f64>> {
    let filepath = path.file_path("phys", config);
    let mut lines = std::fs::File::open(&filepath).map(std::io::BufReader::new)?.lines();

    let ntimes = expect_header(&mut lines, "#NTIMES", &filepath)?.parse::<usize>()?;
    let tmids = parse_floats(&expect_header(&mut lines, "#TIMES[d]", &filepath)?)?;
    if tmids.len() != ntimes {
        return Err(Error::WrongNumberOfValues {
            what: f!("times in {}", filepath.display()),
            expected: ntimes,
            found: tmids.len(),
        });
    }
    Ok(tmids)
}

/// Timesteps with boundaries placed halfway between the reported times
pub fn get_timestep_times<P: AsRef<Path>>(modelpath: P, config: &Config) -> Result<TimestepTimes> {
    let path = CodeComparisonPath::from_path(modelpath)?;
    Ok(TimestepTimes::from_midpoints(&read_times(&path, config)?))
}

/// Timestep times of a code at the requested location
///
/// ```rust, no_run
/// # use artistools_codecomparison::get_timestep_times_float;
/// # use artistools_model::TimeLoc;
/// # use artistools_utils::Config;
/// let tmids = get_timestep_times_float("codecomparison/DDC10/cmfgen", TimeLoc::Mid, &Config::default());
/// ```
pub fn get_timestep_times_float<P: AsRef<Path>>(
    modelpath: P,
    loc: TimeLoc,
    config: &Config,
) -> Result<Vec<f64>> {
    Ok(get_timestep_times(modelpath, config)?.get(loc).to_vec())
}

/// Physical conditions and ion populations of every cell and time
///
/// Cells are numbered in file order within each time block. The ion
/// fractions of the `ionfrac_*` files are converted to populations with the
/// total number density of the cell.
pub fn read_reference_estimators<P: AsRef<Path>>(modelpath: P, config: &Config) -> Result<EstimatorMap> {
    let path = CodeComparisonPath::from_path(modelpath)?;
    let arr_timedays = read_times(&path, config)?;

    let mut estimators = read_phys_file(&path, &arr_timedays, config)?;

    let prefix = "ionfrac_";
    let suffix = f!("_{}_{}.txt", path.modelname, path.codename);
    let mut ionfracfiles = std::fs::read_dir(path.folder(config))?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|p| {
            p.file_name()
                .map(|n| n.to_string_lossy())
                .is_some_and(|n| n.starts_with(prefix) && n.ends_with(&suffix))
        })
        .collect::<Vec<_>>();
    ionfracfiles.sort();

    for filepath in &ionfracfiles {
        read_ionfrac_file(filepath, &arr_timedays, &mut estimators)?;
    }

    Ok(estimators)
}

/// Lines after the file headers, with the time block markers resolved
enum Row {
    Time,
    Columns(String),
    Values(Vec<String>),
}

fn classify(line: &str) -> Option<Row> {
    let mut tokens = line.split_whitespace();
    let first = tokens.next()?;
    match first.trim_end_matches(':') {
        "#TIME" => Some(Row::Time),
        "#vel_mid[km/s]" => Some(Row::Columns(line.to_string())),
        _ if first.starts_with('#') => None,
        _ => Some(Row::Values(line.split_whitespace().map(String::from).collect())),
    }
}

/// Check the `#TIME:` of a block against the header times
fn block_time(line: &str, timestep: usize, arr_timedays: &[f64], path: &Path) -> Result<()> {
    let timedays = line
        .split_whitespace()
        .nth(1)
        .ok_or_else(|| Error::WrongNumberOfValues {
            what: f!("time block in {}", path.display()),
            expected: 2,
            found: 1,
        })?
        .parse::<f64>()?;

    match arr_timedays.get(timestep) {
        Some(&expected) if isclose(timedays, expected, 0.01) => Ok(()),
        expected => Err(Error::TimeMismatch {
            path: path.display().to_string(),
            expected: expected.copied().unwrap_or(f64::NAN),
            found: timedays,
        }),
    }
}

fn read_phys_file(path: &CodeComparisonPath, arr_timedays: &[f64], config: &Config) -> Result<EstimatorMap> {
    let filepath = path.file_path("phys", config);
    info!("Reading {}", filepath.display());

    let mut estimators = EstimatorMap::new();
    let mut timestep: Option<usize> = None;
    let mut modelgridindex = 0;

    let reader = std::io::BufReader::new(std::fs::File::open(&filepath)?);
    for line in reader.lines().skip(2) {
        let line = line?;
        match classify(&line) {
            Some(Row::Time) => {
                let ts = timestep.map_or(0, |t| t + 1);
                block_time(&line, ts, arr_timedays, &filepath)?;
                timestep = Some(ts);
                modelgridindex = 0;
            }
            Some(Row::Values(row)) => {
                let ts = timestep.unwrap_or(0);
                if row.len() < 5 {
                    return Err(Error::WrongNumberOfValues {
                        what: f!("phys row in {}", filepath.display()),
                        expected: 5,
                        found: row.len(),
                    });
                }

                let mut cell = Estimators {
                    timestep: ts,
                    modelgridindex,
                    tdays: arr_timedays.get(ts).copied(),
                    ..Default::default()
                };
                for (key, value) in ["vel_mid", "Te", "rho", "nne", "nntot"].iter().zip(&row) {
                    cell.values.insert(key.to_string(), value.parse::<f64>()?);
                }
                if let Some(vel_mid) = cell.get("vel_mid") {
                    cell.values.insert("velocity_outer".to_string(), vel_mid);
                }

                estimators.insert((ts, modelgridindex), cell);
                modelgridindex += 1;
            }
            Some(Row::Columns(_)) | None => {}
        }
    }

    Ok(estimators)
}

/// Atomic numbers and ion stages from a column header like `#vel_mid[km/s]  fe0  fe1`
///
/// Codes disagree on whether neutral ions are numbered 0 or 1, so the number
/// of the first column decides. Some ion names contain a single space, so
/// columns are separated by double spaces where present.
pub fn parse_ion_columns(line: &str) -> Result<Vec<(usize, usize)>> {
    let mut columns = line
        .split("  ")
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect::<Vec<&str>>();
    if columns.len() <= 1 {
        columns = line.split_whitespace().collect();
    }

    let mut ion_startnumber = None;
    columns
        .iter()
        .skip(1)
        .map(|ionstr| {
            let symbol = ionstr.trim_end_matches(|c: char| c.is_ascii_digit() || c == ' ');
            let number = ionstr.trim_start_matches(|c: char| c.is_ascii_alphabetic() || c == ' ');

            let atomic_number =
                get_atomic_number(symbol).ok_or_else(|| Error::UnknownIon(ionstr.to_string()))?;
            let ion_number = number
                .parse::<usize>()
                .map_err(|_| Error::UnknownIon(ionstr.to_string()))?;

            let ion_stage = match *ion_startnumber.get_or_insert(ion_number) {
                0 => ion_number + 1,
                _ => ion_number,
            };
            Ok((atomic_number, ion_stage))
        })
        .collect()
}

fn read_ionfrac_file(filepath: &Path, arr_timedays: &[f64], estimators: &mut EstimatorMap) -> Result<()> {
    info!("Reading {}", filepath.display());
    let mut lines = std::io::BufReader::new(std::fs::File::open(filepath)?).lines();

    let ntimes = expect_header(&mut lines, "#NTIMES", filepath)?.parse::<usize>()?;
    if ntimes != arr_timedays.len() {
        return Err(Error::WrongNumberOfValues {
            what: f!("times in {}", filepath.display()),
            expected: arr_timedays.len(),
            found: ntimes,
        });
    }
    let nstages = expect_header(&mut lines, "#NSTAGES", filepath)?.parse::<usize>()?;
    let times = parse_floats(&expect_header(&mut lines, "#TIMES[d]", filepath)?)?;
    for (found, expected) in times.iter().zip(arr_timedays) {
        if !isclose(*found, *expected, 0.01) {
            return Err(Error::TimeMismatch {
                path: filepath.display().to_string(),
                expected: *expected,
                found: *found,
            });
        }
    }

    let mut timestep: Option<usize> = None;
    let mut modelgridindex = 0;
    let mut iontuples = Vec::new();
    for line in lines {
        let line = line?;
        match classify(&line) {
            Some(Row::Time) => {
                let ts = timestep.map_or(0, |t| t + 1);
                block_time(&line, ts, arr_timedays, filepath)?;
                timestep = Some(ts);
                modelgridindex = 0;
            }
            Some(Row::Columns(header)) => iontuples = parse_ion_columns(&header)?,
            Some(Row::Values(row)) => {
                let ts = timestep.unwrap_or(0);
                for (what, found) in [("ion columns", iontuples.len()), ("ion fractions", row.len() - 1)] {
                    if found != nstages {
                        return Err(Error::WrongNumberOfValues {
                            what: f!("{what} in {}", filepath.display()),
                            expected: nstages,
                            found,
                        });
                    }
                }

                let cell = estimators
                    .get_mut(&(ts, modelgridindex))
                    .ok_or_else(|| Error::UnknownCell {
                        path: filepath.display().to_string(),
                        timestep: ts,
                        modelgridindex,
                    })?;
                add_ion_fractions(cell, &iontuples, &row)?;
                modelgridindex += 1;
            }
            None => {}
        }
    }
    Ok(())
}

fn add_ion_fractions(cell: &mut Estimators, iontuples: &[(usize, usize)], row: &[String]) -> Result<()> {
    let vel_mid = row[0].parse::<f64>()?;
    let expected = cell.get("vel_mid").unwrap_or(f64::NAN);
    if !isclose(vel_mid, expected, 0.01) {
        return Err(Error::VelocityMismatch {
            timestep: cell.timestep,
            modelgridindex: cell.modelgridindex,
            expected,
            found: vel_mid,
        });
    }
    let nntot = cell.get("nntot").unwrap_or(0.0);

    let mut ionpops: BTreeMap<usize, BTreeMap<usize, f64>> = BTreeMap::new();
    let mut elpops: BTreeMap<usize, f64> = BTreeMap::new();
    for (&(atomic_number, ion_stage), strionfrac) in iontuples.iter().zip(&row[1..]) {
        match strionfrac.parse::<f64>() {
            Ok(ionfrac) => {
                let ionpop = ionfrac * nntot;
                if ionpop > MIN_ION_POPULATION {
                    ionpops.entry(atomic_number).or_default().insert(ion_stage, ionpop);
                    *elpops.entry(atomic_number).or_insert(0.0) += ionpop;
                }
            }
            Err(_) => {
                debug!("Unreadable ion fraction '{strionfrac}' for Z={atomic_number} stage {ion_stage}");
                ionpops.entry(atomic_number).or_default().insert(ion_stage, f64::NAN);
            }
        }
    }

    let populations = cell.ion_values.entry("populations".to_string()).or_default();
    for (atomic_number, stages) in ionpops {
        populations.entry(atomic_number).or_default().extend(stages);
    }
    let elements = cell.element_values.entry("populations".to_string()).or_default();
    for (atomic_number, pop) in elpops {
        *elements.entry(atomic_number).or_insert(0.0) += pop;
    }
    Ok(())
}

/// Spectra of a code from `spectra_<model>_<code>.txt`
pub fn get_spectra<P: AsRef<Path>>(modelpath: P, config: &Config) -> Result<ReferenceSpectra> {
    let path = CodeComparisonPath::from_path(modelpath)?;
    let filepath = path.file_path("spectra", config);
    info!("Reading {}", filepath.display());

    let mut lines = std::io::BufReader::new(std::fs::File::open(&filepath)?).lines();
    let ntimes = expect_header(&mut lines, "#NTIMES", &filepath)?.parse::<usize>()?;
    let nwave = expect_header(&mut lines, "#NWAVE", &filepath)?.parse::<usize>()?;

    let timesline = lines.next().ok_or_else(|| Error::MissingHeader {
        path: filepath.display().to_string(),
        header: "#TIMES[d]".to_string(),
    })??;
    let times = parse_floats(&timesline.split_whitespace().skip(1).collect::<Vec<_>>().join(" "))?;
    if times.len() != ntimes {
        return Err(Error::WrongNumberOfValues {
            what: f!("times in {}", filepath.display()),
            expected: ntimes,
            found: times.len(),
        });
    }

    let mut spectra = ReferenceSpectra {
        times,
        ..Default::default()
    };
    for line in lines {
        let line = line?;
        let line = line.split('#').next().unwrap_or_default();
        let values = parse_floats(line)?;
        match values.split_first() {
            None => continue,
            Some((lambda, luminosity)) if luminosity.len() == ntimes => {
                spectra.lambda.push(*lambda);
                spectra.luminosity.push(luminosity.to_vec());
            }
            Some(_) => {
                return Err(Error::WrongNumberOfValues {
                    what: f!("spectrum row in {}", filepath.display()),
                    expected: ntimes + 1,
                    found: values.len(),
                })
            }
        }
    }

    if spectra.lambda.len() != nwave {
        debug!("{} declares {nwave} wavelengths but has {}", filepath.display(), spectra.lambda.len());
    }
    Ok(spectra)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn headers_with_or_without_colons() {
        assert_eq!(header_value("#NTIMES: 3", "#NTIMES"), Some("3"));
        assert_eq!(header_value("#NTIMES 3", "#NTIMES"), Some("3"));
        assert_eq!(header_value("#NVEL 3", "#NTIMES"), None);
    }

    #[test]
    fn ion_columns_starting_from_zero() {
        let ions = parse_ion_columns("#vel_mid[km/s]  fe0  fe1  fe 2").unwrap();
        assert_eq!(ions, vec![(26, 1), (26, 2), (26, 3)]);
    }

    #[test]
    fn ion_columns_starting_from_one() {
        let ions = parse_ion_columns("#vel_mid[km/s] co1 co2").unwrap();
        assert_eq!(ions, vec![(27, 1), (27, 2)]);
        assert!(parse_ion_columns("#vel_mid[km/s] xx1").is_err());
    }
}
