//! Conversion between timestep numbers and times in days
//!
//! Recent ARTIS versions write `timesteps.out` with the exact start, width and
//! midpoint of every timestep. Older runs always used logarithmic spacing
//! between `tmin` and `tmax` from `input.txt`, so the times are reconstructed
//! from those parameters instead.

// standard library
use std::fmt;
use std::path::Path;
use std::str::FromStr;

// crate modules
use crate::error::{Error, Result};
use crate::inputparams::get_inputparams;
use crate::specfile::get_spec_time_labels;

// external crates
use artistools_utils::{f, WhitespaceTable};
use log::{debug, warn};
use serde::{Deserialize, Serialize};

/// Which point in each timestep to report
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum TimeLoc {
    /// Midpoint of the timestep
    #[default]
    Mid,
    /// Start of the timestep
    Start,
    /// End of the timestep
    End,
    /// Width of the timestep
    Delta,
}

impl FromStr for TimeLoc {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "mid" => Ok(Self::Mid),
            "start" => Ok(Self::Start),
            "end" => Ok(Self::End),
            "delta" => Ok(Self::Delta),
            other => Err(Error::UnknownTimeLoc(other.to_string())),
        }
    }
}

impl fmt::Display for TimeLoc {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Mid => "mid",
            Self::Start => "start",
            Self::End => "end",
            Self::Delta => "delta",
        };
        write!(f, "{s}")
    }
}

/// Start, midpoint, end and width in days of every timestep
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct TimestepTimes {
    /// Start of each timestep
    pub tstarts: Vec<f64>,
    /// Midpoint of each timestep
    pub tmids: Vec<f64>,
    /// End of each timestep
    pub tends: Vec<f64>,
    /// Width of each timestep
    pub twidths: Vec<f64>,
}

/// Ways of choosing a range of timesteps
///
/// Exactly one of a timestep range, a `timemin`/`timemax` pair, or a range in
/// days should be given.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TimeSelection {
    /// Timestep range such as `"10-20"` or `"15"`
    pub timestep_range: Option<String>,
    /// Lower time bound in days
    pub timemin: Option<f64>,
    /// Upper time bound in days
    pub timemax: Option<f64>,
    /// Time range in days such as `"100-150"`, or a single time
    pub timedays_range: Option<String>,
}

/// Inclusive timestep range and the times it spans
///
/// When the requested times lie entirely outside the simulation both
/// timesteps are -1 and the bounds echo the request.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TimeRange {
    /// First timestep, or -1
    pub timestepmin: i64,
    /// Last timestep, or -1
    pub timestepmax: i64,
    /// Start of the first timestep in days
    pub time_days_lower: Option<f64>,
    /// End of the last timestep in days
    pub time_days_upper: Option<f64>,
}

impl TimeRange {
    /// True if the request fell outside of the simulated times
    pub fn is_outside(&self) -> bool {
        self.timestepmin < 0 || self.timestepmax < 0
    }

    /// Timesteps within the range, empty if outside
    pub fn timesteps(&self) -> Vec<usize> {
        match self.is_outside() {
            true => Vec::new(),
            false => (self.timestepmin as usize..=self.timestepmax as usize).collect(),
        }
    }
}

impl TimestepTimes {
    /// Read `timesteps.out` with the header `#timestep tstart_days twidth_days tmid_days`
    pub fn from_timesteps_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let table = WhitespaceTable::read(path)?;
        let tstarts = table.column("tstart_days")?;
        let twidths = table.column("twidth_days")?;
        let tmids = table.column("tmid_days")?;
        let tends = tstarts.iter().zip(&twidths).map(|(s, w)| s + w).collect();

        Ok(Self {
            tstarts,
            tmids,
            tends,
            twidths,
        })
    }

    /// Logarithmically spaced timesteps between `tmin` and `tmax`
    ///
    /// ```rust
    /// # use artistools_model::TimestepTimes;
    /// let times = TimestepTimes::logarithmic(1.0, 100.0, 2);
    /// assert!((times.tends[0] - 10.0).abs() < 1e-12);
    /// assert!((times.tmids[1] - 10.0_f64.powf(1.5)).abs() < 1e-9);
    /// ```
    pub fn logarithmic(tmin: f64, tmax: f64, ntstep: usize) -> Self {
        let dlogt = (tmax.ln() - tmin.ln()) / ntstep as f64;
        let at = |x: f64| tmin * (x * dlogt).exp();

        let tstarts = (0..ntstep).map(|ts| at(ts as f64)).collect::<Vec<f64>>();
        let tmids = (0..ntstep).map(|ts| at(ts as f64 + 0.5)).collect();
        let tends = (0..ntstep)
            .map(|ts| at(ts as f64 + 1.0))
            .collect::<Vec<f64>>();
        let twidths = tends.iter().zip(&tstarts).map(|(e, s)| e - s).collect();

        Self {
            tstarts,
            tmids,
            tends,
            twidths,
        }
    }

    /// Timestep times of an ARTIS model folder
    pub fn read<P: AsRef<Path>>(modelpath: P) -> Result<Self> {
        let tsfile = modelpath.as_ref().join("timesteps.out");
        if tsfile.exists() {
            debug!("Reading {}", tsfile.display());
            return Self::from_timesteps_file(tsfile);
        }

        let params = get_inputparams(modelpath)?;
        Ok(Self::logarithmic(params.tmin, params.tmax, params.ntstep))
    }

    /// Build from midpoints, placing boundaries halfway between them
    ///
    /// The first and last timesteps are made symmetric about their midpoints.
    pub fn from_midpoints(tmids: &[f64]) -> Self {
        let n = tmids.len();
        let mut tstarts = Vec::with_capacity(n);
        let mut tends = Vec::with_capacity(n);

        for i in 0..n {
            let start = match i {
                0 if n > 1 => tmids[0] - (tmids[1] - tmids[0]) / 2.0,
                0 => tmids[0],
                _ => (tmids[i - 1] + tmids[i]) / 2.0,
            };
            let end = match i + 1 < n {
                true => (tmids[i] + tmids[i + 1]) / 2.0,
                false if n > 1 => tmids[i] + (tmids[i] - tmids[i - 1]) / 2.0,
                false => tmids[i],
            };
            tstarts.push(start);
            tends.push(end);
        }

        let twidths = tends.iter().zip(&tstarts).map(|(e, s)| e - s).collect();
        Self {
            tstarts,
            tmids: tmids.to_vec(),
            tends,
            twidths,
        }
    }

    /// Number of timesteps
    pub fn len(&self) -> usize {
        self.tmids.len()
    }

    /// True if there are no timesteps
    pub fn is_empty(&self) -> bool {
        self.tmids.is_empty()
    }

    /// Times at the requested location in each timestep
    pub fn get(&self, loc: TimeLoc) -> &[f64] {
        match loc {
            TimeLoc::Mid => &self.tmids,
            TimeLoc::Start => &self.tstarts,
            TimeLoc::End => &self.tends,
            TimeLoc::Delta => &self.twidths,
        }
    }

    /// Index of the last timestep
    fn last(&self) -> Result<usize> {
        self.len().checked_sub(1).ok_or(Error::NoTimesteps)
    }

    /// Timestep containing a time, tstart <= t < tend
    ///
    /// The next start is used as each end to avoid roundoff in the widths.
    ///
    /// ```rust
    /// # use artistools_model::TimestepTimes;
    /// let times = TimestepTimes::logarithmic(1.0, 100.0, 2);
    /// assert_eq!(times.timestep_of_timedays(9.0).unwrap(), 0);
    /// assert_eq!(times.timestep_of_timedays(11.0).unwrap(), 1);
    /// assert!(times.timestep_of_timedays(150.0).is_err());
    /// ```
    pub fn timestep_of_timedays(&self, timedays: f64) -> Result<usize> {
        let n = self.len();
        (0..n)
            .find(|&ts| {
                let tstart = self.tstarts[ts];
                let tend = match ts + 1 < n {
                    true => self.tstarts[ts + 1],
                    false => self.tends[ts],
                };
                timedays >= tstart && timedays < tend
            })
            .ok_or(Error::TimeNotBracketed(timedays))
    }

    /// Resolve a time selection to an inclusive timestep range
    pub fn time_range(&self, selection: &TimeSelection) -> Result<TimeRange> {
        let (Some(&first_start), Some(&last_end)) = (self.tstarts.first(), self.tends.last())
        else {
            return Err(Error::NoTimesteps);
        };

        let mut timemin = selection.timemin;
        let mut timemax = selection.timemax.filter(|t| *t != 0.0);

        if let Some(tmin) = timemin.filter(|t| *t > last_end) {
            warn!("timemin {tmin} is after the last timestep at {last_end:.1}");
            return Ok(outside(timemin, timemax));
        } else if let Some(tmax) = timemax.filter(|t| *t < first_start) {
            warn!("timemax {tmax} is before the first timestep at {first_start:.1}");
            return Ok(outside(timemin, timemax));
        }

        let timedays_is_specified = (timemin.is_some() && timemax.is_some())
            || selection.timedays_range.is_some();

        let (timestepmin, mut timestepmax) = if let Some(range) = &selection.timestep_range {
            parse_timestep_range(range)?
        } else if timedays_is_specified {
            if let Some(range) = &selection.timedays_range {
                match range.split_once('-') {
                    Some((lower, upper)) => {
                        timemin = Some(parse_timedays(lower)?);
                        timemax = Some(parse_timedays(upper)?);
                    }
                    None => {
                        let ts = self.timestep_of_timedays(parse_timedays(range)?)?;
                        timemin = Some(self.tstarts[ts]);
                        timemax = Some(self.tends[ts]);
                    }
                }
            }

            let lower = timemin.unwrap_or(first_start);
            let timestepmin = self
                .tmids
                .iter()
                .position(|&tmid| tmid >= lower)
                .ok_or(Error::TimeMinAfterTimesteps {
                    timemin: lower,
                    first: first_start,
                    last: last_end,
                })?;

            let upper = timemax.filter(|t| *t != 0.0).unwrap_or(last_end);
            let timestepmax = self
                .tmids
                .iter()
                .rposition(|&tmid| tmid <= upper)
                .filter(|&ts| ts >= timestepmin)
                .ok_or(Error::EmptyTimeRange)?;

            (timestepmin, timestepmax)
        } else {
            return Err(Error::NoTimeRange);
        };

        let timesteplast = self.last()?;
        if timestepmax > timesteplast {
            warn!("timestepmax {timestepmax} > timesteplast {timesteplast}");
            timestepmax = timesteplast;
        }

        if timestepmin > timestepmax {
            return Err(Error::TimestepOutOfRange {
                timestep: timestepmin,
                last: timesteplast,
            });
        }

        Ok(TimeRange {
            timestepmin: timestepmin as i64,
            timestepmax: timestepmax as i64,
            time_days_lower: Some(self.tstarts[timestepmin]),
            time_days_upper: Some(self.tends[timestepmax]),
        })
    }

    /// Text table of timestep numbers and midpoint times in columns
    ///
    /// Timestep zero is omitted, so the entry for index `i` shows the
    /// midpoint of timestep `i + 1`.
    pub fn table(&self, numberofcolumns: usize) -> String {
        let times = &self.tmids;
        let ncols = numberofcolumns.max(1);
        let nrows = times.len().saturating_sub(1).div_ceil(ncols);

        let mut lines = vec!["Timesteps and midpoint times in days:".to_string(), String::new()];
        for rownum in 0..nrows {
            let line = (0..ncols)
                .map(|colnum| {
                    let newindex = rownum + colnum * nrows;
                    match newindex + 1 < times.len() {
                        true => f!("{newindex:4}: {:.3}d", times[newindex + 1]),
                        false => String::new(),
                    }
                })
                .collect::<Vec<String>>()
                .join("\t");
            lines.push(line);
        }

        lines.join("\n")
    }
}

fn outside(timemin: Option<f64>, timemax: Option<f64>) -> TimeRange {
    TimeRange {
        timestepmin: -1,
        timestepmax: -1,
        time_days_lower: timemin,
        time_days_upper: timemax,
    }
}

/// Parse `"a-b"` or `"a"` into a pair of timesteps
fn parse_timestep_range(range: &str) -> Result<(usize, usize)> {
    match range.split_once('-') {
        Some((lower, upper)) => Ok((lower.trim().parse()?, upper.trim().parse()?)),
        None => {
            let ts = range.trim().parse()?;
            Ok((ts, ts))
        }
    }
}

/// Parse a time in days, allowing a trailing `d` as in `"330d"`
///
/// ```rust
/// # use artistools_model::parse_timedays;
/// assert_eq!(parse_timedays("330d").unwrap(), 330.0);
/// assert_eq!(parse_timedays(" 12.5 ").unwrap(), 12.5);
/// ```
pub fn parse_timedays(timedays: &str) -> Result<f64> {
    Ok(timedays.trim().trim_end_matches('d').trim().parse::<f64>()?)
}

/// Times in days of each timestep at the given location
pub fn get_timestep_times_float<P: AsRef<Path>>(modelpath: P, loc: TimeLoc) -> Result<Vec<f64>> {
    Ok(TimestepTimes::read(modelpath)?.get(loc).to_vec())
}

/// Labels for each timestep, from the `spec.out` header if available
///
/// Without a spectrum file the midpoint times are formatted to three
/// decimal places.
pub fn get_timestep_times<P: AsRef<Path>>(modelpath: P) -> Result<Vec<String>> {
    match get_spec_time_labels(modelpath.as_ref()) {
        Ok(labels) => Ok(labels),
        Err(Error::UtilsError(artistools_utils::Error::FileNotFound { .. })) => {
            let tmids = get_timestep_times_float(modelpath, TimeLoc::Mid)?;
            Ok(tmids.iter().map(|t| f!("{t:.3}")).collect())
        }
        Err(e) => Err(e),
    }
}

/// Timestep containing a time in days such as `"330d"` or `"12.5"`
pub fn get_timestep_of_timedays<P: AsRef<Path>>(modelpath: P, timedays: &str) -> Result<usize> {
    TimestepTimes::read(modelpath)?.timestep_of_timedays(parse_timedays(timedays)?)
}

/// Midpoint time in days of a timestep
pub fn get_timestep_time<P: AsRef<Path>>(modelpath: P, timestep: usize) -> Result<f64> {
    let times = TimestepTimes::read(modelpath)?;
    let last = times.len().saturating_sub(1);
    times
        .tmids
        .get(timestep)
        .copied()
        .ok_or(Error::TimestepOutOfRange { timestep, last })
}

/// Inclusive timestep range for a selection in timesteps or days
pub fn get_time_range<P: AsRef<Path>>(modelpath: P, selection: &TimeSelection) -> Result<TimeRange> {
    TimestepTimes::read(modelpath)?.time_range(selection)
}

/// Table of the timestep midpoint times in a model folder
pub fn showtimesteptimes<P: AsRef<Path>>(modelpath: P, numberofcolumns: usize) -> Result<String> {
    Ok(TimestepTimes::read(modelpath)?.table(numberofcolumns))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn times() -> TimestepTimes {
        // starts 1, 2, 3, 4 with widths of 1 day
        TimestepTimes {
            tstarts: vec![1.0, 2.0, 3.0, 4.0],
            tmids: vec![1.5, 2.5, 3.5, 4.5],
            tends: vec![2.0, 3.0, 4.0, 5.0],
            twidths: vec![1.0; 4],
        }
    }

    fn select_days(range: &str) -> TimeSelection {
        TimeSelection {
            timedays_range: Some(range.to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn timestep_range_strings() {
        let selection = TimeSelection {
            timestep_range: Some("1-2".to_string()),
            ..Default::default()
        };
        let range = times().time_range(&selection).unwrap();
        assert_eq!((range.timestepmin, range.timestepmax), (1, 2));
        assert_eq!(range.time_days_lower, Some(2.0));
        assert_eq!(range.time_days_upper, Some(4.0));
    }

    #[test]
    fn timestepmax_is_clamped() {
        let selection = TimeSelection {
            timestep_range: Some("2-10".to_string()),
            ..Default::default()
        };
        let range = times().time_range(&selection).unwrap();
        assert_eq!(range.timesteps(), vec![2, 3]);
    }

    #[test]
    fn days_range_uses_midpoints() {
        let range = times().time_range(&select_days("2.2-4.6")).unwrap();
        assert_eq!((range.timestepmin, range.timestepmax), (1, 3));
        assert_eq!(range.time_days_upper, Some(5.0));
    }

    #[test]
    fn single_day_selects_its_timestep() {
        let range = times().time_range(&select_days("3.2d")).unwrap();
        assert_eq!((range.timestepmin, range.timestepmax), (2, 2));
    }

    #[test]
    fn range_without_full_timesteps() {
        let result = times().time_range(&select_days("2.6-3.4"));
        assert!(matches!(result, Err(Error::EmptyTimeRange)));
    }

    #[test]
    fn times_outside_of_simulation() {
        let selection = TimeSelection {
            timemin: Some(10.0),
            timemax: Some(20.0),
            ..Default::default()
        };
        let range = times().time_range(&selection).unwrap();
        assert!(range.is_outside());
        assert_eq!(range.time_days_lower, Some(10.0));
    }

    #[test]
    fn nothing_selected() {
        let result = times().time_range(&TimeSelection::default());
        assert!(matches!(result, Err(Error::NoTimeRange)));
    }

    #[test]
    fn column_table() {
        let table = times().table(2);
        let lines = table.lines().collect::<Vec<&str>>();
        assert_eq!(lines[0], "Timesteps and midpoint times in days:");
        assert_eq!(lines[2], "   0: 2.500d\t   2: 4.500d");
        assert_eq!(lines[3], "   1: 3.500d\t");
    }

    #[test]
    fn midpoint_boundaries() {
        let times = TimestepTimes::from_midpoints(&[1.0, 2.0, 4.0]);
        assert_eq!(times.tstarts, vec![0.5, 1.5, 3.0]);
        assert_eq!(times.tends, vec![1.5, 3.0, 5.0]);
    }

    #[test]
    fn time_locations_from_text() {
        assert_eq!("start".parse::<TimeLoc>().unwrap(), TimeLoc::Start);
        assert!("middle".parse::<TimeLoc>().is_err());
    }
}
