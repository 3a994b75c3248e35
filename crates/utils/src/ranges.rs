//! Integer range strings and list shaping helpers

// standard library
use std::collections::HashMap;
use std::ops::RangeInclusive;

// crate modules
use crate::error::{Error, Result};

// external crates
use itertools::Itertools;

/// Parse an integer range such as `3-7` or `5` into an inclusive range
///
/// Reversed ranges are swapped, and any part matching a key in `vars` is
/// replaced by its value.
///
/// ```rust
/// # use std::collections::HashMap;
/// # use artistools_utils::parse_range;
/// let vars = HashMap::from([("last".to_string(), 9)]);
/// assert_eq!(parse_range("3-7", &vars).unwrap(), 3..=7);
/// assert_eq!(parse_range("7-3", &vars).unwrap(), 3..=7);
/// assert_eq!(parse_range("5", &vars).unwrap(), 5..=5);
/// assert_eq!(parse_range("4-last", &vars).unwrap(), 4..=9);
/// assert!(parse_range("1-2-3", &vars).is_err());
/// ```
pub fn parse_range(rng: &str, vars: &HashMap<String, i64>) -> Result<RangeInclusive<i64>> {
    let bad_range = || Error::BadRange {
        range: rng.to_string(),
    };

    let parts = rng
        .split('-')
        .map(|p| {
            let p = p.trim();
            vars.get(p)
                .copied()
                .or_else(|| p.parse::<i64>().ok())
                .ok_or_else(bad_range)
        })
        .collect::<Result<Vec<i64>>>()?;

    let (start, end) = match parts.as_slice() {
        [start] => (*start, *start),
        [start, end] => (*start, *end),
        _ => return Err(bad_range()),
    };

    Ok(start.min(end)..=start.max(end))
}

/// Parse comma separated ranges into a sorted list of unique integers
///
/// ```rust
/// # use std::collections::HashMap;
/// # use artistools_utils::parse_range_list;
/// let ranges = parse_range_list("8,1-3,2-4", &HashMap::new()).unwrap();
/// assert_eq!(ranges, vec![1, 2, 3, 4, 8]);
/// ```
pub fn parse_range_list(rngs: &str, vars: &HashMap<String, i64>) -> Result<Vec<i64>> {
    let ranges = rngs
        .split(',')
        .filter(|r| !r.trim().is_empty())
        .map(|r| parse_range(r, vars))
        .collect::<Result<Vec<_>>>()?;

    Ok(ranges.into_iter().flatten().sorted().dedup().collect())
}

/// Truncate or pad a list with `None` to exactly `length` items
///
/// ```rust
/// # use artistools_utils::trim_or_pad;
/// assert_eq!(trim_or_pad(3, &["a"]), vec![Some("a"), None, None]);
/// assert_eq!(trim_or_pad(1, &[1, 2, 3]), vec![Some(1)]);
/// ```
pub fn trim_or_pad<T: Clone>(length: usize, list: &[T]) -> Vec<Option<T>> {
    list.iter()
        .cloned()
        .map(Some)
        .chain(std::iter::repeat(None))
        .take(length)
        .collect()
}

/// Find the value in `times` closest to `reftime`
///
/// ```rust
/// # use artistools_utils::match_closest_time;
/// assert_eq!(match_closest_time(10.2, &[8.0, 10.0, 12.5]), Some(10.0));
/// assert_eq!(match_closest_time(10.2, &[]), None);
/// ```
pub fn match_closest_time(reftime: f64, times: &[f64]) -> Option<f64> {
    times
        .iter()
        .copied()
        .min_by(|a, b| (a - reftime).abs().total_cmp(&(b - reftime).abs()))
}
