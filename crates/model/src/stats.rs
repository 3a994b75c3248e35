//! Packet interaction counters from the `output_0-0.txt` run log

// standard library
use std::collections::BTreeMap;
use std::path::Path;

// crate modules
use crate::error::Result;

// external crates
use log::warn;

/// `k_stat_*` counters of each timestep, in timestep order
pub type RunStats = Vec<BTreeMap<String, i64>>;

/// Read the `k_stat_*` counters from the log of a run folder
pub fn read_run_stats<P: AsRef<Path>>(runfolder: P) -> Result<RunStats> {
    let path = runfolder.as_ref().join("output_0-0.txt");
    let text = std::fs::read_to_string(&path)?;
    Ok(parse_run_stats(&text, &path.display().to_string()))
}

/// Parse `k_stat_*` counters from run log text
///
/// Counters before the first timestep line are ignored.
pub fn parse_run_stats(text: &str, source: &str) -> RunStats {
    let mut stats: RunStats = Vec::new();

    for line in text.lines() {
        if let Some(rest) = line.strip_prefix("timestep ") {
            let timestep = rest
                .split(',')
                .next()
                .and_then(|t| t.trim().parse::<usize>().ok());
            stats.push(BTreeMap::new());
            if timestep != Some(stats.len() - 1) {
                warn!("Unexpected timestep {timestep:?} at entry {} in {source}", stats.len() - 1);
            }
        } else if line.starts_with("k_stat_") {
            let Some((key, value)) = line.split_once(" = ") else {
                continue;
            };
            let (Some(current), Ok(value)) = (stats.last_mut(), value.trim().parse::<i64>()) else {
                continue;
            };
            current.insert(key.trim().to_string(), value);
        }
    }

    stats
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counters_per_timestep() {
        let text = "\
k_stat_to_r_fb = 9
timestep 0, start
k_stat_to_r_fb = 12
k_stat_to_ma_collexc = 4
timestep 1, start
k_stat_to_r_fb = 15
";
        let stats = parse_run_stats(text, "test");
        assert_eq!(stats.len(), 2);
        assert_eq!(stats[0]["k_stat_to_r_fb"], 12);
        assert_eq!(stats[0]["k_stat_to_ma_collexc"], 4);
        assert_eq!(stats[1]["k_stat_to_r_fb"], 15);
    }
}
