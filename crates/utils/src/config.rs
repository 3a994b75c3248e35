//! Runtime configuration passed explicitly to every entry point

// standard library
use std::path::{Path, PathBuf};

// crate modules
use crate::error::Result;

// external crates
use log::{debug, warn};
use serde::{Deserialize, Serialize};

/// Settings shared by the readers and analysis commands
///
/// The defaults are suitable for most systems. Any field may be overridden by
/// environment variables through [Config::from_env] or loaded from a JSON
/// file with [Config::from_json_file].
///
/// ```rust
/// # use artistools_utils::Config;
/// let config = Config::default();
/// assert!(config.num_processes >= 1);
/// assert!(config.enable_diskcache);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Number of worker threads for reading per-rank output files
    pub num_processes: usize,

    /// Use the on-disk memoization cache
    pub enable_diskcache: bool,

    /// Root of the code comparison workshop data
    pub codecomparison_data_path: PathBuf,

    /// Directory containing photometric filter transmission curves
    pub filter_data_path: PathBuf,

    /// Do not draw progress bars while reading files
    pub disable_progress: bool,
}

impl Default for Config {
    fn default() -> Self {
        let cpus = std::thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or(1);

        Self {
            num_processes: (cpus / 2).max(1),
            enable_diskcache: true,
            codecomparison_data_path: PathBuf::from("data/codecomparison"),
            filter_data_path: PathBuf::from("data/filters"),
            disable_progress: false,
        }
    }
}

impl Config {
    /// Default configuration with any `ARTISTOOLS_*` environment overrides
    ///
    /// - `ARTISTOOLS_NUM_PROCESSES`
    /// - `ARTISTOOLS_DISKCACHE` (`0`, `false` or `off` to disable)
    /// - `ARTISTOOLS_CODECOMPARISON_PATH`
    /// - `ARTISTOOLS_FILTER_PATH`
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(value) = std::env::var("ARTISTOOLS_NUM_PROCESSES") {
            match value.trim().parse::<usize>() {
                Ok(n) if n > 0 => config.num_processes = n,
                _ => warn!("Ignoring invalid ARTISTOOLS_NUM_PROCESSES={value}"),
            }
        }

        if let Ok(value) = std::env::var("ARTISTOOLS_DISKCACHE") {
            config.enable_diskcache = !matches!(
                value.trim().to_lowercase().as_str(),
                "0" | "false" | "off" | "no"
            );
        }

        if let Ok(value) = std::env::var("ARTISTOOLS_CODECOMPARISON_PATH") {
            config.codecomparison_data_path = PathBuf::from(value);
        }

        if let Ok(value) = std::env::var("ARTISTOOLS_FILTER_PATH") {
            config.filter_data_path = PathBuf::from(value);
        }

        debug!("{config:?}");
        config
    }

    /// Load a configuration from JSON, missing fields take their defaults
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = std::fs::File::open(path)?;
        let config = serde_json::from_reader(std::io::BufReader::new(file))?;
        Ok(config)
    }

    /// Build a rayon thread pool sized to `num_processes`
    pub fn thread_pool_size(&self) -> usize {
        self.num_processes.max(1)
    }
}
