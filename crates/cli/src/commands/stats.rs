//! `stats`: packet event counters from the run logs

// standard library
use std::collections::BTreeMap;

// crate modules
use crate::commands::ModelArgs;
use crate::error::Result;
use crate::output::{optional, OutputArgs, Table};

// external crates
use artistools_model::{get_runfolders, read_run_stats, TimestepTimes};
use log::{info, warn};
use serde::Serialize;

/// Counters of one run folder
#[derive(Debug, Clone, Serialize)]
struct RunFolderStats {
    runfolder: String,
    timesteps: Vec<TimestepStats>,
}

#[derive(Debug, Clone, Serialize)]
struct TimestepStats {
    timestep: usize,
    time_days: Option<f64>,
    counters: BTreeMap<String, i64>,
}

/// The k_stat counters of every timestep in each run folder
#[derive(clap::Args, Debug, Clone)]
pub(crate) struct StatsArgs {
    #[command(flatten)]
    pub model: ModelArgs,

    /// Counters to list
    #[arg(short, long, value_delimiter = ',')]
    #[arg(default_value = "k_stat_to_r_fb,k_stat_to_ma_collexc")]
    pub keys: Vec<String>,

    #[command(flatten)]
    pub output: OutputArgs,
}

pub(crate) fn run(args: &StatsArgs) -> Result<()> {
    let modelpath = &args.model.modelpath;
    let tmids = match TimestepTimes::read(modelpath) {
        Ok(times) => times.tmids,
        Err(e) => {
            warn!("No timestep times for {}: {e}", modelpath.display());
            Vec::new()
        }
    };

    let mut results = Vec::new();
    for runfolder in get_runfolders(modelpath, None, None)? {
        if !runfolder.join("output_0-0.txt").is_file() {
            continue;
        }

        info!("Reading the run log of {}", runfolder.display());
        let stats = read_run_stats(&runfolder)?;
        results.push(RunFolderStats {
            runfolder: runfolder.display().to_string(),
            timesteps: stats
                .into_iter()
                .enumerate()
                .map(|(timestep, counters)| TimestepStats {
                    timestep,
                    time_days: tmids.get(timestep).copied(),
                    counters,
                })
                .collect(),
        });
    }

    if results.is_empty() {
        warn!("No output_0-0.txt log files found in {}", modelpath.display());
    }

    args.output.emit(&results, || {
        let mut columns = vec!["runfolder".to_string(), "timestep".into(), "time_days".into()];
        columns.extend(args.keys.iter().cloned());

        let mut table = Table::new(&columns);
        for run in &results {
            for ts in &run.timesteps {
                let mut row = vec![
                    run.runfolder.clone(),
                    ts.timestep.to_string(),
                    optional(ts.time_days),
                ];
                row.extend(
                    args.keys
                        .iter()
                        .map(|key| ts.counters.get(key).map(i64::to_string).unwrap_or_default()),
                );
                table.push(row);
            }
        }
        Ok(table)
    })
}
