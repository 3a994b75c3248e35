//! `writecodecomparisondata`: export models in the code comparison format

// standard library
use std::path::PathBuf;

// crate modules
use crate::commands::parse_indices;
use crate::error::{Error, Result};

// external crates
use artistools_codecomparison::writecomparisondata;
use artistools_utils::{f, Config};
use log::info;

/// Write phys, ionfrac and single estimator files for code comparison
#[derive(clap::Args, Debug, Clone)]
pub(crate) struct WriteComparisonArgs {
    /// Model folders to export
    #[arg(default_value = ".", num_args = 1..)]
    pub modelpath: Vec<PathBuf>,

    /// Timesteps to export, e.g. 10,20-30 (default: all)
    #[arg(long, value_name = "list")]
    pub selected_timesteps: Option<String>,

    /// Folder for the comparison files
    #[arg(short, long, default_value = ".")]
    pub outputpath: PathBuf,

    /// Also write the spectra file
    #[arg(long)]
    pub spectra: bool,
}

pub(crate) fn run(args: &WriteComparisonArgs, config: &Config) -> Result<()> {
    let selected_timesteps = parse_indices(&args.selected_timesteps)?
        .into_iter()
        .map(|ts| usize::try_from(ts).map_err(|_| Error::InvalidArgument(f!("timestep {ts}"))))
        .collect::<Result<Vec<usize>>>()?;

    for modelpath in &args.modelpath {
        let written = writecomparisondata(
            modelpath,
            &selected_timesteps,
            &args.outputpath,
            args.spectra,
            config,
        )?;
        info!("Wrote {} files for {}", written.len(), modelpath.display());
    }
    Ok(())
}
