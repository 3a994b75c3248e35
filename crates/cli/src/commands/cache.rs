//! `cache`: inspect or clear the cache folder of a model

// crate modules
use crate::commands::ModelArgs;
use crate::error::Result;
use crate::output::{OutputArgs, Table};

// external crates
use artistools_cache::{cache_entries, clear_cache};
use artistools_utils::f;
use log::info;

/// List the cached results stored in a model folder
#[derive(clap::Args, Debug, Clone)]
pub(crate) struct CacheArgs {
    #[command(flatten)]
    pub model: ModelArgs,

    /// Delete the cached results
    #[arg(long)]
    pub clear: bool,

    #[command(flatten)]
    pub output: OutputArgs,
}

pub(crate) fn run(args: &CacheArgs) -> Result<()> {
    let modelpath = &args.model.modelpath;

    if args.clear {
        let count = clear_cache(modelpath)?;
        info!("Removed {count} cache entries from {}", modelpath.display());
        return Ok(());
    }

    let entries = cache_entries(modelpath)?;
    let total = entries.iter().map(|e| e.size_mib).sum::<f64>();
    info!("{} cache entries, {total:.2} MiB in total", entries.len());

    args.output.emit(&entries, || {
        let mut table = Table::new(&["file", "size_mib"]);
        for entry in &entries {
            let name = entry
                .path
                .file_name()
                .map(|n| n.to_string_lossy().to_string())
                .unwrap_or_default();
            table.push(vec![name, f!("{:.3}", entry.size_mib)]);
        }
        Ok(table)
    })
}
