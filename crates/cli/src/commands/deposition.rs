//! `deposition` and `modeldeposition`: energy deposition rates

// crate modules
use crate::commands::ModelArgs;
use crate::error::Result;
use crate::output::{value, OutputArgs, Table};

// external crates
use artistools_inputmodel::get_modeldata;
use artistools_model::get_deposition;
use artistools_spectra::analytical_positron_deposition;
use artistools_utils::ValueExt;
use log::info;

/// Deposition rates written by ARTIS in `deposition.out`
#[derive(clap::Args, Debug, Clone)]
pub(crate) struct DepositionArgs {
    #[command(flatten)]
    pub model: ModelArgs,

    #[command(flatten)]
    pub output: OutputArgs,
}

pub(crate) fn run(args: &DepositionArgs) -> Result<()> {
    let rows = get_deposition(&args.model.modelpath)?;

    args.output.emit(&rows, || {
        let mut table = Table::new(&[
            "timestep",
            "time_days",
            "gammadep_Lsun",
            "posdep_Lsun",
            "totaldep_Lsun",
        ]);
        for row in &rows {
            table.push(vec![
                row.timestep.to_string(),
                value(row.time),
                value(row.gammadep_over_lsun),
                value(row.posdep_over_lsun),
                value(row.total_dep_over_lsun),
            ]);
        }
        Ok(table)
    })
}

/// Positron deposition of each shell from the initial model
///
/// All 56Ni is assumed to decay to 56Co, and all energy comes from the
/// emitted positrons.
#[derive(clap::Args, Debug, Clone)]
pub(crate) struct ModelDepositionArgs {
    #[command(flatten)]
    pub model: ModelArgs,

    /// Time in days
    #[arg(short = 't', long, default_value_t = 330.0)]
    pub timedays: f64,

    #[command(flatten)]
    pub output: OutputArgs,
}

pub(crate) fn run_analytical(args: &ModelDepositionArgs) -> Result<()> {
    let model = get_modeldata(&args.model.modelpath, false)?;
    let deposition = analytical_positron_deposition(&model, args.timedays)?;

    info!("t_now = {} d", args.timedays);
    info!("Global posdep: {} Lsun", deposition.global_posdep_lsun().sci(3, 2));

    args.output.emit(&deposition, || {
        let mut table = Table::new(&[
            "zone",
            "velocity_inner",
            "velocity_outer",
            "power_erg_s",
            "epsilon_erg_s_cm3",
        ]);
        for zone in &deposition.zones {
            table.push(vec![
                zone.zone.to_string(),
                value(zone.velocity_inner),
                value(zone.velocity_outer),
                value(zone.power),
                value(zone.epsilon),
            ]);
        }
        Ok(table)
    })
}
