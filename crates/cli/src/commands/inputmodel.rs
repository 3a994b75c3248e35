//! Commands that read and rewrite ARTIS input models

// standard library
use std::path::PathBuf;

// crate modules
use crate::error::{Error, Result};
use crate::output::OutputArgs;

// external crates
use artistools_inputmodel::{
    describe, fully_mix, get_modeldata, save_initialabundances, save_modeldata, scale_velocity,
    write_tardis_csvy, AbundanceType, DescribeOptions, TardisOptions, VelocityScale,
};
use artistools_model::get_model_name;
use artistools_utils::f;
use log::info;

/// Total mass and species masses of a model
#[derive(clap::Args, Debug, Clone)]
pub(crate) struct DescribeArgs {
    /// Path to model.txt or its folder
    #[arg(short, long, default_value = ".")]
    pub inputfile: PathBuf,

    /// Only describe a single zero-based cell
    #[arg(long)]
    pub cell: Option<usize>,

    /// Leave out the per species masses
    #[arg(long)]
    pub noabund: bool,

    /// Leave out the isotopes, reading elemental abundances instead
    #[arg(long)]
    pub noisotopes: bool,

    /// Also read the elemental abundances
    #[arg(long)]
    pub getabundances: bool,

    #[command(flatten)]
    pub output: OutputArgs,
}

pub(crate) fn run_describe(args: &DescribeArgs) -> Result<()> {
    let get_abundances = args.getabundances || args.noisotopes;
    let model = get_modeldata(&args.inputfile, get_abundances)?;

    let options = DescribeOptions {
        cell: args.cell,
        noabund: args.noabund,
        noisotopes: args.noisotopes,
    };
    let description = describe(&model, &options)?;

    match args.output.json {
        true => args.output.write_json(&description),
        false => args.output.write_text(description.to_string().trim_end()),
    }
}

/// Scale the velocities of a model, keeping the shell masses
#[derive(clap::Args, Debug, Clone)]
#[command(group(clap::ArgGroup::new("scale").required(true).args(["kescale", "velscale"])))]
pub(crate) struct ScaleVelocityArgs {
    /// Kinetic energy scale factor
    #[arg(short, long)]
    pub kescale: Option<f64>,

    /// Velocity scale factor
    #[arg(long)]
    pub velscale: Option<f64>,

    /// Path to model.txt or its folder
    #[arg(short, long, default_value = "model.txt")]
    pub inputfile: PathBuf,

    /// Path of the scaled model (default: model_velscale<factor>.txt)
    #[arg(short, long)]
    pub outputfile: Option<PathBuf>,
}

pub(crate) fn run_scalevelocity(args: &ScaleVelocityArgs) -> Result<()> {
    let scale = match (args.kescale, args.velscale) {
        (Some(kescale), _) => VelocityScale::KineticEnergy(kescale),
        (None, Some(velscale)) => VelocityScale::Velocity(velscale),
        (None, None) => {
            return Err(Error::InvalidArgument(
                "one of --kescale or --velscale is required".into(),
            ))
        }
    };
    if scale.velscale() <= 0.0 || !scale.velscale().is_finite() {
        return Err(Error::InvalidArgument(f!(
            "scale factor must be positive, got {}",
            scale.velscale()
        )));
    }

    let mut model = get_modeldata(&args.inputfile, false)?;
    info!(
        "Applying velocity factor of {} (kinetic energy factor {})",
        scale.velscale(),
        scale.kescale()
    );
    scale_velocity(&mut model, scale)?;

    let outputfile = args
        .outputfile
        .clone()
        .unwrap_or_else(|| PathBuf::from(f!("model_velscale{:.2}.txt", scale.velscale())));
    save_modeldata(&model, &outputfile)?;
    Ok(())
}

/// Replace every abundance by its average over the whole model
#[derive(clap::Args, Debug, Clone)]
pub(crate) struct FullyMixedArgs {
    /// Folder with model.txt and abundances.txt
    #[arg(short, long, default_value = ".")]
    pub inputpath: PathBuf,

    /// Folder for model_fullymixed.txt and abundances_fullymixed.txt
    #[arg(short, long, default_value = ".")]
    pub outputpath: PathBuf,
}

pub(crate) fn run_fullymixed(args: &FullyMixedArgs) -> Result<()> {
    let mut model = get_modeldata(&args.inputpath, true)?;
    fully_mix(&mut model)?;

    save_modeldata(&model, args.outputpath.join("model_fullymixed.txt"))?;
    if let Some(abundances) = &model.abundances {
        save_initialabundances(abundances, args.outputpath.join("abundances_fullymixed.txt"))?;
    }
    Ok(())
}

/// Species columns of the TARDIS model
#[derive(clap::ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum AbundType {
    Nuclear,
    Elemental,
}

impl From<AbundType> for AbundanceType {
    fn from(abundtype: AbundType) -> Self {
        match abundtype {
            AbundType::Nuclear => AbundanceType::Nuclear,
            AbundType::Elemental => AbundanceType::Elemental,
        }
    }
}

/// Convert an ARTIS model into a TARDIS csvy model
#[derive(clap::Args, Debug, Clone)]
pub(crate) struct TardisModelArgs {
    /// Path to model.txt or its folder
    #[arg(short, long, default_value = ".")]
    pub inputpath: PathBuf,

    /// Radiation temperature in K
    #[arg(short = 'T', long, default_value_t = 10000.0)]
    pub temperature: f64,

    /// Dilution factor
    #[arg(short = 'W', long, default_value_t = 1.0)]
    pub dilution_factor: f64,

    /// Isotopes from the model or elements from the abundances
    #[arg(long, value_enum, default_value_t = AbundType::Elemental)]
    pub abundtype: AbundType,

    /// Leave out species above this atomic number
    #[arg(long, default_value_t = 92)]
    pub maxatomicnumber: usize,

    /// Folder for the csvy file
    #[arg(short, long, default_value = ".")]
    pub outputpath: PathBuf,
}

pub(crate) fn run_tardismodel(args: &TardisModelArgs) -> Result<()> {
    let abundtype = AbundanceType::from(args.abundtype);
    let model = get_modeldata(&args.inputpath, abundtype == AbundanceType::Elemental)?;

    let options = TardisOptions {
        temperature: args.temperature,
        dilution_factor: args.dilution_factor,
        abundtype,
        maxatomicnumber: args.maxatomicnumber,
    };

    let modelname = get_model_name(&args.inputpath);
    write_tardis_csvy(&model, &modelname, &options, &args.outputpath)?;
    Ok(())
}
