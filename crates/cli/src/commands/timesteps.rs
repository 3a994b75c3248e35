//! `timesteptimes`: list the timesteps of a model

// crate modules
use crate::commands::ModelArgs;
use crate::error::Result;
use crate::output::{value, OutputArgs, Table};

// external crates
use artistools_model::{is_codecomparison_path, TimeLoc, TimestepTimes};
use artistools_utils::Config;

/// Point in each timestep to list
#[derive(clap::ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Loc {
    Mid,
    Start,
    End,
    Delta,
}

impl From<Loc> for TimeLoc {
    fn from(loc: Loc) -> Self {
        match loc {
            Loc::Mid => TimeLoc::Mid,
            Loc::Start => TimeLoc::Start,
            Loc::End => TimeLoc::End,
            Loc::Delta => TimeLoc::Delta,
        }
    }
}

/// Show the times of every timestep
#[derive(clap::Args, Debug, Clone)]
pub(crate) struct TimestepTimesArgs {
    #[command(flatten)]
    pub model: ModelArgs,

    /// Number of columns in the listing
    #[arg(short, long, default_value_t = 4)]
    pub columns: usize,

    /// List one time per timestep as a table instead
    #[arg(long, value_enum)]
    pub loc: Option<Loc>,

    #[command(flatten)]
    pub output: OutputArgs,
}

pub(crate) fn run(args: &TimestepTimesArgs, config: &Config) -> Result<()> {
    let modelpath = &args.model.modelpath;
    let times = match is_codecomparison_path(modelpath) {
        true => artistools_codecomparison::get_timestep_times(modelpath, config)?,
        false => TimestepTimes::read(modelpath)?,
    };

    match (args.loc, args.output.json) {
        (Some(loc), _) => {
            let values = times.get(loc.into());
            args.output.emit(values, || {
                let mut table = Table::new(&["timestep".to_string(), TimeLoc::from(loc).to_string()]);
                for (timestep, time) in values.iter().enumerate() {
                    table.push(vec![timestep.to_string(), value(*time)]);
                }
                Ok(table)
            })
        }
        (None, true) => args.output.write_json(&times),
        (None, false) => args.output.write_text(&times.table(args.columns)),
    }
}
