//! `transitions`: synthetic spectra from the bound-bound lines of selected ions

// standard library
use std::collections::BTreeMap;
use std::path::PathBuf;

// crate modules
use crate::error::{Error, Result};
use crate::output::{value, OutputArgs, Table};

// external crates
use artistools_atomic::{
    add_upper_lte_pop, find_ion, generate_ion_spectrum, get_levels, get_line_transitions,
    partition_function, upper_pops_from_levels, LevelPopulation, LineSpectrumOptions,
    LineTransition,
};
use artistools_estimators::{get_cell_estimators, nltepops, read_estimators};
use artistools_model::get_timestep_of_timedays;
use artistools_utils::{f, get_ionstring, parse_ionstring, Config, IonNotation};
use log::info;
use serde::Serialize;

/// Estimated emission spectra of forbidden (and optionally permitted) lines
///
/// Without a model, the level populations are in LTE at each temperature
/// given with -T for a unit ion population. With a model, the NLTE level
/// populations of a cell are used.
#[derive(clap::Args, Debug, Clone)]
pub(crate) struct TransitionsArgs {
    /// Model folder to take NLTE populations and atomic data from
    #[arg(long)]
    pub modelpath: Option<PathBuf>,

    /// Folder with adata.txt and transitiondata.txt when no model is given
    #[arg(long, default_value = ".")]
    pub atomicdata: PathBuf,

    /// Ions to include
    #[arg(long, value_delimiter = ',')]
    #[arg(default_value = "Fe I,Fe II,Fe III,Co II,Co III,Ni II,Ni III")]
    pub ions: Vec<String>,

    /// Lower wavelength limit in Angstroms
    #[arg(long, default_value_t = 3500.0)]
    pub xmin: f64,

    /// Upper wavelength limit in Angstroms
    #[arg(long, default_value_t = 8000.0)]
    pub xmax: f64,

    /// Excitation temperatures in K for LTE populations (default: 2000)
    #[arg(short = 'T', long = "temperature", value_delimiter = ',')]
    pub temperatures: Vec<f64>,

    /// Gaussian line width in km/s
    #[arg(long, default_value_t = 5500.0)]
    pub sigma_v: f64,

    /// Half width of each line profile in units of sigma
    #[arg(long, default_value_t = 3.0)]
    pub gaussian_window: f64,

    /// Include permitted lines as well as forbidden ones
    #[arg(long)]
    pub include_permitted: bool,

    /// Time in days, overriding --timestep
    #[arg(long)]
    pub timedays: Option<String>,

    /// Timestep of the NLTE populations
    #[arg(long, default_value_t = 70)]
    pub timestep: usize,

    /// Model grid cell of the NLTE populations
    #[arg(long, default_value_t = 0)]
    pub cell: usize,

    /// Scale every spectrum to a peak of one
    #[arg(long)]
    pub normalised: bool,

    /// List the contributing lines instead of the spectra
    #[arg(long)]
    pub print_lines: bool,

    #[command(flatten)]
    pub output: OutputArgs,
}

impl TransitionsArgs {
    fn options(&self) -> LineSpectrumOptions {
        LineSpectrumOptions {
            xmin: self.xmin,
            xmax: self.xmax,
            sigma_v: self.sigma_v,
            gaussian_window: self.gaussian_window,
            include_permitted: self.include_permitted,
        }
    }

    fn ionlist(&self) -> Result<Vec<(usize, usize)>> {
        let mut ionlist = Vec::new();
        for label in &self.ions {
            match parse_ionstring(label)? {
                (atomic_number, Some(ion_stage)) => ionlist.push((atomic_number, ion_stage)),
                (_, None) => {
                    return Err(Error::InvalidArgument(f!("'{label}' has no ion stage")));
                }
            }
        }
        ionlist.sort_unstable();
        ionlist.dedup();
        Ok(ionlist)
    }
}

/// Where the upper level populations come from
enum Populations {
    Lte(Vec<f64>),
    Nlte(Vec<LevelPopulation>),
}

/// A named synthetic spectrum on the shared wavelength grid
#[derive(Debug, Clone, Serialize)]
struct Series {
    label: String,
    yvalues: Vec<f64>,
}

#[derive(Debug, Clone, Serialize)]
struct Spectra {
    lambda_angstroms: Vec<f64>,
    series: Vec<Series>,
}

/// A line with the population of its upper level
#[derive(Debug, Clone, Serialize)]
struct PopulatedLine {
    ion: String,
    population: String,
    upper_pop: f64,
    #[serde(flatten)]
    line: LineTransition,
}

fn model_populations(args: &TransitionsArgs, config: &Config) -> Result<Populations> {
    let Some(modelpath) = &args.modelpath else {
        let temperatures = match args.temperatures.is_empty() {
            true => vec![2000.0],
            false => args.temperatures.clone(),
        };
        return Ok(Populations::Lte(temperatures));
    };

    let timestep = match &args.timedays {
        Some(timedays) => get_timestep_of_timedays(modelpath, timedays)?,
        None => args.timestep,
    };

    let estimators = read_estimators(modelpath, &[timestep], &[args.cell as i64], config)?;
    let cell = get_cell_estimators(&estimators, timestep, args.cell)?;
    info!(
        "Cell {} at timestep {timestep} has Te = {} K, TR = {} K",
        args.cell,
        cell.get("Te").map(value).unwrap_or_default(),
        cell.get("TR").map(value).unwrap_or_default(),
    );

    let pops = nltepops::read_files(modelpath, Some(timestep), Some(args.cell), config)?;
    if pops.is_empty() {
        return Err(Error::InvalidArgument(f!(
            "no NLTE populations for cell {} at timestep {timestep}",
            args.cell
        )));
    }
    Ok(Populations::Nlte(pops))
}

pub(crate) fn run(args: &TransitionsArgs, config: &Config) -> Result<()> {
    let options = args.options();
    let ionlist = args.ionlist()?;
    let populations = model_populations(args, config)?;

    let datapath = args.modelpath.as_ref().unwrap_or(&args.atomicdata);
    let ions = get_levels(datapath, &ionlist, true, false)?;

    let xvalues = options.xvalues();
    let mut series = Vec::new();
    let mut populated = Vec::new();

    for &(atomic_number, ion_stage) in &ionlist {
        let ion = find_ion(&ions, atomic_number, ion_stage)?;
        let ionstring = get_ionstring(atomic_number, Some(ion_stage), IonNotation::Spectral)?;
        let lines = get_line_transitions(ion, &options)?;
        info!(
            "{ionstring}: {} transitions, {} plottable",
            ion.transitions.len(),
            lines.len()
        );

        let upper_pops = match &populations {
            Populations::Lte(temperatures) => temperatures
                .iter()
                .map(|&t_exc| {
                    let ltepartfunc = partition_function(&ion.levels, t_exc);
                    (f!("T={t_exc:.0}K"), add_upper_lte_pop(&lines, t_exc, 1.0, ltepartfunc))
                })
                .collect::<Vec<(String, Vec<f64>)>>(),
            Populations::Nlte(pops) => {
                let levelpops = pops
                    .iter()
                    .filter(|p| p.atomic_number == atomic_number && p.ion_stage == ion_stage)
                    .filter_map(|p| usize::try_from(p.level).ok().map(|l| (l, p.n_nlte)))
                    .collect::<BTreeMap<usize, f64>>();
                info!(
                    "{ionstring}: population {} cm^-3",
                    value(levelpops.values().sum())
                );
                vec![("NLTE".to_string(), upper_pops_from_levels(&lines, &levelpops))]
            }
        };

        for (population, pops) in upper_pops {
            if args.print_lines {
                populated.extend(lines.iter().zip(&pops).map(|(line, upper_pop)| PopulatedLine {
                    ion: ionstring.clone(),
                    population: population.clone(),
                    upper_pop: *upper_pop,
                    line: line.clone(),
                }));
            }

            let mut yvalues = generate_ion_spectrum(&lines, &pops, &xvalues, &options);
            if args.normalised {
                normalise(&mut yvalues);
            }
            series.push(Series {
                label: f!("{ionstring} {population}"),
                yvalues,
            });
        }
    }

    match args.print_lines {
        true => write_lines(args, &populated),
        false => write_spectra(
            args,
            &Spectra {
                lambda_angstroms: xvalues,
                series,
            },
        ),
    }
}

/// Divide by the peak value, if there is one
fn normalise(yvalues: &mut [f64]) {
    let peak = yvalues.iter().copied().fold(0.0, f64::max);
    if peak > 0.0 {
        yvalues.iter_mut().for_each(|y| *y /= peak);
    }
}

fn write_spectra(args: &TransitionsArgs, spectra: &Spectra) -> Result<()> {
    args.output.emit(spectra, || {
        let mut columns = vec!["lambda_angstroms".to_string()];
        columns.extend(spectra.series.iter().map(|s| s.label.clone()));

        let mut table = Table::new(&columns);
        for (i, lambda) in spectra.lambda_angstroms.iter().enumerate() {
            let mut row = vec![value(*lambda)];
            row.extend(spectra.series.iter().map(|s| value(s.yvalues[i])));
            table.push(row);
        }
        Ok(table)
    })
}

fn write_lines(args: &TransitionsArgs, lines: &[PopulatedLine]) -> Result<()> {
    args.output.emit(lines, || {
        let mut table = Table::new(&[
            "ion",
            "populations",
            "lambda_angstroms",
            "lower",
            "upper",
            "A",
            "forbidden",
            "upper_pop",
            "flux",
        ]);
        for populated in lines {
            let line = &populated.line;
            table.push(vec![
                populated.ion.clone(),
                populated.population.clone(),
                value(line.lambda_angstroms),
                line.lower.to_string(),
                line.upper.to_string(),
                value(line.a),
                line.forbidden.to_string(),
                value(populated.upper_pop),
                value(line.flux_factor * populated.upper_pop),
            ]);
        }
        Ok(table)
    })
}
