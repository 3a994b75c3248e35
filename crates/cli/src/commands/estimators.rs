//! Commands reading the per-rank outputs of a run

// standard library
use std::path::PathBuf;

// crate modules
use crate::commands::{cell_index, parse_indices, ModelArgs, TimeArgs};
use crate::error::{Error, Result};
use crate::output::{optional, value, OutputArgs, Table};

// external crates
use artistools_atomic::{add_lte_pops, get_levels, LevelPopulation};
use artistools_estimators::macroatom::{self, MacroatomFilter};
use artistools_estimators::{
    exportmassfractions, get_cell_estimators, nltepops, nonthermal, read_estimators, Estimators,
};
use artistools_utils::{f, get_atomic_number, get_elsymbol, parse_ionstring, Config};
use log::{info, warn};

/// Estimated cell quantities such as temperatures and densities
///
/// A quantity is either a cell value like `Te` or a per-ion variable with
/// an ion or element, like `populations:Fe II` or `populations:Ni`.
#[derive(clap::Args, Debug, Clone)]
pub(crate) struct EstimatorsArgs {
    #[command(flatten)]
    pub model: ModelArgs,

    #[command(flatten)]
    pub time: TimeArgs,

    /// Model grid cells, e.g. 0,5-10 (default: all)
    #[arg(short, long, value_name = "list")]
    pub cell: Option<String>,

    /// Quantities to list
    #[arg(long, value_delimiter = ',', default_value = "TR,Te,W,nne,total_dep")]
    pub quantities: Vec<String>,

    /// Keep cells without any estimators
    #[arg(long)]
    pub include_empty: bool,

    #[command(flatten)]
    pub output: OutputArgs,
}

/// Value of a quantity in a cell
fn quantity(estimators: &Estimators, name: &str) -> Result<Option<f64>> {
    let Some((variable, species)) = name.split_once(':') else {
        return Ok(estimators.get(name));
    };

    Ok(match parse_ionstring(species)? {
        (atomic_number, Some(ion_stage)) => estimators.ion(variable, atomic_number, ion_stage),
        (atomic_number, None) => estimators.element(variable, atomic_number),
    })
}

pub(crate) fn run(args: &EstimatorsArgs, config: &Config) -> Result<()> {
    let modelpath = &args.model.modelpath;
    let timesteps = args.time.timesteps(modelpath)?;
    let cells = parse_indices(&args.cell)?;

    let estimators = read_estimators(modelpath, &timesteps, &cells, config)?;
    let blocks = estimators
        .values()
        .filter(|e| args.include_empty || !e.emptycell)
        .collect::<Vec<&Estimators>>();

    if blocks.is_empty() {
        warn!("No estimators found in {}", modelpath.display());
    }

    args.output.emit(&blocks, || {
        let mut columns = vec!["timestep".to_string(), "modelgridindex".into(), "tdays".into()];
        columns.extend(args.quantities.iter().cloned());

        let mut table = Table::new(&columns);
        for block in &blocks {
            let mut row = vec![
                block.timestep.to_string(),
                block.modelgridindex.to_string(),
                optional(block.tdays),
            ];
            for name in &args.quantities {
                row.push(optional(quantity(block, name)?));
            }
            table.push(row);
        }
        Ok(table)
    })
}

/// Write the element mass fractions of cells for use as initial abundances
#[derive(clap::Args, Debug, Clone)]
pub(crate) struct ExportMassFractionsArgs {
    #[command(flatten)]
    pub model: ModelArgs,

    /// Timestep number
    #[arg(short, long, default_value_t = 14)]
    pub timestep: usize,

    /// Model grid cells
    #[arg(short, long, value_name = "list", default_value = "0-9")]
    pub cell: String,

    /// Path of the written file
    #[arg(short, long, default_value = "massfracs.txt")]
    pub outputfile: PathBuf,
}

pub(crate) fn run_exportmassfractions(args: &ExportMassFractionsArgs, config: &Config) -> Result<()> {
    let cells = parse_indices(&Some(args.cell.clone()))?
        .into_iter()
        .map(cell_index)
        .collect::<Result<Vec<usize>>>()?;

    exportmassfractions(
        &args.model.modelpath,
        args.timestep,
        &cells,
        &args.outputfile,
        config,
    )?;
    Ok(())
}

/// Level populations of a cell, optionally compared to LTE
#[derive(clap::Args, Debug, Clone)]
pub(crate) struct NltePopsArgs {
    #[command(flatten)]
    pub model: ModelArgs,

    #[command(flatten)]
    pub time: TimeArgs,

    /// Model grid cell
    #[arg(short, long, default_value_t = 0)]
    pub cell: usize,

    /// Only show the ions of one element, e.g. Fe
    #[arg(short, long)]
    pub element: Option<String>,

    /// Skip the LTE populations at the electron temperature
    #[arg(long)]
    pub no_lte: bool,

    #[command(flatten)]
    pub output: OutputArgs,
}

/// Column with the LTE populations at the cell electron temperature
const LTE_TE: &str = "n_LTE_T_e";

pub(crate) fn run_nltepops(args: &NltePopsArgs, config: &Config) -> Result<()> {
    let modelpath = &args.model.modelpath;
    let timestep = args.time.single(modelpath)?;

    let atomic_number = match &args.element {
        Some(symbol) => Some(
            get_atomic_number(symbol)
                .ok_or_else(|| Error::InvalidArgument(f!("unknown element '{symbol}'")))?,
        ),
        None => None,
    };

    let mut pops = nltepops::read_files(modelpath, Some(timestep), Some(args.cell), config)?;
    pops.retain(|p| atomic_number.map_or(true, |z| p.atomic_number == z));

    if pops.is_empty() {
        warn!("No NLTE populations for timestep {timestep} cell {}", args.cell);
    } else if !args.no_lte {
        add_te_lte_pops(args, timestep, &mut pops, config)?;
    }

    args.output.emit(&pops, || {
        let mut columns = vec![
            "timestep", "modelgridindex", "Z", "ion_stage", "level", "energy_ev", "n_LTE",
            "n_NLTE", "ion_popfrac",
        ];
        if !args.no_lte {
            columns.push(LTE_TE);
        }

        let mut table = Table::new(&columns);
        for pop in &pops {
            let mut row = vec![
                pop.timestep.to_string(),
                pop.modelgridindex.to_string(),
                pop.atomic_number.to_string(),
                pop.ion_stage.to_string(),
                pop.level.to_string(),
                value(pop.energy_ev),
                value(pop.n_lte),
                value(pop.n_nlte),
                value(pop.ion_popfrac),
            ];
            if !args.no_lte {
                row.push(optional(pop.lte.get(LTE_TE).copied()));
            }
            table.push(row);
        }
        Ok(table)
    })
}

fn add_te_lte_pops(
    args: &NltePopsArgs,
    timestep: usize,
    pops: &mut [LevelPopulation],
    config: &Config,
) -> Result<()> {
    let modelpath = &args.model.modelpath;
    let estimators = read_estimators(modelpath, &[timestep], &[args.cell as i64], config)?;
    let te = get_cell_estimators(&estimators, timestep, args.cell)?
        .get("Te")
        .ok_or_else(|| Error::InvalidArgument(f!("no Te in cell {}", args.cell)))?;
    info!("Cell {} has Te = {} K", args.cell, value(te));

    let mut ionlist = pops
        .iter()
        .map(|p| (p.atomic_number, p.ion_stage))
        .collect::<Vec<(usize, usize)>>();
    ionlist.sort_unstable();
    ionlist.dedup();

    let ions = get_levels(modelpath, &ionlist, false, false)?;
    add_lte_pops(&ions, pops, &[(LTE_TE, te)], None)?;
    Ok(())
}

/// Non-thermal electron spectrum of a cell
#[derive(clap::Args, Debug, Clone)]
pub(crate) struct NonthermalArgs {
    #[command(flatten)]
    pub model: ModelArgs,

    #[command(flatten)]
    pub time: TimeArgs,

    /// Model grid cell
    #[arg(short, long, default_value_t = 0)]
    pub cell: usize,

    #[command(flatten)]
    pub output: OutputArgs,
}

pub(crate) fn run_nonthermal(args: &NonthermalArgs) -> Result<()> {
    let modelpath = &args.model.modelpath;
    let timestep = args.time.single(modelpath)?;

    let table = nonthermal::read_files(modelpath, Some(timestep), Some(args.cell))?;
    if table.is_empty() {
        warn!("No nonthermal spectrum for timestep {timestep} cell {}", args.cell);
    }
    args.output.write_table(&Table::from(&table))
}

/// Wavelengths of packets absorbed and emitted by a macroatom element
#[derive(clap::Args, Debug, Clone)]
pub(crate) struct MacroatomArgs {
    #[command(flatten)]
    pub model: ModelArgs,

    /// Element symbol
    #[arg(short, long, default_value = "Fe")]
    pub element: String,

    /// First timestep
    #[arg(short, long, default_value_t = 10)]
    pub timestep: usize,

    /// Last timestep (default: same as --timestep)
    #[arg(long)]
    pub timestepmax: Option<usize>,

    /// Model grid cell
    #[arg(short, long, default_value_t = 0)]
    pub cell: usize,

    /// Lower wavelength limit in Angstroms
    #[arg(long, default_value_t = 1000.0)]
    pub xmin: f64,

    /// Upper wavelength limit in Angstroms
    #[arg(long, default_value_t = 15000.0)]
    pub xmax: f64,

    #[command(flatten)]
    pub output: OutputArgs,
}

pub(crate) fn run_macroatom(args: &MacroatomArgs) -> Result<()> {
    let atomic_number = get_atomic_number(&args.element)
        .ok_or_else(|| Error::InvalidArgument(f!("unknown element '{}'", args.element)))?;

    let files = macroatom::find_macroatom_files(&args.model.modelpath)?;
    let filter = MacroatomFilter {
        modelgridindex: Some(args.cell),
        timestepmin: Some(args.timestep),
        timestepmax: Some(args.timestepmax.unwrap_or(args.timestep)),
        atomic_number: Some(atomic_number),
    };

    let table = macroatom::read_files(&files, &filter)?;
    let wavelengths = match table.is_empty() {
        true => Vec::new(),
        false => macroatom::transition_wavelengths(&table)?,
    };

    let inrange = |lambda: f64| (args.xmin..=args.xmax).contains(&lambda);
    let selected = wavelengths
        .into_iter()
        .filter(|(lambda_in, lambda_out)| inrange(*lambda_in) && inrange(*lambda_out))
        .collect::<Vec<(f64, f64)>>();
    info!(
        "{} {} transitions between {} and {} Angstroms",
        selected.len(),
        get_elsymbol(atomic_number)?,
        args.xmin,
        args.xmax
    );

    args.output.emit(&selected, || {
        let mut table = Table::new(&["lambda_in", "lambda_out"]);
        for (lambda_in, lambda_out) in &selected {
            table.push(vec![value(*lambda_in), value(*lambda_out)]);
        }
        Ok(table)
    })
}
