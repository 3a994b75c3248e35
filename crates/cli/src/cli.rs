//! Argument parsing and dispatch of the `artistools` binary

// standard library
use std::path::PathBuf;

// crate modules
use crate::aliases::command_alias_from_program_name;
use crate::commands::{
    atomic, cache, codecomparison, deposition, estimators, inputmodel, spectra, stats, timesteps,
};
use crate::error::{Error, Result};

// external crates
use artistools_utils::{f, Config};
use clap::{CommandFactory, Parser};
use log::debug;

/// Name used in usage messages whatever the program was invoked as
const PROGRAM_NAME: &str = "artistools";

/// Tools for reading, summarising and converting ARTIS simulation output
#[derive(Parser, Debug)]
#[command(name = PROGRAM_NAME, version)]
pub(crate) struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Number of worker threads for reading files
    #[arg(help_heading("Configuration"), global = true)]
    #[arg(long, value_name = "n")]
    pub num_processes: Option<usize>,

    /// Never read or write cached results
    #[arg(help_heading("Configuration"), global = true)]
    #[arg(long)]
    pub no_diskcache: bool,

    /// Folder with the code comparison data
    #[arg(help_heading("Configuration"), global = true)]
    #[arg(long, value_name = "path")]
    pub codecomparison_path: Option<PathBuf>,

    /// JSON configuration file, used instead of the environment
    #[arg(help_heading("Configuration"), global = true)]
    #[arg(long, value_name = "path")]
    pub config: Option<PathBuf>,

    // * Flags
    /// Verbose logging (-v, -vv)
    ///
    /// If specified, the default log level of INFO is increased to DEBUG (-v)
    /// or TRACE (-vv). Errors and Warnings are always logged unless in quiet
    /// (-q) mode.
    #[arg(short, long, global = true)]
    #[arg(action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Supress all log output (overrules --verbose)
    #[arg(short, long, global = true)]
    pub quiet: bool,
}

#[derive(clap::Subcommand, Debug)]
pub(crate) enum Command {
    /// List the times of every timestep
    #[command(name = "timesteptimes")]
    TimestepTimes(timesteps::TimestepTimesArgs),

    /// Gamma and positron deposition rates from deposition.out
    Deposition(deposition::DepositionArgs),

    /// Analytical positron deposition of each model shell
    #[command(name = "modeldeposition")]
    ModelDeposition(deposition::ModelDepositionArgs),

    /// Estimated cell quantities such as temperatures and densities
    Estimators(estimators::EstimatorsArgs),

    /// Light curve or absolute magnitudes in photometric filters
    #[command(name = "lightcurve")]
    LightCurve(spectra::LightCurveArgs),

    /// Spectrum averaged over a range of timesteps
    Spectrum(spectra::SpectrumArgs),

    /// NLTE level populations of a cell
    #[command(name = "nltepops")]
    NltePops(estimators::NltePopsArgs),

    /// Non-thermal electron spectrum of a cell
    Nonthermal(estimators::NonthermalArgs),

    /// Wavelengths of macroatom absorptions and emissions
    Macroatom(estimators::MacroatomArgs),

    /// Synthetic spectra from the bound-bound transitions of selected ions
    Transitions(atomic::TransitionsArgs),

    /// Total and per species masses of an input model
    #[command(name = "describeinputmodel")]
    DescribeInputModel(inputmodel::DescribeArgs),

    /// Scale the velocities of an input model
    #[command(name = "scalevelocity")]
    ScaleVelocity(inputmodel::ScaleVelocityArgs),

    /// Mix the abundances of an input model throughout
    #[command(name = "fullymixed")]
    FullyMixed(inputmodel::FullyMixedArgs),

    /// Convert an input model to a TARDIS csvy model
    #[command(name = "maketardismodel")]
    MakeTardisModel(inputmodel::TardisModelArgs),

    /// Export models in the code comparison format
    #[command(name = "writecodecomparisondata")]
    WriteCodeComparisonData(codecomparison::WriteComparisonArgs),

    /// Write cell mass fractions at a timestep
    #[command(name = "exportmassfractions")]
    ExportMassFractions(estimators::ExportMassFractionsArgs),

    /// Packet event counters from the run logs
    Stats(stats::StatsArgs),

    /// List or clear the cached results of a model
    Cache(cache::CacheArgs),
}

impl Cli {
    /// Configuration from the JSON file or environment, then the flags
    pub fn config(&self) -> Result<Config> {
        let mut config = match &self.config {
            Some(path) => Config::from_json_file(path)?,
            None => Config::from_env(),
        };

        if let Some(num_processes) = self.num_processes {
            config.num_processes = num_processes.max(1);
        }
        if self.no_diskcache {
            config.enable_diskcache = false;
        }
        if let Some(path) = &self.codecomparison_path {
            config.codecomparison_data_path = path.clone();
        }
        if self.quiet {
            config.disable_progress = true;
        }

        debug!("{config:?}");
        Ok(config)
    }
}

/// Run a parsed subcommand
pub(crate) fn dispatch(command: &Command, config: &Config) -> Result<()> {
    match command {
        Command::TimestepTimes(args) => timesteps::run(args, config),
        Command::Deposition(args) => deposition::run(args),
        Command::ModelDeposition(args) => deposition::run_analytical(args),
        Command::Estimators(args) => estimators::run(args, config),
        Command::LightCurve(args) => spectra::run_lightcurve(args, config),
        Command::Spectrum(args) => spectra::run_spectrum(args, config),
        Command::NltePops(args) => estimators::run_nltepops(args, config),
        Command::Nonthermal(args) => estimators::run_nonthermal(args),
        Command::Macroatom(args) => estimators::run_macroatom(args),
        Command::Transitions(args) => atomic::run(args, config),
        Command::DescribeInputModel(args) => inputmodel::run_describe(args),
        Command::ScaleVelocity(args) => inputmodel::run_scalevelocity(args),
        Command::FullyMixed(args) => inputmodel::run_fullymixed(args),
        Command::MakeTardisModel(args) => inputmodel::run_tardismodel(args),
        Command::WriteCodeComparisonData(args) => codecomparison::run(args, config),
        Command::ExportMassFractions(args) => estimators::run_exportmassfractions(args, config),
        Command::Stats(args) => stats::run(args),
        Command::Cache(args) => cache::run(args),
    }
}

/// Full argument list, inserting the subcommand implied by the program name
pub(crate) fn full_args(program_name: &str, args: Vec<String>) -> Vec<String> {
    let alias = command_alias_from_program_name(program_name)
        .filter(|name| Cli::command().find_subcommand(name).is_some());

    std::iter::once(PROGRAM_NAME.to_string())
        .chain(alias)
        .chain(args)
        .collect()
}

/// Parse arguments, turning help and version requests into `None`
pub(crate) fn parse(args: &[String]) -> Result<Option<Cli>> {
    match Cli::try_parse_from(args) {
        Ok(cli) => Ok(Some(cli)),
        Err(err) => match err.kind() {
            clap::error::ErrorKind::DisplayHelp | clap::error::ErrorKind::DisplayVersion => {
                print!("{err}");
                Ok(None)
            }
            _ => Err(Error::Usage(err.to_string())),
        },
    }
}

/// One line per subcommand with its description
pub(crate) fn command_listing() -> String {
    let indent = " ".repeat(28);
    let options = textwrap::Options::new(80).subsequent_indent(&indent);

    let mut listing = String::from("artistools provides the following commands:\n\n");
    for subcommand in Cli::command().get_subcommands() {
        let about = subcommand
            .get_about()
            .map(|a| a.to_string())
            .unwrap_or_default();
        let line = f!("  {:<26}{about}", subcommand.get_name());
        listing.push_str(&textwrap::fill(&line, &options));
        listing.push('\n');
    }
    listing.push_str("\nRun 'artistools <command> --help' for the options of a command.");
    listing
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn alias_inserts_subcommand() {
        let full = full_args("plotartisspectrum", args(&["--timestep", "10"]));
        assert_eq!(full, args(&["artistools", "spectrum", "--timestep", "10"]));

        let cli = parse(&full).unwrap().unwrap();
        assert!(matches!(cli.command, Some(Command::Spectrum(_))));
    }

    #[test]
    fn unknown_alias_is_ignored() {
        let full = full_args("plotartisradfield", args(&["deposition"]));
        assert_eq!(full, args(&["artistools", "deposition"]));
    }

    #[test]
    fn global_flags_after_subcommand() {
        let full = args(&["artistools", "timesteptimes", "-vv", "--no-diskcache"]);
        let cli = parse(&full).unwrap().unwrap();

        assert_eq!(cli.verbose, 2);
        assert!(!cli.config().unwrap().enable_diskcache);
    }

    #[test]
    fn quiet_disables_progress() {
        let quiet = parse(&args(&["artistools", "-q", "estimators"])).unwrap().unwrap();
        assert!(quiet.config().unwrap().disable_progress);

        let loud = parse(&args(&["artistools", "estimators"])).unwrap().unwrap();
        assert!(!loud.config().unwrap().disable_progress);
    }

    #[test]
    fn bad_arguments_are_usage_errors() {
        let error = parse(&args(&["artistools", "nosuchcommand"])).unwrap_err();
        assert!(matches!(error, Error::Usage(_)));
        assert_eq!(error.exit_code(), 2);
    }

    #[test]
    fn listing_has_every_command() {
        let listing = command_listing();
        assert!(listing.starts_with("artistools provides the following commands:"));
        for name in ["timesteptimes", "describeinputmodel", "writecodecomparisondata", "cache"] {
            assert!(listing.contains(name), "{name} missing");
        }
    }
}
