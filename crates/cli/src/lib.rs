//! Command line interface to the artistools readers
#![doc = include_str!("../readme.md")]

// Split into subfiles for development, but anything important is re-exported
mod aliases;
mod cli;
mod commands;
mod error;
mod output;

// Inline the important types and helpers for a nice public API
#[doc(inline)]
pub use aliases::command_alias_from_program_name;

#[doc(inline)]
pub use output::value;

#[doc(inline)]
pub use error::{Error, Result};

/// Run with the process arguments, returning the exit code
///
/// Errors are logged before returning a non-zero code.
pub fn run_from_env() -> i32 {
    let mut args = std::env::args();
    let program_name = args.next().unwrap_or_else(|| "artistools".to_string());
    let remaining = args.collect::<Vec<String>>();

    match run_with_program_name(&program_name, remaining) {
        Ok(()) => 0,
        Err(Error::Usage(message)) => {
            eprint!("{message}");
            2
        }
        Err(error) => {
            use std::error::Error as _;
            log::error!("{error}");
            let mut source = error.source();
            while let Some(cause) = source {
                log::error!("  caused by: {cause}");
                source = cause.source();
            }
            error.exit_code()
        }
    }
}

/// Run with arguments that do not include the program name
pub fn run<I, S>(args: I) -> Result<()>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    run_with_program_name("artistools", args.into_iter().map(Into::into).collect())
}

fn run_with_program_name(program_name: &str, args: Vec<String>) -> Result<()> {
    let full_args = cli::full_args(program_name, args);
    let Some(parsed) = cli::parse(&full_args)? else {
        return Ok(());
    };

    logging_init(parsed.verbose + 2, parsed.quiet);

    let Some(command) = &parsed.command else {
        println!("{}", cli::command_listing());
        return Ok(());
    };

    let config = parsed.config()?;
    cli::dispatch(command, &config)
}

/// Sets up logging at runtime to allow for multiple verbosity levels
fn logging_init(verbosity: u8, quiet: bool) {
    let result = stderrlog::new()
        .modules(vec![
            module_path!(),
            "artistools_utils",
            "artistools_cache",
            "artistools_model",
            "artistools_inputmodel",
            "artistools_atomic",
            "artistools_estimators",
            "artistools_spectra",
            "artistools_codecomparison",
        ])
        .quiet(quiet)
        .verbosity(verbosity as usize)
        .show_level(false)
        .color(stderrlog::ColorChoice::Never)
        .timestamp(stderrlog::Timestamp::Off)
        .init();

    // a logger is already set when running more than once in a process
    if result.is_err() {
        log::debug!("Logger already initialised");
    }
}
