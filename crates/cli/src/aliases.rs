//! Program names that select a subcommand

// standard library
use std::path::Path;

/// Names of the main binary, which never imply a subcommand
const MAIN_NAMES: [&str; 2] = ["artistools", "at"];

/// Prefixes of the per-command program names
const PREFIXES: [&str; 3] = ["artistools-", "plotartis", "makeartismodel"];

/// Program names that do not follow the prefix pattern
const SPECIAL: [(&str, &str); 1] = [("listartistimesteps", "timesteptimes")];

/// Subcommand implied by the name the binary was invoked with
///
/// Symlinks such as `plotartisspectrum` or `artistools-estimators` run the
/// matching subcommand. Whether the subcommand exists is left to the caller.
///
/// ```rust
/// # use artistools_cli::command_alias_from_program_name;
/// let alias = command_alias_from_program_name("/usr/bin/plotartisspectrum");
/// assert_eq!(alias.as_deref(), Some("spectrum"));
/// assert_eq!(command_alias_from_program_name("artistools"), None);
/// ```
pub fn command_alias_from_program_name(program_name: &str) -> Option<String> {
    let executable_name = Path::new(program_name)
        .file_name()
        .and_then(|name| name.to_str())
        .unwrap_or(program_name);
    let normalized = executable_name
        .strip_suffix(".exe")
        .unwrap_or(executable_name);

    if MAIN_NAMES.contains(&normalized) {
        return None;
    }

    if let Some((_, command)) = SPECIAL.iter().find(|(name, _)| *name == normalized) {
        return Some(command.to_string());
    }

    PREFIXES
        .iter()
        .find_map(|prefix| normalized.strip_prefix(prefix))
        .filter(|command| !command.is_empty())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("artistools-timesteptimes", Some("timesteptimes"))]
    #[case("listartistimesteps", Some("timesteptimes"))]
    #[case("plotartisdeposition", Some("deposition"))]
    #[case("makeartismodelscalevelocity", Some("scalevelocity"))]
    #[case("makeartismodelfullymixed", Some("fullymixed"))]
    #[case("./target/release/artistools-estimators.exe", Some("estimators"))]
    #[case("at", None)]
    #[case("artistools.exe", None)]
    #[case("artistools-", None)]
    #[case("something-else", None)]
    fn program_names(#[case] program_name: &str, #[case] expected: Option<&str>) {
        assert_eq!(
            command_alias_from_program_name(program_name),
            expected.map(str::to_string)
        );
    }
}
