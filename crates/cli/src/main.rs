fn main() {
    std::process::exit(artistools_cli::run_from_env());
}
