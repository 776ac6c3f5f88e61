use tracing_subscriber::EnvFilter;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_target(false)
        .init();

    if let Err(err) = modelgen::cli::run_cli() {
        eprintln!("❌ {err:#}");
        std::process::exit(1);
    }
}
