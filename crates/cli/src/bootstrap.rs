use anyhow::Context;
use ferrous_resolv_infrastructure::dns::resolver::system_resolver;
use ferrous_resolv_infrastructure::dns::StubResolver;
use tracing::Level;
use tracing_subscriber::EnvFilter;

/// Logs go to stderr so stdout carries only results.
///
/// `RUST_LOG` directives are honoured on top of the chosen level.
pub fn init_logging(log_level: Option<&str>) {
    let level = match log_level.map(str::to_ascii_lowercase).as_deref() {
        Some("trace") => Level::TRACE,
        Some("debug") => Level::DEBUG,
        Some("info") => Level::INFO,
        Some("error") => Level::ERROR,
        _ => Level::WARN,
    };

    let filter = EnvFilter::from_default_env().add_directive(level.into());

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init()
        .ok();
}

/// Explicit file if given, otherwise the process-wide resolver.
pub fn load_resolver(path: Option<&str>) -> anyhow::Result<StubResolver> {
    match path {
        Some(path) => StubResolver::from_file(path)
            .with_context(|| format!("Failed to load resolver configuration from {}", path)),
        None => system_resolver()
            .cloned()
            .context("Failed to load system resolver configuration"),
    }
}
