use clap::Parser;
use ferrous_resolv_domain::DEFAULT_RESOLV_CONF;
use std::process::ExitCode;
use tracing::{info, warn};

mod bootstrap;
mod output;

use output::{LookupKind, LookupOutput};

#[derive(Parser)]
#[command(name = "ferrous-resolv")]
#[command(version = "0.1.0")]
#[command(about = "Ferrous Resolv - Stub DNS resolver with forged reply filtering")]
struct Cli {
    /// Resolver configuration file path
    #[arg(short = 'c', long, value_name = "FILE")]
    config: Option<String>,

    /// Record type to look up
    #[arg(short = 't', long = "type", value_enum, default_value_t = LookupKind::Ip)]
    kind: LookupKind,

    /// Print one JSON object per name instead of tab separated lines
    #[arg(long)]
    json: bool,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long)]
    log_level: Option<String>,

    /// Names to resolve
    #[arg(required = true, value_name = "NAME")]
    names: Vec<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();

    bootstrap::init_logging(cli.log_level.as_deref());

    let resolver = bootstrap::load_resolver(cli.config.as_deref())?;
    info!(
        config = cli.config.as_deref().unwrap_or(DEFAULT_RESOLV_CONF),
        names = cli.names.len(),
        "Resolving"
    );

    let mut failures = 0usize;

    for name in &cli.names {
        let result = output::resolve(&resolver, name, cli.kind).await;
        if let Err(e) = &result {
            warn!(name = %name, error = %e, "Lookup failed");
            failures += 1;
        }

        let line = LookupOutput::new(name, cli.kind, result);
        if cli.json {
            println!("{}", serde_json::to_string(&line)?);
        } else {
            println!("{}", line.to_text());
        }
    }

    if failures > 0 {
        return Ok(ExitCode::FAILURE);
    }
    Ok(ExitCode::SUCCESS)
}
