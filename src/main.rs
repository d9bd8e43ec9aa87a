// src/main.rs
// =============================================================================
// This is the entry point of our CLI application.
//
// What happens here:
// 1. Parse command-line arguments using clap
// 2. Set up logging (tracing, filtered by RUST_LOG)
// 3. Collect the target domains from -d and/or -i
// 4. Run the scan and write what we found
// 5. Exit with proper code (0 = done, 2 = bad configuration or output error)
//
// A domain that crt.sh never answers for is NOT an error: it is logged and
// the run carries on with the others.
// =============================================================================

mod cli;
mod config;
mod crtsh;
mod output;
mod scan;

use anyhow::{bail, Result};
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use cli::Cli;
use config::{collect_domains, ScanConfig};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let exit_code = match run(cli).await {
        Ok(()) => 0,
        Err(e) => {
            tracing::error!("{:#}", e);
            2
        }
    };

    std::process::exit(exit_code);
}

fn init_logging(verbose: bool) {
    let default_filter = if verbose { "debug" } else { "info" };

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| default_filter.into()))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

async fn run(cli: Cli) -> Result<()> {
    let domains = collect_domains(cli.input.as_deref(), &cli.domains)?;
    if domains.is_empty() {
        bail!("no domains provided, use -d/--domains or -i/--input");
    }

    let config = ScanConfig::new(domains, cli.output).with_concurrency(cli.threads);
    let found = scan::run(&config).await?;

    tracing::info!(
        unique = found.len(),
        domains = config.domains.len(),
        empty_domains = found.empty_domains(),
        "scan complete"
    );

    if found.is_empty() {
        tracing::warn!("no subdomains found, writing an empty file");
    }

    output::save_subdomains(&config.output, &found).await?;
    Ok(())
}
