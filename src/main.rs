//! # Butterfly-narrate CLI
//!
//! Renders routes from the command line:
//!   butterfly-narrate render --network net.json --route route.json
//!   butterfly-narrate render -n net.json -r route.json --format length
//!   butterfly-narrate decode-hint <token>
//!   butterfly-narrate checksum --network net.json

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

mod cli;

use cli::Cli;

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose, cli.log_json);

    if let Err(e) = run(cli) {
        tracing::error!("{e:#}");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    cli.run()
}

/// Logs go to stderr so rendered documents can be piped from stdout
fn init_tracing(verbose: bool, json: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("butterfly_narrate={default_level}")));

    let registry = tracing_subscriber::registry().with(filter);
    if json {
        registry
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        registry
            .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
            .init();
    }
}
