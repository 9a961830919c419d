//! Example service resolving its settings from a config file and
//! `BILLING_*` environment variables.
//!
//! ```text
//! BILLING_WORKERS=8 BILLING_LOG_LEVEL=debug cargo run --example service -- --config billing.yaml
//! ```

use clap::Parser;
use serde::{Deserialize, Serialize};
use tiered_config::{ConfigResult, RootArgs, TieredConfig};
use tracing::{debug, info};

/// Settings that belong to this service only.
#[derive(Clone, Debug, Deserialize, PartialEq, Eq, Serialize)]
#[serde(default)]
struct ServiceConfig {
    listen: String,
    workers: u16,
    upstreams: Vec<String>,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            listen: String::from("127.0.0.1:8080"),
            workers: 4,
            upstreams: Vec::new(),
        }
    }
}

impl TieredConfig for ServiceConfig {
    fn replaced_maps() -> &'static [&'static str] {
        &[]
    }
}

#[derive(Debug, Parser)]
#[command(name = "billing", about = "Runs the billing service")]
struct Cli {
    #[command(flatten)]
    root: RootArgs,
    /// Print the resolved configuration and exit.
    #[arg(long)]
    check: bool,
}

fn main() -> ConfigResult<()> {
    let cli = Cli::parse();
    let mut service = ServiceConfig::default();
    let configured = cli.root.setup(&mut service, "billing", None)?;
    configured.logger.install()?;

    debug!(config = ?configured.config, "resolved standard sections");
    info!(
        listen = %service.listen,
        workers = service.workers,
        upstreams = service.upstreams.len(),
        check = cli.check,
        "billing service configured"
    );
    Ok(())
}
