mod menu;
mod render;

use std::io;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use crate::application::LedgerService;

pub use menu::Menu;
pub use render::{Listing, OutputFormat, write_listing};

/// Tellerbook - in-memory banking ledger
#[derive(Parser, Debug)]
#[command(name = "tellerbook")]
#[command(about = "An in-memory banking ledger driven by an interactive teller menu")]
#[command(version)]
pub struct Cli {
    /// Enable debug logging (written to stderr)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Log filter directive, e.g. "info" or "tellerbook=debug" (overrides RUST_LOG)
    #[arg(long)]
    pub log_level: Option<String>,

    /// Output format for customer, account, transaction and beneficiary lists
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Table)]
    pub format: OutputFormat,
}

impl Cli {
    /// Pick the log filter: explicit flag, then --verbose, then RUST_LOG, then "warn".
    fn log_filter(&self) -> Result<EnvFilter> {
        if let Some(directive) = &self.log_level {
            return EnvFilter::try_new(directive)
                .with_context(|| format!("Invalid log level '{}'", directive));
        }
        if self.verbose {
            return Ok(EnvFilter::new("debug"));
        }
        Ok(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
    }

    fn init_logging(&self) -> Result<()> {
        tracing_subscriber::fmt()
            .with_env_filter(self.log_filter()?)
            .with_writer(io::stderr)
            .try_init()
            .map_err(|err| anyhow::anyhow!("Failed to initialize logging: {}", err))
    }

    pub fn run(self) -> Result<()> {
        self.init_logging()?;
        tracing::info!("Starting teller menu");

        let stdin = io::stdin();
        let stdout = io::stdout();
        let mut menu = Menu::new(LedgerService::new(), stdin.lock(), stdout.lock())
            .with_format(self.format);
        menu.run()
    }
}
