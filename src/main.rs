use anyhow::Result;
use clap::Parser;
use tellerbook::cli::Cli;

fn main() -> Result<()> {
    let cli = Cli::parse();
    cli.run()
}
