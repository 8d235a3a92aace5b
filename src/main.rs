use anyhow::Result;
use clap::Parser;

use cuecraft::{cli, config, pipeline};

fn main() -> Result<()> {
    let args = cli::Args::parse();

    let cfg = config::Config::load(args.config.as_deref())?;
    config::init_tracing(&cfg.logging, args.log_level.as_deref())?;

    tracing::info!(version = env!("CARGO_PKG_VERSION"), "cuecraft starting");

    match args.command {
        cli::Command::Convert(cmd) => pipeline::run_convert(cmd, &cfg),
        cli::Command::Preview(cmd) => pipeline::run_preview(cmd, &cfg),
        cli::Command::Presets => {
            pipeline::run_presets(&cfg);
            Ok(())
        }
        cli::Command::PrintDefaultConfig => {
            let s = cfg.to_toml_pretty()?;
            print!("{s}");
            Ok(())
        }
    }
}
