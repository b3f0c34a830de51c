use anyhow::Result;
use cbeta_reader_config::Config;
use clap::Parser;
use std::{io::stdout, process};

mod commands;

use commands::{Cli, run};

fn main() -> Result<()> {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();

    let cli = Cli::parse();

    let (config_path, loaded) = match &cli.config {
        Some(path) => (path.clone(), Config::load_from_path(path)),
        None => (Config::config_path(), Config::load()),
    };
    let config = match loaded {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: Failed to load config file: {e}");
            process::exit(1);
        }
    };
    match &config {
        Some(_) => log::debug!("Using config from {}", config_path.display()),
        None => log::debug!("No config file at {}, using defaults", config_path.display()),
    }

    run(&cli.command, config.as_ref(), &config_path, &mut stdout().lock())
}
