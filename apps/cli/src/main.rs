#![allow(clippy::print_stdout, clippy::print_stderr)]

pub mod handlers;
pub mod models;

use crate::handlers::{check, give, inspect, recipes};
use crate::models::args::{Cli, Commands};
use anyhow::{Context, Result};
use clap::Parser;
use zitems::domain::config::ZItemsConfig;
use zitems::domain::instance::Overrides;
use zitems::kernel::config::load_config;
use zitems_logger::{ConsoleTarget, LevelFilter, Logger};

fn main() -> Result<()> {
    let cli = Cli::parse();

    let _logger = Logger::builder()
        .name(env!("CARGO_PKG_NAME"))
        .console_target(ConsoleTarget::Stderr)
        .ansi(false)
        .level(LevelFilter::WARN)
        .debug(cli.verbose)
        .init()?;

    let config: ZItemsConfig = load_config(cli.config.as_deref()).context("Configuration is malformed")?;

    match cli.command {
        Commands::Check { dir } => check::check_definitions(&config, &dir)?,
        Commands::Recipes { dir } => recipes::list_recipes(&config, &dir)?,
        Commands::Give { dir, key, amount, attributes, enchantments, effects } => {
            let overrides = Overrides {
                attributes: attributes.into_iter().collect(),
                enchantments: enchantments.into_iter().collect(),
                effects,
            };
            give::give_item(&config, &dir, &key, amount, overrides)?;
        },
        Commands::Inspect { dir, hex } => inspect::inspect_item(&config, &dir, &hex)?,
    }

    Ok(())
}
