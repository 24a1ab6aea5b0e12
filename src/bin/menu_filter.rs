//! Menu filter
//!
//! Prints the beers in a menu export whose name contains a needle
//! (`<name> - <brewery>`), then the total number of beers on the menu.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

use howardbot_deploy::config;
use howardbot_deploy::infrastructure::home::expand_home;
use howardbot_deploy::logging::init_logging;
use howardbot_deploy::menu;
use howardbot_deploy::presentation::print_config_warnings;

/// Filter a beer menu export by name
#[derive(Parser, Debug)]
#[command(name = "menu-filter")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Menu JSON file (default: ~/Downloads/menu.json)
    #[arg(long, value_name = "FILE")]
    file: Option<PathBuf>,

    /// Case-sensitive substring to look for in beer names (default: ogether)
    #[arg(long, value_name = "TEXT")]
    contains: Option<String>,

    /// Config file providing the `[menu]` defaults
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Verbosity level (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let (settings, warnings) =
        config::resolve(cli.config.as_deref()).context("loading configuration")?;
    print_config_warnings(&warnings);
    let defaults = settings.menu;

    let file = match cli.file {
        Some(file) => expand_home(&file),
        None => defaults.menu_file(),
    };
    let needle = cli.contains.unwrap_or(defaults.contains);

    let items = menu::load(&file)?;
    for line in menu::filter(items, &needle).lines() {
        println!("{}", line);
    }
    Ok(())
}
