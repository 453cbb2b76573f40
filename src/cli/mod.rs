pub mod commands;

use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "fishysearch")]
#[command(about = "Aggregates shop catalogs into one dated JSON file", long_about = None)]
pub struct Cli {
    /// Settings file (toml, json or yaml)
    #[arg(short, long, global = true)]
    pub settings: Option<PathBuf>,

    /// Shop configuration file, overrides paths.config_path
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Results directory, overrides paths.results_dir
    #[arg(short, long, global = true)]
    pub results_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug, PartialEq)]
pub enum Commands {
    /// Aggregate every configured shop into today's result file (default)
    Run,
    /// Validate the shop configuration without fetching anything
    Check,
    /// Summarise a stored daily result
    Summary {
        /// Day to read as YYMMDD (default: today)
        #[arg(short, long, value_parser = parse_short_date)]
        date: Option<NaiveDate>,
    },
}

pub fn parse_short_date(raw: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(raw, "%y%m%d").map_err(|e| format!("expected YYMMDD: {}", e))
}
