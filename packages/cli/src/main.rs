#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Command line entry point for the Lima housing dashboard.
//!
//! With a subcommand the dashboard runs once and prints listings,
//! statistics or districts. Without one it starts the interactive
//! dashboard.
//!
//! Uses `indicatif-log-bridge` (via [`lima_housing_cli_utils::init_logger`])
//! to route `log` output through `indicatif::MultiProgress` so that log
//! lines and the load spinner never fight for the terminal.

mod interactive;
mod render;

use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use lima_housing_cli_utils::{MultiProgress, SpinnerProgress};
use lima_housing_listing::{DashboardSession, ListingConfig, ListingError};
use lima_housing_listing_models::{DistrictFilter, FilterSpec, SortKey};
use lima_housing_source::progress::LoadProgress;
use lima_housing_source::{ListingSource, source_from_spec};

#[derive(Parser)]
#[command(name = "lima_housing_cli", about = "Lima rental listings dashboard")]
struct Cli {
    /// Listing source: `sample`, a CSV file path, or an http(s) URL to a CSV
    #[arg(long, global = true, default_value = "sample")]
    source: String,
    /// TOML configuration file overriding the defaults
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the listings matching a filter
    List {
        /// Only show this district ("all" for every district)
        #[arg(long)]
        district: Option<String>,
        /// Maximum monthly rent in soles
        #[arg(long)]
        max_price: Option<f64>,
        /// Minimum final score
        #[arg(long)]
        min_score: Option<f64>,
        /// Minimum number of bedrooms (0 = any)
        #[arg(long)]
        min_bedrooms: Option<u32>,
        /// Sort order: score, price-asc, price-desc, area, district
        #[arg(long)]
        sort: Option<SortKey>,
        /// Print the view as JSON
        #[arg(long)]
        json: bool,
    },
    /// Print global statistics, top districts and best value listings
    Stats {
        /// Print the statistics as JSON
        #[arg(long)]
        json: bool,
    },
    /// Print the districts present in the data
    Districts,
}

/// Loads `source` into `session`, drawing a spinner unless `quiet`.
async fn load(
    session: &mut DashboardSession,
    source: &dyn ListingSource,
    multi: &MultiProgress,
    quiet: bool,
) -> Result<usize, ListingError> {
    let progress: Arc<dyn LoadProgress> = if quiet {
        Arc::new(SpinnerProgress::hidden(&source.label()))
    } else {
        SpinnerProgress::start(multi, &source.label())
    };
    session.load(source, progress).await
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let multi = lima_housing_cli_utils::init_logger();
    let cli = Cli::parse();

    let config = ListingConfig::load(cli.config.as_deref()).map_err(ListingError::from)?;
    let mut session = DashboardSession::new(config);
    let source = source_from_spec(&cli.source);

    let Some(command) = cli.command else {
        return interactive::run(&multi, &mut session, source.as_ref()).await;
    };

    match command {
        Commands::List {
            district,
            max_price,
            min_score,
            min_bedrooms,
            sort,
            json,
        } => {
            load(&mut session, source.as_ref(), &multi, json).await?;

            let defaults = session.default_filter();
            let spec = FilterSpec {
                district: district
                    .as_deref()
                    .map_or(DistrictFilter::All, DistrictFilter::from),
                max_price: max_price.unwrap_or(defaults.max_price),
                min_score: min_score.unwrap_or(defaults.min_score),
                min_bedrooms: min_bedrooms.unwrap_or(defaults.min_bedrooms),
                sort_key: sort.unwrap_or(defaults.sort_key),
            };
            log::debug!("Applying filter {spec:?}");

            let view = session.view(&spec);
            if json {
                println!("{}", serde_json::to_string_pretty(&view)?);
            } else {
                print!("{}", render::view(&view));
            }
        }
        Commands::Stats { json } => {
            load(&mut session, source.as_ref(), &multi, json).await?;
            let summary = session.stats().ok_or(ListingError::NotLoaded)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&summary)?);
            } else {
                print!("{}", render::stats(&summary));
            }
        }
        Commands::Districts => {
            load(&mut session, source.as_ref(), &multi, false).await?;
            for district in session.districts() {
                println!("{district}");
            }
        }
    }

    Ok(())
}
