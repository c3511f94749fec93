//! Interactive dashboard.
//!
//! Provides a menu-driven interface using `dialoguer`: browse the cards
//! for the current filter, change filters, view statistics, or reload the
//! source. A failed load is reported with a retry prompt instead of
//! ending the session.

use dialoguer::{Confirm, Input, Select};
use lima_housing_cli_utils::{MultiProgress, SpinnerProgress};
use lima_housing_listing::{DashboardSession, ListingError};
use lima_housing_listing_models::{DistrictFilter, FilterSpec, SortKey};
use lima_housing_source::ListingSource;

use crate::render;

/// Top-level actions of the dashboard menu.
enum DashboardAction {
    Browse,
    ChangeFilters,
    ResetFilters,
    Statistics,
    Reload,
    Quit,
}

impl DashboardAction {
    const ALL: &[Self] = &[
        Self::Browse,
        Self::ChangeFilters,
        Self::ResetFilters,
        Self::Statistics,
        Self::Reload,
        Self::Quit,
    ];

    #[must_use]
    const fn label(&self) -> &'static str {
        match self {
            Self::Browse => "Browse listings",
            Self::ChangeFilters => "Change filters",
            Self::ResetFilters => "Reset filters",
            Self::Statistics => "Statistics",
            Self::Reload => "Reload data",
            Self::Quit => "Quit",
        }
    }
}

/// Loads the source, offering a retry after each failure.
///
/// Returns `false` if the user declined to retry.
async fn load_with_retry(
    multi: &MultiProgress,
    session: &mut DashboardSession,
    source: &dyn ListingSource,
) -> Result<bool, Box<dyn std::error::Error>> {
    loop {
        let progress = SpinnerProgress::start(multi, &source.label());
        match session.load(source, progress).await {
            Ok(count) => {
                log::info!("Loaded {count} listings from {}", source.id());
                if let Some(collection) = session.collection() {
                    println!(
                        "{count} listings from {} as of {}",
                        source.label(),
                        collection.loaded_at.format("%Y-%m-%d %H:%M UTC")
                    );
                }
                return Ok(true);
            }
            Err(e @ ListingError::SourceUnavailable { .. }) => {
                print!("{}", render::view(&session.view(&session.default_filter())));
                log::warn!("{e}");

                let retry = Confirm::new()
                    .with_prompt("Retry loading?")
                    .default(true)
                    .interact()?;
                if !retry {
                    return Ok(false);
                }
            }
            Err(e) => return Err(e.into()),
        }
    }
}

/// Runs the interactive dashboard until the user quits.
///
/// # Errors
///
/// Returns an error if a prompt cannot be shown.
pub async fn run(
    multi: &MultiProgress,
    session: &mut DashboardSession,
    source: &dyn ListingSource,
) -> Result<(), Box<dyn std::error::Error>> {
    println!("Lima Housing Dashboard");
    println!();

    if !load_with_retry(multi, session, source).await? {
        return Ok(());
    }

    let mut spec = session.default_filter();
    let labels: Vec<&str> = DashboardAction::ALL
        .iter()
        .map(DashboardAction::label)
        .collect();

    loop {
        println!();
        println!("Filter: {}", describe(&spec));

        let idx = Select::new()
            .with_prompt("What would you like to do?")
            .items(&labels)
            .default(0)
            .interact()?;

        match DashboardAction::ALL[idx] {
            DashboardAction::Browse => print!("{}", render::view(&session.view(&spec))),
            DashboardAction::ChangeFilters => spec = prompt_filters(session, &spec)?,
            DashboardAction::ResetFilters => spec = session.default_filter(),
            DashboardAction::Statistics => match session.stats() {
                Some(summary) => print!("{}", render::stats(&summary)),
                None => print!("{}", render::view(&session.view(&spec))),
            },
            DashboardAction::Reload => {
                if !load_with_retry(multi, session, source).await? {
                    return Ok(());
                }
            }
            DashboardAction::Quit => return Ok(()),
        }
    }
}

/// One-line summary of a filter.
fn describe(spec: &FilterSpec) -> String {
    let mut parts = vec![
        format!("district {}", spec.district),
        format!("price ≤ {}", render::soles(spec.max_price)),
        format!("score ≥ {:.1}", spec.min_score),
    ];
    if spec.min_bedrooms > 0 {
        parts.push(format!("{}+ bedrooms", spec.min_bedrooms));
    }
    parts.push(format!("sorted by {}", spec.sort_key.label().to_lowercase()));
    parts.join(", ")
}

/// Walks the user through every filter field, starting from `current`.
fn prompt_filters(
    session: &DashboardSession,
    current: &FilterSpec,
) -> Result<FilterSpec, Box<dyn std::error::Error>> {
    let districts = session.districts();
    let mut district_labels = vec!["All districts"];
    district_labels.extend(districts.iter().copied());

    let current_district = match &current.district {
        DistrictFilter::All => 0,
        DistrictFilter::Named(name) => districts
            .iter()
            .position(|d| *d == name.as_str())
            .map_or(0, |i| i + 1),
    };

    let district_idx = Select::new()
        .with_prompt("District")
        .items(&district_labels)
        .default(current_district)
        .max_length(15)
        .interact()?;
    let district = if district_idx == 0 {
        DistrictFilter::All
    } else {
        DistrictFilter::Named(districts[district_idx - 1].to_owned())
    };

    let max_price: f64 = Input::new()
        .with_prompt("Maximum price (S/.)")
        .default(current.max_price)
        .interact_text()?;

    let min_score: f64 = Input::new()
        .with_prompt("Minimum score (0-10)")
        .default(current.min_score)
        .validate_with(|s: &f64| {
            if (0.0..=10.0).contains(s) {
                Ok(())
            } else {
                Err("score must be between 0 and 10")
            }
        })
        .interact_text()?;

    let min_bedrooms: u32 = Input::new()
        .with_prompt("Minimum bedrooms (0 = any)")
        .default(current.min_bedrooms)
        .interact_text()?;

    let sort_labels: Vec<&str> = SortKey::all().iter().map(|k| k.label()).collect();
    let current_sort = SortKey::all()
        .iter()
        .position(|k| *k == current.sort_key)
        .unwrap_or(0);
    let sort_idx = Select::new()
        .with_prompt("Sort by")
        .items(&sort_labels)
        .default(current_sort)
        .interact()?;

    Ok(FilterSpec {
        district,
        max_price,
        min_score,
        min_bedrooms,
        sort_key: SortKey::all()[sort_idx],
    })
}
