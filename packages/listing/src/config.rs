//! Dashboard configuration.
//!
//! [`ListingConfig`] is read from TOML. Every key is optional; anything
//! omitted falls back to the compiled-in defaults, which are also shipped
//! as `config/default.toml` for reference.

use std::path::{Path, PathBuf};

use lima_housing_listing_models::{DistrictFilter, FilterSpec, SortKey};
use serde::{Deserialize, Serialize};

/// Hard upper bound on the number of cards in a single view.
pub const MAX_DISPLAYED_CAP: usize = 20;

/// Errors that can occur while loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The configuration file could not be read.
    #[error("I/O error reading {path}: {source}")]
    Io {
        /// File that could not be read.
        path: PathBuf,
        /// Underlying error.
        source: std::io::Error,
    },

    /// The configuration file is not valid TOML or has wrongly typed keys.
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),
}

/// Dashboard defaults and ingestion settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ListingConfig {
    /// Cards shown per view; clamped to [`MAX_DISPLAYED_CAP`].
    pub max_displayed: usize,
    /// Sort key applied when the user has not picked one.
    pub default_sort: SortKey,
    /// Default price ceiling.
    pub default_max_price: f64,
    /// Default final score floor.
    pub default_min_score: f64,
    /// Length of the district ranking.
    pub top_districts: usize,
    /// Length of the best-value list.
    pub best_value_count: usize,
    /// Soles per US dollar for prices quoted in USD.
    pub usd_exchange_rate: f64,
    /// District assigned when none can be determined.
    pub unknown_district: String,
    /// Column header aliases.
    pub fields: FieldMapping,
}

impl Default for ListingConfig {
    fn default() -> Self {
        Self {
            max_displayed: MAX_DISPLAYED_CAP,
            default_sort: SortKey::Score,
            default_max_price: 10_000.0,
            default_min_score: 0.0,
            top_districts: 5,
            best_value_count: 5,
            usd_exchange_rate: 3.7,
            unknown_district: "Unknown".to_owned(),
            fields: FieldMapping::default(),
        }
    }
}

impl ListingConfig {
    /// Parses a configuration from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Toml`] if the TOML is malformed or a key has
    /// the wrong type.
    pub fn from_toml_str(toml_str: &str) -> Result<Self, ConfigError> {
        Ok(toml::de::from_str(toml_str)?)
    }

    /// Loads a configuration file, or the defaults when `path` is `None`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the file cannot be read or parsed.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let Some(path) = path else {
            return Ok(Self::default());
        };

        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        let config = Self::from_toml_str(&contents)?;
        log::debug!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    /// Number of cards a view may show.
    #[must_use]
    pub fn display_cap(&self) -> usize {
        self.max_displayed.min(MAX_DISPLAYED_CAP)
    }

    /// Filter the dashboard starts with.
    #[must_use]
    pub const fn default_filter(&self) -> FilterSpec {
        FilterSpec {
            district: DistrictFilter::All,
            max_price: self.default_max_price,
            min_score: self.default_min_score,
            min_bedrooms: 0,
            sort_key: self.default_sort,
        }
    }
}

/// Maps canonical record fields to CSV column headers.
///
/// Each field lists candidate headers tried in order; the first one with a
/// non-empty value wins.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FieldMapping {
    /// Listing identifier.
    pub id: Vec<String>,
    /// Listing headline.
    pub title: Vec<String>,
    /// Address or free-form location.
    pub location: Vec<String>,
    /// District supplied directly.
    pub district: Vec<String>,
    /// Rent.
    pub price: Vec<String>,
    /// Floor area.
    pub area: Vec<String>,
    /// Bedroom count.
    pub bedrooms: Vec<String>,
    /// Bathroom count.
    pub bathrooms: Vec<String>,
    /// Affordability sub-score.
    pub cost_score: Vec<String>,
    /// Safety sub-score.
    pub safety_score: Vec<String>,
    /// Services sub-score.
    pub services_score: Vec<String>,
    /// Composite score.
    pub final_score: Vec<String>,
    /// Parking flag.
    pub parking: Vec<String>,
    /// Furnished flag.
    pub furnished: Vec<String>,
    /// Pet-friendly flag.
    pub pet_friendly: Vec<String>,
    /// Provenance tag.
    pub source: Vec<String>,
    /// Publication date.
    pub listed_on: Vec<String>,
    /// Listing link.
    pub url: Vec<String>,
}

fn names(headers: &[&str]) -> Vec<String> {
    headers.iter().map(|h| (*h).to_owned()).collect()
}

impl Default for FieldMapping {
    fn default() -> Self {
        Self {
            id: names(&["id"]),
            title: names(&["title", "description"]),
            location: names(&["location", "address"]),
            district: names(&["district"]),
            price: names(&["price_clean", "price_soles", "price"]),
            area: names(&["area_clean", "area_m2", "area"]),
            bedrooms: names(&["bedroom_clean", "bedrooms", "bedroom"]),
            bathrooms: names(&["bathroom_clean", "bathrooms", "bathroom"]),
            cost_score: names(&["cost_score"]),
            safety_score: names(&["safety_score"]),
            services_score: names(&["services_score"]),
            final_score: names(&["final_score"]),
            parking: names(&["parking"]),
            furnished: names(&["furnished"]),
            pet_friendly: names(&["pet_friendly"]),
            source: names(&["source"]),
            listed_on: names(&["date_pub", "created_date", "scraped_date"]),
            url: names(&["url"]),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SHIPPED_DEFAULTS: &str = include_str!("../config/default.toml");

    #[test]
    fn shipped_defaults_match_compiled_defaults() {
        let parsed = ListingConfig::from_toml_str(SHIPPED_DEFAULTS).unwrap();
        assert_eq!(parsed, ListingConfig::default());
    }

    #[test]
    fn empty_toml_yields_defaults() {
        assert_eq!(
            ListingConfig::from_toml_str("").unwrap(),
            ListingConfig::default()
        );
    }

    #[test]
    fn partial_override_keeps_other_defaults() {
        let config = ListingConfig::from_toml_str(
            "default_sort = \"price-asc\"\nusd_exchange_rate = 3.8\n[fields]\nprice = [\"precio\"]\n",
        )
        .unwrap();
        assert_eq!(config.default_sort, SortKey::PriceAsc);
        assert!((config.usd_exchange_rate - 3.8).abs() < f64::EPSILON);
        assert_eq!(config.fields.price, vec!["precio".to_owned()]);
        assert_eq!(config.fields.area, FieldMapping::default().area);
        assert_eq!(config.max_displayed, MAX_DISPLAYED_CAP);
    }

    #[test]
    fn display_cap_never_exceeds_twenty() {
        let config = ListingConfig {
            max_displayed: 50,
            ..ListingConfig::default()
        };
        assert_eq!(config.display_cap(), MAX_DISPLAYED_CAP);

        let config = ListingConfig {
            max_displayed: 8,
            ..ListingConfig::default()
        };
        assert_eq!(config.display_cap(), 8);
    }

    #[test]
    fn default_filter_uses_configured_thresholds() {
        let config = ListingConfig {
            default_max_price: 3000.0,
            default_min_score: 7.0,
            ..ListingConfig::default()
        };
        let filter = config.default_filter();
        assert_eq!(filter.district, DistrictFilter::All);
        assert!((filter.max_price - 3000.0).abs() < f64::EPSILON);
        assert!((filter.min_score - 7.0).abs() < f64::EPSILON);
        assert_eq!(filter.min_bedrooms, 0);
    }

    #[test]
    fn rejects_wrongly_typed_key() {
        assert!(matches!(
            ListingConfig::from_toml_str("max_displayed = \"lots\""),
            Err(ConfigError::Toml(_))
        ));
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let err = ListingConfig::load(Some(Path::new("/no/such/lima_housing.toml"))).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
        assert!(
            err.to_string()
                .starts_with("I/O error reading /no/such/lima_housing.toml: ")
        );
    }
}
