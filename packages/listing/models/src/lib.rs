#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Property listing types shared across the Lima housing dashboard.
//!
//! Defines the normalized [`PropertyRecord`], the user-facing
//! [`FilterSpec`] and [`SortKey`], the [`ScoreBucket`] severity scale used
//! for presentation, and the view and statistics types handed to the
//! rendering layer.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

/// A field value that went through best-effort coercion.
///
/// Values that could not be coerced are kept verbatim so the rendering
/// layer can show them (or a placeholder) instead of a misleading zero.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Coerced<T> {
    /// The raw value was coerced successfully.
    Parsed(T),
    /// The raw value was present but not coercible.
    Unparsed(String),
    /// No value was supplied.
    Missing,
}

impl<T: Copy> Coerced<T> {
    /// Returns the coerced value, if any.
    #[must_use]
    pub const fn value(&self) -> Option<T> {
        match self {
            Self::Parsed(value) => Some(*value),
            Self::Unparsed(_) | Self::Missing => None,
        }
    }
}

impl<T> Coerced<T> {
    /// Returns `true` when no raw value was supplied at all.
    #[must_use]
    pub const fn is_missing(&self) -> bool {
        matches!(self, Self::Missing)
    }
}

impl<T> Default for Coerced<T> {
    fn default() -> Self {
        Self::Missing
    }
}

/// Where a record came from.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum RecordSource {
    /// Scraped from a live listings portal (authoritative).
    #[strum(to_string = "scraped", serialize = "urbania_real", serialize = "urbania")]
    Scraped,
    /// Generated sample data (synthetic).
    #[strum(to_string = "sample", serialize = "sample_data", serialize = "synthetic")]
    Sample,
    /// No or unrecognized provenance tag.
    Unknown,
}

impl RecordSource {
    /// Maps a free-form provenance tag to a [`RecordSource`].
    #[must_use]
    pub fn from_tag(tag: &str) -> Self {
        tag.trim().parse().unwrap_or(Self::Unknown)
    }

    /// Returns `true` for records that came from a real listings portal.
    #[must_use]
    pub const fn is_authoritative(self) -> bool {
        matches!(self, Self::Scraped)
    }
}

/// Independent amenity flags of a listing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Amenities {
    /// Has a parking space.
    pub parking: bool,
    /// Rented furnished.
    pub furnished: bool,
    /// Pets allowed.
    pub pet_friendly: bool,
}

/// A property listing normalized to the canonical shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PropertyRecord {
    /// Unique listing identifier.
    pub id: String,
    /// Listing headline, if the source provides one.
    pub title: Option<String>,
    /// Free-form address or location text.
    pub location: Option<String>,
    /// District used for filtering and grouping.
    pub district: String,
    /// Monthly rent in soles.
    pub price: Coerced<f64>,
    /// Floor area in square meters.
    pub area: Coerced<f64>,
    /// Derived price per square meter.
    pub price_per_area: Option<f64>,
    /// Number of bedrooms.
    pub bedrooms: Coerced<u32>,
    /// Number of bathrooms.
    pub bathrooms: Coerced<u32>,
    /// Affordability sub-score (0-10).
    pub cost_score: Coerced<f64>,
    /// Safety sub-score (0-10).
    pub safety_score: Coerced<f64>,
    /// Nearby services sub-score (0-10).
    pub services_score: Coerced<f64>,
    /// Composite score, supplied or derived from the sub-scores.
    pub final_score: Option<f64>,
    /// Amenity flags.
    pub amenities: Amenities,
    /// Provenance tag.
    pub source: RecordSource,
    /// Publication date of the listing.
    pub listed_on: Option<NaiveDate>,
    /// Link to the original listing.
    pub url: Option<String>,
}

impl PropertyRecord {
    /// Numeric price, if known.
    #[must_use]
    pub const fn price_value(&self) -> Option<f64> {
        self.price.value()
    }

    /// Numeric area, if known.
    #[must_use]
    pub const fn area_value(&self) -> Option<f64> {
        self.area.value()
    }

    /// Numeric bedroom count, if known.
    #[must_use]
    pub const fn bedroom_count(&self) -> Option<u32> {
        self.bedrooms.value()
    }
}

/// Presentation bucket for a final score.
///
/// Buckets are ordered from best to worst and cover the whole real line:
/// every score falls into exactly one bucket.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ScoreBucket {
    /// 8.5 and above
    Excellent,
    /// 7.0 up to 8.5
    Good,
    /// 5.5 up to 7.0
    Fair,
    /// 4.0 up to 5.5
    Low,
    /// Below 4.0
    Poor,
}

impl ScoreBucket {
    /// Inclusive lower bound of each bucket, best first. [`Self::Poor`]
    /// has no lower bound.
    pub const THRESHOLDS: &[(Self, f64)] = &[
        (Self::Excellent, 8.5),
        (Self::Good, 7.0),
        (Self::Fair, 5.5),
        (Self::Low, 4.0),
    ];

    /// Hex color used for the score badge.
    #[must_use]
    pub const fn color(self) -> &'static str {
        match self {
            Self::Excellent => "#4CAF50",
            Self::Good => "#8BC34A",
            Self::Fair => "#FFC107",
            Self::Low => "#FF9800",
            Self::Poor => "#F44336",
        }
    }

    /// Human-readable label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Excellent => "Excellent",
            Self::Good => "Good",
            Self::Fair => "Fair",
            Self::Low => "Low",
            Self::Poor => "Poor",
        }
    }

    /// Returns all variants, best first.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[Self::Excellent, Self::Good, Self::Fair, Self::Low, Self::Poor]
    }
}

/// Ordering applied to a filtered listing.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case", ascii_case_insensitive)]
pub enum SortKey {
    /// Final score, best first.
    #[default]
    #[strum(to_string = "score", serialize = "final_score")]
    Score,
    /// Price, cheapest first.
    PriceAsc,
    /// Price, most expensive first.
    PriceDesc,
    /// Area, largest first.
    #[strum(to_string = "area-desc", serialize = "area")]
    AreaDesc,
    /// District name, alphabetical.
    District,
}

impl SortKey {
    /// Returns all variants in menu order.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[
            Self::Score,
            Self::PriceAsc,
            Self::PriceDesc,
            Self::AreaDesc,
            Self::District,
        ]
    }

    /// Human-readable label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Score => "Best score",
            Self::PriceAsc => "Lowest price",
            Self::PriceDesc => "Highest price",
            Self::AreaDesc => "Largest area",
            Self::District => "District (A-Z)",
        }
    }
}

/// District constraint of a [`FilterSpec`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum DistrictFilter {
    /// Every district matches.
    #[default]
    All,
    /// Only the named district matches.
    Named(String),
}

impl From<&str> for DistrictFilter {
    fn from(value: &str) -> Self {
        let trimmed = value.trim();
        if trimmed.is_empty() || trimmed.eq_ignore_ascii_case("all") {
            Self::All
        } else {
            Self::Named(trimmed.to_string())
        }
    }
}

impl std::fmt::Display for DistrictFilter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::All => write!(f, "all"),
            Self::Named(name) => write!(f, "{name}"),
        }
    }
}

/// User-selected predicates and ordering for a listing view.
///
/// All predicates are conjunctive.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterSpec {
    /// District constraint.
    pub district: DistrictFilter,
    /// Inclusive price ceiling.
    pub max_price: f64,
    /// Inclusive final score floor.
    pub min_score: f64,
    /// Minimum bedrooms; `0` disables the constraint.
    pub min_bedrooms: u32,
    /// Ordering of the result.
    pub sort_key: SortKey,
}

impl Default for FilterSpec {
    fn default() -> Self {
        Self {
            district: DistrictFilter::All,
            max_price: 10_000.0,
            min_score: 0.0,
            min_bedrooms: 0,
            sort_key: SortKey::Score,
        }
    }
}

/// A display-ready listing card.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ListingCard<'a> {
    /// The underlying record from the master collection.
    #[serde(flatten)]
    pub record: &'a PropertyRecord,
    /// Presentation bucket of the final score, if the record has one.
    pub bucket: Option<ScoreBucket>,
}

/// What the presentation layer should render for the listing area.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "state", rename_all = "camelCase")]
pub enum DashboardView<'a> {
    /// Nothing has been loaded yet.
    Loading,
    /// The record source could not be obtained; offer a retry.
    #[serde(rename_all = "camelCase")]
    Unavailable {
        /// Why loading failed.
        reason: String,
    },
    /// The filter matched nothing.
    NoMatches,
    /// At least one record matched.
    #[serde(rename_all = "camelCase")]
    Listings {
        /// Matching cards in display order, capped.
        cards: Vec<ListingCard<'a>>,
        /// Number of matches before the display cap was applied.
        total_matches: usize,
    },
}

/// Headline statistics over the master collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GlobalStats {
    /// Number of records.
    pub count: usize,
    /// Mean final score, one decimal.
    pub mean_score: Option<f64>,
    /// Mean price, rounded to an integer.
    pub mean_price: Option<i64>,
    /// Mean area, rounded to an integer.
    pub mean_area: Option<i64>,
}

/// One entry of the district ranking.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DistrictRank {
    /// District name.
    pub district: String,
    /// Number of listings in the district.
    pub count: usize,
    /// Mean final score, one decimal.
    pub mean_score: f64,
    /// Mean price, rounded to an integer.
    pub mean_price: Option<i64>,
    /// Mean area, rounded to an integer.
    pub mean_area: Option<i64>,
    /// Highest final score in the district.
    pub best_score: f64,
}

/// A listing ranked by score per thousand soles of rent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValuePick {
    /// Listing identifier.
    pub id: String,
    /// District name.
    pub district: String,
    /// Rent in soles.
    pub price: f64,
    /// Final score.
    pub final_score: f64,
    /// `final_score / (price / 1000)`, two decimals.
    pub value_ratio: f64,
}

/// Statistics block of the dashboard.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatsSummary {
    /// Global aggregates; `None` when the collection is empty.
    pub global: Option<GlobalStats>,
    /// Best districts by mean final score.
    pub top_districts: Vec<DistrictRank>,
    /// Best score-for-money listings.
    pub best_value: Vec<ValuePick>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn coerced_value_only_for_parsed() {
        assert_eq!(Coerced::Parsed(3.5).value(), Some(3.5));
        assert_eq!(Coerced::<f64>::Unparsed("consultar".into()).value(), None);
        assert_eq!(Coerced::<f64>::Missing.value(), None);
        assert!(Coerced::<u32>::default().is_missing());
    }

    #[test]
    fn coerced_serializes_untagged() {
        let parsed = serde_json::to_value(Coerced::Parsed(2u32)).unwrap();
        let unparsed = serde_json::to_value(Coerced::<u32>::Unparsed("n/a".into())).unwrap();
        let missing = serde_json::to_value(Coerced::<u32>::Missing).unwrap();
        assert_eq!(parsed, serde_json::json!(2));
        assert_eq!(unparsed, serde_json::json!("n/a"));
        assert_eq!(missing, serde_json::Value::Null);
    }

    #[test]
    fn record_source_accepts_legacy_tags() {
        assert_eq!(RecordSource::from_tag("urbania_real"), RecordSource::Scraped);
        assert_eq!(RecordSource::from_tag("sample_data"), RecordSource::Sample);
        assert_eq!(RecordSource::from_tag("SAMPLE"), RecordSource::Sample);
        assert_eq!(RecordSource::from_tag("whatever"), RecordSource::Unknown);
        assert!(RecordSource::Scraped.is_authoritative());
        assert!(!RecordSource::Sample.is_authoritative());
    }

    #[test]
    fn sort_key_parses_cli_spellings() {
        assert_eq!("score".parse::<SortKey>().unwrap(), SortKey::Score);
        assert_eq!("price-asc".parse::<SortKey>().unwrap(), SortKey::PriceAsc);
        assert_eq!("PRICE-DESC".parse::<SortKey>().unwrap(), SortKey::PriceDesc);
        assert_eq!("area".parse::<SortKey>().unwrap(), SortKey::AreaDesc);
        assert_eq!("district".parse::<SortKey>().unwrap(), SortKey::District);
        assert!("cheapest".parse::<SortKey>().is_err());
        assert_eq!(SortKey::default(), SortKey::Score);
    }

    #[test]
    fn sort_key_display_roundtrip() {
        for key in SortKey::all() {
            assert_eq!(key.to_string().parse::<SortKey>().unwrap(), *key);
        }
    }

    #[test]
    fn district_filter_wildcard() {
        assert_eq!(DistrictFilter::from("all"), DistrictFilter::All);
        assert_eq!(DistrictFilter::from(" ALL "), DistrictFilter::All);
        assert_eq!(DistrictFilter::from(""), DistrictFilter::All);
        assert_eq!(
            DistrictFilter::from(" Miraflores "),
            DistrictFilter::Named("Miraflores".to_owned())
        );
    }

    #[test]
    fn bucket_thresholds_descend() {
        let bounds: Vec<f64> = ScoreBucket::THRESHOLDS.iter().map(|(_, b)| *b).collect();
        assert!(bounds.windows(2).all(|w| w[0] > w[1]));
        assert_eq!(ScoreBucket::all().len(), ScoreBucket::THRESHOLDS.len() + 1);
    }

    #[test]
    fn dashboard_view_tags_state() {
        let view = DashboardView::NoMatches;
        assert_eq!(
            serde_json::to_value(&view).unwrap(),
            serde_json::json!({"state": "noMatches"})
        );
    }
}
