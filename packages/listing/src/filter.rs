//! Filter and sort engine.
//!
//! Every function here is pure: it borrows the master collection and a
//! [`FilterSpec`] and returns a new sequence of references, leaving the
//! collection untouched. Applying the same spec to the same collection
//! always yields the same sequence.

use std::cmp::Ordering;

use lima_housing_listing_models::{
    DashboardView, DistrictFilter, FilterSpec, ListingCard, PropertyRecord, SortKey,
};

use crate::collate;
use crate::score::colorize;

/// Returns `true` if `district` satisfies `filter`. Names are compared
/// on their collation key, so case and accents do not matter.
#[must_use]
pub fn district_matches(filter: &DistrictFilter, district: &str) -> bool {
    match filter {
        DistrictFilter::All => true,
        DistrictFilter::Named(name) => {
            collate::collation_key(name) == collate::collation_key(district)
        }
    }
}

/// Returns `true` if `record` satisfies every predicate of `spec`.
///
/// A record without a numeric price fails the price ceiling and a record
/// without a final score fails the score floor. The bedroom predicate is
/// only active when `min_bedrooms > 0`.
#[must_use]
pub fn matches(record: &PropertyRecord, spec: &FilterSpec) -> bool {
    let district_ok = district_matches(&spec.district, &record.district);
    let price_ok = record.price_value().is_some_and(|p| p <= spec.max_price);
    let score_ok = record.final_score.is_some_and(|s| s >= spec.min_score);
    let bedrooms_ok = spec.min_bedrooms == 0
        || record
            .bedroom_count()
            .is_some_and(|b| b >= spec.min_bedrooms);

    district_ok && price_ok && score_ok && bedrooms_ok
}

/// Selects the records of `records` that satisfy `spec`, in input order.
#[must_use]
pub fn filter_records<'a>(
    records: &'a [PropertyRecord],
    spec: &FilterSpec,
) -> Vec<&'a PropertyRecord> {
    records.iter().filter(|r| matches(r, spec)).collect()
}

/// Compares optional keys so that present values come first, in the given
/// direction, and absent values trail.
fn cmp_present(a: Option<f64>, b: Option<f64>, descending: bool) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) if descending => b.total_cmp(&a),
        (Some(a), Some(b)) => a.total_cmp(&b),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// Orders two records under `key`.
#[must_use]
pub fn compare(a: &PropertyRecord, b: &PropertyRecord, key: SortKey) -> Ordering {
    match key {
        SortKey::Score => cmp_present(a.final_score, b.final_score, true),
        SortKey::PriceAsc => cmp_present(a.price_value(), b.price_value(), false),
        SortKey::PriceDesc => cmp_present(a.price_value(), b.price_value(), true),
        SortKey::AreaDesc => cmp_present(a.area_value(), b.area_value(), true),
        SortKey::District => collate::compare(&a.district, &b.district),
    }
}

/// Sorts `records` in place under `key`. The sort is stable: ties keep
/// their relative input order.
pub fn sort_records(records: &mut [&PropertyRecord], key: SortKey) {
    records.sort_by(|a, b| compare(a, b, key));
}

/// Filters and sorts the master collection under `spec`.
#[must_use]
pub fn apply<'a>(records: &'a [PropertyRecord], spec: &FilterSpec) -> Vec<&'a PropertyRecord> {
    let mut selected = filter_records(records, spec);
    sort_records(&mut selected, spec.sort_key);
    selected
}

/// Builds the listing view for `spec`, showing at most `cap` cards.
///
/// An empty result is [`DashboardView::NoMatches`], distinct from the
/// loading and failure states.
#[must_use]
pub fn build_view<'a>(
    records: &'a [PropertyRecord],
    spec: &FilterSpec,
    cap: usize,
) -> DashboardView<'a> {
    let selected = apply(records, spec);
    let total_matches = selected.len();

    if total_matches == 0 {
        return DashboardView::NoMatches;
    }

    let cards = selected
        .into_iter()
        .take(cap)
        .map(|record| ListingCard {
            record,
            bucket: record.final_score.map(colorize),
        })
        .collect();

    DashboardView::Listings {
        cards,
        total_matches,
    }
}
