//! Statistics over the master collection.
//!
//! Aggregates are always computed over the full collection, never over a
//! filtered view, so headline numbers stay put while the user filters.
//! Means only include records that carry the value in question; a mean
//! with no contributing values is `None` rather than a division by zero.

use std::collections::BTreeMap;

use lima_housing_listing_models::{
    DistrictRank, GlobalStats, PropertyRecord, StatsSummary, ValuePick,
};

use crate::collate;
use crate::config::ListingConfig;
use crate::score::round_to;

/// Running sum for a mean.
#[derive(Debug, Default, Clone, Copy)]
struct Mean {
    sum: f64,
    count: usize,
}

impl Mean {
    fn push(&mut self, value: Option<f64>) {
        if let Some(value) = value {
            self.sum += value;
            self.count += 1;
        }
    }

    #[allow(clippy::cast_precision_loss)]
    fn get(self) -> Option<f64> {
        (self.count > 0).then(|| self.sum / self.count as f64)
    }

    #[allow(clippy::cast_possible_truncation)]
    fn rounded(self) -> Option<i64> {
        self.get().map(|mean| mean.round() as i64)
    }
}

/// Computes the headline statistics, or `None` for an empty collection.
#[must_use]
pub fn global_stats(records: &[PropertyRecord]) -> Option<GlobalStats> {
    if records.is_empty() {
        return None;
    }

    let mut score = Mean::default();
    let mut price = Mean::default();
    let mut area = Mean::default();

    for record in records {
        score.push(record.final_score);
        price.push(record.price_value());
        area.push(record.area_value());
    }

    Some(GlobalStats {
        count: records.len(),
        mean_score: score.get().map(|m| round_to(m, 1)),
        mean_price: price.rounded(),
        mean_area: area.rounded(),
    })
}

/// Per-district accumulator, in first-encountered order.
struct DistrictGroup<'a> {
    district: &'a str,
    count: usize,
    score: Mean,
    price: Mean,
    area: Mean,
    best_score: f64,
}

/// Ranks districts by mean final score, best first, keeping `limit`.
///
/// Districts where no listing has a final score are not ranked. Equal
/// means are ordered by district name, then by first appearance.
#[must_use]
pub fn district_ranking(records: &[PropertyRecord], limit: usize) -> Vec<DistrictRank> {
    let mut index: BTreeMap<&str, usize> = BTreeMap::new();
    let mut groups: Vec<DistrictGroup<'_>> = Vec::new();

    for record in records {
        let slot = *index.entry(record.district.as_str()).or_insert_with(|| {
            groups.push(DistrictGroup {
                district: &record.district,
                count: 0,
                score: Mean::default(),
                price: Mean::default(),
                area: Mean::default(),
                best_score: f64::NEG_INFINITY,
            });
            groups.len() - 1
        });

        let group = &mut groups[slot];
        group.count += 1;
        group.score.push(record.final_score);
        group.price.push(record.price_value());
        group.area.push(record.area_value());
        if let Some(score) = record.final_score {
            group.best_score = group.best_score.max(score);
        }
    }

    let mut ranked: Vec<(f64, DistrictGroup<'_>)> = groups
        .into_iter()
        .filter_map(|group| group.score.get().map(|mean| (mean, group)))
        .collect();

    ranked.sort_by(|(a_mean, a), (b_mean, b)| {
        b_mean
            .total_cmp(a_mean)
            .then_with(|| collate::compare(a.district, b.district))
    });

    ranked
        .into_iter()
        .take(limit)
        .map(|(mean, group)| DistrictRank {
            district: group.district.to_owned(),
            count: group.count,
            mean_score: round_to(mean, 1),
            mean_price: group.price.rounded(),
            mean_area: group.area.rounded(),
            best_score: group.best_score,
        })
        .collect()
}

/// Ranks listings by final score per thousand soles of rent, keeping
/// `limit`. Listings without a positive price or a final score are
/// skipped.
#[must_use]
pub fn best_value(records: &[PropertyRecord], limit: usize) -> Vec<ValuePick> {
    let mut picks: Vec<(f64, &PropertyRecord, f64, f64)> = records
        .iter()
        .filter_map(|record| {
            let price = record.price_value().filter(|p| *p > 0.0)?;
            let score = record.final_score?;
            Some((score / (price / 1_000.0), record, price, score))
        })
        .collect();

    picks.sort_by(|a, b| b.0.total_cmp(&a.0));

    picks
        .into_iter()
        .take(limit)
        .map(|(ratio, record, price, final_score)| ValuePick {
            id: record.id.clone(),
            district: record.district.clone(),
            price,
            final_score,
            value_ratio: round_to(ratio, 2),
        })
        .collect()
}

/// Builds the statistics block of the dashboard.
#[must_use]
pub fn summarize(records: &[PropertyRecord], config: &ListingConfig) -> StatsSummary {
    StatsSummary {
        global: global_stats(records),
        top_districts: district_ranking(records, config.top_districts),
        best_value: best_value(records, config.best_value_count),
    }
}
