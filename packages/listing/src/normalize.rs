//! Raw row normalization.
//!
//! Turns the untyped rows produced by a [`lima_housing_source::ListingSource`]
//! into [`PropertyRecord`]s. This is the only place where the shape of the
//! input is trusted to be arbitrary: columns are located through the
//! configured [`FieldMapping`](crate::config::FieldMapping) aliases, values
//! are coerced best-effort, the final score is backfilled, and rows that
//! are not viable are skipped without aborting the batch.

use lima_housing_listing_models::{Amenities, Coerced, PropertyRecord, RecordSource};
use lima_housing_source::RawRecord;

use crate::coerce::{
    cell_text, coerce_bool, coerce_count, coerce_f64, coerce_price, parse_listing_date,
};
use crate::config::ListingConfig;
use crate::score::{cost_score_from_price_per_area, round_to, weighted_score};

/// Derives a district from a free-form location string.
///
/// The location is split on commas and the trimmed second segment is the
/// district (`"Av. Larco 123, Miraflores"` → `"Miraflores"`). A location
/// without a comma is taken whole. An empty location, or an empty second
/// segment, yields `unknown`.
#[must_use]
pub fn extract_district(location: Option<&str>, unknown: &str) -> String {
    let Some(location) = location.map(str::trim).filter(|l| !l.is_empty()) else {
        return unknown.to_owned();
    };

    let district = location.split(',').nth(1).map_or(location, str::trim);

    if district.is_empty() {
        unknown.to_owned()
    } else {
        district.to_owned()
    }
}

/// Returns the first aliased cell of `row` that carries a value.
fn lookup<'r>(row: &'r RawRecord, aliases: &[String]) -> Option<&'r serde_json::Value> {
    aliases
        .iter()
        .filter_map(|alias| row.get(alias))
        .find(|value| cell_text(value).is_some())
}

/// Normalizes raw rows according to a [`ListingConfig`].
#[derive(Debug, Clone, Copy)]
pub struct Normalizer<'a> {
    config: &'a ListingConfig,
}

impl<'a> Normalizer<'a> {
    /// Creates a normalizer bound to `config`.
    #[must_use]
    pub const fn new(config: &'a ListingConfig) -> Self {
        Self { config }
    }

    /// Normalizes a batch of rows, dropping the ones that are not viable.
    ///
    /// Never fails: a malformed row is skipped and the batch continues.
    #[must_use]
    pub fn normalize(&self, rows: &[RawRecord]) -> Vec<PropertyRecord> {
        let records: Vec<PropertyRecord> = rows
            .iter()
            .enumerate()
            .filter_map(|(position, row)| self.normalize_row(position, row))
            .collect();

        log::info!(
            "Normalized {} of {} rows ({} dropped)",
            records.len(),
            rows.len(),
            rows.len() - records.len()
        );

        records
    }

    /// Normalizes one row. `position` is the zero-based index of the row in
    /// its batch and is used for the fallback id.
    ///
    /// Returns `None` when the row is not a JSON object, or when it has
    /// neither a location/district nor a final score after backfill.
    #[must_use]
    pub fn normalize_row(&self, position: usize, row: &RawRecord) -> Option<PropertyRecord> {
        if !row.is_object() {
            log::debug!("Skipping row {}: not a record object", position + 1);
            return None;
        }

        let fields = &self.config.fields;
        let text = |aliases: &[String]| lookup(row, aliases).and_then(cell_text);

        // ── Identity & location ──────────────────────────────────
        let id = text(&fields.id).unwrap_or_else(|| format!("row-{}", position + 1));
        let title = text(&fields.title);
        let location = text(&fields.location);
        let supplied_district = text(&fields.district);
        let has_place = location.is_some() || supplied_district.is_some();

        let district = supplied_district.unwrap_or_else(|| {
            extract_district(location.as_deref(), &self.config.unknown_district)
        });

        // ── Economics ────────────────────────────────────────────
        let price = coerce_price(lookup(row, &fields.price), self.config.usd_exchange_rate);
        let area = coerce_f64(lookup(row, &fields.area));

        let price_per_area = match (price.value(), area.value()) {
            (Some(price), Some(area)) if area > 0.0 => Some(round_to(price / area, 2)),
            _ => None,
        };

        let bedrooms = coerce_count(lookup(row, &fields.bedrooms));
        let bathrooms = coerce_count(lookup(row, &fields.bathrooms));

        // ── Scores ───────────────────────────────────────────────
        let mut cost_score = coerce_f64(lookup(row, &fields.cost_score));
        if cost_score.is_missing()
            && let Some(ppa) = price_per_area
        {
            cost_score = Coerced::Parsed(cost_score_from_price_per_area(ppa));
        }
        let safety_score = coerce_f64(lookup(row, &fields.safety_score));
        let services_score = coerce_f64(lookup(row, &fields.services_score));

        let supplied_score = coerce_f64(lookup(row, &fields.final_score)).value();
        let final_score = match supplied_score {
            Some(score) if score.abs() > f64::EPSILON => Some(score),
            supplied => match (cost_score.value(), safety_score.value(), services_score.value()) {
                (Some(cost), Some(safety), Some(services)) => {
                    Some(weighted_score(cost, safety, services))
                }
                _ => supplied,
            },
        };

        if !has_place && final_score.is_none() {
            log::debug!("Dropping row {id}: no location, district or final score");
            return None;
        }

        // ── Amenities & provenance ───────────────────────────────
        let flag = |aliases: &[String]| coerce_bool(lookup(row, aliases)).unwrap_or(false);
        let amenities = Amenities {
            parking: flag(&fields.parking),
            furnished: flag(&fields.furnished),
            pet_friendly: flag(&fields.pet_friendly),
        };

        let source = text(&fields.source)
            .as_deref()
            .map_or(RecordSource::Unknown, RecordSource::from_tag);

        let listed_on = text(&fields.listed_on)
            .as_deref()
            .and_then(parse_listing_date);

        Some(PropertyRecord {
            id,
            title,
            location,
            district,
            price,
            area,
            price_per_area,
            bedrooms,
            bathrooms,
            cost_score,
            safety_score,
            services_score,
            final_score,
            amenities,
            source,
            listed_on,
            url: text(&fields.url),
        })
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use serde_json::json;

    use super::*;

    fn normalize_one(row: &serde_json::Value) -> Option<PropertyRecord> {
        let config = ListingConfig::default();
        Normalizer::new(&config).normalize_row(0, row)
    }

    #[test]
    fn district_from_location() {
        assert_eq!(
            extract_district(Some("Av. Larco 123, Miraflores"), "Unknown"),
            "Miraflores"
        );
        assert_eq!(
            extract_district(Some("Jr. Cuzco 45, Barranco, Lima"), "Unknown"),
            "Barranco"
        );
        assert_eq!(extract_district(Some("Unknown St"), "Unknown"), "Unknown St");
        assert_eq!(extract_district(Some("  "), "Unknown"), "Unknown");
        assert_eq!(extract_district(Some("Calle 5, "), "Unknown"), "Unknown");
        assert_eq!(extract_district(None, "Sin distrito"), "Sin distrito");
    }

    #[test]
    fn supplied_district_wins_over_location() {
        let record = normalize_one(&json!({
            "location": "Av. Larco 123, Miraflores",
            "district": "San Isidro",
            "final_score": "7.0",
        }))
        .unwrap();
        assert_eq!(record.district, "San Isidro");
    }

    #[test]
    fn supplied_nonzero_score_is_preserved() {
        let record = normalize_one(&json!({
            "location": "Av. Larco 123, Miraflores",
            "cost_score": "8.2",
            "safety_score": "8.5",
            "services_score": "9.0",
            "final_score": "6.3",
        }))
        .unwrap();
        assert_eq!(record.final_score, Some(6.3));
    }

    #[test]
    fn absent_or_zero_score_is_backfilled() {
        for supplied in [json!(""), json!("0"), json!(0)] {
            let record = normalize_one(&json!({
                "location": "Av. Larco 123, Miraflores",
                "cost_score": "8.2",
                "safety_score": "8.5",
                "services_score": "9.0",
                "final_score": supplied,
            }))
            .unwrap();
            assert_eq!(record.final_score, Some(8.5));
        }
    }

    #[test]
    fn underivable_score_stays_absent() {
        let record = normalize_one(&json!({
            "location": "Calle Berlin 200, Miraflores",
            "safety_score": "8.5",
        }))
        .unwrap();
        assert_eq!(record.final_score, None);
        assert_eq!(record.district, "Miraflores");
    }

    #[test]
    fn drops_rows_with_neither_place_nor_score() {
        assert!(normalize_one(&json!({ "price": "2500" })).is_none());
        assert!(normalize_one(&json!("not a row")).is_none());

        let scored = normalize_one(&json!({ "final_score": "7.4" })).unwrap();
        assert_eq!(scored.district, "Unknown");
    }

    #[test]
    fn coerces_decorated_numbers() {
        let record = normalize_one(&json!({
            "location": "Av. Pardo 500, Miraflores",
            "price": "S/. 2,500",
            "area": "85 m²",
            "bedrooms": "2 dormitorios",
            "bathrooms": "consultar",
            "final_score": "8",
        }))
        .unwrap();
        assert_eq!(record.price, Coerced::Parsed(2500.0));
        assert_eq!(record.area, Coerced::Parsed(85.0));
        assert_eq!(record.price_per_area, Some(29.41));
        assert_eq!(record.bedrooms, Coerced::Parsed(2));
        assert_eq!(record.bathrooms, Coerced::Unparsed("consultar".to_owned()));
    }

    #[test]
    fn prefers_earlier_aliases() {
        let record = normalize_one(&json!({
            "district": "Lince",
            "price_clean": "",
            "price_soles": "1800",
            "price": "S/. 9,999",
            "final_score": "6",
        }))
        .unwrap();
        assert_eq!(record.price, Coerced::Parsed(1800.0));
    }

    #[test]
    fn converts_dollar_prices() {
        let record = normalize_one(&json!({
            "district": "La Molina",
            "price": "USD 1,000",
            "final_score": "7",
        }))
        .unwrap();
        assert_eq!(record.price_value().map(f64::round), Some(3700.0));
    }

    #[test]
    fn backfills_cost_score_from_price_per_area() {
        let record = normalize_one(&json!({
            "district": "Surco",
            "price": "2000",
            "area": "100",
            "safety_score": "8",
            "services_score": "7",
        }))
        .unwrap();
        // 2000 / 100 = 20 soles/m² → 10 - 0.2 = 9.8
        assert_eq!(record.cost_score, Coerced::Parsed(9.8));
        // 9.8*0.4 + 8*0.4 + 7*0.2 = 8.52
        assert_eq!(record.final_score, Some(8.5));
    }

    #[test]
    fn fallback_id_uses_row_position() {
        let config = ListingConfig::default();
        let normalizer = Normalizer::new(&config);
        let record = normalizer
            .normalize_row(4, &json!({ "district": "Lince", "final_score": "5" }))
            .unwrap();
        assert_eq!(record.id, "row-5");
    }

    #[test]
    fn reads_amenities_provenance_and_date() {
        let record = normalize_one(&json!({
            "id": "PROP1001",
            "district": "Barranco",
            "final_score": "7.9",
            "parking": "1",
            "furnished": "no",
            "pet_friendly": "true",
            "source": "sample_data",
            "created_date": "2024-03-15",
            "url": "https://urbania.pe/inmueble/1001",
        }))
        .unwrap();
        assert_eq!(
            record.amenities,
            Amenities {
                parking: true,
                furnished: false,
                pet_friendly: true,
            }
        );
        assert_eq!(record.source, RecordSource::Sample);
        assert_eq!(record.listed_on, NaiveDate::from_ymd_opt(2024, 3, 15));
        assert_eq!(record.url.as_deref(), Some("https://urbania.pe/inmueble/1001"));
    }

    #[test]
    fn batch_skips_bad_rows_and_keeps_order() {
        let config = ListingConfig::default();
        let rows = vec![
            json!({ "id": "a", "district": "Lince", "final_score": "6" }),
            json!({ "id": "b" }),
            json!(42),
            json!({ "id": "c", "location": "Av. Brasil 100, Jesus Maria" }),
        ];
        let records = Normalizer::new(&config).normalize(&rows);
        let ids: Vec<&str> = records.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "c"]);
    }
}
