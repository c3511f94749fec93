//! Plain-text rendering of listing cards and statistics.
//!
//! Missing or unparseable values are always shown as an explicit
//! placeholder, never as `0` or a blank.

use std::fmt::Write as _;

use console::{Style, style};
use lima_housing_listing_models::{
    Coerced, DashboardView, ListingCard, ScoreBucket, StatsSummary,
};

pub const PRICE_PLACEHOLDER: &str = "Price not available";
pub const AREA_PLACEHOLDER: &str = "Area not available";
pub const VALUE_PLACEHOLDER: &str = "N/A";

/// Groups the integer part of `amount` in threes with `,` as `es-PE` does.
#[allow(clippy::cast_possible_truncation)]
fn group_thousands(amount: f64) -> String {
    let rounded = amount.round() as i64;
    let digits = rounded.unsigned_abs().to_string();

    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }

    if rounded < 0 {
        format!("-{grouped}")
    } else {
        grouped
    }
}

/// Formats an amount in soles, e.g. `S/. 2,500`.
#[must_use]
pub fn soles(amount: f64) -> String {
    format!("S/. {}", group_thousands(amount))
}

#[must_use]
pub fn price(value: &Coerced<f64>) -> String {
    value
        .value()
        .map_or_else(|| PRICE_PLACEHOLDER.to_owned(), soles)
}

#[must_use]
pub fn area(value: &Coerced<f64>) -> String {
    value.value().map_or_else(
        || AREA_PLACEHOLDER.to_owned(),
        |area| {
            if area.fract().abs() < f64::EPSILON {
                format!("{area:.0} m²")
            } else {
                format!("{area:.1} m²")
            }
        },
    )
}

#[must_use]
pub fn count(value: &Coerced<u32>) -> String {
    value
        .value()
        .map_or_else(|| VALUE_PLACEHOLDER.to_owned(), |n| n.to_string())
}

#[must_use]
pub fn score(value: Option<f64>) -> String {
    value.map_or_else(|| VALUE_PLACEHOLDER.to_owned(), |s| format!("{s:.1}"))
}

/// Price per square meter, e.g. `S/. 29/m²`.
#[must_use]
pub fn price_per_area(value: Option<f64>) -> String {
    value.map_or_else(|| VALUE_PLACEHOLDER.to_owned(), |p| format!("{}/m²", soles(p)))
}

/// Splits a `#RRGGBB` color into its channels.
fn rgb(hex: &str) -> Option<(u8, u8, u8)> {
    let hex = hex.strip_prefix('#')?;
    if hex.len() != 6 {
        return None;
    }
    let channel = |i: usize| u8::from_str_radix(hex.get(i..i + 2)?, 16).ok();
    Some((channel(0)?, channel(2)?, channel(4)?))
}

/// Terminal style for the bucket's badge color.
fn bucket_style(bucket: ScoreBucket) -> Style {
    let style = Style::new().bold();
    match rgb(bucket.color()) {
        Some((r, g, b)) => style.true_color(r, g, b),
        None => style,
    }
}

/// Renders one listing card.
#[must_use]
pub fn card(card: &ListingCard<'_>) -> String {
    let record = card.record;
    let mut out = String::new();

    let badge = card.bucket.map_or_else(
        || VALUE_PLACEHOLDER.to_owned(),
        |bucket| {
            bucket_style(bucket)
                .apply_to(format!("{} {}", score(record.final_score), bucket.label()))
                .to_string()
        },
    );

    let provenance = if record.source.is_authoritative() {
        style(record.source.to_string()).cyan()
    } else {
        style(record.source.to_string()).dim()
    };
    let _ = writeln!(
        out,
        "{}  {}  [{badge}]  {provenance}",
        style(&record.id).bold(),
        record.district
    );
    if let Some(title) = &record.title {
        let _ = writeln!(out, "  {title}");
    }
    if let Some(location) = &record.location {
        let _ = writeln!(out, "  {}", style(location).dim());
    }
    let _ = writeln!(
        out,
        "  {} · {} ({}) · {} bd · {} ba",
        price(&record.price),
        area(&record.area),
        price_per_area(record.price_per_area),
        count(&record.bedrooms),
        count(&record.bathrooms),
    );
    let _ = writeln!(
        out,
        "  Cost {} · Safety {} · Services {}",
        score(record.cost_score.value()),
        score(record.safety_score.value()),
        score(record.services_score.value()),
    );

    let amenities: Vec<&str> = [
        (record.amenities.parking, "Parking"),
        (record.amenities.furnished, "Furnished"),
        (record.amenities.pet_friendly, "Pet friendly"),
    ]
    .iter()
    .filter(|(present, _)| *present)
    .map(|(_, label)| *label)
    .collect();
    if !amenities.is_empty() {
        let _ = writeln!(out, "  {}", amenities.join(" · "));
    }
    if let Some(url) = &record.url {
        let _ = writeln!(out, "  {url}");
    }

    out
}

/// Renders the listing area for a view.
#[must_use]
pub fn view(view: &DashboardView<'_>) -> String {
    match view {
        DashboardView::Loading => "Loading listings...\n".to_owned(),
        DashboardView::Unavailable { reason } => format!(
            "{}\n  {reason}\n",
            style("Listings could not be loaded.").red().bold()
        ),
        DashboardView::NoMatches => "No properties match the current filters.\n".to_owned(),
        DashboardView::Listings {
            cards,
            total_matches,
        } => {
            let mut out = format!("Showing {} of {total_matches} listings\n\n", cards.len());
            for c in cards {
                out.push_str(&card(c));
                out.push('\n');
            }
            out
        }
    }
}

/// Renders the statistics block.
#[must_use]
pub fn stats(summary: &StatsSummary) -> String {
    let mut out = String::new();

    let _ = writeln!(out, "{}", style("Overview").bold());
    match &summary.global {
        None => {
            let _ = writeln!(out, "  No data");
        }
        Some(global) => {
            let _ = writeln!(out, "  Listings:      {}", global.count);
            let _ = writeln!(out, "  Average score: {}", score(global.mean_score));
            #[allow(clippy::cast_precision_loss)]
            let mean_price = global
                .mean_price
                .map_or_else(|| PRICE_PLACEHOLDER.to_owned(), |p| soles(p as f64));
            let _ = writeln!(out, "  Average price: {mean_price}");
            let mean_area = global
                .mean_area
                .map_or_else(|| AREA_PLACEHOLDER.to_owned(), |a| format!("{a} m²"));
            let _ = writeln!(out, "  Average area:  {mean_area}");
        }
    }

    if !summary.top_districts.is_empty() {
        let _ = writeln!(out);
        let _ = writeln!(out, "{}", style("Top districts").bold());
        for (rank, d) in summary.top_districts.iter().enumerate() {
            #[allow(clippy::cast_precision_loss)]
            let mean_price = d
                .mean_price
                .map_or_else(|| PRICE_PLACEHOLDER.to_owned(), |p| soles(p as f64));
            let mean_area = d
                .mean_area
                .map_or_else(|| AREA_PLACEHOLDER.to_owned(), |a| format!("{a} m²"));
            let _ = writeln!(
                out,
                "  {}. {:<16} {:>4.1}  ({} listings, best {:.1}, avg {mean_price}, {mean_area})",
                rank + 1,
                d.district,
                d.mean_score,
                d.count,
                d.best_score,
            );
        }
    }

    if !summary.best_value.is_empty() {
        let _ = writeln!(out);
        let _ = writeln!(out, "{}", style("Best value").bold());
        for pick in &summary.best_value {
            let _ = writeln!(
                out,
                "  {:<10} {:<16} {:>12}  score {:.1}  ratio {:.2}",
                pick.id,
                pick.district,
                soles(pick.price),
                pick.final_score,
                pick.value_ratio,
            );
        }
    }

    out
}
