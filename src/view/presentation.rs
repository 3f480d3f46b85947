//! Headless description of what the map, legend and table show
//!
//! Widgets only draw a [`ViewSnapshot`]; every decision about which records
//! appear, in which order and in which color is made before it is built.

use crate::{
    core::geo::{LatLng, LatLngBounds},
    data::record::Record,
    view::bucket::{Bucket, BucketThresholds},
};

#[derive(Debug, Clone, PartialEq)]
pub struct MarkerSpec {
    /// Row index of the same record in the table
    pub row: usize,
    pub position: LatLng,
    pub bucket: Bucket,
    pub title: String,
    pub body: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TableRow {
    pub city: String,
    pub lat: String,
    pub lng: String,
    pub value: String,
    pub bucket: Bucket,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LegendEntry {
    pub bucket: Bucket,
    pub label: String,
}

/// Everything the presentation layer needs for one frame
#[derive(Debug, Clone, PartialEq)]
pub struct ViewSnapshot {
    /// Session revision this snapshot was built from
    pub revision: u64,
    /// Records in the store, visible or not
    pub total: usize,
    pub markers: Vec<MarkerSpec>,
    pub rows: Vec<TableRow>,
    pub legend: Vec<LegendEntry>,
    /// Extent of the markers, if any have a finite position
    pub bounds: Option<LatLngBounds>,
}

impl ViewSnapshot {
    pub fn build(
        visible: &[&Record],
        thresholds: &BucketThresholds,
        revision: u64,
        total: usize,
    ) -> Self {
        let mut markers = Vec::with_capacity(visible.len());
        let mut rows = Vec::with_capacity(visible.len());

        for (row, record) in visible.iter().enumerate() {
            let bucket = thresholds.classify(record.value);
            let value = format_grouped(record.value);

            // A manual entry may lack a usable position; it still gets a row
            if record.position().is_finite() {
                markers.push(MarkerSpec {
                    row,
                    position: record.position(),
                    bucket,
                    title: record.city.clone(),
                    body: format!("Value: {}", value),
                });
            }

            rows.push(TableRow {
                city: record.city.clone(),
                lat: record.lat.to_string(),
                lng: record.lng.to_string(),
                value,
                bucket,
            });
        }

        let bounds = LatLngBounds::from_points(markers.iter().map(|m| &m.position));

        Self {
            revision,
            total,
            markers,
            rows,
            legend: legend(thresholds),
            bounds,
        }
    }

    pub fn visible_count(&self) -> usize {
        self.rows.len()
    }
}

/// The three legend lines, highest bucket first
pub fn legend(thresholds: &BucketThresholds) -> Vec<LegendEntry> {
    let medium_floor = if thresholds.medium.fract() == 0.0 {
        format_grouped(thresholds.medium + 1.0)
    } else {
        format!("> {}", format_grouped(thresholds.medium))
    };

    Bucket::ALL
        .iter()
        .map(|&bucket| LegendEntry {
            bucket,
            label: match bucket {
                Bucket::High => format!("Value > {}", format_grouped(thresholds.high)),
                Bucket::Medium => format!(
                    "Value {} – {}",
                    medium_floor,
                    format_grouped(thresholds.high)
                ),
                Bucket::Low => format!("Value ≤ {}", format_grouped(thresholds.medium)),
            },
        })
        .collect()
}

/// Thousands-grouped value with at most three fraction digits, e.g. `12,000,000`
/// or `1,234.568`
pub fn format_grouped(value: f64) -> String {
    if value.is_nan() {
        return "NaN".to_string();
    }
    if value.is_infinite() {
        let symbol = if value > 0.0 { "∞" } else { "-∞" };
        return symbol.to_string();
    }

    let fixed = format!("{:.3}", value.abs());
    let (int_part, frac_part) = fixed.split_once('.').unwrap_or((fixed.as_str(), ""));
    let frac_part = frac_part.trim_end_matches('0');

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3 + 1);
    for (i, digit) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }

    let sign = if value < 0.0 { "-" } else { "" };
    if frac_part.is_empty() {
        format!("{}{}", sign, grouped)
    } else {
        format!("{}{}.{}", sign, grouped, frac_part)
    }
}
