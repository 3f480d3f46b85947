//! Filter, search and sort over the record store
//!
//! The pipeline is a pure function of the records and the view parameters.
//! Markers and table rows are both built from its output, so they always
//! show the same records in the same order.

use crate::{
    data::record::Record,
    view::params::{SortDirection, SortKey, ViewParams},
};
use std::cmp::Ordering;

/// Visible records, in display order
pub fn apply<'a, I>(records: I, params: &ViewParams) -> Vec<&'a Record>
where
    I: IntoIterator<Item = &'a Record>,
{
    let needle = params.search.to_lowercase();

    let mut visible: Vec<&Record> = records
        .into_iter()
        .filter(|record| passes_threshold(record, params.min_value))
        .filter(|record| needle.is_empty() || record.city.to_lowercase().contains(&needle))
        .collect();

    // sort_by is stable, so equal keys keep their filtered order
    match params.sort_key {
        SortKey::None => {}
        SortKey::City => {
            visible.sort_by(|a, b| directed(compare_cities(&a.city, &b.city), params.direction))
        }
        SortKey::Value => visible.sort_by(|a, b| compare_values(a.value, b.value, params.direction)),
    }

    visible
}

fn passes_threshold(record: &Record, min_value: Option<f64>) -> bool {
    match min_value {
        Some(threshold) => record.value > threshold,
        None => true,
    }
}

fn directed(ordering: Ordering, direction: SortDirection) -> Ordering {
    match direction {
        SortDirection::Ascending => ordering,
        SortDirection::Descending => ordering.reverse(),
    }
}

/// Case-insensitive, with byte order breaking ties between spellings
fn compare_cities(a: &str, b: &str) -> Ordering {
    a.to_lowercase()
        .cmp(&b.to_lowercase())
        .then_with(|| a.cmp(b))
}

/// NaN sorts after every number in both directions
fn compare_values(a: f64, b: f64, direction: SortDirection) -> Ordering {
    match (a.is_nan(), b.is_nan()) {
        (true, true) => Ordering::Equal,
        (true, false) => Ordering::Greater,
        (false, true) => Ordering::Less,
        (false, false) => directed(a.partial_cmp(&b).unwrap_or(Ordering::Equal), direction),
    }
}
