use crate::data::conversion::parse_number;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum SortKey {
    #[default]
    None,
    City,
    Value,
}

impl SortKey {
    pub const ALL: [SortKey; 3] = [SortKey::None, SortKey::City, SortKey::Value];

    pub fn label(&self) -> &'static str {
        match self {
            SortKey::None => "Sort by...",
            SortKey::City => "City Name",
            SortKey::Value => "Value",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum SortDirection {
    #[default]
    Ascending,
    Descending,
}

impl SortDirection {
    pub const ALL: [SortDirection; 2] = [SortDirection::Ascending, SortDirection::Descending];

    pub fn label(&self) -> &'static str {
        match self {
            SortDirection::Ascending => "Ascending",
            SortDirection::Descending => "Descending",
        }
    }
}

/// Current filter threshold, search text and sort order
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ViewParams {
    /// Only values strictly greater than this are shown
    pub min_value: Option<f64>,
    /// Case-insensitive substring of the city; empty means unset
    pub search: String,
    pub sort_key: SortKey,
    pub direction: SortDirection,
}

impl ViewParams {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_min_value(mut self, min_value: f64) -> Self {
        self.min_value = Some(min_value);
        self
    }

    pub fn with_search(mut self, search: impl Into<String>) -> Self {
        self.search = search.into();
        self
    }

    pub fn with_sort(mut self, key: SortKey, direction: SortDirection) -> Self {
        self.sort_key = key;
        self.direction = direction;
        self
    }

    /// Interprets the threshold input box. Empty or non-numeric text clears it.
    pub fn threshold_from_text(text: &str) -> Option<f64> {
        if text.trim().is_empty() {
            return None;
        }
        let value = parse_number(text);
        if value.is_nan() {
            log::debug!("ignoring non-numeric threshold {:?}", text);
            None
        } else {
            Some(value)
        }
    }

    pub fn has_search(&self) -> bool {
        !self.search.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_threshold_text() {
        assert_eq!(ViewParams::threshold_from_text(""), None);
        assert_eq!(ViewParams::threshold_from_text("   "), None);
        assert_eq!(ViewParams::threshold_from_text("abc"), None);
        assert_eq!(ViewParams::threshold_from_text("0"), Some(0.0));
        assert_eq!(ViewParams::threshold_from_text("5000000"), Some(5_000_000.0));
        assert_eq!(ViewParams::threshold_from_text("-2.5"), Some(-2.5));
    }

    #[test]
    fn test_builder() {
        let params = ViewParams::new()
            .with_min_value(10.0)
            .with_search("lah")
            .with_sort(SortKey::Value, SortDirection::Descending);

        assert_eq!(params.min_value, Some(10.0));
        assert!(params.has_search());
        assert_eq!(params.sort_key, SortKey::Value);
        assert_eq!(params.direction, SortDirection::Descending);
        assert!(!ViewParams::default().has_search());
    }
}
