use crate::core::geo::LatLng;
use serde::{Deserialize, Serialize};

/// One city data point
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    pub city: String,
    pub lat: f64,
    pub lng: f64,
    pub value: f64,
}

impl Record {
    pub fn new(city: impl Into<String>, lat: f64, lng: f64, value: f64) -> Self {
        Self {
            city: city.into(),
            lat,
            lng,
            value,
        }
    }

    /// All three numeric fields are finite. Batch ingestion only keeps
    /// records for which this holds.
    pub fn is_valid(&self) -> bool {
        self.lat.is_finite() && self.lng.is_finite() && self.value.is_finite()
    }

    pub fn position(&self) -> LatLng {
        LatLng::new(self.lat, self.lng)
    }

    /// Name of the first numeric field that is not finite
    pub fn first_invalid_field(&self) -> Option<&'static str> {
        [("lat", self.lat), ("lng", self.lng), ("value", self.value)]
            .into_iter()
            .find(|(_, v)| !v.is_finite())
            .map(|(name, _)| name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validity() {
        assert!(Record::new("Lahore", 31.5, 74.3, 12_000_000.0).is_valid());
        assert!(Record::new("", 0.0, 0.0, -1.0).is_valid());

        let bad = Record::new("Nowhere", 10.0, f64::NAN, 1.0);
        assert!(!bad.is_valid());
        assert_eq!(bad.first_invalid_field(), Some("lng"));

        let inf = Record::new("Far", 10.0, 10.0, f64::INFINITY);
        assert_eq!(inf.first_invalid_field(), Some("value"));
    }
}
