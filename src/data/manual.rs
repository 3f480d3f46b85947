use crate::data::{conversion::parse_number, record::Record};
use serde::{Deserialize, Serialize};

/// Raw contents of the manual entry form, one string per input
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManualEntry {
    pub city: String,
    pub lat: String,
    pub lng: String,
    pub value: String,
}

/// How numeric parse failures in a manual submission are treated
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum EntryPolicy {
    /// Failed fields are stored as NaN
    #[default]
    Lenient,
    /// Failed fields reject the whole submission
    Strict,
}

impl ManualEntry {
    pub fn new(
        city: impl Into<String>,
        lat: impl Into<String>,
        lng: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        Self {
            city: city.into(),
            lat: lat.into(),
            lng: lng.into(),
            value: value.into(),
        }
    }

    /// Every input has content; the form refuses to submit otherwise
    pub fn is_complete(&self) -> bool {
        [&self.city, &self.lat, &self.lng, &self.value]
            .iter()
            .all(|field| !field.trim().is_empty())
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }

    pub fn to_record(&self, policy: EntryPolicy) -> Result<Record, ManualEntryError> {
        let record = Record::new(
            self.city.clone(),
            parse_number(&self.lat),
            parse_number(&self.lng),
            parse_number(&self.value),
        );

        if policy == EntryPolicy::Strict {
            if let Some(field) = record.first_invalid_field() {
                let input = match field {
                    "lat" => &self.lat,
                    "lng" => &self.lng,
                    _ => &self.value,
                };
                return Err(ManualEntryError::InvalidNumber {
                    field,
                    input: input.clone(),
                });
            }
        }

        Ok(record)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ManualEntryError {
    #[error("All fields are required")]
    Incomplete,
    #[error("{field} must be a number, got {input:?}")]
    InvalidNumber { field: &'static str, input: String },
}
