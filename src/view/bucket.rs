use crate::core::constants::{HIGH_VALUE_THRESHOLD, MEDIUM_VALUE_THRESHOLD};
use serde::{Deserialize, Serialize};

/// Display class of a record's value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Bucket {
    Low,
    Medium,
    High,
}

impl Bucket {
    /// Highest first, the order the legend lists them in
    pub const ALL: [Bucket; 3] = [Bucket::High, Bucket::Medium, Bucket::Low];

    pub fn name(&self) -> &'static str {
        match self {
            Bucket::Low => "low",
            Bucket::Medium => "medium",
            Bucket::High => "high",
        }
    }

    /// Marker fill as RGB
    pub fn rgb(&self) -> [u8; 3] {
        match self {
            Bucket::Low => [46, 160, 67],
            Bucket::Medium => [255, 140, 0],
            Bucket::High => [220, 38, 38],
        }
    }
}

impl std::fmt::Display for Bucket {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Lower bounds (exclusive) of the medium and high buckets
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BucketThresholds {
    pub medium: f64,
    pub high: f64,
}

impl Default for BucketThresholds {
    fn default() -> Self {
        Self {
            medium: MEDIUM_VALUE_THRESHOLD,
            high: HIGH_VALUE_THRESHOLD,
        }
    }
}

impl BucketThresholds {
    /// NaN compares false against both bounds and lands in Low
    pub fn classify(&self, value: f64) -> Bucket {
        if value > self.high {
            Bucket::High
        } else if value > self.medium {
            Bucket::Medium
        } else {
            Bucket::Low
        }
    }
}

/// Classifies with the default thresholds
pub fn classify(value: f64) -> Bucket {
    BucketThresholds::default().classify(value)
}
