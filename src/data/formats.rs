use crate::{
    core::constants::{INVALID_JSON_MESSAGE, UNSUPPORTED_FORMAT_MESSAGE},
    data::{
        conversion::{number_from_json, parse_number, text_from_json},
        record::Record,
    },
};
use serde_json::Value;
use std::path::Path;

/// Supported upload formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataFormat {
    Csv,
    Json,
}

impl DataFormat {
    /// Maps a file extension (without the dot, any case) to a format
    pub fn from_extension(extension: &str) -> Option<Self> {
        match extension.to_ascii_lowercase().as_str() {
            "csv" => Some(Self::Csv),
            "json" => Some(Self::Json),
            _ => None,
        }
    }

    /// Derives the format from the text after the last dot of a file name
    pub fn from_file_name(file_name: &str) -> Result<Self, IngestError> {
        let extension = Path::new(file_name)
            .extension()
            .and_then(|ext| ext.to_str())
            .unwrap_or("");

        Self::from_extension(extension).ok_or_else(|| IngestError::UnsupportedFormat {
            extension: extension.to_string(),
        })
    }
}

impl std::fmt::Display for DataFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DataFormat::Csv => write!(f, "csv"),
            DataFormat::Json => write!(f, "json"),
        }
    }
}

/// Records accepted from one upload, plus how many candidates were dropped
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedBatch {
    pub format: DataFormat,
    pub records: Vec<Record>,
    pub dropped: usize,
}

impl ParsedBatch {
    fn new(format: DataFormat) -> Self {
        Self {
            format,
            records: Vec::new(),
            dropped: 0,
        }
    }

    fn push_candidate(&mut self, candidate: Option<Record>, position: usize) {
        match candidate {
            Some(record) if record.is_valid() => self.records.push(record),
            Some(record) => {
                log::debug!(
                    "dropping {} entry {} ({:?}): field {} is not a number",
                    self.format,
                    position,
                    record.city,
                    record.first_invalid_field().unwrap_or("?"),
                );
                self.dropped += 1;
            }
            None => {
                log::debug!("dropping {} entry {}: no city", self.format, position);
                self.dropped += 1;
            }
        }
    }
}

/// Turns uploaded file text into validated records
pub struct DataProcessor;

impl DataProcessor {
    /// Parses a whole upload. The format comes from the file name's extension.
    pub fn parse_file(file_name: &str, data: &str) -> Result<ParsedBatch, IngestError> {
        let format = DataFormat::from_file_name(file_name)?;
        Self::parse(data, format)
    }

    pub fn parse(data: &str, format: DataFormat) -> Result<ParsedBatch, IngestError> {
        let batch = match format {
            DataFormat::Csv => Self::parse_csv(data)?,
            DataFormat::Json => Self::parse_json(data)?,
        };
        log::info!(
            "parsed {} upload: {} records accepted, {} dropped",
            format,
            batch.records.len(),
            batch.dropped
        );
        Ok(batch)
    }

    // Header row names the columns; blank lines and ragged rows are tolerated
    fn parse_csv(data: &str) -> Result<ParsedBatch, IngestError> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_reader(data.as_bytes());

        let headers = reader.headers()?.clone();
        let column = |name: &str| {
            headers
                .iter()
                .position(|h| h.trim_start_matches('\u{feff}').trim() == name)
        };
        let (city_col, lat_col, lng_col, value_col) =
            (column("city"), column("lat"), column("lng"), column("value"));

        let mut batch = ParsedBatch::new(DataFormat::Csv);

        for (index, row) in reader.records().enumerate() {
            let row = match row {
                Ok(row) => row,
                Err(e) => {
                    log::debug!("dropping csv row {}: {}", index + 1, e);
                    batch.dropped += 1;
                    continue;
                }
            };

            let number = |col: Option<usize>| {
                col.and_then(|c| row.get(c))
                    .map(parse_number)
                    .unwrap_or(f64::NAN)
            };
            let candidate = city_col.and_then(|c| row.get(c)).map(|city| {
                Record::new(city, number(lat_col), number(lng_col), number(value_col))
            });

            batch.push_candidate(candidate, index + 1);
        }

        Ok(batch)
    }

    // Top-level array of objects; anything else is a structural error
    fn parse_json(data: &str) -> Result<ParsedBatch, IngestError> {
        let json: Value = serde_json::from_str(data).map_err(|e| IngestError::InvalidJson {
            detail: e.to_string(),
        })?;

        let Value::Array(elements) = json else {
            return Err(IngestError::InvalidJson {
                detail: "top-level value is not an array".to_string(),
            });
        };

        let mut batch = ParsedBatch::new(DataFormat::Json);

        for (index, element) in elements.iter().enumerate() {
            let candidate = element.as_object().and_then(|object| {
                let city = object.get("city").and_then(text_from_json)?;
                let number = |key: &str| object.get(key).map(number_from_json).unwrap_or(f64::NAN);
                Some(Record::new(city, number("lat"), number("lng"), number("value")))
            });

            batch.push_candidate(candidate, index);
        }

        Ok(batch)
    }
}

/// Errors that abort an upload as a whole. Row-level failures are never
/// errors; those rows are dropped.
#[derive(Debug, thiserror::Error)]
pub enum IngestError {
    #[error("{}", UNSUPPORTED_FORMAT_MESSAGE)]
    UnsupportedFormat { extension: String },
    #[error("{}", INVALID_JSON_MESSAGE)]
    InvalidJson { detail: String },
    #[error("Invalid CSV: {0}")]
    Csv(#[from] csv::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_from_file_name() {
        assert_eq!(DataFormat::from_file_name("cities.csv").unwrap(), DataFormat::Csv);
        assert_eq!(DataFormat::from_file_name("Cities.JSON").unwrap(), DataFormat::Json);
        assert_eq!(
            DataFormat::from_file_name("/tmp/dir.v2/points.csv").unwrap(),
            DataFormat::Csv
        );

        for name in ["cities.xlsx", "cities", "csv", "cities.csv.bak"] {
            let err = DataFormat::from_file_name(name).unwrap_err();
            assert!(matches!(err, IngestError::UnsupportedFormat { .. }), "{}", name);
            assert_eq!(
                err.to_string(),
                "Unsupported file format. Please upload a CSV or JSON file."
            );
        }
    }

    #[test]
    fn test_csv_parsing() {
        let csv_data = "city,lat,lng,value\nLahore,31.5,74.3,12000000\nInvalidRow,abc,74.3,500";
        let result = DataProcessor::parse(csv_data, DataFormat::Csv).unwrap();

        assert_eq!(result.records, vec![Record::new("Lahore", 31.5, 74.3, 12_000_000.0)]);
        assert_eq!(result.dropped, 1);
    }

    #[test]
    fn test_csv_column_order_extra_columns_and_blank_lines() {
        let csv_data = "value,province,lng,city,lat\n\n6000000,Sindh,67.0,Karachi,24.8\n\n1000000,Balochistan,67.0,Quetta,30.2\n";
        let result = DataProcessor::parse(csv_data, DataFormat::Csv).unwrap();

        assert_eq!(result.records.len(), 2);
        assert_eq!(result.records[0], Record::new("Karachi", 24.8, 67.0, 6_000_000.0));
        assert_eq!(result.records[1].city, "Quetta");
        assert_eq!(result.dropped, 0);
    }

    #[test]
    fn test_csv_quoted_fields_and_short_rows() {
        let csv_data = "city,lat,lng,value\n\"Islamabad, ICT\",33.7,73.1,\"1,000\"\nShort,10.0\n";
        let result = DataProcessor::parse(csv_data, DataFormat::Csv).unwrap();

        // "1,000" coerces to its numeric prefix
        assert_eq!(result.records, vec![Record::new("Islamabad, ICT", 33.7, 73.1, 1.0)]);
        assert_eq!(result.dropped, 1);
    }

    #[test]
    fn test_csv_missing_columns_drop_every_row() {
        let result = DataProcessor::parse("name,lat,lng,value\nLahore,31.5,74.3,1", DataFormat::Csv)
            .unwrap();
        assert!(result.records.is_empty());
        assert_eq!(result.dropped, 1);

        let result = DataProcessor::parse("", DataFormat::Csv).unwrap();
        assert!(result.records.is_empty());
        assert_eq!(result.dropped, 0);
    }

    #[test]
    fn test_csv_header_whitespace_and_bom() {
        let csv_data = "\u{feff}city , lat, lng ,value\nMultan,30.2,71.5,2000000";
        let result = DataProcessor::parse(csv_data, DataFormat::Csv).unwrap();
        assert_eq!(result.records, vec![Record::new("Multan", 30.2, 71.5, 2_000_000.0)]);
    }

    #[test]
    fn test_json_parsing() {
        let json = r#"[{"city":"Karachi","lat":24.8,"lng":67.0,"value":6000000}]"#;
        let result = DataProcessor::parse(json, DataFormat::Json).unwrap();

        assert_eq!(result.records, vec![Record::new("Karachi", 24.8, 67.0, 6_000_000.0)]);
    }

    #[test]
    fn test_json_coercion_and_drops() {
        let json = r#"[
            {"city":"Peshawar","lat":"34.0","lng":"71.5","value":"2300000","extra":true},
            {"city":"NoValue","lat":1,"lng":2},
            {"city":null,"lat":1,"lng":2,"value":3},
            {"lat":1,"lng":2,"value":3},
            42,
            {"city":"Inf","lat":1,"lng":2,"value":"Infinity"}
        ]"#;
        let result = DataProcessor::parse(json, DataFormat::Json).unwrap();

        assert_eq!(result.records, vec![Record::new("Peshawar", 34.0, 71.5, 2_300_000.0)]);
        assert_eq!(result.dropped, 5);
    }

    #[test]
    fn test_json_out_of_range_number_drops_only_its_row() {
        let json = r#"[
            {"city":"Huge","lat":1,"lng":2,"value":1e400},
            {"city":"Ok","lat":1,"lng":2,"value":3}
        ]"#;
        let result = DataProcessor::parse(json, DataFormat::Json).unwrap();

        assert_eq!(result.records, vec![Record::new("Ok", 1.0, 2.0, 3.0)]);
        assert_eq!(result.dropped, 1);
    }

    #[test]
    fn test_json_null_element_is_dropped() {
        let json = r#"[null, {"city":"Ok","lat":1,"lng":2,"value":3}]"#;
        let result = DataProcessor::parse(json, DataFormat::Json).unwrap();

        assert_eq!(result.records.len(), 1);
        assert_eq!(result.dropped, 1);
    }

    #[test]
    fn test_invalid_json() {
        for text in ["{not valid}", "", "{\"city\": \"Lahore\"}", "[1, 2"] {
            let err = DataProcessor::parse(text, DataFormat::Json).unwrap_err();
            assert!(matches!(err, IngestError::InvalidJson { .. }), "{:?}", text);
            assert_eq!(err.to_string(), "Invalid JSON format");
        }
    }

    #[test]
    fn test_parse_file_dispatches_on_extension() {
        let batch = DataProcessor::parse_file("points.JSON", "[]").unwrap();
        assert_eq!(batch.format, DataFormat::Json);
        assert!(batch.records.is_empty());

        assert!(DataProcessor::parse_file("points.txt", "city,lat,lng,value").is_err());
    }
}
