use std::time::Duration;
use chrono::{DateTime, NaiveDateTime, Utc};
use serde::Deserialize;
use serde_json::{Map, Value};
use thiserror::Error;
use crate::manager_bom::errors::BomError;

/// A loosely typed argument as given by a caller or a configuration file.
/// It is coerced to the expected type when a fetch request is built.
#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(untagged)]
pub enum ArgValue {
    Int(i64),
    Float(f64),
    Text(String),
}

impl From<&str> for ArgValue {
    fn from(s: &str) -> Self { ArgValue::Text(s.to_string()) }
}
impl From<String> for ArgValue {
    fn from(s: String) -> Self { ArgValue::Text(s) }
}
impl From<&String> for ArgValue {
    fn from(s: &String) -> Self { ArgValue::Text(s.clone()) }
}
impl From<i32> for ArgValue {
    fn from(v: i32) -> Self { ArgValue::Int(v as i64) }
}
impl From<i64> for ArgValue {
    fn from(v: i64) -> Self { ArgValue::Int(v) }
}
impl From<u32> for ArgValue {
    fn from(v: u32) -> Self { ArgValue::Int(v as i64) }
}
impl From<f64> for ArgValue {
    fn from(v: f64) -> Self { ArgValue::Float(v) }
}

impl ArgValue {
    /// Coerces the value to text
    ///
    pub fn to_text(&self) -> Result<String, BomError> {
        match self {
            ArgValue::Text(s) => Ok(s.clone()),
            ArgValue::Int(i) => Ok(i.to_string()),
            ArgValue::Float(f) if f.is_finite() => Ok(format!("{:?}", f)),
            ArgValue::Float(f) => Err(BomError::InvalidInput(format!("value {} can't be converted to text", f))),
        }
    }

    /// Coerces the value to a float, text is trimmed before parsing
    ///
    pub fn to_float(&self) -> Result<f64, BomError> {
        match self {
            ArgValue::Float(f) => Ok(*f),
            ArgValue::Int(i) => Ok(*i as f64),
            ArgValue::Text(s) => s.trim().parse::<f64>()
                .map_err(|_| BomError::InvalidInput(format!("'{}' can't be converted to a float", s))),
        }
    }

    /// Coerces the value to an integer. Floats are truncated toward zero while
    /// text must hold an integer literal.
    ///
    pub fn to_int(&self) -> Result<i64, BomError> {
        match self {
            ArgValue::Int(i) => Ok(*i),
            ArgValue::Float(f) if f.is_finite() && f.abs() < i64::MAX as f64 => Ok(f.trunc() as i64),
            ArgValue::Float(f) => Err(BomError::InvalidInput(format!("{} can't be converted to an integer", f))),
            ArgValue::Text(s) => s.trim().parse::<i64>()
                .map_err(|_| BomError::InvalidInput(format!("'{}' can't be converted to an integer", s))),
        }
    }
}

/// A validated request for observations
#[derive(Debug, Clone, PartialEq)]
pub struct FetchRequest {
    pub location_name: String,
    pub timeout_seconds: f64,
    pub timeout: Duration,
    pub max_attempts: u32,
}

impl FetchRequest {
    /// Coerces and validates the arguments of a fetch, first failure wins
    ///
    /// # Arguments
    ///
    /// * 'location_name' - station name, must not be empty
    /// * 'timeout_seconds' - seconds to wait for the server per attempt, must be greater than zero
    /// * 'max_attempts' - number of attempts on connection failures, must be at least one
    pub fn new(location_name: &ArgValue, timeout_seconds: &ArgValue, max_attempts: &ArgValue) -> Result<FetchRequest, BomError> {
        let location_name = location_name.to_text()?;
        if location_name.is_empty() {
            return Err(BomError::InvalidInput("location name must not be an empty string".to_string()));
        }

        let timeout_seconds = timeout_seconds.to_float()?;
        if !timeout_seconds.is_finite() || timeout_seconds <= 0.0 {
            return Err(BomError::InvalidInput(format!("timeout must be greater than zero, got {}", timeout_seconds)));
        }
        let timeout = Duration::try_from_secs_f64(timeout_seconds)
            .map_err(|e| BomError::InvalidInput(format!("timeout {} is out of range: {}", timeout_seconds, e)))?;

        let max_attempts = max_attempts.to_int()?;
        if max_attempts < 1 {
            return Err(BomError::InvalidInput(format!("attempt number must be greater than or equal to 1, got {}", max_attempts)));
        }
        let max_attempts = u32::try_from(max_attempts)
            .map_err(|_| BomError::InvalidInput(format!("attempt number {} is too large", max_attempts)))?;

        Ok(FetchRequest { location_name, timeout_seconds, timeout, max_attempts })
    }
}

/// Observation rows indexed by the time of observation
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ObservationTable {
    index: Vec<DateTime<Utc>>,
    rows: Vec<Map<String, Value>>,
}

impl ObservationTable {
    /// Builds a table from JSON records, moving the index field out of each record
    /// and parsing it into a timestamp. Record order is kept.
    ///
    /// # Arguments
    ///
    /// * 'records' - JSON records, each must be an object
    /// * 'index_field' - name of the field holding the observation time
    pub fn from_records(records: Vec<Value>, index_field: &str) -> Result<ObservationTable, TableError> {
        let mut index = Vec::with_capacity(records.len());
        let mut rows = Vec::with_capacity(records.len());

        for (pos, record) in records.into_iter().enumerate() {
            let Value::Object(mut row) = record else {
                return Err(TableError::NotAnObject(pos));
            };
            let raw = row.remove(index_field)
                .ok_or_else(|| TableError::MissingIndex(pos, index_field.to_string()))?;
            let time = match &raw {
                Value::String(s) => parse_timestamp(s),
                Value::Number(n) if n.is_u64() || n.is_i64() => parse_timestamp(&n.to_string()),
                _ => None,
            }.ok_or_else(|| TableError::BadTimestamp(pos, raw.to_string()))?;

            index.push(time);
            rows.push(row);
        }

        Ok(ObservationTable { index, rows })
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn index(&self) -> &[DateTime<Utc>] {
        &self.index
    }

    pub fn rows(&self) -> &[Map<String, Value>] {
        &self.rows
    }

    /// Iterates over (observation time, row) pairs in source order
    ///
    pub fn iter(&self) -> impl Iterator<Item = (&DateTime<Utc>, &Map<String, Value>)> {
        self.index.iter().zip(self.rows.iter())
    }

    /// Returns the union of all field names, in the order they were first seen
    ///
    pub fn columns(&self) -> Vec<&str> {
        let mut columns: Vec<&str> = Vec::new();
        for row in &self.rows {
            for key in row.keys() {
                if !columns.contains(&key.as_str()) {
                    columns.push(key);
                }
            }
        }
        columns
    }

    /// Returns the values of a field for every row, None where a row lacks it
    ///
    /// # Arguments
    ///
    /// * 'field' - name of the field
    pub fn column(&self, field: &str) -> Vec<Option<&Value>> {
        self.rows.iter().map(|r| r.get(field)).collect()
    }

    /// Returns a single value
    ///
    /// # Arguments
    ///
    /// * 'row' - row position
    /// * 'field' - name of the field
    pub fn get(&self, row: usize, field: &str) -> Option<&Value> {
        self.rows.get(row).and_then(|r| r.get(field))
    }
}

/// Parses an observation time given in UTC.
/// BoM uses a compact 'YYYYMMDDHHMMSS' form, RFC 3339 and 'YYYY-MM-DD HH:MM:SS' are accepted as well.
///
/// # Arguments
///
/// * 'raw' - the raw time value
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(dt) = NaiveDateTime::parse_from_str(raw, "%Y%m%d%H%M%S") {
        return Some(dt.and_utc());
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S")
        .ok()
        .map(|dt| dt.and_utc())
}

/// Error depicting records that can't be turned into an observation table
///
#[derive(Error, Debug, PartialEq)]
pub enum TableError {
    #[error("record {0} is not an object")]
    NotAnObject(usize),
    #[error("record {0} has no '{1}' field")]
    MissingIndex(usize, String),
    #[error("record {0} has an invalid timestamp {1}")]
    BadTimestamp(usize, String),
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;
    use serde_json::json;
    use super::*;

    fn request(l: impl Into<ArgValue>, t: impl Into<ArgValue>, a: impl Into<ArgValue>) -> Result<FetchRequest, BomError> {
        FetchRequest::new(&l.into(), &t.into(), &a.into())
    }

    #[test]
    fn test_request_valid() {
        let req = request("Adelaide", 2.5, "3").unwrap();
        assert_eq!(req.location_name, "Adelaide");
        assert_eq!(req.timeout, Duration::from_millis(2500));
        assert_eq!(req.max_attempts, 3);
    }

    #[test]
    fn test_request_empty_location() {
        assert!(matches!(request("", 10, 3), Err(BomError::InvalidInput(_))));
    }

    #[test]
    fn test_request_number_location_is_text() {
        assert_eq!(request(17, 10, 3).unwrap().location_name, "17");
        assert_eq!(request(17.0, 10, 3).unwrap().location_name, "17.0");
        assert_eq!(request(2.5, 10, 3).unwrap().location_name, "2.5");
    }

    #[test]
    fn test_request_bad_timeout() {
        for t in [ArgValue::Float(0.0), ArgValue::Float(-1.0), ArgValue::Int(0), ArgValue::Float(f64::NAN),
                  ArgValue::Float(f64::INFINITY), ArgValue::Text("ten".into()), ArgValue::Text("".into())] {
            assert!(matches!(request("ADELAIDE", t, 3), Err(BomError::InvalidInput(_))));
        }
        assert_eq!(request("ADELAIDE", " 0.5 ", 3).unwrap().timeout_seconds, 0.5);
    }

    #[test]
    fn test_request_bad_attempts() {
        for a in [ArgValue::Int(0), ArgValue::Int(-2), ArgValue::Float(0.9), ArgValue::Text("three".into()),
                  ArgValue::Text("2.0".into()), ArgValue::Float(f64::NAN)] {
            assert!(matches!(request("ADELAIDE", 10, a), Err(BomError::InvalidInput(_))));
        }
        assert_eq!(request("ADELAIDE", 10, 2.7).unwrap().max_attempts, 2);
    }

    #[test]
    fn test_request_first_failure_wins() {
        match request("", -1, 0) {
            Err(BomError::InvalidInput(msg)) => assert!(msg.contains("location")),
            other => panic!("unexpected result: {:?}", other),
        }
        match request("X", -1, 0) {
            Err(BomError::InvalidInput(msg)) => assert!(msg.contains("timeout")),
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_parse_timestamp() {
        let expected = Utc.with_ymd_and_hms(2024, 3, 5, 7, 30, 0).unwrap();
        assert_eq!(parse_timestamp("20240305073000"), Some(expected));
        assert_eq!(parse_timestamp("2024-03-05T18:00:00+10:30"), Some(expected));
        assert_eq!(parse_timestamp("2024-03-05 07:30:00"), Some(expected));
        assert_eq!(parse_timestamp("yesterday"), None);
        assert_eq!(parse_timestamp("20241305073000"), None);
    }

    #[test]
    fn test_table_from_records() {
        let records = vec![
            json!({"aifstime_utc": "20240305073000", "air_temp": 21.5, "name": "Adelaide"}),
            json!({"aifstime_utc": "20240305070000", "air_temp": 21.0, "rain_trace": "0.2"}),
        ];
        let table = ObservationTable::from_records(records, "aifstime_utc").unwrap();

        assert_eq!(table.len(), 2);
        assert_eq!(table.index()[0], Utc.with_ymd_and_hms(2024, 3, 5, 7, 30, 0).unwrap());
        assert_eq!(table.index()[1], Utc.with_ymd_and_hms(2024, 3, 5, 7, 0, 0).unwrap());
        assert_eq!(table.get(1, "air_temp"), Some(&json!(21.0)));
        assert!(table.rows()[0].get("aifstime_utc").is_none());
        assert_eq!(table.columns(), vec!["air_temp", "name", "rain_trace"]);
        assert_eq!(table.column("name"), vec![Some(&json!("Adelaide")), None]);

        let pairs: Vec<(DateTime<Utc>, Option<&Value>)> = table.iter().map(|(t, r)| (*t, r.get("air_temp"))).collect();
        assert_eq!(pairs, vec![
            (Utc.with_ymd_and_hms(2024, 3, 5, 7, 30, 0).unwrap(), Some(&json!(21.5))),
            (Utc.with_ymd_and_hms(2024, 3, 5, 7, 0, 0).unwrap(), Some(&json!(21.0))),
        ]);
    }

    #[test]
    fn test_table_integer_index() {
        let table = ObservationTable::from_records(vec![json!({"aifstime_utc": 20240305073000u64})], "aifstime_utc").unwrap();
        assert_eq!(table.index()[0], Utc.with_ymd_and_hms(2024, 3, 5, 7, 30, 0).unwrap());
    }

    #[test]
    fn test_table_bad_records() {
        let res = ObservationTable::from_records(vec![json!({"aifstime_utc": "20240305073000"}), json!([1])], "aifstime_utc");
        assert_eq!(res, Err(TableError::NotAnObject(1)));

        let res = ObservationTable::from_records(vec![json!({"air_temp": 1.0})], "aifstime_utc");
        assert_eq!(res, Err(TableError::MissingIndex(0, "aifstime_utc".to_string())));

        let res = ObservationTable::from_records(vec![json!({"aifstime_utc": "soon"})], "aifstime_utc");
        assert!(matches!(res, Err(TableError::BadTimestamp(0, _))));
    }

    #[test]
    fn test_table_empty() {
        let table = ObservationTable::from_records(Vec::new(), "aifstime_utc").unwrap();
        assert!(table.is_empty());
        assert!(table.columns().is_empty());
    }
}
