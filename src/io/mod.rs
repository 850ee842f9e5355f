//! JSON decoders for overlay documents.
//!
//! Decoding is lenient: an absent or ill-typed field keeps its default
//! value and is listed in the returned [`LoadReport`]. Only an unreadable
//! source or text that is not a JSON object fails the load.

pub mod finder_chart_json;
pub mod geojson;
pub mod occultation_json;

pub use finder_chart_json::{decode_finder_chart, read_finder_chart};
pub use occultation_json::{decode_occultation_event, read_occultation_event};

use std::path::Path;

use serde::Serialize;
use serde_json::{Map, Value};

use crate::error::{MapError, MapResult};

/// Field-level diagnostics from one decode.
///
/// Paths use `key`, `key.nested` and `array[index].key` notation.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct LoadReport {
    pub missing_fields: Vec<String>,
    pub invalid_fields: Vec<String>,
    pub skipped_records: Vec<String>,
}

impl LoadReport {
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.missing_fields.is_empty()
            && self.invalid_fields.is_empty()
            && self.skipped_records.is_empty()
    }

    #[must_use]
    pub fn is_missing(&self, path: &str) -> bool {
        self.missing_fields.iter().any(|field| field == path)
    }

    #[must_use]
    pub fn issue_count(&self) -> usize {
        self.missing_fields.len() + self.invalid_fields.len() + self.skipped_records.len()
    }
}

pub(crate) fn read_object(path: &Path) -> MapResult<Map<String, Value>> {
    let text = std::fs::read_to_string(path).map_err(|err| MapError::io(path, err))?;
    parse_object(&text)
}

pub(crate) fn parse_object(text: &str) -> MapResult<Map<String, Value>> {
    match serde_json::from_str(text) {
        Ok(Value::Object(object)) => Ok(object),
        Ok(_) => Err(MapError::Decode(
            "document root must be a JSON object".to_owned(),
        )),
        Err(err) => Err(MapError::Decode(err.to_string())),
    }
}

/// Typed field access over one JSON object, recording every miss.
#[derive(Debug, Clone, Copy)]
pub(crate) struct FieldReader<'v, 'p> {
    object: &'v Map<String, Value>,
    prefix: &'p str,
    nested: bool,
}

impl<'v, 'p> FieldReader<'v, 'p> {
    /// Document root: keys absent at the top level are searched for in
    /// nested objects, in document order. Arrays are never searched.
    pub(crate) fn root(object: &'v Map<String, Value>) -> Self {
        Self {
            object,
            prefix: "",
            nested: true,
        }
    }

    pub(crate) fn record(object: &'v Map<String, Value>, prefix: &'p str) -> Self {
        Self {
            object,
            prefix,
            nested: false,
        }
    }

    fn path(&self, key: &str) -> String {
        if self.prefix.is_empty() {
            key.to_owned()
        } else {
            format!("{}.{key}", self.prefix)
        }
    }

    fn get(&self, key: &str) -> Option<&'v Value> {
        if self.nested {
            find_in_objects(self.object, key)
        } else {
            self.object.get(key)
        }
    }

    /// Required number; `None` when absent or not a number.
    pub(crate) fn number(&self, key: &str, report: &mut LoadReport) -> Option<f64> {
        match self.get(key) {
            None | Some(Value::Null) => {
                report.missing_fields.push(self.path(key));
                None
            }
            Some(value) => {
                let number = value.as_f64().filter(|number| number.is_finite());
                if number.is_none() {
                    report.invalid_fields.push(self.path(key));
                }
                number
            }
        }
    }

    pub(crate) fn number_or(&self, key: &str, default: f64, report: &mut LoadReport) -> f64 {
        self.number(key, report).unwrap_or(default)
    }

    /// Optional number: absence is silent, a wrong type is still reported.
    pub(crate) fn optional_number(&self, key: &str, report: &mut LoadReport) -> Option<f64> {
        match self.get(key) {
            None | Some(Value::Null) => None,
            Some(_) => self.number(key, report),
        }
    }

    /// Required text. Numbers are accepted and printed as-is.
    pub(crate) fn text_or_empty(&self, key: &str, report: &mut LoadReport) -> String {
        match self.get(key) {
            None | Some(Value::Null) => {
                report.missing_fields.push(self.path(key));
                String::new()
            }
            Some(Value::String(text)) => text.clone(),
            Some(Value::Number(number)) => number.to_string(),
            Some(_) => {
                report.invalid_fields.push(self.path(key));
                String::new()
            }
        }
    }

    pub(crate) fn optional_text(&self, key: &str, report: &mut LoadReport) -> Option<String> {
        match self.get(key) {
            None | Some(Value::Null) => None,
            Some(_) => Some(self.text_or_empty(key, report)),
        }
    }

    /// Required array; absent or ill-typed yields an empty slice.
    pub(crate) fn array(&self, key: &str, report: &mut LoadReport) -> &'v [Value] {
        match self.get(key) {
            None | Some(Value::Null) => {
                report.missing_fields.push(self.path(key));
                &[]
            }
            Some(Value::Array(items)) => items,
            Some(_) => {
                report.invalid_fields.push(self.path(key));
                &[]
            }
        }
    }
}

/// Object records of `items`; non-object entries are reported as skipped.
pub(crate) fn object_records<'v>(
    key: &str,
    items: &'v [Value],
    report: &mut LoadReport,
) -> Vec<(String, &'v Map<String, Value>)> {
    items
        .iter()
        .enumerate()
        .filter_map(|(index, item)| {
            let path = format!("{key}[{index}]");
            match item.as_object() {
                Some(object) => Some((path, object)),
                None => {
                    report.skipped_records.push(path);
                    None
                }
            }
        })
        .collect()
}

fn find_in_objects<'v>(object: &'v Map<String, Value>, key: &str) -> Option<&'v Value> {
    if let Some(value) = object.get(key) {
        return Some(value);
    }
    object
        .values()
        .filter_map(Value::as_object)
        .find_map(|nested| find_in_objects(nested, key))
}
