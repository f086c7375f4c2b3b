//! `runQuery` response decoding.
//!
//! The endpoint returns a JSON array with one element per matched document,
//! plus bookkeeping elements (read time only, completion markers) that
//! carry no `document` and are skipped. Field values arrive as the store's
//! typed value union and are collapsed into a plain JSON tree once, here,
//! so nothing downstream re-inspects wire shapes.

use std::collections::BTreeMap;

use serde::Deserialize;
use serde_json::{Map, Value};

use super::FirestoreError;
use vodsite_core::RawDocument;

/// One element of the `runQuery` response stream.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RunQueryElement {
    #[serde(default)]
    pub document: Option<ApiDocument>,
    #[serde(default)]
    pub read_time: Option<String>,
}

/// A document as returned by the REST API.
#[derive(Debug, Deserialize)]
pub struct ApiDocument {
    pub name: String,
    #[serde(default)]
    pub fields: BTreeMap<String, ApiValue>,
}

/// One wire value from the store's typed value union.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ApiValue {
    NullValue(()),
    BooleanValue(bool),
    /// int64 values arrive as decimal strings.
    IntegerValue(String),
    DoubleValue(f64),
    TimestampValue(String),
    StringValue(String),
    /// base64 payload, passed through as a string.
    BytesValue(String),
    ReferenceValue(String),
    GeoPointValue(GeoPoint),
    ArrayValue(ArrayPayload),
    MapValue(MapPayload),
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct GeoPoint {
    #[serde(default)]
    pub latitude: f64,
    #[serde(default)]
    pub longitude: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ArrayPayload {
    #[serde(default)]
    pub values: Vec<ApiValue>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct MapPayload {
    #[serde(default)]
    pub fields: BTreeMap<String, ApiValue>,
}

impl ApiValue {
    /// Collapse the wire union into a plain JSON tree.
    pub fn into_json(self) -> Result<Value, FirestoreError> {
        match self {
            Self::NullValue(()) => Ok(Value::Null),
            Self::BooleanValue(flag) => Ok(Value::Bool(flag)),
            Self::IntegerValue(text) => text
                .parse::<i64>()
                .map(Value::from)
                .map_err(|_| FirestoreError::Parse(format!("bad int64: {text}"))),
            Self::DoubleValue(number) => serde_json::Number::from_f64(number)
                .map(Value::Number)
                .ok_or_else(|| FirestoreError::Parse(format!("non-finite double: {number}"))),
            Self::TimestampValue(text)
            | Self::StringValue(text)
            | Self::BytesValue(text)
            | Self::ReferenceValue(text) => Ok(Value::String(text)),
            Self::GeoPointValue(point) => Ok(serde_json::json!({
                "latitude": point.latitude,
                "longitude": point.longitude,
            })),
            Self::ArrayValue(array) => {
                let values: Result<Vec<Value>, FirestoreError> =
                    array.values.into_iter().map(ApiValue::into_json).collect();
                Ok(Value::Array(values?))
            }
            Self::MapValue(map) => fields_to_json(map.fields).map(Value::Object),
        }
    }
}

fn fields_to_json(fields: BTreeMap<String, ApiValue>) -> Result<Map<String, Value>, FirestoreError> {
    let mut object = Map::with_capacity(fields.len());
    for (key, value) in fields {
        object.insert(key, value.into_json()?);
    }
    Ok(object)
}

impl ApiDocument {
    /// Decode into the store-agnostic document model.
    pub fn into_raw(self) -> Result<RawDocument, FirestoreError> {
        Ok(RawDocument { name: self.name, fields: Value::Object(fields_to_json(self.fields)?) })
    }
}
