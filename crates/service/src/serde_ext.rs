//! Lenient field decoders.
//!
//! Multipart forms deliver every value as text, so numeric and date fields
//! accept either a JSON number or a string holding one. An empty string on an
//! optional field reads as absent.

use chrono::{DateTime, FixedOffset};
use serde::de::{self, DeserializeOwned, Deserializer};
use serde::Deserialize;
use serde_json::Value;

use crate::errors::ServiceError;

/// Decode a JSON object (from a JSON body or collected multipart text fields)
/// into a typed input.
pub fn decode<T: DeserializeOwned>(value: Value) -> Result<T, ServiceError> {
    serde_json::from_value(value).map_err(|e| ServiceError::Validation(e.to_string()))
}

/// Pull the array under `key` out of a sync body and decode each entry.
/// A missing or non-array value fails with `invalid_message`.
pub fn decode_batch<T: DeserializeOwned>(body: Value, key: &str, invalid_message: &str) -> Result<Vec<T>, ServiceError> {
    match body {
        Value::Object(mut map) => match map.remove(key) {
            Some(Value::Array(items)) => items.into_iter().map(decode).collect(),
            _ => Err(ServiceError::BadRequest(invalid_message.to_string())),
        },
        _ => Err(ServiceError::BadRequest(invalid_message.to_string())),
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum NumOrStr {
    Int(i64),
    Str(String),
}

fn to_i64<E: de::Error>(raw: NumOrStr) -> Result<Option<i64>, E> {
    match raw {
        NumOrStr::Int(n) => Ok(Some(n)),
        NumOrStr::Str(s) if s.trim().is_empty() => Ok(None),
        NumOrStr::Str(s) => s
            .trim()
            .parse::<i64>()
            .map(Some)
            .map_err(|_| E::custom(format!("expected an integer, got '{s}'"))),
    }
}

fn narrow<E: de::Error>(n: i64) -> Result<i32, E> {
    i32::try_from(n).map_err(|_| E::custom(format!("integer {n} out of range")))
}

pub fn opt_i32<'de, D: Deserializer<'de>>(d: D) -> Result<Option<i32>, D::Error> {
    match Option::<NumOrStr>::deserialize(d)? {
        None => Ok(None),
        Some(raw) => to_i64(raw)?.map(narrow).transpose(),
    }
}

pub fn req_i32<'de, D: Deserializer<'de>>(d: D) -> Result<i32, D::Error> {
    to_i64(NumOrStr::deserialize(d)?)?
        .map(narrow)
        .transpose()?
        .ok_or_else(|| de::Error::custom("expected an integer, got an empty value"))
}

pub fn req_i64<'de, D: Deserializer<'de>>(d: D) -> Result<i64, D::Error> {
    to_i64(NumOrStr::deserialize(d)?)?.ok_or_else(|| de::Error::custom("expected an integer, got an empty value"))
}

/// `YYYY-MM-DD` or RFC 3339.
pub fn opt_date<'de, D: Deserializer<'de>>(d: D) -> Result<Option<DateTime<FixedOffset>>, D::Error> {
    match Option::<String>::deserialize(d)? {
        None => Ok(None),
        Some(s) if s.trim().is_empty() => Ok(None),
        Some(s) => models::validation::parse_date("date", &s).map(Some).map_err(de::Error::custom),
    }
}

/// Integer list given either as a JSON array or a comma separated string.
pub fn i32_list<'de, D: Deserializer<'de>>(d: D) -> Result<Vec<i32>, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        List(Vec<NumOrStr>),
        Str(String),
    }
    let parts: Vec<NumOrStr> = match Raw::deserialize(d)? {
        Raw::List(v) => v,
        Raw::Str(s) => s.split(',').map(|p| NumOrStr::Str(p.to_string())).collect(),
    };
    parts
        .into_iter()
        .filter_map(|p| to_i64::<D::Error>(p).transpose())
        .map(|r| r.and_then(narrow))
        .collect()
}

/// Boolean given as JSON bool or "true"/"false".
pub fn opt_bool<'de, D: Deserializer<'de>>(d: D) -> Result<Option<bool>, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Bool(bool),
        Str(String),
    }
    match Option::<Raw>::deserialize(d)? {
        None => Ok(None),
        Some(Raw::Bool(b)) => Ok(Some(b)),
        Some(Raw::Str(s)) => match s.trim().to_ascii_lowercase().as_str() {
            "" => Ok(None),
            "true" | "1" => Ok(Some(true)),
            "false" | "0" => Ok(Some(false)),
            other => Err(de::Error::custom(format!("expected a boolean, got '{other}'"))),
        },
    }
}
