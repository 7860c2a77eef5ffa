//! Field-level checks shared by every entity's write path.

use chrono::{DateTime, FixedOffset, NaiveDate};

use crate::errors::ModelError;

/// Trimmed value of a required string, or a validation error naming `field`.
pub fn require_non_blank(field: &str, value: &str) -> Result<String, ModelError> {
    let v = value.trim();
    if v.is_empty() {
        return Err(ModelError::Validation(format!("{field} is required")));
    }
    Ok(v.to_string())
}

pub fn validate_http_url(field: &str, value: &str) -> Result<String, ModelError> {
    let v = require_non_blank(field, value)?;
    let lower = v.to_ascii_lowercase();
    let rest = lower
        .strip_prefix("https://")
        .or_else(|| lower.strip_prefix("http://"))
        .ok_or_else(|| ModelError::Validation(format!("{field} must be a valid http(s) URL")))?;
    if rest.is_empty() || rest.starts_with('/') || rest.contains(char::is_whitespace) {
        return Err(ModelError::Validation(format!("{field} must be a valid http(s) URL")));
    }
    Ok(v)
}

/// Accepts RFC 3339 timestamps or bare `YYYY-MM-DD` dates (midnight UTC).
pub fn parse_date(field: &str, value: &str) -> Result<DateTime<FixedOffset>, ModelError> {
    let v = value.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(v) {
        return Ok(dt);
    }
    NaiveDate::parse_from_str(v, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|ndt| ndt.and_utc().fixed_offset())
        .ok_or_else(|| ModelError::Validation(format!("{field} must be a date (YYYY-MM-DD or RFC 3339)")))
}
