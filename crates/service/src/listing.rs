//! Filters shared by the list endpoints.

use sea_orm::sea_query::{Expr, Func};
use models::search::contains_pattern;
use sea_orm::{ColumnTrait, Condition};

use crate::errors::ServiceError;

/// Case-insensitive substring match of `keyword` over any of `columns`.
/// `None` when the keyword is absent or blank.
pub fn keyword_condition<C: ColumnTrait>(columns: &[C], keyword: Option<&str>) -> Option<Condition> {
    let kw = keyword.map(str::trim).filter(|k| !k.is_empty())?;
    let pattern = contains_pattern(kw);
    let cond = columns.iter().fold(Condition::any(), |cond, col| {
        cond.add(Expr::expr(Func::lower(Expr::col((col.entity_name(), *col)))).like(pattern.clone()))
    });
    Some(cond)
}

pub fn non_blank(keyword: Option<&str>) -> Option<&str> {
    keyword.map(str::trim).filter(|k| !k.is_empty())
}

/// Optional integer query filter; a present, non-numeric value is a 400.
pub fn int_filter(name: &str, raw: Option<&str>) -> Result<Option<i32>, ServiceError> {
    match non_blank(raw) {
        None => Ok(None),
        Some(v) => v
            .parse::<i32>()
            .map(Some)
            .map_err(|_| ServiceError::Validation(format!("Query parameter \"{name}\" must be an integer"))),
    }
}

/// Optional integer query filter; a non-numeric value is treated as absent.
pub fn lenient_int_filter(raw: Option<&str>) -> Option<i32> {
    non_blank(raw).and_then(|v| v.parse::<i32>().ok())
}

/// Optional enum query filter parsed from its upper snake case wire value.
pub fn enum_filter<T: serde::de::DeserializeOwned>(name: &str, raw: Option<&str>) -> Result<Option<T>, ServiceError> {
    match non_blank(raw) {
        None => Ok(None),
        Some(v) => serde_json::from_value(serde_json::Value::String(v.to_string()))
            .map(Some)
            .map_err(|_| ServiceError::Validation(format!("Query parameter \"{name}\" has an invalid value '{v}'"))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use models::enums::VideoFormat;
    use models::website;

    #[test]
    fn blank_keyword_means_no_filter() {
        assert!(keyword_condition(&[website::Column::Title], Some("  ")).is_none());
        assert!(keyword_condition(&[website::Column::Title], None).is_none());
        assert!(keyword_condition(&[website::Column::Title], Some("Shop")).is_some());
    }

    #[test]
    fn int_filters() {
        assert_eq!(int_filter("country_id", Some("91")).unwrap(), Some(91));
        assert!(int_filter("country_id", Some("india")).is_err());
        assert_eq!(lenient_int_filter(Some("abc")), None);
        assert_eq!(lenient_int_filter(Some("7")), Some(7));
    }

    #[test]
    fn enum_filter_parses_wire_values() {
        assert_eq!(enum_filter::<VideoFormat>("format", Some("SQUARE")).unwrap(), Some(VideoFormat::Square));
        assert!(enum_filter::<VideoFormat>("format", Some("round")).is_err());
    }
}
