//! Field extraction by ordered alias probing.
//!
//! Different database vendors and schema vintages expose the same semantic
//! field under different key paths: country code may live at
//! `country.iso_code`, `country.code`, or a bare top-level `country`. Each
//! logical field therefore has a static, ordered list of path specifiers,
//! evaluated in order; the first alias yielding a non-empty string wins.
//! The alias lists cover only observed schemas; nothing is guessed.

use serde_json::Value;

use crate::lookup::country_names::english_country_name;
use crate::lookup::types::GeoRecord;

const COUNTRY_CODE_PATHS: &[&str] = &[
    "country.iso_code",
    "country.code",
    "country.country_code",
    "countryCode",
    "country_code",
    "registered_country.iso_code",
    "registered_country.code",
];

const COUNTRY_NAME_PATHS: &[&str] = &[
    "country.names.en",
    "country.name",
    "country_name",
    "registered_country.names.en",
    "registered_country.name",
];

const CITY_PATHS: &[&str] = &["city.names.en", "city.name", "city", "city_name"];

const REGION_PATHS: &[&str] = &[
    "subdivisions.0.names.en",
    "subdivisions.0.name",
    "stateProv",
    "state_prov",
    "region",
];

const TIMEZONE_PATHS: &[&str] = &["location.time_zone", "time_zone", "timezone"];

/// Builds a `GeoRecord` for `ip` from a codec record by alias probing.
pub(crate) fn extract_record(ip: &str, record: &Value) -> GeoRecord {
    let mut country_code = first_non_empty(record, COUNTRY_CODE_PATHS).unwrap_or_default();
    let mut country_name = first_non_empty(record, COUNTRY_NAME_PATHS).unwrap_or_default();

    // Some flat schemas put either the code or the name under a bare
    // top-level "country"; length disambiguates which one it is.
    if country_code.is_empty() {
        if let Some(country) = value_at_path(record, "country").filter(|v| v.len() == 2) {
            country_code = country;
        }
    }
    if country_name.is_empty() {
        if let Some(country) = value_at_path(record, "country").filter(|v| v.len() > 2) {
            country_name = country;
        }
    }

    country_code = country_code.to_uppercase();

    if country_name.is_empty() && country_code.len() == 2 {
        if let Some(name) = english_country_name(&country_code) {
            country_name = name.to_string();
        }
    }
    if country_name.is_empty() {
        country_name = "Unknown".to_string();
    }

    GeoRecord {
        ip: ip.to_string(),
        country_code,
        country_name,
        city: first_non_empty(record, CITY_PATHS).unwrap_or_default(),
        region: first_non_empty(record, REGION_PATHS).unwrap_or_default(),
        timezone: first_non_empty(record, TIMEZONE_PATHS).unwrap_or_default(),
    }
}

/// First alias in `paths` that resolves to a non-empty string.
pub(crate) fn first_non_empty(record: &Value, paths: &[&str]) -> Option<String> {
    paths
        .iter()
        .find_map(|path| value_at_path(record, path).filter(|v| !v.is_empty()))
}

/// Resolves a dot-separated path against a nested field map.
///
/// Numeric segments index into arrays (`subdivisions.0.name`). String and
/// numeric leaves stringify; any other leaf type resolves to `None`.
pub(crate) fn value_at_path(record: &Value, path: &str) -> Option<String> {
    let mut current = record;
    for segment in path.split('.') {
        current = match current {
            Value::Array(items) => {
                let index: usize = segment.parse().ok()?;
                items.get(index)?
            }
            Value::Object(map) => map.get(segment)?,
            _ => return None,
        };
    }

    match current {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}
