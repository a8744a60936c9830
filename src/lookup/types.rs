//! Lookup result types.

use serde::{Deserialize, Serialize};

/// The result of a geolocation lookup.
///
/// Fields other than `ip` may be empty when the database carries no value;
/// `country_name` is the exception and defaults to `"Unknown"`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeoRecord {
    /// The address that was looked up.
    pub ip: String,
    /// ISO 3166-1 alpha-2 country code, uppercased; may be empty.
    pub country_code: String,
    /// English country name; `"Unknown"` when unresolvable.
    pub country_name: String,
    /// City name; may be empty.
    pub city: String,
    /// Region / subdivision name; may be empty.
    pub region: String,
    /// IANA timezone identifier; may be empty.
    pub timezone: String,
}

impl GeoRecord {
    /// Human-readable one-line summary: `"City, Country"`, or just the
    /// country when the city is unknown.
    pub fn title(&self) -> String {
        if self.city.is_empty() {
            self.country_name.clone()
        } else {
            format!("{}, {}", self.city, self.country_name)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(city: &str) -> GeoRecord {
        GeoRecord {
            ip: "1.1.1.1".to_string(),
            country_code: "US".to_string(),
            country_name: "United States".to_string(),
            city: city.to_string(),
            region: String::new(),
            timezone: String::new(),
        }
    }

    #[test]
    fn test_title_with_city() {
        assert_eq!(record("Santa Clara").title(), "Santa Clara, United States");
    }

    #[test]
    fn test_title_without_city() {
        assert_eq!(record("").title(), "United States");
    }

    #[test]
    fn test_serde_round_trip() {
        let original = record("Santa Clara");
        let json = serde_json::to_string(&original).expect("serialize");
        let parsed: GeoRecord = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(parsed, original);
    }
}
