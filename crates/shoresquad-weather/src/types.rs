use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Geographic location
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub latitude: f64,
    pub longitude: f64,
    pub city_name: Option<String>,
}

impl Location {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
            city_name: None,
        }
    }
}

/// Relative humidity reported for a forecast day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Humidity {
    Percent(f64),
    Range { low: Option<f64>, high: Option<f64> },
}

impl Humidity {
    /// "65%", "70-90%", or "--" when nothing usable is present.
    pub fn display(&self) -> String {
        match *self {
            Humidity::Percent(p) => format!("{:.0}%", p),
            Humidity::Range {
                low: Some(low),
                high: Some(high),
            } => format!("{:.0}-{:.0}%", low, high),
            Humidity::Range {
                low: Some(v),
                high: None,
            }
            | Humidity::Range {
                low: None,
                high: Some(v),
            } => format!("{:.0}%", v),
            Humidity::Range {
                low: None,
                high: None,
            } => "--".to_string(),
        }
    }
}

/// One day of the multi-day outlook. Every field may be missing upstream.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ForecastEntry {
    pub date: Option<String>,
    pub condition: Option<String>,
    pub humidity: Option<Humidity>,
}

impl ForecastEntry {
    pub fn new(date: NaiveDate, condition: &str, humidity: Humidity) -> Self {
        Self {
            date: Some(date.format("%Y-%m-%d").to_string()),
            condition: Some(condition.to_string()),
            humidity: Some(humidity),
        }
    }

    /// Parsed calendar date, if the upstream value is an ISO date or timestamp.
    pub fn parsed_date(&self) -> Option<NaiveDate> {
        let raw = self.date.as_deref()?.trim();
        NaiveDate::parse_from_str(raw, "%Y-%m-%d")
            .ok()
            .or_else(|| {
                DateTime::parse_from_rfc3339(raw)
                    .ok()
                    .map(|dt| dt.date_naive())
            })
            .or_else(|| raw.get(..10).and_then(|d| NaiveDate::parse_from_str(d, "%Y-%m-%d").ok()))
    }
}

/// Current temperature plus up to four forecast entries.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherSnapshot {
    pub location_name: String,
    /// Degrees Celsius
    pub temperature: Option<f64>,
    pub forecast: Vec<ForecastEntry>,
    pub fetched_at: DateTime<Utc>,
}

/// Location service errors
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum LocationError {
    #[error("Geolocation is not supported")]
    Unsupported,
    #[error("Location permission denied")]
    PermissionDenied,
    #[error("Location request timed out")]
    Timeout,
    #[error("No place matches {0:?}")]
    PlaceNotFound(String),
    #[error("Location error: {0}")]
    Other(String),
}

/// Weather provider errors
#[derive(Debug, thiserror::Error)]
pub enum WeatherError {
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),
    #[error("{endpoint} endpoint returned HTTP {status}")]
    Status { endpoint: &'static str, status: u16 },
    #[error("Parse error: {0}")]
    Parse(String),
    #[error("Location error: {0}")]
    Location(#[from] LocationError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_location_serializes_coordinates_and_label() {
        let json = serde_json::to_value(Location::new(1.3, 103.9)).unwrap();
        assert_eq!(
            json,
            serde_json::json!({ "latitude": 1.3, "longitude": 103.9, "city_name": null })
        );
    }

    #[test]
    fn test_humidity_display() {
        assert_eq!(Humidity::Percent(65.0).display(), "65%");
        assert_eq!(
            Humidity::Range {
                low: Some(70.0),
                high: Some(90.0)
            }
            .display(),
            "70-90%"
        );
        assert_eq!(
            Humidity::Range {
                low: None,
                high: Some(85.0)
            }
            .display(),
            "85%"
        );
        assert_eq!(
            Humidity::Range {
                low: None,
                high: None
            }
            .display(),
            "--"
        );
    }

    #[test]
    fn test_humidity_deserializes_number_or_range() {
        let n: Humidity = serde_json::from_str("72").unwrap();
        assert_eq!(n, Humidity::Percent(72.0));

        let r: Humidity = serde_json::from_str(r#"{"low":60,"high":95}"#).unwrap();
        assert_eq!(
            r,
            Humidity::Range {
                low: Some(60.0),
                high: Some(95.0)
            }
        );
    }

    #[test]
    fn test_parsed_date_accepts_date_and_timestamp() {
        let plain = ForecastEntry {
            date: Some("2026-01-05".into()),
            ..Default::default()
        };
        assert_eq!(plain.parsed_date(), NaiveDate::from_ymd_opt(2026, 1, 5));

        let stamp = ForecastEntry {
            date: Some("2026-01-06T00:00:00+08:00".into()),
            ..Default::default()
        };
        assert_eq!(stamp.parsed_date(), NaiveDate::from_ymd_opt(2026, 1, 6));

        let junk = ForecastEntry {
            date: Some("Tuesday".into()),
            ..Default::default()
        };
        assert_eq!(junk.parsed_date(), None);
    }
}
