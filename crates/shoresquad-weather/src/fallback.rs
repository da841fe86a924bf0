//! Canned snapshot shown whenever live weather is unavailable.

use chrono::{Duration, NaiveDate, Utc};

use crate::types::{ForecastEntry, Humidity, WeatherSnapshot};

pub const FALLBACK_TEMPERATURE_C: f64 = 28.0;
pub const FALLBACK_LOCATION_NAME: &str = "Singapore (sample data)";

const OUTLOOK: [(&str, f64, f64); 4] = [
    ("Partly Cloudy", 60.0, 90.0),
    ("Thundery Showers", 65.0, 95.0),
    ("Fair and Warm", 55.0, 85.0),
    ("Light Rain", 65.0, 95.0),
];

/// Complete snapshot dated from `today`: four days starting tomorrow.
pub fn canned_snapshot(today: NaiveDate) -> WeatherSnapshot {
    let forecast = OUTLOOK
        .iter()
        .zip(1..)
        .map(|(&(condition, low, high), offset)| {
            ForecastEntry::new(
                today + Duration::days(offset),
                condition,
                Humidity::Range {
                    low: Some(low),
                    high: Some(high),
                },
            )
        })
        .collect();

    WeatherSnapshot {
        location_name: FALLBACK_LOCATION_NAME.to_string(),
        temperature: Some(FALLBACK_TEMPERATURE_C),
        forecast,
        fetched_at: Utc::now(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_canned_snapshot_shape() {
        let today = NaiveDate::from_ymd_opt(2026, 2, 27).unwrap();
        let snapshot = canned_snapshot(today);

        assert_eq!(snapshot.temperature, Some(28.0));
        assert_eq!(snapshot.forecast.len(), 4);
        assert_eq!(
            snapshot.forecast[0].parsed_date(),
            NaiveDate::from_ymd_opt(2026, 2, 28)
        );
        assert_eq!(
            snapshot.forecast[3].parsed_date(),
            NaiveDate::from_ymd_opt(2026, 3, 3)
        );
        assert!(snapshot
            .forecast
            .iter()
            .all(|f| f.condition.is_some() && f.humidity.is_some()));
    }
}
