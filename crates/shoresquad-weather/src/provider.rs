use std::sync::Arc;

use reqwest::Client;
use serde::Deserialize;
use serde_json::Value;
use tracing::instrument;

use crate::types::{ForecastEntry, Humidity, Location, WeatherError};

const TEMPERATURE_URL: &str = "https://api-open.data.gov.sg/v2/real-time/api/air-temperature";
const FORECAST_URL: &str = "https://api-open.data.gov.sg/v2/real-time/api/four-day-outlook";

#[derive(Debug, Clone)]
pub struct WeatherEndpoints {
    pub temperature_url: String,
    pub forecast_url: String,
}

impl Default for WeatherEndpoints {
    fn default() -> Self {
        Self {
            temperature_url: TEMPERATURE_URL.to_string(),
            forecast_url: FORECAST_URL.to_string(),
        }
    }
}

// Upstream payloads. Every level is optional so a thin or partial body still
// parses; only a body that is not JSON at all is an error.

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct TemperatureResponse {
    data: TemperatureData,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct TemperatureData {
    stations: Vec<StationReading>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct StationReading {
    value: Option<Value>,
    location: Option<StationLocation>,
}

#[derive(Debug, Deserialize)]
struct StationLocation {
    latitude: f64,
    longitude: f64,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ForecastResponse {
    data: ForecastData,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ForecastData {
    forecasts: Vec<RawForecast>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawForecast {
    date: Option<Value>,
    forecast: Option<Value>,
    relative_humidity: Option<Value>,
}

impl RawForecast {
    fn into_entry(self) -> ForecastEntry {
        ForecastEntry {
            date: self.date.as_ref().and_then(text_of),
            condition: self.forecast.as_ref().and_then(|v| {
                text_of(v).or_else(|| {
                    v.get("text")
                        .or_else(|| v.get("summary"))
                        .and_then(text_of)
                })
            }),
            humidity: self.relative_humidity.as_ref().and_then(humidity_of),
        }
    }
}

fn text_of(value: &Value) -> Option<String> {
    value
        .as_str()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
}

fn number_of(value: &Value) -> Option<f64> {
    value
        .as_f64()
        .or_else(|| value.as_str().and_then(|s| s.trim().parse().ok()))
}

fn humidity_of(value: &Value) -> Option<Humidity> {
    if let Some(p) = number_of(value) {
        return Some(Humidity::Percent(p));
    }
    let low = value.get("low").and_then(number_of);
    let high = value.get("high").and_then(number_of);
    if low.is_none() && high.is_none() {
        return None;
    }
    Some(Humidity::Range { low, high })
}

/// Reading from the station nearest `near`, or the first usable one when
/// stations carry no coordinates.
fn pick_reading(stations: &[StationReading], near: Option<&Location>) -> Option<f64> {
    let readings = stations
        .iter()
        .filter_map(|s| s.value.as_ref().and_then(number_of).map(|v| (s, v)));

    match near {
        Some(origin) if stations.iter().any(|s| s.location.is_some()) => readings
            .filter_map(|(s, v)| {
                let at = s.location.as_ref()?;
                let d = (at.latitude - origin.latitude).powi(2)
                    + (at.longitude - origin.longitude).powi(2);
                Some((d, v))
            })
            .min_by(|a, b| a.0.total_cmp(&b.0))
            .map(|(_, v)| v),
        _ => readings.map(|(_, v)| v).next(),
    }
}

#[derive(Debug, Clone)]
pub struct WeatherProvider {
    client: Arc<Client>,
    endpoints: WeatherEndpoints,
}

impl WeatherProvider {
    pub fn new(endpoints: WeatherEndpoints) -> Result<Self, WeatherError> {
        let client = Client::builder().build()?;

        Ok(Self {
            client: Arc::new(client),
            endpoints,
        })
    }

    /// Current air temperature in °C.
    ///
    /// `Ok(None)` means the endpoint answered but carried no usable reading.
    #[instrument(skip(self), level = "debug")]
    pub async fn current_temperature(
        &self,
        near: Option<&Location>,
    ) -> Result<Option<f64>, WeatherError> {
        let response = self
            .client
            .get(&self.endpoints.temperature_url)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(WeatherError::Status {
                endpoint: "temperature",
                status: status.as_u16(),
            });
        }

        let body = response.text().await?;
        let parsed: TemperatureResponse =
            serde_json::from_str(&body).map_err(|e| WeatherError::Parse(e.to_string()))?;

        let reading = pick_reading(&parsed.data.stations, near);
        tracing::debug!(
            stations = parsed.data.stations.len(),
            ?reading,
            "Fetched temperature"
        );
        Ok(reading)
    }

    /// Up to `days` forecast entries, in upstream order.
    #[instrument(skip(self), level = "debug")]
    pub async fn forecast(&self, days: usize) -> Result<Vec<ForecastEntry>, WeatherError> {
        let response = self
            .client
            .get(&self.endpoints.forecast_url)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(WeatherError::Status {
                endpoint: "forecast",
                status: status.as_u16(),
            });
        }

        let body = response.text().await?;
        let parsed: ForecastResponse =
            serde_json::from_str(&body).map_err(|e| WeatherError::Parse(e.to_string()))?;

        Ok(parsed
            .data
            .forecasts
            .into_iter()
            .take(days)
            .map(RawForecast::into_entry)
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn stations(value: Value) -> Vec<StationReading> {
        let parsed: TemperatureResponse =
            serde_json::from_value(json!({ "data": { "stations": value } })).unwrap();
        parsed.data.stations
    }

    #[test]
    fn test_first_numeric_reading_wins() {
        let s = stations(json!([{ "id": "S1" }, { "value": "n/a" }, { "value": 29.4 }, { "value": 31 }]));
        assert_eq!(pick_reading(&s, None), Some(29.4));
    }

    #[test]
    fn test_numeric_string_reading() {
        let s = stations(json!([{ "value": "27.5" }]));
        assert_eq!(pick_reading(&s, None), Some(27.5));
    }

    #[test]
    fn test_nearest_station_when_located() {
        let s = stations(json!([
            { "value": 30.0, "location": { "latitude": 1.45, "longitude": 103.8 } },
            { "value": 27.0, "location": { "latitude": 1.31, "longitude": 103.92 } }
        ]));
        let here = Location::new(1.30, 103.91);
        assert_eq!(pick_reading(&s, Some(&here)), Some(27.0));
    }

    #[test]
    fn test_no_stations() {
        let parsed: TemperatureResponse = serde_json::from_value(json!({})).unwrap();
        assert_eq!(pick_reading(&parsed.data.stations, None), None);
    }

    #[test]
    fn test_forecast_entry_tolerates_shapes() {
        let raw: RawForecast = serde_json::from_value(json!({
            "date": "2026-01-05",
            "forecast": { "text": "Thundery Showers" },
            "relative_humidity": { "low": 60, "high": 95 }
        }))
        .unwrap();
        let entry = raw.into_entry();
        assert_eq!(entry.condition.as_deref(), Some("Thundery Showers"));
        assert_eq!(entry.humidity.unwrap().display(), "60-95%");

        let bare: RawForecast = serde_json::from_value(json!({ "forecast": 12 })).unwrap();
        let entry = bare.into_entry();
        assert_eq!(entry, ForecastEntry::default());
    }
}
