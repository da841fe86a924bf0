//! Geocoding: coordinates to place names and back.
//! Uses Nominatim (OpenStreetMap) - free, no API key required.

use reqwest::Client;
use serde::Deserialize;
use tracing::instrument;

use crate::types::{Location, LocationError};

const NOMINATIM_REVERSE_URL: &str = "https://nominatim.openstreetmap.org/reverse";
const NOMINATIM_SEARCH_URL: &str = "https://nominatim.openstreetmap.org/search";
const USER_AGENT: &str = concat!("ShoreSquad/", env!("CARGO_PKG_VERSION"));

#[derive(Debug, Clone)]
pub struct GeocodingEndpoints {
    pub reverse_url: String,
    pub search_url: String,
    pub user_agent: String,
}

impl Default for GeocodingEndpoints {
    fn default() -> Self {
        Self {
            reverse_url: NOMINATIM_REVERSE_URL.to_string(),
            search_url: NOMINATIM_SEARCH_URL.to_string(),
            user_agent: USER_AGENT.to_string(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct NominatimResponse {
    address: Option<NominatimAddress>,
}

#[derive(Debug, Deserialize)]
struct NominatimAddress {
    city: Option<String>,
    town: Option<String>,
    village: Option<String>,
    municipality: Option<String>,
    state_district: Option<String>,
    state: Option<String>,
    county: Option<String>,
    country: Option<String>,
}

#[derive(Debug, Deserialize)]
struct NominatimPlace {
    lat: Option<String>,
    lon: Option<String>,
    display_name: Option<String>,
}

#[derive(Debug, Clone)]
pub struct Geocoder {
    client: Client,
    endpoints: GeocodingEndpoints,
}

impl Geocoder {
    pub fn new(endpoints: GeocodingEndpoints) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .user_agent(endpoints.user_agent.clone())
            .build()?;

        Ok(Self { client, endpoints })
    }

    /// Reverse geocode coordinates to a human-readable place name (e.g. "Seattle, Washington").
    /// Returns `None` on failure or timeout; the caller picks its own label.
    #[instrument(skip(self), level = "debug")]
    pub async fn reverse(&self, location: &Location) -> Option<String> {
        if location.city_name.is_some() {
            return location.city_name.clone();
        }

        let url = format!(
            "{}?lat={}&lon={}&format=json&addressdetails=1&layer=address&zoom=10",
            self.endpoints.reverse_url, location.latitude, location.longitude
        );

        let response = match self.client.get(&url).send().await {
            Ok(r) => r,
            Err(e) => {
                tracing::debug!("Reverse geocode request failed: {}", e);
                return None;
            }
        };

        if !response.status().is_success() {
            tracing::debug!("Reverse geocode returned status {}", response.status());
            return None;
        }

        let body: NominatimResponse = match response.json().await {
            Ok(b) => b,
            Err(e) => {
                tracing::debug!("Reverse geocode parse error: {}", e);
                return None;
            }
        };

        let result = place_label(body.address?)?;
        tracing::info!("Reverse geocoded to: {}", result);
        Some(result)
    }

    /// Resolve a typed place name to coordinates using the first search hit.
    #[instrument(skip(self), level = "debug")]
    pub async fn search(&self, place: &str) -> Result<Location, LocationError> {
        let query = place.trim();
        if query.is_empty() {
            return Err(LocationError::PlaceNotFound(place.to_string()));
        }

        let url = format!(
            "{}?q={}&format=json&limit=1",
            self.endpoints.search_url,
            urlencoding::encode(query)
        );

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| LocationError::Other(e.to_string()))?;

        if !response.status().is_success() {
            return Err(LocationError::Other(format!(
                "place search returned status {}",
                response.status()
            )));
        }

        let places: Vec<NominatimPlace> = response
            .json()
            .await
            .map_err(|e| LocationError::Other(e.to_string()))?;

        let located = places.into_iter().find_map(|p| {
            let latitude = p.lat?.trim().parse::<f64>().ok()?;
            let longitude = p.lon?.trim().parse::<f64>().ok()?;
            let label = p
                .display_name
                .as_deref()
                .and_then(|n| n.split(',').next())
                .map(str::trim)
                .filter(|n| !n.is_empty())
                .unwrap_or(query)
                .to_string();
            Some(Location {
                latitude,
                longitude,
                city_name: Some(label),
            })
        });

        match located {
            Some(loc) => {
                tracing::info!(
                    "Resolved {:?} to {}, {}",
                    query,
                    loc.latitude,
                    loc.longitude
                );
                Ok(loc)
            }
            None => Err(LocationError::PlaceNotFound(query.to_string())),
        }
    }
}

/// Primary place (city > town > village > ...) with a state or country suffix.
fn place_label(addr: NominatimAddress) -> Option<String> {
    let state = addr.state.clone();
    let country = addr.country.clone();

    let place = addr
        .city
        .or(addr.town)
        .or(addr.village)
        .or(addr.municipality)
        .or(addr.state_district)
        .or(addr.county)
        .or(addr.state)
        .or(addr.country)?;

    let suffix = state
        .as_deref()
        .filter(|s| !s.is_empty() && *s != place)
        .or_else(|| {
            country
                .as_deref()
                .filter(|c| !c.is_empty() && *c != place)
        });

    Some(match suffix {
        Some(s) => format!("{}, {}", place, s),
        None => place,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn address(city: Option<&str>, state: Option<&str>, country: Option<&str>) -> NominatimAddress {
        NominatimAddress {
            city: city.map(String::from),
            town: None,
            village: None,
            municipality: None,
            state_district: None,
            state: state.map(String::from),
            county: None,
            country: country.map(String::from),
        }
    }

    #[test]
    fn test_place_label_prefers_city_with_state() {
        let label = place_label(address(Some("Santa Monica"), Some("California"), Some("USA")));
        assert_eq!(label.as_deref(), Some("Santa Monica, California"));
    }

    #[test]
    fn test_place_label_uses_country_when_no_state() {
        let label = place_label(address(Some("Singapore"), None, Some("Singapore")));
        assert_eq!(label.as_deref(), Some("Singapore"));

        let label = place_label(address(Some("Bedok"), None, Some("Singapore")));
        assert_eq!(label.as_deref(), Some("Bedok, Singapore"));
    }

    #[test]
    fn test_place_label_empty_address() {
        assert_eq!(place_label(address(None, None, None)), None);
    }

    #[tokio::test]
    async fn test_reverse_preserves_existing_city() {
        let geocoder = Geocoder::new(GeocodingEndpoints::default()).unwrap();
        let loc = Location {
            city_name: Some("Malibu".to_string()),
            ..Location::new(34.03, -118.78)
        };
        assert_eq!(geocoder.reverse(&loc).await.as_deref(), Some("Malibu"));
    }

    #[tokio::test]
    async fn test_search_blank_place_is_not_found() {
        let geocoder = Geocoder::new(GeocodingEndpoints::default()).unwrap();
        let err = geocoder.search("   ").await.unwrap_err();
        assert!(matches!(err, LocationError::PlaceNotFound(_)));
    }
}
