//! Builds the page's services from configuration.

use std::future::Future;
use std::time::Duration;

use shoresquad_core::{AppError, Config, MembershipPolicy as ConfiguredPolicy};
use shoresquad_services::{CrewDirectory, FileKeyValueStore, MembershipPolicy, ProfileStore};
use shoresquad_weather::{
    CoordinateSource, Geocoder, GeocodingEndpoints, Geolocator, Location, LocationError,
    WeatherEndpoints, WeatherPipeline, WeatherProvider,
};

use crate::error_mapping::IntoAppError;

/// Geolocation as configured: fixed coordinates, or unsupported.
#[derive(Debug, Clone, Default)]
pub struct ConfiguredGeolocator {
    location: Option<Location>,
}

impl ConfiguredGeolocator {
    pub fn from_config(config: &Config) -> Self {
        Self {
            location: config
                .weather
                .fixed_location
                .as_ref()
                .map(|c| Location::new(c.latitude, c.longitude)),
        }
    }
}

impl Geolocator for ConfiguredGeolocator {
    fn locate(&self) -> impl Future<Output = Result<Location, LocationError>> + Send {
        std::future::ready(self.location.clone().ok_or(LocationError::Unsupported))
    }
}

pub fn membership_policy(policy: ConfiguredPolicy) -> MembershipPolicy {
    match policy {
        ConfiguredPolicy::Unbounded => MembershipPolicy::Unbounded,
        ConfiguredPolicy::OncePerCrew => MembershipPolicy::OncePerCrew,
    }
}

pub fn crew_directory(config: &Config) -> CrewDirectory {
    CrewDirectory::seeded().with_policy(membership_policy(config.crews.membership_policy))
}

pub fn geocoding_endpoints(config: &Config) -> GeocodingEndpoints {
    GeocodingEndpoints {
        reverse_url: config.geocoding.reverse_url.clone(),
        search_url: config.geocoding.search_url.clone(),
        user_agent: config.geocoding.user_agent.clone(),
    }
}

pub fn weather_endpoints(config: &Config) -> WeatherEndpoints {
    WeatherEndpoints {
        temperature_url: config.weather.temperature_url.clone(),
        forecast_url: config.weather.forecast_url.clone(),
    }
}

pub fn weather_pipeline<G: Geolocator>(
    config: &Config,
    geolocator: G,
) -> Result<WeatherPipeline<G>, AppError> {
    let geocoder =
        Geocoder::new(geocoding_endpoints(config)).map_err(IntoAppError::into_app_error)?;
    let provider =
        WeatherProvider::new(weather_endpoints(config)).map_err(IntoAppError::into_app_error)?;

    Ok(WeatherPipeline::new(geolocator, geocoder, provider).with_geolocation_timeout(
        Duration::from_secs(config.weather.geolocation_timeout_secs),
    ))
}

/// Profile store under the configured data directory.
pub fn profile_store(config: &Config) -> Result<ProfileStore<FileKeyValueStore>, AppError> {
    let store =
        FileKeyValueStore::open(&config.storage.data_dir).map_err(IntoAppError::into_app_error)?;
    Ok(ProfileStore::new(store))
}

/// Where the first weather request gets its coordinates.
pub fn default_coordinate_source(config: &Config) -> CoordinateSource {
    match config.weather.default_place.as_deref().map(str::trim) {
        Some(place) if !place.is_empty() => CoordinateSource::Place(place.to_string()),
        _ => CoordinateSource::Geolocation,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shoresquad_core::FixedCoordinates;

    #[tokio::test]
    async fn test_configured_geolocator() {
        let mut config = Config::default();
        assert_eq!(
            ConfiguredGeolocator::from_config(&config).locate().await,
            Err(LocationError::Unsupported)
        );

        config.weather.fixed_location = Some(FixedCoordinates {
            latitude: 1.3,
            longitude: 103.9,
        });
        let loc = ConfiguredGeolocator::from_config(&config)
            .locate()
            .await
            .unwrap();
        assert_eq!((loc.latitude, loc.longitude), (1.3, 103.9));
    }

    #[test]
    fn test_default_coordinate_source() {
        let mut config = Config::default();
        assert_eq!(
            default_coordinate_source(&config),
            CoordinateSource::Geolocation
        );

        config.weather.default_place = Some("  ".into());
        assert_eq!(
            default_coordinate_source(&config),
            CoordinateSource::Geolocation
        );

        config.weather.default_place = Some("Changi Beach".into());
        assert_eq!(
            default_coordinate_source(&config),
            CoordinateSource::Place("Changi Beach".into())
        );
    }

    #[test]
    fn test_policy_from_config() {
        let mut config = Config::default();
        config.crews.membership_policy = ConfiguredPolicy::OncePerCrew;
        assert_eq!(crew_directory(&config).policy(), MembershipPolicy::OncePerCrew);
    }

    #[test]
    fn test_profile_store_in_data_dir() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = Config::default();
        config.storage.data_dir = dir.path().to_path_buf();

        let store = profile_store(&config).unwrap();
        assert!(store.load().unwrap().is_none());
    }
}
