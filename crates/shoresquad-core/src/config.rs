use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use url::Url;

/// Cache tag used when the build does not inject one.
pub const DEFAULT_CACHE_TAG: &str = "shorequad-v1";

/// Configuration validation errors
#[derive(Debug, Clone)]
pub struct ConfigValidationError {
    pub field: String,
    pub message: String,
}

impl std::fmt::Display for ConfigValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Result of config validation
#[derive(Debug, Clone, Default)]
pub struct ValidationResult {
    pub errors: Vec<ConfigValidationError>,
    pub warnings: Vec<ConfigValidationError>,
}

impl ValidationResult {
    /// Returns true if there are no errors (warnings are OK)
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn add_error(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.errors.push(ConfigValidationError {
            field: field.into(),
            message: message.into(),
        });
    }

    pub fn add_warning(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.warnings.push(ConfigValidationError {
            field: field.into(),
            message: message.into(),
        });
    }

    /// Get a user-friendly message summarizing all errors
    pub fn error_summary(&self) -> String {
        self.errors
            .iter()
            .map(|e| e.to_string())
            .collect::<Vec<_>>()
            .join("; ")
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Application configuration directory
    pub config_dir: PathBuf,

    /// Local key-value storage
    #[serde(default)]
    pub storage: StorageConfig,

    /// Weather endpoints and location settings
    #[serde(default)]
    pub weather: WeatherConfig,

    /// Geocoding service settings
    #[serde(default)]
    pub geocoding: GeocodingConfig,

    /// Offline cache worker settings
    #[serde(default)]
    pub offline: OfflineConfig,

    /// Crew directory settings
    #[serde(default)]
    pub crews: CrewsConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Directory holding the local key-value records
    pub data_dir: PathBuf,
}

fn default_data_dir() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("shoresquad")
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
        }
    }
}

/// Fixed coordinates used in place of device geolocation
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FixedCoordinates {
    pub latitude: f64,
    pub longitude: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeatherConfig {
    /// Current temperature by station
    pub temperature_url: String,

    /// Multi-day forecast
    pub forecast_url: String,

    /// How long to wait for a geolocation fix
    #[serde(default = "default_geolocation_timeout")]
    pub geolocation_timeout_secs: u64,

    /// Place name looked up when no geolocation is available
    #[serde(default)]
    pub default_place: Option<String>,

    /// Coordinates reported by the geolocator; unset means geolocation is unsupported
    #[serde(default)]
    pub fixed_location: Option<FixedCoordinates>,
}

fn default_geolocation_timeout() -> u64 {
    10
}

impl Default for WeatherConfig {
    fn default() -> Self {
        Self {
            temperature_url: "https://api-open.data.gov.sg/v2/real-time/api/air-temperature"
                .to_string(),
            forecast_url: "https://api-open.data.gov.sg/v2/real-time/api/four-day-outlook"
                .to_string(),
            geolocation_timeout_secs: default_geolocation_timeout(),
            default_place: None,
            fixed_location: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeocodingConfig {
    pub reverse_url: String,
    pub search_url: String,
    pub user_agent: String,
}

impl Default for GeocodingConfig {
    fn default() -> Self {
        Self {
            reverse_url: "https://nominatim.openstreetmap.org/reverse".to_string(),
            search_url: "https://nominatim.openstreetmap.org/search".to_string(),
            user_agent: concat!("ShoreSquad/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OfflineConfig {
    /// Name of the current cache generation
    #[serde(default = "default_cache_tag")]
    pub cache_tag: String,

    /// Origin that relative asset paths resolve against
    pub origin: String,

    /// Directory backing the on-disk cache storage
    #[serde(default = "default_cache_dir")]
    pub cache_dir: PathBuf,

    /// App shell cached on install
    #[serde(default = "default_assets")]
    pub assets: Vec<String>,

    /// Page served when the network is unreachable
    #[serde(default = "default_fallback_page")]
    pub fallback_page: String,
}

fn default_cache_tag() -> String {
    option_env!("SHORESQUAD_CACHE_TAG")
        .unwrap_or(DEFAULT_CACHE_TAG)
        .to_string()
}

fn default_cache_dir() -> PathBuf {
    dirs::cache_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("shoresquad")
}

fn default_assets() -> Vec<String> {
    ["/", "/index.html", "/css/styles.css", "/js/app.js"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}

fn default_fallback_page() -> String {
    "/index.html".to_string()
}

impl Default for OfflineConfig {
    fn default() -> Self {
        Self {
            cache_tag: default_cache_tag(),
            origin: "http://localhost:8080".to_string(),
            cache_dir: default_cache_dir(),
            assets: default_assets(),
            fallback_page: default_fallback_page(),
        }
    }
}

/// How repeated crew joins affect the profile counter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum MembershipPolicy {
    #[default]
    Unbounded,
    OncePerCrew,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CrewsConfig {
    #[serde(default)]
    pub membership_policy: MembershipPolicy,
}

impl Default for Config {
    fn default() -> Self {
        let config_dir = dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("shoresquad");

        Self {
            config_dir,
            storage: StorageConfig::default(),
            weather: WeatherConfig::default(),
            geocoding: GeocodingConfig::default(),
            offline: OfflineConfig::default(),
            crews: CrewsConfig::default(),
        }
    }
}

impl Config {
    /// Load configuration from file, creating default if it doesn't exist
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path()?;
        Self::load_from(&config_path)
    }

    /// Load configuration from an explicit path, writing defaults there if missing
    pub fn load_from(config_path: &Path) -> Result<Self> {
        if !config_path.exists() {
            let config = Self::default();
            config.save_to(config_path)?;
            return Ok(config);
        }

        let contents =
            std::fs::read_to_string(config_path).context("Failed to read config file")?;

        let config: Config = toml::from_str(&contents).context("Failed to parse config file")?;

        Ok(config)
    }

    /// Load configuration and validate it
    ///
    /// Returns an error if validation fails with critical errors.
    pub fn load_validated() -> Result<(Self, ValidationResult)> {
        let config = Self::load()?;
        let validation = config.validate();

        if !validation.is_valid() {
            anyhow::bail!(
                "Configuration validation failed: {}",
                validation.error_summary()
            );
        }

        for warning in &validation.warnings {
            tracing::warn!("Config warning: {}", warning);
        }

        Ok((config, validation))
    }

    /// Validate the configuration
    pub fn validate(&self) -> ValidationResult {
        let mut result = ValidationResult::default();

        validate_url(
            &self.weather.temperature_url,
            "weather.temperature_url",
            &mut result,
        );
        validate_url(&self.weather.forecast_url, "weather.forecast_url", &mut result);
        validate_url(
            &self.geocoding.reverse_url,
            "geocoding.reverse_url",
            &mut result,
        );
        validate_url(&self.geocoding.search_url, "geocoding.search_url", &mut result);
        validate_url(&self.offline.origin, "offline.origin", &mut result);

        if self.weather.geolocation_timeout_secs == 0 {
            result.add_error(
                "weather.geolocation_timeout_secs",
                "Geolocation timeout must be greater than 0",
            );
        }

        if let Some(coords) = self.weather.fixed_location {
            if !(-90.0..=90.0).contains(&coords.latitude) {
                result.add_error("weather.fixed_location.latitude", "Latitude out of range");
            }
            if !(-180.0..=180.0).contains(&coords.longitude) {
                result.add_error(
                    "weather.fixed_location.longitude",
                    "Longitude out of range",
                );
            }
        }

        if self.geocoding.user_agent.trim().is_empty() {
            result.add_warning(
                "geocoding.user_agent",
                "Nominatim rejects requests without a user agent",
            );
        }

        if self.offline.cache_tag.trim().is_empty() {
            result.add_error("offline.cache_tag", "Cache tag must not be empty");
        }

        if self.offline.assets.is_empty() {
            result.add_warning("offline.assets", "No assets will be cached on install");
        }

        if !self.offline.fallback_page.starts_with('/') {
            result.add_error(
                "offline.fallback_page",
                "Fallback page must be a same-origin path starting with '/'",
            );
        } else if !self.offline.assets.contains(&self.offline.fallback_page) {
            result.add_warning(
                "offline.fallback_page",
                "Fallback page is not part of the cached assets",
            );
        }

        result
    }

    /// Save configuration to file
    pub fn save(&self) -> Result<()> {
        let config_path = Self::config_path()?;
        self.save_to(&config_path)
    }

    fn save_to(&self, config_path: &Path) -> Result<()> {
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent).context("Failed to create config directory")?;
        }

        let contents = toml::to_string_pretty(self).context("Failed to serialize config")?;

        std::fs::write(config_path, contents).context("Failed to write config file")?;

        Ok(())
    }

    /// Get the path to the configuration file
    fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .context("Failed to get config directory")?
            .join("shoresquad");

        Ok(config_dir.join("config.toml"))
    }
}

/// Validate a URL field
fn validate_url(url_str: &str, field_name: &str, result: &mut ValidationResult) {
    match Url::parse(url_str) {
        Ok(url) => {
            if url.scheme() != "http" && url.scheme() != "https" {
                result.add_error(
                    field_name,
                    format!("URL must use http or https scheme, got: {}", url.scheme()),
                );
            }

            if url.host().is_none() {
                result.add_error(field_name, "URL must have a host");
            }

            if url.port() == Some(0) {
                result.add_error(field_name, "Port cannot be 0");
            }
        }
        Err(e) => {
            result.add_error(field_name, format!("Invalid URL: {}", e));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_default_config() {
        let config = Config::default();
        let result = config.validate();
        assert!(result.is_valid(), "Default config should be valid: {:?}", result.errors);
    }

    #[test]
    fn test_default_assets_include_fallback() {
        let config = Config::default();
        assert!(config.offline.assets.contains(&config.offline.fallback_page));
        assert_eq!(config.offline.assets.len(), 4);
    }

    #[test]
    fn test_invalid_url() {
        let mut config = Config::default();
        config.weather.temperature_url = "not-a-url".to_string();
        let result = config.validate();
        assert!(!result.is_valid());
        assert!(result.errors.iter().any(|e| e.field == "weather.temperature_url"));
    }

    #[test]
    fn test_invalid_url_scheme() {
        let mut config = Config::default();
        config.offline.origin = "ftp://localhost:8080".to_string();
        let result = config.validate();
        assert!(!result.is_valid());
        assert!(result.errors.iter().any(|e| e.message.contains("http or https")));
    }

    #[test]
    fn test_zero_geolocation_timeout() {
        let mut config = Config::default();
        config.weather.geolocation_timeout_secs = 0;
        let result = config.validate();
        assert!(!result.is_valid());
        assert!(result
            .errors
            .iter()
            .any(|e| e.field == "weather.geolocation_timeout_secs"));
    }

    #[test]
    fn test_empty_cache_tag_is_error() {
        let mut config = Config::default();
        config.offline.cache_tag = "  ".to_string();
        assert!(!config.validate().is_valid());
    }

    #[test]
    fn test_out_of_range_coordinates() {
        let mut config = Config::default();
        config.weather.fixed_location = Some(FixedCoordinates {
            latitude: 91.0,
            longitude: 0.0,
        });
        let result = config.validate();
        assert!(result
            .errors
            .iter()
            .any(|e| e.field == "weather.fixed_location.latitude"));
    }

    #[test]
    fn test_load_from_creates_default_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let config = Config::load_from(&path).unwrap();
        assert!(path.exists());
        assert_eq!(config.crews.membership_policy, MembershipPolicy::Unbounded);

        let reloaded = Config::load_from(&path).unwrap();
        assert_eq!(reloaded.offline.cache_tag, config.offline.cache_tag);
    }

    #[test]
    fn test_partial_file_uses_section_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            "config_dir = \"/tmp/shoresquad\"\n\n[crews]\nmembership_policy = \"once_per_crew\"\n",
        )
        .unwrap();

        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.crews.membership_policy, MembershipPolicy::OncePerCrew);
        assert_eq!(config.weather.geolocation_timeout_secs, 10);
        assert_eq!(config.offline.fallback_page, "/index.html");
    }

    #[test]
    fn test_older_file_with_request_timeout_still_loads() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        let mut text = toml::to_string_pretty(&Config::default()).unwrap();
        text = text.replace(
            "geolocation_timeout_secs = 10",
            "geolocation_timeout_secs = 10\nrequest_timeout_secs = 10",
        );
        assert!(text.contains("request_timeout_secs"));
        std::fs::write(&path, text).unwrap();

        let config = Config::load_from(&path).unwrap();
        assert!(config.validate().is_valid());
        assert_eq!(config.weather.geolocation_timeout_secs, 10);
    }

    #[test]
    fn test_validation_result_error_summary() {
        let mut result = ValidationResult::default();
        result.add_error("field1", "error1");
        result.add_error("field2", "error2");
        let summary = result.error_summary();
        assert!(summary.contains("field1"));
        assert!(summary.contains("field2"));
    }
}
