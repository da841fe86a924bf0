//! The weather request as an ordered list of fallible stages.
//!
//! | Stage              | On failure                                   |
//! |--------------------|----------------------------------------------|
//! | Locate             | stop; the page offers retry and manual entry |
//! | ResolvePlace       | use [`UNKNOWN_PLACE_LABEL`]                  |
//! | CurrentTemperature | replace everything with the canned snapshot  |
//! | Forecast           | omit the forecast                            |
//!
//! Requests are never cancelled. When two overlap, whichever result is
//! rendered last wins.

use std::time::Duration;

use chrono::Utc;

use crate::fallback::canned_snapshot;
use crate::geocode::Geocoder;
use crate::location::Geolocator;
use crate::provider::WeatherProvider;
use crate::types::{Location, LocationError, WeatherSnapshot};

/// Label used when reverse geocoding comes back empty.
pub const UNKNOWN_PLACE_LABEL: &str = "Your Location";

/// Forecast entries kept from the outlook.
pub const FORECAST_DAYS: usize = 4;

const DEFAULT_GEOLOCATION_TIMEOUT: Duration = Duration::from_secs(10);

/// Where stage 1 gets its coordinates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CoordinateSource {
    Geolocation,
    Place(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Locate,
    ResolvePlace,
    CurrentTemperature,
    Forecast,
}

/// What a stage failure does to the rest of the request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailurePolicy {
    StopPipeline,
    UseDefault,
    SubstituteCanned,
    Omit,
}

impl Stage {
    pub const ALL: [Stage; 4] = [
        Stage::Locate,
        Stage::ResolvePlace,
        Stage::CurrentTemperature,
        Stage::Forecast,
    ];

    pub fn on_failure(self) -> FailurePolicy {
        match self {
            Stage::Locate => FailurePolicy::StopPipeline,
            Stage::ResolvePlace => FailurePolicy::UseDefault,
            Stage::CurrentTemperature => FailurePolicy::SubstituteCanned,
            Stage::Forecast => FailurePolicy::Omit,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Stage::Locate => "locate",
            Stage::ResolvePlace => "resolve_place",
            Stage::CurrentTemperature => "current_temperature",
            Stage::Forecast => "forecast",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StageStatus {
    Succeeded,
    FellBack(String),
    Skipped,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StageReport {
    pub stage: Stage,
    pub status: StageStatus,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PipelineReport {
    pub stages: Vec<StageReport>,
}

impl PipelineReport {
    fn record(&mut self, stage: Stage, status: StageStatus) {
        match &status {
            StageStatus::FellBack(reason) => tracing::warn!(
                stage = stage.name(),
                policy = ?stage.on_failure(),
                "Weather stage failed: {}",
                reason
            ),
            StageStatus::Succeeded => tracing::debug!(stage = stage.name(), "Weather stage ok"),
            StageStatus::Skipped => tracing::debug!(stage = stage.name(), "Weather stage skipped"),
        }
        self.stages.push(StageReport { stage, status });
    }

    fn skip_remaining(&mut self, after: Stage) {
        let rest = Stage::ALL.iter().skip_while(|s| **s != after).skip(1);
        for stage in rest {
            self.record(*stage, StageStatus::Skipped);
        }
    }

    pub fn status(&self, stage: Stage) -> Option<&StageStatus> {
        self.stages
            .iter()
            .find(|r| r.stage == stage)
            .map(|r| &r.status)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SnapshotSource {
    Live,
    Fallback,
}

#[derive(Debug, Clone)]
pub enum WeatherOutcome {
    Ready {
        snapshot: WeatherSnapshot,
        source: SnapshotSource,
        report: PipelineReport,
    },
    LocationUnavailable {
        error: LocationError,
        report: PipelineReport,
    },
}

impl WeatherOutcome {
    pub fn report(&self) -> &PipelineReport {
        match self {
            WeatherOutcome::Ready { report, .. } | WeatherOutcome::LocationUnavailable { report, .. } => {
                report
            }
        }
    }

    pub fn snapshot(&self) -> Option<&WeatherSnapshot> {
        match self {
            WeatherOutcome::Ready { snapshot, .. } => Some(snapshot),
            WeatherOutcome::LocationUnavailable { .. } => None,
        }
    }
}

pub struct WeatherPipeline<G> {
    geolocator: G,
    geocoder: Geocoder,
    provider: WeatherProvider,
    geolocation_timeout: Duration,
}

impl<G: Geolocator> WeatherPipeline<G> {
    pub fn new(geolocator: G, geocoder: Geocoder, provider: WeatherProvider) -> Self {
        Self {
            geolocator,
            geocoder,
            provider,
            geolocation_timeout: DEFAULT_GEOLOCATION_TIMEOUT,
        }
    }

    pub fn with_geolocation_timeout(mut self, timeout: Duration) -> Self {
        self.geolocation_timeout = timeout;
        self
    }

    /// Run every stage in order and return what the page should show.
    pub async fn run(&self, source: &CoordinateSource) -> WeatherOutcome {
        let mut report = PipelineReport::default();

        // Stage 1
        let location = match self.locate(source).await {
            Ok(loc) => {
                report.record(Stage::Locate, StageStatus::Succeeded);
                loc
            }
            Err(error) => {
                report.record(Stage::Locate, StageStatus::FellBack(error.to_string()));
                report.skip_remaining(Stage::Locate);
                return WeatherOutcome::LocationUnavailable { error, report };
            }
        };

        // Stage 2
        let location_name = match self.geocoder.reverse(&location).await {
            Some(name) => {
                report.record(Stage::ResolvePlace, StageStatus::Succeeded);
                name
            }
            None => {
                report.record(
                    Stage::ResolvePlace,
                    StageStatus::FellBack("no place name".to_string()),
                );
                UNKNOWN_PLACE_LABEL.to_string()
            }
        };

        // Stage 3
        let temperature = match self.provider.current_temperature(Some(&location)).await {
            Ok(t) => {
                report.record(Stage::CurrentTemperature, StageStatus::Succeeded);
                t
            }
            Err(e) => {
                report.record(Stage::CurrentTemperature, StageStatus::FellBack(e.to_string()));
                report.skip_remaining(Stage::CurrentTemperature);
                return WeatherOutcome::Ready {
                    snapshot: canned_snapshot(Utc::now().date_naive()),
                    source: SnapshotSource::Fallback,
                    report,
                };
            }
        };

        // Stage 4
        let forecast = match self.provider.forecast(FORECAST_DAYS).await {
            Ok(entries) => {
                report.record(Stage::Forecast, StageStatus::Succeeded);
                entries
            }
            Err(e) => {
                report.record(Stage::Forecast, StageStatus::FellBack(e.to_string()));
                Vec::new()
            }
        };

        tracing::info!(
            location = %location_name,
            ?temperature,
            forecast_days = forecast.len(),
            "Live weather ready"
        );

        WeatherOutcome::Ready {
            snapshot: WeatherSnapshot {
                location_name,
                temperature,
                forecast,
                fetched_at: Utc::now(),
            },
            source: SnapshotSource::Live,
            report,
        }
    }

    async fn locate(&self, source: &CoordinateSource) -> Result<Location, LocationError> {
        match source {
            CoordinateSource::Geolocation => {
                tokio::time::timeout(self.geolocation_timeout, self.geolocator.locate())
                    .await
                    .map_err(|_| LocationError::Timeout)?
            }
            CoordinateSource::Place(place) => self.geocoder.search(place).await,
        }
    }
}
