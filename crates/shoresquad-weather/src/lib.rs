//! Weather retrieval for ShoreSquad
//!
//! Locates the user, names the place, and fetches the current temperature
//! and a short forecast from public endpoints. Any failure on the primary
//! endpoint swaps in a canned snapshot so the page always has something
//! complete to show.

pub mod fallback;
pub mod geocode;
pub mod location;
pub mod pipeline;
pub mod provider;
pub mod types;

pub use fallback::{canned_snapshot, FALLBACK_LOCATION_NAME, FALLBACK_TEMPERATURE_C};
pub use geocode::{Geocoder, GeocodingEndpoints};
pub use location::{FixedGeolocator, Geolocator, UnsupportedGeolocator};
pub use pipeline::{
    CoordinateSource, FailurePolicy, PipelineReport, SnapshotSource, Stage, StageReport,
    StageStatus, WeatherOutcome, WeatherPipeline, UNKNOWN_PLACE_LABEL,
};
pub use provider::{WeatherEndpoints, WeatherProvider};
pub use types::*;
