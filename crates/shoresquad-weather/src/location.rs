//! Device geolocation sources.

use std::future::Future;

use crate::types::{Location, LocationError};

/// Something that can report the user's current position.
///
/// Timeouts are applied by the caller.
pub trait Geolocator: Send + Sync {
    fn locate(&self) -> impl Future<Output = Result<Location, LocationError>> + Send;
}

/// No geolocation on this platform.
#[derive(Debug, Clone, Copy, Default)]
pub struct UnsupportedGeolocator;

impl Geolocator for UnsupportedGeolocator {
    fn locate(&self) -> impl Future<Output = Result<Location, LocationError>> + Send {
        std::future::ready(Err(LocationError::Unsupported))
    }
}

/// Always reports the same coordinates.
#[derive(Debug, Clone)]
pub struct FixedGeolocator {
    location: Location,
}

impl FixedGeolocator {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            location: Location::new(latitude, longitude),
        }
    }
}

impl Geolocator for FixedGeolocator {
    fn locate(&self) -> impl Future<Output = Result<Location, LocationError>> + Send {
        std::future::ready(Ok(self.location.clone()))
    }
}
