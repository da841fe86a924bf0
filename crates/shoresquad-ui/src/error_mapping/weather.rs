use shoresquad_core::{AppError, ReqwestErrorExt};
use shoresquad_weather::{LocationError, WeatherError};

use super::IntoAppError;

fn location_message(err: &LocationError) -> &'static str {
    match err {
        LocationError::Unsupported => "Geolocation is not supported by your browser",
        LocationError::PermissionDenied => {
            "Location access denied. Please enable location in your browser settings."
        }
        LocationError::Timeout => "Getting your location took too long. Please try again.",
        LocationError::PlaceNotFound(_) => "We couldn't find that place. Try another name.",
        LocationError::Other(_) => "We couldn't look up that place right now. Please try again.",
    }
}

impl IntoAppError for LocationError {
    fn into_app_error(self) -> AppError {
        AppError::Location {
            message: location_message(&self),
            detail: self.to_string(),
        }
    }
}

impl IntoAppError for WeatherError {
    fn into_app_error(self) -> AppError {
        match self {
            WeatherError::Network(e) => AppError::Network(e.into_network_error()),
            WeatherError::Status { endpoint, status } => {
                AppError::Weather(format!("{} returned HTTP {}", endpoint, status))
            }
            WeatherError::Parse(s) => AppError::Weather(s),
            WeatherError::Location(e) => e.into_app_error(),
        }
    }
}

impl IntoAppError for reqwest::Error {
    fn into_app_error(self) -> AppError {
        AppError::Network(self.into_network_error())
    }
}
