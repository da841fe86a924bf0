//! ShoreSquad page: state, event handlers and HTML regions.

pub mod app_services;
pub mod controller;
pub mod effects;
pub mod error_mapping;
pub mod render;
pub mod state;

pub use app_services::ConfiguredGeolocator;
pub use controller::PageController;
pub use effects::{Effect, Notice, NoticeLevel, Region, Section};
pub use error_mapping::IntoAppError;
pub use render::{Page, RenderError};
pub use state::{AppState, WeatherPanel};
