//! Maps state to HTML for each page region.
//!
//! Display is defensive: missing values render as placeholders, and a region
//! that fails to render is replaced by an error panel with a retry button.

use std::collections::HashMap;

use askama::Template;
use shoresquad_services::{Crew, Profile};
use shoresquad_weather::{ForecastEntry, SnapshotSource, WeatherSnapshot, UNKNOWN_PLACE_LABEL};

use crate::effects::Region;
use crate::state::{AppState, WeatherPanel};

const GENERIC_ERROR: &str = "Something went wrong while showing this section.";

#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[error("Template error: {0}")]
    Template(#[from] askama::Error),
}

struct CrewCard {
    id: u32,
    name: String,
    description: String,
    location: String,
    members: u32,
    next_cleanup: String,
    image: String,
}

impl From<&Crew> for CrewCard {
    fn from(crew: &Crew) -> Self {
        Self {
            id: crew.id,
            name: crew.name.clone(),
            description: crew.description.clone(),
            location: crew.location.clone(),
            members: crew.members,
            next_cleanup: crew.next_cleanup.format("%-m/%-d/%Y").to_string(),
            image: crew.image.clone(),
        }
    }
}

struct ProfileView {
    username: String,
    member_since: String,
    cleanups: u32,
    crew_members: u32,
    trash_collected: String,
}

impl From<&Profile> for ProfileView {
    fn from(profile: &Profile) -> Self {
        Self {
            username: profile.username.clone(),
            member_since: profile.joined_date.format("%-m/%-d/%Y").to_string(),
            cleanups: profile.cleanups,
            crew_members: profile.crew_members,
            trash_collected: profile.trash_collected.to_string(),
        }
    }
}

struct ForecastView {
    date: String,
    condition: String,
    humidity: String,
}

impl From<&ForecastEntry> for ForecastView {
    fn from(entry: &ForecastEntry) -> Self {
        let date = match (entry.parsed_date(), entry.date.as_deref()) {
            (Some(d), _) => d.format("%a, %-d %b").to_string(),
            (None, Some(raw)) if !raw.trim().is_empty() => raw.trim().to_string(),
            _ => "Upcoming".to_string(),
        };
        Self {
            date,
            condition: entry
                .condition
                .clone()
                .unwrap_or_else(|| "Unavailable".to_string()),
            humidity: entry
                .humidity
                .as_ref()
                .map(|h| h.display())
                .unwrap_or_else(|| "--".to_string()),
        }
    }
}

struct WeatherView {
    location: String,
    temperature: String,
    sample: bool,
    forecast: Vec<ForecastView>,
}

impl WeatherView {
    fn new(snapshot: &WeatherSnapshot, source: SnapshotSource) -> Self {
        let location = if snapshot.location_name.trim().is_empty() {
            UNKNOWN_PLACE_LABEL.to_string()
        } else {
            snapshot.location_name.clone()
        };
        Self {
            location,
            temperature: temperature_label(snapshot.temperature),
            sample: source == SnapshotSource::Fallback,
            forecast: snapshot.forecast.iter().map(ForecastView::from).collect(),
        }
    }
}

fn temperature_label(temperature: Option<f64>) -> String {
    match temperature {
        Some(t) if t.is_finite() => format!("{}°C", (t * 10.0).round() / 10.0),
        _ => "--".to_string(),
    }
}

#[derive(Template)]
#[template(path = "crews_list.html")]
struct CrewsListTemplate {
    crews: Vec<CrewCard>,
}

#[derive(Template)]
#[template(path = "profile.html")]
struct ProfileTemplate {
    profile: Option<ProfileView>,
}

#[derive(Template)]
#[template(path = "weather_card.html")]
struct WeatherCardTemplate {
    view: WeatherView,
}

#[derive(Template)]
#[template(path = "weather_idle.html")]
struct WeatherIdleTemplate;

#[derive(Template)]
#[template(path = "weather_loading.html")]
struct WeatherLoadingTemplate;

#[derive(Template)]
#[template(path = "location_error.html")]
struct LocationErrorTemplate<'a> {
    message: &'a str,
}

#[derive(Template)]
#[template(path = "error_panel.html")]
struct ErrorPanelTemplate<'a> {
    message: &'a str,
    region: &'a str,
}

#[derive(Template)]
#[template(path = "page.html")]
struct PageTemplate<'a> {
    crews_list: &'a str,
    profile: &'a str,
    weather: &'a str,
}

/// Crew cards, or the empty-state message when `crews` is empty.
pub fn crews_list(crews: &[Crew]) -> Result<String, RenderError> {
    let template = CrewsListTemplate {
        crews: crews.iter().map(CrewCard::from).collect(),
    };
    Ok(template.render()?)
}

pub fn profile(profile: Option<&Profile>) -> Result<String, RenderError> {
    let template = ProfileTemplate {
        profile: profile.map(ProfileView::from),
    };
    Ok(template.render()?)
}

/// Live and canned snapshots both go through here.
pub fn weather_card(snapshot: &WeatherSnapshot, source: SnapshotSource) -> Result<String, RenderError> {
    let template = WeatherCardTemplate {
        view: WeatherView::new(snapshot, source),
    };
    Ok(template.render()?)
}

pub fn weather(panel: &WeatherPanel) -> Result<String, RenderError> {
    let html = match panel {
        WeatherPanel::Idle => WeatherIdleTemplate.render()?,
        WeatherPanel::Loading => WeatherLoadingTemplate.render()?,
        WeatherPanel::Ready { snapshot, source } => weather_card(snapshot, *source)?,
        WeatherPanel::LocationError { message } => LocationErrorTemplate { message }.render()?,
    };
    Ok(html)
}

/// Generic error panel with a retry button for `region`.
pub fn error_panel(region: Region, message: &str) -> String {
    let template = ErrorPanelTemplate {
        message,
        region: region.element_id(),
    };
    template.render().unwrap_or_else(|e| {
        tracing::error!("Error panel failed to render: {}", e);
        format!(
            r#"<div class="error-panel" role="alert"><p>{}</p></div>"#,
            GENERIC_ERROR
        )
    })
}

/// The rendered HTML, or the error panel if rendering failed.
pub fn region_or_error_panel(region: Region, rendered: Result<String, RenderError>) -> String {
    match rendered {
        Ok(html) => html,
        Err(e) => {
            tracing::error!(region = region.element_id(), "Render failed: {}", e);
            error_panel(region, GENERIC_ERROR)
        }
    }
}

/// Render one region from state, never failing.
pub fn region(state: &AppState, region: Region) -> String {
    let rendered = match region {
        Region::CrewsList => crews_list(&state.visible_crews()),
        Region::Profile => profile(state.profile.as_ref()),
        Region::Weather => weather(&state.weather),
    };
    region_or_error_panel(region, rendered)
}

/// Latest HTML of every region.
#[derive(Debug, Clone, Default)]
pub struct Page {
    regions: HashMap<Region, String>,
}

impl Page {
    pub fn set(&mut self, region: Region, html: String) {
        self.regions.insert(region, html);
    }

    pub fn region(&self, region: Region) -> &str {
        self.regions.get(&region).map(String::as_str).unwrap_or("")
    }

    /// The whole document with every region mounted.
    pub fn document(&self) -> Result<String, RenderError> {
        let template = PageTemplate {
            crews_list: self.region(Region::CrewsList),
            profile: self.region(Region::Profile),
            weather: self.region(Region::Weather),
        };
        Ok(template.render()?)
    }
}
