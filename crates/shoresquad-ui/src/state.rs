use shoresquad_services::{Crew, CrewDirectory, Profile};
use shoresquad_weather::{SnapshotSource, WeatherSnapshot};

/// What the weather region currently shows.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum WeatherPanel {
    /// Nothing requested yet.
    #[default]
    Idle,
    Loading,
    Ready {
        snapshot: WeatherSnapshot,
        source: SnapshotSource,
    },
    /// Stage 1 failed; the panel offers retry and manual entry.
    LocationError { message: String },
}

/// Everything the page renders from.
#[derive(Debug, Clone)]
pub struct AppState {
    pub crews: CrewDirectory,
    pub profile: Option<Profile>,
    pub search_term: String,
    pub weather: WeatherPanel,
    pub loading: bool,
}

impl AppState {
    pub fn new(crews: CrewDirectory) -> Self {
        Self {
            crews,
            profile: None,
            search_term: String::new(),
            weather: WeatherPanel::Idle,
            loading: false,
        }
    }

    /// Crews matching the current search term.
    pub fn visible_crews(&self) -> Vec<Crew> {
        self.crews.search(&self.search_term)
    }

    pub fn has_profile(&self) -> bool {
        self.profile.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_visible_crews_follow_search_term() {
        let mut state = AppState::new(CrewDirectory::seeded());
        assert_eq!(state.visible_crews().len(), 4);

        state.search_term = "MALIBU".to_string();
        let visible = state.visible_crews();
        assert_eq!(visible.len(), 1);
        assert_eq!(visible[0].name, "Wave Riders for Earth");
    }
}
