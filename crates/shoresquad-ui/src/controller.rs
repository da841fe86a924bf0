//! Page controller: owns the state, reacts to user events, re-renders regions.
//!
//! Every handler updates [`AppState`] first, then re-renders the regions it
//! touched and reports what it did as a list of [`Effect`]s. Crew and profile
//! actions require a saved profile; without one the user is sent to the
//! profile section instead.

use chrono::Utc;
use shoresquad_core::AppError;
use shoresquad_services::{
    CrewDraft, CrewError, KeyValueStore, ProfileError, ProfileForm, ProfileStore,
};
use shoresquad_weather::{CoordinateSource, Geolocator, WeatherOutcome, WeatherPipeline};

use crate::effects::{Effect, Notice, Region, Section};
use crate::error_mapping::IntoAppError;
use crate::render::{self, Page};
use crate::state::{AppState, WeatherPanel};

const PROFILE_REQUIRED: &str = "Please create your profile first!";

pub struct PageController<S, G> {
    state: AppState,
    profiles: ProfileStore<S>,
    weather: WeatherPipeline<G>,
    page: Page,
}

impl<S: KeyValueStore, G: Geolocator> PageController<S, G> {
    pub fn new(state: AppState, profiles: ProfileStore<S>, weather: WeatherPipeline<G>) -> Self {
        Self {
            state,
            profiles,
            weather,
            page: Page::default(),
        }
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub fn page(&self) -> &Page {
        &self.page
    }

    pub fn profiles(&self) -> &ProfileStore<S> {
        &self.profiles
    }

    /// Load the saved profile and render every region.
    pub fn boot(&mut self) -> Vec<Effect> {
        self.state.profile = match self.profiles.load() {
            Ok(profile) => profile,
            Err(ProfileError::Corrupt(e)) => {
                tracing::warn!("Ignoring corrupt saved profile: {}", e);
                None
            }
            Err(e) => {
                tracing::warn!("Could not load saved profile: {}", e);
                None
            }
        };

        tracing::info!(
            crews = self.state.crews.list().len(),
            has_profile = self.state.has_profile(),
            "Page booted"
        );
        Region::ALL.iter().map(|r| self.render(*r)).collect()
    }

    pub fn get_started(&self) -> Vec<Effect> {
        vec![Effect::ScrollTo(Section::Crews)]
    }

    pub fn search(&mut self, term: &str) -> Vec<Effect> {
        self.state.search_term = term.to_string();
        vec![self.render(Region::CrewsList)]
    }

    pub fn submit_profile(&mut self, form: ProfileForm) -> Vec<Effect> {
        let profile = match form.into_profile(Utc::now()) {
            Ok(p) => p,
            Err(e) => return vec![failure_notice(e.into_app_error())],
        };

        if let Err(e) = self.profiles.save(&profile) {
            return vec![failure_notice(e.into_app_error())];
        }

        tracing::info!(username = %profile.username, "Profile saved");
        self.state.crews.forget_joins();
        self.state.profile = Some(profile);
        vec![
            Effect::Notify(Notice::success("✅ Profile saved! Welcome to ShoreSquad!")),
            Effect::ResetForm,
            self.render(Region::Profile),
        ]
    }

    pub fn clear_profile(&mut self) -> Vec<Effect> {
        if let Err(e) = self.profiles.clear() {
            return vec![failure_notice(e.into_app_error())];
        }
        self.state.crews.forget_joins();
        self.state.profile = None;
        vec![self.render(Region::Profile)]
    }

    pub fn join_crew(&mut self, crew_id: u32) -> Vec<Effect> {
        let Some(mut profile) = self.state.profile.clone() else {
            return profile_required();
        };

        let crew = match self.state.crews.join(crew_id, &mut profile) {
            Ok(crew) => crew,
            Err(CrewError::AlreadyJoined(name)) => {
                return vec![Effect::Notify(Notice::info(format!(
                    "You're already part of {}!",
                    name
                )))];
            }
            Err(e) => return vec![failure_notice(e.into_app_error())],
        };

        if let Err(e) = self.profiles.save(&profile) {
            self.state.crews.forget_join(crew_id);
            return vec![failure_notice(e.into_app_error())];
        }

        self.state.profile = Some(profile);
        vec![
            Effect::Notify(Notice::success(format!(
                "✅ You've joined {}! Time to make waves! 🌊",
                crew.name
            ))),
            self.render(Region::Profile),
        ]
    }

    /// A blank field cancels creation without a notice.
    pub fn create_crew(&mut self, draft: CrewDraft) -> Vec<Effect> {
        if !self.state.has_profile() {
            return profile_required();
        }

        let crew = match self.state.crews.create(draft) {
            Ok(crew) => crew,
            Err(CrewError::MissingField(field)) => {
                tracing::debug!(field, "Crew creation cancelled");
                return Vec::new();
            }
            Err(e) => return vec![failure_notice(e.into_app_error())],
        };

        self.state.search_term.clear();
        vec![
            self.render(Region::CrewsList),
            Effect::Notify(Notice::success(format!(
                "🎉 {} created! Invite your friends to join!",
                crew.name
            ))),
        ]
    }

    /// Show the loading placeholder, run the pipeline, render the result.
    ///
    /// Overlapping requests are not cancelled; the last one to finish wins.
    pub async fn request_weather(&mut self, source: CoordinateSource) -> Vec<Effect> {
        self.state.loading = true;
        self.state.weather = WeatherPanel::Loading;
        let mut effects = vec![self.render(Region::Weather)];

        let outcome = self.weather.run(&source).await;
        self.state.loading = false;
        self.state.weather = match outcome {
            WeatherOutcome::Ready {
                snapshot, source, ..
            } => WeatherPanel::Ready { snapshot, source },
            WeatherOutcome::LocationUnavailable { error, .. } => WeatherPanel::LocationError {
                message: error.into_app_error().user_message().to_string(),
            },
        };

        effects.push(self.render(Region::Weather));
        effects
    }

    fn render(&mut self, region: Region) -> Effect {
        self.page.set(region, render::region(&self.state, region));
        Effect::Rendered(region)
    }
}

fn failure_notice(error: AppError) -> Effect {
    tracing::warn!(class = ?error.class(), "{}", error);
    Effect::Notify(Notice::error(error.user_message()))
}

fn profile_required() -> Vec<Effect> {
    vec![
        Effect::Notify(Notice::info(PROFILE_REQUIRED)),
        Effect::ScrollTo(Section::Profile),
    ]
}
