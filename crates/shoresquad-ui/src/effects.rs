//! What a handler asks the page to do after updating state.

/// Page sections a handler can scroll to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Section {
    Crews,
    Profile,
    Weather,
}

impl Section {
    pub fn anchor(self) -> &'static str {
        match self {
            Section::Crews => "crews",
            Section::Profile => "profile",
            Section::Weather => "weather",
        }
    }
}

/// Independently re-rendered parts of the page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Region {
    CrewsList,
    Profile,
    Weather,
}

impl Region {
    pub const ALL: [Region; 3] = [Region::CrewsList, Region::Profile, Region::Weather];

    /// Element id the region is mounted under.
    pub fn element_id(self) -> &'static str {
        match self {
            Region::CrewsList => "crews-list",
            Region::Profile => "profile",
            Region::Weather => "weather-container",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Success,
    Info,
    Error,
}

/// A blocking message shown to the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

impl Notice {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Success,
            message: message.into(),
        }
    }

    pub fn info(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Info,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Error,
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    Notify(Notice),
    ScrollTo(Section),
    /// Clear the profile form inputs.
    ResetForm,
    Rendered(Region),
}

impl Effect {
    /// The notice text, if this effect is a notice.
    pub fn notice(&self) -> Option<&str> {
        match self {
            Effect::Notify(n) => Some(&n.message),
            _ => None,
        }
    }
}
