//! The local user profile and its single-record store.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::store::{KeyValueStore, StoreError};

/// Key of the one profile record in the key-value store.
pub const PROFILE_KEY: &str = "shorequad_user";

/// Identity plus cumulative impact stats.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    pub username: String,
    pub email: String,
    pub joined_date: DateTime<Utc>,
    pub cleanups: u32,
    pub crew_members: u32,
    /// Kilograms
    pub trash_collected: f64,
}

impl Profile {
    /// A fresh profile with zeroed stats.
    pub fn new(username: impl Into<String>, email: impl Into<String>, now: DateTime<Utc>) -> Self {
        Self {
            username: username.into(),
            email: email.into(),
            joined_date: now,
            cleanups: 0,
            crew_members: 0,
            trash_collected: 0.0,
        }
    }
}

/// Raw profile form input.
#[derive(Debug, Clone, Default)]
pub struct ProfileForm {
    pub username: String,
    pub email: String,
}

impl ProfileForm {
    pub fn new(username: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            email: email.into(),
        }
    }

    /// Trim and check both fields, then build a fresh profile joined at `now`.
    pub fn into_profile(self, now: DateTime<Utc>) -> Result<Profile, ProfileError> {
        let username = self.username.trim();
        let email = self.email.trim();

        if username.is_empty() {
            return Err(ProfileError::Validation { field: "username" });
        }
        if email.is_empty() {
            return Err(ProfileError::Validation { field: "email" });
        }

        Ok(Profile::new(username, email, now))
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ProfileError {
    #[error("Profile field is required: {field}")]
    Validation { field: &'static str },

    #[error("Stored profile is corrupt: {0}")]
    Corrupt(#[source] serde_json::Error),

    #[error("Failed to encode profile: {0}")]
    Encode(#[source] serde_json::Error),

    #[error(transparent)]
    Storage(#[from] StoreError),
}

/// Loads and saves the profile as the single record of a key-value store.
#[derive(Debug, Clone)]
pub struct ProfileStore<S> {
    store: S,
}

impl<S: KeyValueStore> ProfileStore<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn inner(&self) -> &S {
        &self.store
    }

    /// The stored profile, or `None` when nothing has been saved yet.
    pub fn load(&self) -> Result<Option<Profile>, ProfileError> {
        let Some(raw) = self.store.get(PROFILE_KEY)? else {
            return Ok(None);
        };

        let profile = serde_json::from_str(&raw).map_err(ProfileError::Corrupt)?;
        Ok(Some(profile))
    }

    /// Overwrite the stored record with `profile`.
    pub fn save(&self, profile: &Profile) -> Result<(), ProfileError> {
        let raw = serde_json::to_string(profile).map_err(ProfileError::Encode)?;
        self.store.set(PROFILE_KEY, &raw)?;
        tracing::debug!(username = %profile.username, "Saved profile");
        Ok(())
    }

    pub fn clear(&self) -> Result<(), ProfileError> {
        self.store.remove(PROFILE_KEY)?;
        tracing::info!("Cleared stored profile");
        Ok(())
    }
}
