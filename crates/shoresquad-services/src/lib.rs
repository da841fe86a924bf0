//! Crew directory and local profile storage for ShoreSquad.

pub mod crew;
pub mod profile;
pub mod store;

pub use crew::{Crew, CrewDirectory, CrewDraft, CrewError, MembershipPolicy};
pub use profile::{Profile, ProfileError, ProfileForm, ProfileStore, PROFILE_KEY};
pub use store::{FileKeyValueStore, KeyValueStore, MemoryKeyValueStore, StoreError};
