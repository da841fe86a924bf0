//! In-memory crew directory.
//!
//! Crews are seeded from a fixed list at boot and only ever grow by
//! prepending user-created crews. Nothing here is persisted.

use std::collections::HashSet;

use chrono::{Duration, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::profile::Profile;

/// Days between creating a crew and its first cleanup.
pub const FIRST_CLEANUP_AFTER_DAYS: i64 = 7;

/// Icon given to user-created crews.
pub const DEFAULT_CREW_IMAGE: &str = "🌊";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Crew {
    pub id: u32,
    pub name: String,
    pub description: String,
    pub location: String,
    pub members: u32,
    pub next_cleanup: NaiveDate,
    pub image: String,
}

impl Crew {
    /// Case-insensitive substring match over name, location and description.
    ///
    /// `needle` must already be lowercased.
    fn matches(&self, needle: &str) -> bool {
        self.name.to_lowercase().contains(needle)
            || self.location.to_lowercase().contains(needle)
            || self.description.to_lowercase().contains(needle)
    }
}

/// Fields collected when a user creates a crew.
#[derive(Debug, Clone, Default)]
pub struct CrewDraft {
    pub name: String,
    pub description: String,
    pub location: String,
}

impl CrewDraft {
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        location: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            location: location.into(),
        }
    }
}

/// How repeated joins affect the profile's crew counter.
///
/// `Unbounded` keeps the historical behavior: every join increments the
/// counter, even for a crew the user already joined.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MembershipPolicy {
    #[default]
    Unbounded,
    OncePerCrew,
}

#[derive(Debug, thiserror::Error)]
pub enum CrewError {
    #[error("Crew not found: {0}")]
    NotFound(u32),

    #[error("Missing crew field: {0}")]
    MissingField(&'static str),

    #[error("Already joined crew: {0}")]
    AlreadyJoined(String),
}

#[derive(Debug, Clone)]
pub struct CrewDirectory {
    crews: Vec<Crew>,
    policy: MembershipPolicy,
    joined: HashSet<u32>,
}

impl Default for CrewDirectory {
    fn default() -> Self {
        Self::seeded()
    }
}

impl CrewDirectory {
    pub fn new(crews: Vec<Crew>) -> Self {
        Self {
            crews,
            policy: MembershipPolicy::default(),
            joined: HashSet::new(),
        }
    }

    /// Directory holding the four launch crews.
    pub fn seeded() -> Self {
        Self::new(seed_crews())
    }

    pub fn with_policy(mut self, policy: MembershipPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn policy(&self) -> MembershipPolicy {
        self.policy
    }

    /// All crews, newest first.
    pub fn list(&self) -> &[Crew] {
        &self.crews
    }

    pub fn get(&self, crew_id: u32) -> Option<&Crew> {
        self.crews.iter().find(|c| c.id == crew_id)
    }

    /// Crews whose name, location or description contains `term`, ignoring case.
    pub fn search(&self, term: &str) -> Vec<Crew> {
        let needle = term.to_lowercase();
        self.crews
            .iter()
            .filter(|crew| crew.matches(&needle))
            .cloned()
            .collect()
    }

    /// Create a crew whose first cleanup is a week from today (UTC).
    pub fn create(&mut self, draft: CrewDraft) -> Result<Crew, CrewError> {
        self.create_on(draft, Utc::now().date_naive())
    }

    /// Create a crew as if today were `today`, and prepend it to the list.
    pub fn create_on(&mut self, draft: CrewDraft, today: NaiveDate) -> Result<Crew, CrewError> {
        let name = required(&draft.name, "name")?;
        let description = required(&draft.description, "description")?;
        let location = required(&draft.location, "location")?;

        let crew = Crew {
            id: self.next_id(),
            name,
            description,
            location,
            members: 1,
            next_cleanup: today + Duration::days(FIRST_CLEANUP_AFTER_DAYS),
            image: DEFAULT_CREW_IMAGE.to_string(),
        };

        tracing::info!(crew_id = crew.id, name = %crew.name, "Created crew");
        self.crews.insert(0, crew.clone());
        Ok(crew)
    }

    /// Record that `profile` joined `crew_id` and bump its crew counter.
    ///
    /// The caller is responsible for persisting the profile afterwards.
    pub fn join(&mut self, crew_id: u32, profile: &mut Profile) -> Result<Crew, CrewError> {
        let crew = self.get(crew_id).cloned().ok_or(CrewError::NotFound(crew_id))?;

        let first_join = self.joined.insert(crew_id);
        if !first_join && self.policy == MembershipPolicy::OncePerCrew {
            return Err(CrewError::AlreadyJoined(crew.name));
        }

        profile.crew_members = profile.crew_members.saturating_add(1);
        tracing::info!(
            crew_id,
            crew_members = profile.crew_members,
            "Joined crew"
        );
        Ok(crew)
    }

    /// Undo the join record for `crew_id`, e.g. when the profile could not be saved.
    pub fn forget_join(&mut self, crew_id: u32) {
        self.joined.remove(&crew_id);
    }

    /// Joins belong to one profile; call this when the profile is replaced or cleared.
    pub fn forget_joins(&mut self) {
        self.joined.clear();
    }

    fn next_id(&self) -> u32 {
        self.crews.iter().map(|c| c.id).max().unwrap_or(0) + 1
    }
}

fn required(value: &str, field: &'static str) -> Result<String, CrewError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(CrewError::MissingField(field));
    }
    Ok(trimmed.to_string())
}

fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap_or_default()
}

fn seed_crews() -> Vec<Crew> {
    vec![
        Crew {
            id: 1,
            name: "Ocean Warriors".to_string(),
            description: "Dedicated to keeping our beaches pristine".to_string(),
            location: "Santa Monica Beach".to_string(),
            members: 24,
            next_cleanup: date(2025, 12, 8),
            image: "🌊".to_string(),
        },
        Crew {
            id: 2,
            name: "Coastal Cleanup Crew".to_string(),
            description: "Fun, energetic, and environmentally conscious".to_string(),
            location: "Huntington Beach".to_string(),
            members: 18,
            next_cleanup: date(2025, 12, 9),
            image: "🏖️".to_string(),
        },
        Crew {
            id: 3,
            name: "Wave Riders for Earth".to_string(),
            description: "Combining our love of surfing with environmental action".to_string(),
            location: "Malibu Beach".to_string(),
            members: 32,
            next_cleanup: date(2025, 12, 7),
            image: "🏄".to_string(),
        },
        Crew {
            id: 4,
            name: "Eco Squad".to_string(),
            description: "Young environmental activists making waves".to_string(),
            location: "Ventura Beach".to_string(),
            members: 15,
            next_cleanup: date(2025, 12, 10),
            image: "♻️".to_string(),
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn profile() -> Profile {
        Profile::new(
            "dana",
            "dana@example.com",
            Utc.with_ymd_and_hms(2025, 11, 1, 9, 0, 0).unwrap(),
        )
    }

    #[test]
    fn test_seeded_directory_has_four_crews() {
        let dir = CrewDirectory::seeded();
        let ids: Vec<u32> = dir.list().iter().map(|c| c.id).collect();
        assert_eq!(ids, vec![1, 2, 3, 4]);
    }

    #[test]
    fn test_search_matches_name_location_and_description() {
        let dir = CrewDirectory::seeded();

        let by_name = dir.search("eco");
        assert_eq!(by_name.len(), 1);
        assert_eq!(by_name[0].name, "Eco Squad");

        let by_location = dir.search("MALIBU");
        assert_eq!(by_location.len(), 1);
        assert_eq!(by_location[0].id, 3);

        let by_description = dir.search("surfing");
        assert_eq!(by_description.len(), 1);
        assert_eq!(by_description[0].id, 3);
    }

    #[test]
    fn test_search_returns_exact_subset() {
        let dir = CrewDirectory::seeded();
        for term in ["beach", "a", "Wave", "zzz", "", "ENVIRONMENT"] {
            let needle = term.to_lowercase();
            let expected: Vec<u32> = dir
                .list()
                .iter()
                .filter(|c| {
                    c.name.to_lowercase().contains(&needle)
                        || c.location.to_lowercase().contains(&needle)
                        || c.description.to_lowercase().contains(&needle)
                })
                .map(|c| c.id)
                .collect();
            let actual: Vec<u32> = dir.search(term).iter().map(|c| c.id).collect();
            assert_eq!(actual, expected, "term {:?}", term);
        }
    }

    #[test]
    fn test_search_empty_term_returns_all() {
        let dir = CrewDirectory::seeded();
        assert_eq!(dir.search("").len(), 4);
    }

    #[test]
    fn test_search_no_match_is_empty_not_error() {
        let dir = CrewDirectory::seeded();
        assert!(dir.search("glacier").is_empty());
    }

    #[test]
    fn test_create_prepends_with_one_member_and_week_out_cleanup() {
        let mut dir = CrewDirectory::seeded();
        let today = date(2026, 3, 1);

        let crew = dir
            .create_on(CrewDraft::new("Reef Guardians", "D", "L"), today)
            .unwrap();

        assert_eq!(crew.id, 5);
        assert_eq!(crew.members, 1);
        assert_eq!(crew.next_cleanup, date(2026, 3, 8));
        assert_eq!(crew.image, "🌊");
        assert_eq!(dir.list()[0], crew);
        assert_eq!(dir.list().len(), 5);

        let search = dir.search("reef");
        assert_eq!(search[0].name, "Reef Guardians");
    }

    #[test]
    fn test_create_uses_current_date() {
        let mut dir = CrewDirectory::seeded();
        let crew = dir.create(CrewDraft::new("Tide Pool Crew", "D", "L")).unwrap();
        let expected = Utc::now().date_naive() + Duration::days(7);
        assert_eq!(crew.next_cleanup, expected);
    }

    #[test]
    fn test_create_rejects_blank_fields() {
        let mut dir = CrewDirectory::seeded();
        let err = dir
            .create_on(CrewDraft::new("Reef Guardians", "   ", "L"), date(2026, 3, 1))
            .unwrap_err();
        assert!(matches!(err, CrewError::MissingField("description")));
        assert_eq!(dir.list().len(), 4);
    }

    #[test]
    fn test_join_unknown_crew() {
        let mut dir = CrewDirectory::seeded();
        let mut p = profile();
        assert!(matches!(dir.join(99, &mut p), Err(CrewError::NotFound(99))));
        assert_eq!(p.crew_members, 0);
    }

    #[test]
    fn test_repeated_joins_increment_without_cap() {
        let mut dir = CrewDirectory::seeded();
        let mut p = profile();
        let mut last = p.crew_members;
        for _ in 0..10 {
            dir.join(1, &mut p).unwrap();
            assert!(p.crew_members > last);
            last = p.crew_members;
        }
        assert_eq!(p.crew_members, 10);
    }

    #[test]
    fn test_once_per_crew_policy_rejects_second_join() {
        let mut dir = CrewDirectory::seeded().with_policy(MembershipPolicy::OncePerCrew);
        let mut p = profile();

        dir.join(2, &mut p).unwrap();
        let err = dir.join(2, &mut p).unwrap_err();
        assert!(matches!(err, CrewError::AlreadyJoined(ref name) if name == "Coastal Cleanup Crew"));
        assert_eq!(p.crew_members, 1);

        dir.join(3, &mut p).unwrap();
        assert_eq!(p.crew_members, 2);
    }

    #[test]
    fn test_forgotten_joins_can_be_repeated() {
        let mut dir = CrewDirectory::seeded().with_policy(MembershipPolicy::OncePerCrew);
        let mut p = profile();

        dir.join(1, &mut p).unwrap();
        dir.forget_join(1);
        dir.join(1, &mut p).unwrap();

        dir.forget_joins();
        let mut next = profile();
        dir.join(1, &mut next).unwrap();
        assert_eq!(next.crew_members, 1);
    }

    #[test]
    fn test_join_does_not_change_crew_member_count() {
        let mut dir = CrewDirectory::seeded();
        let mut p = profile();
        dir.join(1, &mut p).unwrap();
        assert_eq!(dir.get(1).unwrap().members, 24);
    }
}
