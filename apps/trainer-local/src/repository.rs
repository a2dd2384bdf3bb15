//! Profile and result repositories over namespaced storage.
//!
//! Layout inside the namespace:
//! - `profiles.index`: list of profile ids in creation order
//! - `profiles.active`: id of the profile currently playing
//! - `profile.{id}`: one [`UserProfile`]
//! - `results.{profile}`: list of result ids for a profile, append order
//! - `result.{id}`: one [`ExerciseResult`]
//!
//! Results are append-only; there is no update path.

use crate::storage::Storage;
use chrono::{DateTime, Utc};
use trainer_core::{ExerciseResult, UserProfile};
use uuid::Uuid;

pub const PROFILES_INDEX_KEY: &str = "profiles.index";
pub const ACTIVE_PROFILE_KEY: &str = "profiles.active";

pub fn profile_key(id: &str) -> String {
    format!("profile.{id}")
}

pub fn result_key(id: &str) -> String {
    format!("result.{id}")
}

pub fn results_index_key(profile_id: &str) -> String {
    format!("results.{profile_id}")
}

/// Repository for child profiles.
pub trait ProfileRepository {
    fn list_profiles(&self) -> Vec<UserProfile>;
    fn get_profile(&self, id: &str) -> Option<UserProfile>;
    fn save_profile(&self, profile: &UserProfile) -> bool;
    fn create_profile(&self, nickname: &str, avatar_id: &str, now: DateTime<Utc>) -> UserProfile;
    fn delete_profile(&self, id: &str);
    fn active_profile(&self) -> Option<UserProfile>;
    fn set_active_profile(&self, id: &str) -> bool;
}

/// Repository for the exercise result log.
pub trait ResultRepository {
    fn append_result(&self, result: &ExerciseResult) -> bool;
    fn results_for_profile(&self, profile_id: &str) -> Vec<ExerciseResult>;
    fn all_results(&self) -> Vec<ExerciseResult>;
}

/// Both repositories over one [`Storage`] handle.
#[derive(Clone)]
pub struct LocalRepository {
    storage: Storage,
}

impl LocalRepository {
    pub fn new(storage: Storage) -> Self {
        Self { storage }
    }

    pub fn storage(&self) -> &Storage {
        &self.storage
    }

    fn profile_ids(&self) -> Vec<String> {
        self.storage.get(PROFILES_INDEX_KEY).unwrap_or_default()
    }

    fn result_ids(&self, profile_id: &str) -> Vec<String> {
        self.storage
            .get(&results_index_key(profile_id))
            .unwrap_or_default()
    }
}

impl ProfileRepository for LocalRepository {
    fn list_profiles(&self) -> Vec<UserProfile> {
        self.profile_ids()
            .iter()
            .filter_map(|id| self.get_profile(id))
            .collect()
    }

    fn get_profile(&self, id: &str) -> Option<UserProfile> {
        self.storage.get(&profile_key(id))
    }

    fn save_profile(&self, profile: &UserProfile) -> bool {
        if !self.storage.set(&profile_key(&profile.id), profile) {
            return false;
        }
        let mut ids = self.profile_ids();
        if !ids.contains(&profile.id) {
            ids.push(profile.id.clone());
            return self.storage.set(PROFILES_INDEX_KEY, &ids);
        }
        true
    }

    fn create_profile(&self, nickname: &str, avatar_id: &str, now: DateTime<Utc>) -> UserProfile {
        let profile = UserProfile::new(
            Uuid::new_v4().to_string(),
            nickname.trim().to_string(),
            avatar_id.to_string(),
            now,
        );
        if self.save_profile(&profile) {
            tracing::info!(profile_id = %profile.id, "created profile");
        }
        profile
    }

    /// Remove a profile together with its results.
    fn delete_profile(&self, id: &str) {
        for result_id in self.result_ids(id) {
            self.storage.remove(&result_key(&result_id));
        }
        self.storage.remove(&results_index_key(id));
        self.storage.remove(&profile_key(id));

        let mut ids = self.profile_ids();
        let before = ids.len();
        ids.retain(|existing| existing != id);
        if ids.len() != before {
            self.storage.set(PROFILES_INDEX_KEY, &ids);
        }
        if self.storage.get::<String>(ACTIVE_PROFILE_KEY).as_deref() == Some(id) {
            self.storage.remove(ACTIVE_PROFILE_KEY);
        }
        tracing::info!(profile_id = id, "deleted profile");
    }

    /// The active profile, if its id still resolves to a stored profile.
    fn active_profile(&self) -> Option<UserProfile> {
        let id: String = self.storage.get(ACTIVE_PROFILE_KEY)?;
        self.get_profile(&id)
    }

    fn set_active_profile(&self, id: &str) -> bool {
        if self.get_profile(id).is_none() {
            return false;
        }
        self.storage.set(ACTIVE_PROFILE_KEY, &id)
    }
}

impl ResultRepository for LocalRepository {
    fn append_result(&self, result: &ExerciseResult) -> bool {
        let key = result_key(&result.id);
        if self.storage.get::<ExerciseResult>(&key).is_some() {
            tracing::warn!(result_id = %result.id, "result already recorded, not overwriting");
            return false;
        }
        if !self.storage.set(&key, result) {
            return false;
        }
        let mut ids = self.result_ids(&result.child_profile_id);
        ids.push(result.id.clone());
        self.storage
            .set(&results_index_key(&result.child_profile_id), &ids)
    }

    /// Results for a profile, oldest first.
    fn results_for_profile(&self, profile_id: &str) -> Vec<ExerciseResult> {
        let mut results: Vec<ExerciseResult> = self
            .result_ids(profile_id)
            .iter()
            .filter_map(|id| self.storage.get(&result_key(id)))
            .collect();
        results.sort_by_key(|r| r.completed_at);
        results
    }

    /// Every stored result, oldest first.
    fn all_results(&self) -> Vec<ExerciseResult> {
        let mut results: Vec<ExerciseResult> = self
            .storage
            .keys_with_prefix("result.")
            .iter()
            .filter_map(|key| self.storage.get(key))
            .collect();
        results.sort_by_key(|r| r.completed_at);
        results
    }
}
