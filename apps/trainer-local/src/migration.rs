//! One-time move of pre-namespacing data into the repository layout.
//!
//! Older builds kept everything under three bare keys holding raw JSON:
//! `profiles` (array of profiles), `results` (array of results) and
//! `activeProfile` (a profile id). The migration spreads them over the keys
//! the repositories read, wrapped in envelopes, then writes a completion
//! marker. Legacy keys are left in place so sibling trainer variants sharing
//! the store can still migrate them.
//!
//! Re-running is safe: records that already exist are not overwritten, index
//! lists only gain missing ids, and once the marker is set the migration
//! performs no writes at all.

use crate::repository::{
    profile_key, result_key, results_index_key, ACTIVE_PROFILE_KEY, PROFILES_INDEX_KEY,
};
use crate::storage::{namespaced, Envelope, KeyValueStore, Result};
use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::collections::BTreeMap;
use trainer_core::{ExerciseResult, UserProfile};

/// Marker key (inside the namespace) set once the migration completed.
pub const MIGRATION_MARKER: &str = "migration.v1.complete";

pub const LEGACY_PROFILES_KEY: &str = "profiles";
pub const LEGACY_RESULTS_KEY: &str = "results";
pub const LEGACY_ACTIVE_PROFILE_KEY: &str = "activeProfile";

/// How a migration run ended.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum MigrationStatus {
    /// Marker already present; nothing was touched.
    AlreadyComplete,
    /// Legacy keys that produced writes (possibly none); marker written.
    Migrated { keys: Vec<String> },
    /// A storage call failed. The caller may retry on the next load.
    Failed { error: String },
}

/// Result of a migration run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MigrationReport {
    pub status: MigrationStatus,
    /// Backend writes performed during this run.
    pub writes: usize,
}

impl MigrationReport {
    pub fn is_complete(&self) -> bool {
        !matches!(self.status, MigrationStatus::Failed { .. })
    }
}

/// Run the migration for `namespace` against `backend`.
pub fn migrate_legacy_keys(
    backend: &dyn KeyValueStore,
    namespace: &str,
    now: DateTime<Utc>,
) -> MigrationReport {
    let mut migrator = Migrator {
        backend,
        namespace,
        now,
        writes: 0,
    };
    match migrator.run() {
        Ok(status) => {
            match &status {
                MigrationStatus::Migrated { keys } => {
                    tracing::info!(namespace, migrated = ?keys, "legacy key migration complete");
                }
                _ => tracing::debug!(namespace, "legacy key migration already complete"),
            }
            MigrationReport {
                status,
                writes: migrator.writes,
            }
        }
        Err(e) => {
            let writes = migrator.writes;
            tracing::warn!(namespace, error = %e, writes, "legacy key migration failed");
            MigrationReport {
                status: MigrationStatus::Failed {
                    error: e.to_string(),
                },
                writes,
            }
        }
    }
}

struct Migrator<'a> {
    backend: &'a dyn KeyValueStore,
    namespace: &'a str,
    now: DateTime<Utc>,
    writes: usize,
}

impl Migrator<'_> {
    fn run(&mut self) -> Result<MigrationStatus> {
        let marker = namespaced(self.namespace, MIGRATION_MARKER);
        if self.backend.get_raw(&marker)?.is_some() {
            return Ok(MigrationStatus::AlreadyComplete);
        }

        let mut migrated = Vec::new();
        if self.migrate_profiles()? {
            migrated.push(LEGACY_PROFILES_KEY.to_string());
        }
        if self.migrate_results()? {
            migrated.push(LEGACY_RESULTS_KEY.to_string());
        }
        if self.migrate_active_profile()? {
            migrated.push(LEGACY_ACTIVE_PROFILE_KEY.to_string());
        }

        self.write(MIGRATION_MARKER, &true)?;
        Ok(MigrationStatus::Migrated { keys: migrated })
    }

    fn migrate_profiles(&mut self) -> Result<bool> {
        let Some(profiles) = self.legacy::<Vec<UserProfile>>(LEGACY_PROFILES_KEY)? else {
            return Ok(false);
        };
        let before = self.writes;
        for profile in &profiles {
            self.write_if_absent(&profile_key(&profile.id), profile)?;
        }
        self.append_to_index(PROFILES_INDEX_KEY, profiles.into_iter().map(|p| p.id))?;
        Ok(self.writes > before)
    }

    fn migrate_results(&mut self) -> Result<bool> {
        let Some(results) = self.legacy::<Vec<ExerciseResult>>(LEGACY_RESULTS_KEY)? else {
            return Ok(false);
        };
        let before = self.writes;
        let mut by_profile: BTreeMap<String, Vec<String>> = BTreeMap::new();
        for result in &results {
            self.write_if_absent(&result_key(&result.id), result)?;
            by_profile
                .entry(result.child_profile_id.clone())
                .or_default()
                .push(result.id.clone());
        }
        for (profile_id, ids) in by_profile {
            self.append_to_index(&results_index_key(&profile_id), ids)?;
        }
        Ok(self.writes > before)
    }

    fn migrate_active_profile(&mut self) -> Result<bool> {
        let Some(id) = self.legacy::<String>(LEGACY_ACTIVE_PROFILE_KEY)? else {
            return Ok(false);
        };
        self.write_if_absent(ACTIVE_PROFILE_KEY, &id)
    }

    /// A bare legacy value. Undecodable values are skipped with a warning.
    fn legacy<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>> {
        let Some(raw) = self.backend.get_raw(key)? else {
            return Ok(None);
        };
        match serde_json::from_str(&raw) {
            Ok(value) => Ok(Some(value)),
            Err(e) => {
                tracing::warn!(key, error = %e, "unreadable legacy value, skipping");
                Ok(None)
            }
        }
    }

    fn read<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>> {
        let Some(raw) = self.backend.get_raw(&namespaced(self.namespace, key))? else {
            return Ok(None);
        };
        let envelope: Envelope<T> = serde_json::from_str(&raw)?;
        Ok(Some(envelope.value))
    }

    fn write<T: Serialize>(&mut self, key: &str, value: &T) -> Result<()> {
        let raw = serde_json::to_string(&Envelope::new(value, self.now))?;
        self.backend.set_raw(&namespaced(self.namespace, key), &raw)?;
        self.writes += 1;
        Ok(())
    }

    fn write_if_absent<T: Serialize>(&mut self, key: &str, value: &T) -> Result<bool> {
        if self
            .backend
            .get_raw(&namespaced(self.namespace, key))?
            .is_some()
        {
            return Ok(false);
        }
        self.write(key, value)?;
        Ok(true)
    }

    /// Add ids missing from an index list, keeping existing order.
    fn append_to_index(&mut self, key: &str, ids: impl IntoIterator<Item = String>) -> Result<()> {
        let mut index: Vec<String> = self.read(key)?.unwrap_or_default();
        let before = index.len();
        for id in ids {
            if !index.contains(&id) {
                index.push(id);
            }
        }
        if index.len() != before {
            self.write(key, &index)?;
        }
        Ok(())
    }
}
