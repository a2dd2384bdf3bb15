//! Common test utilities for integration tests.
//!
//! `TestContext` wires an [`AppContext`] over an in-memory SQLite store with
//! the fixture catalog and a cue recorder.

#![allow(dead_code)]

pub mod fixtures;

use std::sync::Arc;

use trainer_core::{Catalog, TrainerSettings, UserProfile};
use trainer_local::context::{AppContext, RecordingCues};
use trainer_local::repository::{LocalRepository, ProfileRepository};
use trainer_local::storage::{KeyValueStore, SqliteStore, Storage};

pub const NAMESPACE: &str = "trainer";

pub struct TestContext {
    pub ctx: AppContext,
    pub backend: Arc<SqliteStore>,
    pub cues: Arc<RecordingCues>,
    pub catalog: Catalog,
}

impl TestContext {
    pub fn new() -> Self {
        Self::with_backend(Arc::new(
            SqliteStore::open_in_memory().expect("Failed to open in-memory store"),
        ))
    }

    /// Context over an existing store, e.g. one seeded with legacy keys.
    pub fn with_backend(backend: Arc<SqliteStore>) -> Self {
        let catalog = fixtures::catalog();
        let cues = Arc::new(RecordingCues::new());
        let dyn_backend: Arc<dyn KeyValueStore> = backend.clone();
        let ctx = AppContext::new(
            Storage::new(dyn_backend, NAMESPACE),
            TrainerSettings::default(),
        )
        .with_catalog(&catalog)
        .with_cues(cues.clone());
        Self {
            ctx,
            backend,
            cues,
            catalog,
        }
    }

    pub fn repo(&self) -> LocalRepository {
        self.ctx.repository()
    }

    /// Create a profile through the repository.
    pub fn create_profile(&self, nickname: &str) -> UserProfile {
        self.repo()
            .create_profile(nickname, "fox", fixtures::day(1, 8))
    }
}
