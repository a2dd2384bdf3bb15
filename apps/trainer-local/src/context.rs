//! Application context.
//!
//! Built once at startup and passed to every operation that needs storage,
//! rule settings or feedback cues.

use crate::config::TrainerConfig;
use crate::repository::LocalRepository;
use crate::storage::{KeyValueStore, SqliteStore, Storage, StoreError};
use serde::Serialize;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use trainer_core::{Catalog, TrainerSettings};

/// Audio/visual feedback requested by the progress pipeline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "cue", rename_all = "snake_case")]
pub enum Cue {
    ExerciseComplete { correct: bool, stars: u8 },
    LevelUp { area_id: String, level: u32 },
    BadgeEarned { badge_id: String },
    StreakExtended { days: u32 },
}

/// Sink for feedback cues. Playing sounds or animations is up to the host.
pub trait FeedbackCues {
    fn emit(&self, cue: &Cue);
}

/// Discards every cue.
pub struct NoopCues;

impl FeedbackCues for NoopCues {
    fn emit(&self, _cue: &Cue) {}
}

/// Logs cues at debug level.
pub struct TracingCues;

impl FeedbackCues for TracingCues {
    fn emit(&self, cue: &Cue) {
        tracing::debug!(?cue, "feedback cue");
    }
}

/// Keeps cues in memory for inspection.
#[derive(Default)]
pub struct RecordingCues {
    cues: Mutex<Vec<Cue>>,
}

impl RecordingCues {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn take(&self) -> Vec<Cue> {
        self.cues
            .lock()
            .map(|mut cues| std::mem::take(&mut *cues))
            .unwrap_or_default()
    }
}

impl FeedbackCues for RecordingCues {
    fn emit(&self, cue: &Cue) {
        if let Ok(mut cues) = self.cues.lock() {
            cues.push(cue.clone());
        }
    }
}

/// Everything the trainer operations need.
pub struct AppContext {
    storage: Storage,
    settings: TrainerSettings,
    theme_totals: HashMap<String, u32>,
    cues: Arc<dyn FeedbackCues>,
}

impl AppContext {
    pub fn new(storage: Storage, settings: TrainerSettings) -> Self {
        Self {
            storage,
            settings,
            theme_totals: HashMap::new(),
            cues: Arc::new(NoopCues),
        }
    }

    /// Context over a SQLite store at the configured path.
    pub fn open(config: &TrainerConfig) -> Result<Self, StoreError> {
        if let Some(parent) = config.db_path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| StoreError::Unavailable(format!("{}: {e}", parent.display())))?;
        }
        let backend: Arc<dyn KeyValueStore> = Arc::new(SqliteStore::open(&config.db_path)?);
        tracing::info!(path = %config.db_path.display(), "opened trainer store");
        Ok(Self::new(
            Storage::new(backend, config.namespace.clone()),
            config.settings.clone(),
        )
        .with_cues(Arc::new(TracingCues)))
    }

    pub fn with_cues(mut self, cues: Arc<dyn FeedbackCues>) -> Self {
        self.cues = cues;
        self
    }

    /// Take per-theme exercise counts from a content catalog.
    pub fn with_catalog(mut self, catalog: &Catalog) -> Self {
        self.theme_totals = catalog.theme_totals();
        self
    }

    pub fn storage(&self) -> &Storage {
        &self.storage
    }

    pub fn settings(&self) -> &TrainerSettings {
        &self.settings
    }

    pub fn theme_totals(&self) -> &HashMap<String, u32> {
        &self.theme_totals
    }

    pub fn repository(&self) -> LocalRepository {
        LocalRepository::new(self.storage.clone())
    }

    pub fn emit(&self, cue: Cue) {
        self.cues.emit(&cue);
    }
}
