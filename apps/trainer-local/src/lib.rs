pub mod config;
pub mod context;
pub mod dashboard;
pub mod migration;
pub mod progress;
pub mod repository;
pub mod storage;
pub mod telemetry;

use anyhow::Context as _;
use chrono::{Local, Utc};
use trainer_core::streak::adjusted_day;

use crate::config::TrainerConfig;
use crate::context::AppContext;
use crate::dashboard::{DashboardFilter, DashboardStats};
use crate::repository::{ProfileRepository, ResultRepository};

/// Maintenance run: migrate, repair every profile and print dashboard JSON.
pub fn run() -> anyhow::Result<()> {
    let config = TrainerConfig::from_env()?;
    telemetry::init();

    let mut ctx = AppContext::open(&config)?;
    if let Some(path) = &config.catalog_path {
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("reading catalog {}", path.display()))?;
        let catalog = trainer_core::parse_catalog(&json)?;
        tracing::info!(exercises = catalog.exercises().len(), "loaded exercise catalog");
        ctx = ctx.with_catalog(&catalog);
    }

    tracing::info!(namespace = %config.namespace, "running legacy key migration");
    let report =
        migration::migrate_legacy_keys(ctx.storage().backend(), &config.namespace, Utc::now());
    if !report.is_complete() {
        tracing::warn!(?report, "migration incomplete, will retry on next run");
    }

    let repo = ctx.repository();
    let mut profiles = Vec::new();
    for profile in repo.list_profiles() {
        profiles.push(progress::recompute_profile(&ctx, &profile.id)?);
    }

    let filter = DashboardFilter {
        activity_days: config.activity_days,
        daily_reset_hour: config.settings.daily_reset_hour,
        ..Default::default()
    };
    let today = adjusted_day(&Local::now(), config.settings.daily_reset_hour);
    let stats = DashboardStats::compute(&repo.all_results(), &profiles, &filter, today);

    println!("{}", serde_json::to_string_pretty(&stats)?);
    Ok(())
}
