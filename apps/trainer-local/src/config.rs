//! Environment configuration.

use crate::dashboard::MAX_ACTIVITY_DAYS;
use std::path::PathBuf;
use std::str::FromStr;
use thiserror::Error;
use trainer_core::TrainerSettings;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {key}: {value:?} ({reason})")]
    Invalid {
        key: &'static str,
        value: String,
        reason: &'static str,
    },

    #[error("no local data directory available, set TRAINER_DB_PATH")]
    NoDataDir,
}

pub type Result<T> = std::result::Result<T, ConfigError>;

pub const DEFAULT_NAMESPACE: &str = "trainer";
pub const DEFAULT_ACTIVITY_DAYS: u32 = 30;

/// Runtime configuration for the local trainer.
#[derive(Debug, Clone)]
pub struct TrainerConfig {
    pub namespace: String,
    pub db_path: PathBuf,
    /// Optional exercise catalog used for theme totals.
    pub catalog_path: Option<PathBuf>,
    pub settings: TrainerSettings,
    pub activity_days: u32,
}

impl TrainerConfig {
    /// Load from the process environment, reading `.env` first if present.
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let namespace = lookup("TRAINER_NAMESPACE")
            .map(|v| v.trim().to_string())
            .unwrap_or_else(|| DEFAULT_NAMESPACE.to_string());
        if namespace.is_empty() || namespace.contains(crate::storage::NAMESPACE_SEPARATOR) {
            return Err(ConfigError::Invalid {
                key: "TRAINER_NAMESPACE",
                value: namespace,
                reason: "must be non-empty and contain no ':'",
            });
        }

        let db_path = match lookup("TRAINER_DB_PATH") {
            Some(path) => PathBuf::from(path),
            None => default_db_path()?,
        };
        let catalog_path = lookup("TRAINER_CATALOG_PATH").map(PathBuf::from);

        let defaults = TrainerSettings::default();
        let settings = TrainerSettings {
            max_attempts: parse_or(&lookup, "TRAINER_MAX_ATTEMPTS", defaults.max_attempts)?,
            stars_per_level: parse_or(&lookup, "TRAINER_STARS_PER_LEVEL", defaults.stars_per_level)?,
            daily_reset_hour: parse_or(
                &lookup,
                "TRAINER_DAILY_RESET_HOUR",
                defaults.daily_reset_hour,
            )?,
        };
        let activity_days = parse_or(&lookup, "TRAINER_ACTIVITY_DAYS", DEFAULT_ACTIVITY_DAYS)?;

        check(
            settings.max_attempts >= 1,
            "TRAINER_MAX_ATTEMPTS",
            settings.max_attempts,
            "must be at least 1",
        )?;
        check(
            settings.stars_per_level >= 1,
            "TRAINER_STARS_PER_LEVEL",
            settings.stars_per_level,
            "must be at least 1",
        )?;
        check(
            settings.daily_reset_hour <= 23,
            "TRAINER_DAILY_RESET_HOUR",
            settings.daily_reset_hour,
            "must be 0-23",
        )?;
        check(
            (1..=MAX_ACTIVITY_DAYS).contains(&activity_days),
            "TRAINER_ACTIVITY_DAYS",
            activity_days,
            "must be 1-366",
        )?;

        Ok(Self {
            namespace,
            db_path,
            catalog_path,
            settings,
            activity_days,
        })
    }
}

fn default_db_path() -> Result<PathBuf> {
    let base = dirs::data_local_dir().ok_or(ConfigError::NoDataDir)?;
    Ok(base.join("exercise-trainer").join("trainer.db"))
}

fn parse_or<F, T>(lookup: &F, key: &'static str, default: T) -> Result<T>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    match lookup(key) {
        None => Ok(default),
        Some(raw) => raw.trim().parse().map_err(|_| ConfigError::Invalid {
            key,
            value: raw,
            reason: "not a number",
        }),
    }
}

fn check(ok: bool, key: &'static str, value: u32, reason: &'static str) -> Result<()> {
    if ok {
        Ok(())
    } else {
        Err(ConfigError::Invalid {
            key,
            value: value.to_string(),
            reason,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn load(vars: &[(&str, &str)]) -> Result<TrainerConfig> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        TrainerConfig::from_lookup(|key| map.get(key).cloned())
    }

    #[test]
    fn defaults_apply() {
        let config = load(&[("TRAINER_DB_PATH", "/tmp/t.db")]).unwrap();
        assert_eq!(config.namespace, "trainer");
        assert_eq!(config.db_path, PathBuf::from("/tmp/t.db"));
        assert_eq!(config.settings.max_attempts, 3);
        assert_eq!(config.settings.stars_per_level, 10);
        assert_eq!(config.settings.daily_reset_hour, 0);
        assert_eq!(config.activity_days, 30);
        assert!(config.catalog_path.is_none());
    }

    #[test]
    fn overrides_are_parsed() {
        let config = load(&[
            ("TRAINER_DB_PATH", "/tmp/t.db"),
            ("TRAINER_NAMESPACE", "german"),
            ("TRAINER_MAX_ATTEMPTS", "5"),
            ("TRAINER_DAILY_RESET_HOUR", " 4 "),
        ])
        .unwrap();
        assert_eq!(config.namespace, "german");
        assert_eq!(config.settings.max_attempts, 5);
        assert_eq!(config.settings.daily_reset_hour, 4);

        let longest = load(&[("TRAINER_DB_PATH", "x"), ("TRAINER_ACTIVITY_DAYS", "366")]).unwrap();
        assert_eq!(longest.activity_days, 366);
    }

    #[test]
    fn invalid_values_are_rejected() {
        assert!(matches!(
            load(&[("TRAINER_DB_PATH", "x"), ("TRAINER_MAX_ATTEMPTS", "many")]),
            Err(ConfigError::Invalid { key: "TRAINER_MAX_ATTEMPTS", .. })
        ));
        assert!(matches!(
            load(&[("TRAINER_DB_PATH", "x"), ("TRAINER_STARS_PER_LEVEL", "0")]),
            Err(ConfigError::Invalid { key: "TRAINER_STARS_PER_LEVEL", .. })
        ));
        assert!(matches!(
            load(&[("TRAINER_DB_PATH", "x"), ("TRAINER_DAILY_RESET_HOUR", "24")]),
            Err(ConfigError::Invalid { key: "TRAINER_DAILY_RESET_HOUR", .. })
        ));
        assert!(matches!(
            load(&[("TRAINER_DB_PATH", "x"), ("TRAINER_ACTIVITY_DAYS", "4000000000")]),
            Err(ConfigError::Invalid { key: "TRAINER_ACTIVITY_DAYS", .. })
        ));
        assert!(matches!(
            load(&[("TRAINER_DB_PATH", "x"), ("TRAINER_ACTIVITY_DAYS", "367")]),
            Err(ConfigError::Invalid { key: "TRAINER_ACTIVITY_DAYS", .. })
        ));
        assert!(matches!(
            load(&[("TRAINER_DB_PATH", "x"), ("TRAINER_NAMESPACE", "a:b")]),
            Err(ConfigError::Invalid { key: "TRAINER_NAMESPACE", .. })
        ));
    }
}
