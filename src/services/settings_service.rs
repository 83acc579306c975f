use std::path::{Path, PathBuf};
use std::sync::RwLock;

use tracing::{debug, info};

use crate::error::{AppError, AppResult};
use crate::models::settings::CoordinationSettings;

const ENV_MAX_WEEKLY_MINUTES: &str = "WELLSYNC_MAX_WEEKLY_MINUTES";
const ENV_BUDGET_UTILIZATION_LIMIT: &str = "WELLSYNC_BUDGET_UTILIZATION_LIMIT";
const ENV_RECOVERY_CONFIDENCE_PENALTY: &str = "WELLSYNC_RECOVERY_CONFIDENCE_PENALTY";

/// Loads, overrides and validates coordination settings.
///
/// Settings are resolved once and cached; `reload` drops the cache.
pub struct SettingsService {
    path: Option<PathBuf>,
    cache: RwLock<Option<CoordinationSettings>>,
}

impl SettingsService {
    /// Defaults plus environment overrides.
    pub fn new() -> Self {
        Self {
            path: None,
            cache: RwLock::new(None),
        }
    }

    pub fn with_file(path: impl Into<PathBuf>) -> Self {
        Self {
            path: Some(path.into()),
            cache: RwLock::new(None),
        }
    }

    pub fn get(&self) -> AppResult<CoordinationSettings> {
        if let Ok(guard) = self.cache.read() {
            if let Some(settings) = guard.as_ref() {
                return Ok(settings.clone());
            }
        }

        let settings = self.resolve()?;
        if let Ok(mut guard) = self.cache.write() {
            *guard = Some(settings.clone());
        }
        Ok(settings)
    }

    pub fn reload(&self) -> AppResult<CoordinationSettings> {
        if let Ok(mut guard) = self.cache.write() {
            *guard = None;
        }
        self.get()
    }

    fn resolve(&self) -> AppResult<CoordinationSettings> {
        let base = match &self.path {
            Some(path) => Self::load_file(path)?,
            None => CoordinationSettings::default(),
        };
        let settings = apply_env_overrides(base, |key| std::env::var(key).ok())?;
        validate(&settings)?;
        info!(
            target: "app::settings",
            source = %self.path.as_deref().map(|p| p.display().to_string()).unwrap_or_else(|| "defaults".to_string()),
            "coordination settings loaded"
        );
        Ok(settings)
    }

    /// Parses YAML; every field is optional and falls back to its default.
    pub fn from_yaml_str(raw: &str) -> AppResult<CoordinationSettings> {
        if raw.trim().is_empty() {
            return Ok(CoordinationSettings::default());
        }
        let settings: CoordinationSettings = serde_yaml::from_str(raw)?;
        validate(&settings)?;
        Ok(settings)
    }

    pub fn load_file(path: &Path) -> AppResult<CoordinationSettings> {
        let raw = std::fs::read_to_string(path)?;
        debug!(target: "app::settings", path = %path.display(), "reading settings file");
        Self::from_yaml_str(&raw)
    }
}

impl Default for SettingsService {
    fn default() -> Self {
        Self::new()
    }
}

/// Applies `WELLSYNC_*` overrides read through `lookup`.
pub fn apply_env_overrides<F>(mut settings: CoordinationSettings, lookup: F) -> AppResult<CoordinationSettings>
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(value) = parse_override(&lookup, ENV_MAX_WEEKLY_MINUTES)? {
        settings.default_max_weekly_minutes = value;
    }
    if let Some(value) = parse_override(&lookup, ENV_BUDGET_UTILIZATION_LIMIT)? {
        settings.budget_utilization_limit = value;
    }
    if let Some(value) = parse_override(&lookup, ENV_RECOVERY_CONFIDENCE_PENALTY)? {
        settings.recovery_confidence_penalty = value;
    }
    Ok(settings)
}

fn parse_override<F>(lookup: &F, key: &str) -> AppResult<Option<f64>>
where
    F: Fn(&str) -> Option<String>,
{
    let Some(raw) = lookup(key) else {
        return Ok(None);
    };
    let value = raw
        .trim()
        .parse::<f64>()
        .map_err(|_| AppError::invalid_settings(format!("{key} must be a number, got {raw:?}")))?;
    debug!(target: "app::settings", key, value, "environment override applied");
    Ok(Some(value))
}

pub fn validate(settings: &CoordinationSettings) -> AppResult<()> {
    let unit_fields = [
        ("budget_utilization_limit", settings.budget_utilization_limit),
        ("budget_utilization_target", settings.budget_utilization_target),
        ("recovery_confidence_penalty", settings.recovery_confidence_penalty),
        ("recovery_confidence_floor", settings.recovery_confidence_floor),
        ("resolution_confidence_floor", settings.resolution_confidence_floor),
        ("major_conflict_penalty", settings.major_conflict_penalty),
        ("minor_conflict_penalty", settings.minor_conflict_penalty),
    ];
    for (name, value) in unit_fields {
        if !(0.0..=1.0).contains(&value) {
            return Err(AppError::invalid_settings(format!(
                "{name} must be within [0, 1], got {value}"
            )));
        }
    }

    if settings.budget_utilization_target > settings.budget_utilization_limit {
        return Err(AppError::invalid_settings(
            "budget_utilization_target must not exceed budget_utilization_limit",
        ));
    }

    for (name, value) in settings.thresholds.score_scale() {
        if !(0.0..=100.0).contains(&value) {
            return Err(AppError::invalid_settings(format!(
                "thresholds.{name} must be within [0, 100], got {value}"
            )));
        }
    }

    let sleep = &settings.thresholds;
    if !(sleep.sleep_debt_hours.is_finite() && sleep.sleep_debt_hours >= 0.0) {
        return Err(AppError::invalid_settings(
            "thresholds.sleep_debt_hours must be a non-negative number",
        ));
    }
    if !(sleep.sleep_target_hours > 0.0 && sleep.sleep_target_hours <= 24.0) {
        return Err(AppError::invalid_settings(
            "thresholds.sleep_target_hours must be within (0, 24]",
        ));
    }

    if !(settings.default_weekly_food_budget.is_finite() && settings.default_weekly_food_budget >= 0.0)
    {
        return Err(AppError::invalid_settings(
            "default_weekly_food_budget must be a non-negative number",
        ));
    }

    if !(settings.default_max_weekly_minutes.is_finite() && settings.default_max_weekly_minutes > 0.0) {
        return Err(AppError::invalid_settings(
            "default_max_weekly_minutes must be positive",
        ));
    }

    if settings
        .resolution_impacts
        .all()
        .iter()
        .any(|impact| !impact.is_finite() || *impact > 0.0)
    {
        return Err(AppError::invalid_settings(
            "resolution impacts must not raise confidence",
        ));
    }

    Ok(())
}
