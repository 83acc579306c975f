use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

use crate::models::proposal::JsonMap;

/// User constraints supplied with a coordination request.
///
/// Only the fields the engine reasons about are typed; the original map is
/// kept in `raw` so constraint analysis and fingerprints see everything.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct PlanningConstraints {
    #[serde(default)]
    pub weekly_food_budget: Option<f64>,
    #[serde(default)]
    pub max_weekly_minutes: Option<f64>,
    #[serde(default)]
    pub dietary_restrictions: Vec<String>,
    #[serde(default)]
    pub raw: JsonMap,
}

impl PlanningConstraints {
    /// Reads constraints without failing: malformed fields are treated as absent.
    pub fn from_json(value: &JsonValue) -> Self {
        let Some(map) = value.as_object() else {
            return Self::default();
        };

        let weekly_food_budget = number_at(value, &["budget", "weekly_food_budget"])
            .filter(|budget| *budget >= 0.0);
        let max_weekly_minutes = number_at(value, &["time_available", "max_weekly_minutes"])
            .filter(|minutes| *minutes > 0.0);
        let dietary_restrictions = match map.get("dietary_restrictions") {
            Some(JsonValue::Array(items)) => items
                .iter()
                .filter_map(|item| item.as_str().map(str::to_string))
                .collect(),
            Some(JsonValue::String(single)) => vec![single.clone()],
            _ => Vec::new(),
        };

        Self {
            weekly_food_budget,
            max_weekly_minutes,
            dietary_restrictions,
            raw: map.clone(),
        }
    }

    pub fn with_max_weekly_minutes(mut self, minutes: f64) -> Self {
        self.max_weekly_minutes = Some(minutes);
        self
    }

    pub fn with_weekly_food_budget(mut self, budget: f64) -> Self {
        self.weekly_food_budget = Some(budget);
        self
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct StressIndicators {
    /// 0-10 scale
    pub work_stress_level: f64,
    /// 0-10 scale
    pub life_stress_level: f64,
    /// 0-10 scale
    pub relationship_stress: f64,
    /// 0-10 scale
    pub financial_stress: f64,
    pub health_concerns: bool,
}

/// Raw user signals the energy assessment consumes.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct UserProfile {
    #[serde(default)]
    pub user_id: Option<String>,
    /// Most recent nightly sleep durations, oldest first.
    #[serde(default)]
    pub daily_sleep_hours: Vec<f64>,
    #[serde(default)]
    pub stress_indicators: StressIndicators,
}

impl UserProfile {
    /// Reads `shared_state.user_profile`; accepts either the shared state or the profile itself.
    pub fn from_shared_state(value: &JsonValue) -> Self {
        let profile = value.get("user_profile").unwrap_or(value);
        if !profile.is_object() {
            return Self::default();
        }

        let daily_sleep_hours = profile
            .pointer("/recent_data/sleep/daily_hours")
            .and_then(JsonValue::as_array)
            .map(|hours| {
                hours
                    .iter()
                    .filter_map(JsonValue::as_f64)
                    .filter(|h| h.is_finite() && *h >= 0.0)
                    .collect()
            })
            .unwrap_or_default();

        let indicators = profile.get("stress_indicators");
        let level = |key: &str| {
            indicators
                .and_then(|i| i.get(key))
                .and_then(JsonValue::as_f64)
                .filter(|v| v.is_finite())
                .map(|v| v.clamp(0.0, 10.0))
                .unwrap_or(0.0)
        };

        let stress_indicators = StressIndicators {
            work_stress_level: level("work_stress_level"),
            life_stress_level: level("life_stress_level"),
            relationship_stress: level("relationship_stress"),
            financial_stress: level("financial_stress"),
            health_concerns: indicators
                .and_then(|i| i.get("health_concerns"))
                .and_then(JsonValue::as_bool)
                .unwrap_or(false),
        };

        let user_id = profile
            .get("user_id")
            .and_then(JsonValue::as_str)
            .map(str::to_string);

        Self {
            user_id,
            daily_sleep_hours,
            stress_indicators,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ConstraintKind {
    Hard,
    Soft,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WeightedConstraint {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: ConstraintKind,
    pub weight: f64,
    pub source: String,
    #[serde(default)]
    pub data: JsonValue,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ConstraintAnalysis {
    pub constraints: Vec<WeightedConstraint>,
    pub total_constraints: usize,
    pub hard_constraints: usize,
    pub soft_constraints: usize,
    pub recovery_priority_active: bool,
}

fn number_at(value: &JsonValue, path: &[&str]) -> Option<f64> {
    let mut current = value;
    for key in path {
        current = current.get(*key)?;
    }
    current.as_f64().filter(|n| n.is_finite())
}
