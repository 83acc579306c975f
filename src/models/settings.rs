use serde::{Deserialize, Serialize};

/// Thresholds that drive energy assessment and recovery prioritization.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct EnergyThresholds {
    /// Net energy below `-deficit_margin` is a deficit.
    pub deficit_margin: f64,
    /// Net energy above `surplus_margin` may be a surplus.
    pub surplus_margin: f64,
    pub deficit_recovery_capacity: f64,
    pub surplus_recovery_capacity: f64,
    pub high_demand: f64,
    pub low_recovery: f64,
    pub nutrition_demand: f64,
    pub nutrition_adequacy_floor: f64,
    pub sleep_debt_hours: f64,
    pub sleep_target_hours: f64,
    pub overtraining_load: f64,
    pub stress_overload: f64,
    pub critical_recovery_capacity: f64,
    pub critical_sustainability: f64,
    pub medium_recovery_capacity: f64,
    pub medium_sustainability: f64,
}

impl Default for EnergyThresholds {
    fn default() -> Self {
        Self {
            deficit_margin: 20.0,
            surplus_margin: 20.0,
            deficit_recovery_capacity: 30.0,
            surplus_recovery_capacity: 70.0,
            high_demand: 70.0,
            low_recovery: 30.0,
            nutrition_demand: 60.0,
            nutrition_adequacy_floor: 50.0,
            sleep_debt_hours: 2.0,
            sleep_target_hours: 8.0,
            overtraining_load: 80.0,
            stress_overload: 75.0,
            critical_recovery_capacity: 25.0,
            critical_sustainability: 30.0,
            medium_recovery_capacity: 50.0,
            medium_sustainability: 60.0,
        }
    }
}

impl EnergyThresholds {
    /// Thresholds expressed on the 0-100 score scale.
    pub fn score_scale(&self) -> [(&'static str, f64); 14] {
        [
            ("deficit_margin", self.deficit_margin),
            ("surplus_margin", self.surplus_margin),
            ("deficit_recovery_capacity", self.deficit_recovery_capacity),
            ("surplus_recovery_capacity", self.surplus_recovery_capacity),
            ("high_demand", self.high_demand),
            ("low_recovery", self.low_recovery),
            ("nutrition_demand", self.nutrition_demand),
            ("nutrition_adequacy_floor", self.nutrition_adequacy_floor),
            ("overtraining_load", self.overtraining_load),
            ("stress_overload", self.stress_overload),
            ("critical_recovery_capacity", self.critical_recovery_capacity),
            ("critical_sustainability", self.critical_sustainability),
            ("medium_recovery_capacity", self.medium_recovery_capacity),
            ("medium_sustainability", self.medium_sustainability),
        ]
    }
}

/// Confidence impact each resolution strategy assigns to its conflict.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ResolutionImpacts {
    pub recovery: f64,
    pub energy: f64,
    pub time: f64,
    pub budget: f64,
    pub nutritional: f64,
    pub motivation: f64,
    pub unclassified: f64,
}

impl Default for ResolutionImpacts {
    fn default() -> Self {
        Self {
            recovery: -0.1,
            energy: -0.05,
            time: -0.1,
            budget: -0.05,
            nutritional: -0.1,
            motivation: -0.05,
            unclassified: -0.1,
        }
    }
}

impl ResolutionImpacts {
    pub fn all(&self) -> [f64; 7] {
        [
            self.recovery,
            self.energy,
            self.time,
            self.budget,
            self.nutritional,
            self.motivation,
            self.unclassified,
        ]
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct CoordinationSettings {
    pub default_max_weekly_minutes: f64,
    pub default_weekly_food_budget: f64,
    pub budget_utilization_limit: f64,
    pub budget_utilization_target: f64,
    pub recovery_confidence_penalty: f64,
    pub recovery_confidence_floor: f64,
    pub resolution_confidence_floor: f64,
    pub major_conflict_penalty: f64,
    pub minor_conflict_penalty: f64,
    pub thresholds: EnergyThresholds,
    pub resolution_impacts: ResolutionImpacts,
}

impl Default for CoordinationSettings {
    fn default() -> Self {
        Self {
            default_max_weekly_minutes: 600.0,
            default_weekly_food_budget: 100.0,
            budget_utilization_limit: 0.9,
            budget_utilization_target: 0.85,
            recovery_confidence_penalty: 0.1,
            recovery_confidence_floor: 0.3,
            resolution_confidence_floor: 0.1,
            major_conflict_penalty: 0.1,
            minor_conflict_penalty: 0.05,
            thresholds: EnergyThresholds::default(),
            resolution_impacts: ResolutionImpacts::default(),
        }
    }
}
