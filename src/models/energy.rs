use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::models::domain::Domain;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum BalanceStatus {
    Deficit,
    Balanced,
    Surplus,
}

impl BalanceStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            BalanceStatus::Deficit => "deficit",
            BalanceStatus::Balanced => "balanced",
            BalanceStatus::Surplus => "surplus",
        }
    }
}

impl fmt::Display for BalanceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Composite 0-100 scores describing the user's energy situation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EnergyBalance {
    pub energy_demand: f64,
    pub energy_availability: f64,
    pub recovery_capacity: f64,
    pub stress_load: f64,
    pub sustainability_score: f64,
    pub balance_status: BalanceStatus,
}

impl EnergyBalance {
    pub fn net_energy(&self) -> f64 {
        self.energy_availability - self.energy_demand
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "snake_case")]
pub enum EnergyConflict {
    HighDemandLowRecovery,
    InsufficientNutrition,
    SleepDebtAccumulation,
    OvertrainingRisk,
    StressOverload,
    MultipleStressors,
}

impl EnergyConflict {
    pub fn as_str(&self) -> &'static str {
        match self {
            EnergyConflict::HighDemandLowRecovery => "high_demand_low_recovery",
            EnergyConflict::InsufficientNutrition => "insufficient_nutrition",
            EnergyConflict::SleepDebtAccumulation => "sleep_debt_accumulation",
            EnergyConflict::OvertrainingRisk => "overtraining_risk",
            EnergyConflict::StressOverload => "stress_overload",
            EnergyConflict::MultipleStressors => "multiple_stressors",
        }
    }

    /// Conflicts rooted in energy supply or physical recovery rather than stress.
    pub fn is_energy_or_recovery(&self) -> bool {
        matches!(
            self,
            EnergyConflict::HighDemandLowRecovery
                | EnergyConflict::InsufficientNutrition
                | EnergyConflict::SleepDebtAccumulation
                | EnergyConflict::OvertrainingRisk
        )
    }
}

impl fmt::Display for EnergyConflict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord)]
#[serde(rename_all = "lowercase")]
pub enum RecoveryPriorityLevel {
    Low,
    Medium,
    High,
    Critical,
}

impl RecoveryPriorityLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            RecoveryPriorityLevel::Low => "low",
            RecoveryPriorityLevel::Medium => "medium",
            RecoveryPriorityLevel::High => "high",
            RecoveryPriorityLevel::Critical => "critical",
        }
    }

    /// Critical and high priorities rewrite proposals before conflict resolution.
    pub fn is_applied(&self) -> bool {
        matches!(
            self,
            RecoveryPriorityLevel::Critical | RecoveryPriorityLevel::High
        )
    }
}

impl fmt::Display for RecoveryPriorityLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum RecoveryTimeline {
    Immediate,
    ShortTerm,
    MediumTerm,
    Ongoing,
}

impl RecoveryTimeline {
    pub fn as_str(&self) -> &'static str {
        match self {
            RecoveryTimeline::Immediate => "immediate",
            RecoveryTimeline::ShortTerm => "short_term",
            RecoveryTimeline::MediumTerm => "medium_term",
            RecoveryTimeline::Ongoing => "ongoing",
        }
    }
}

impl From<RecoveryPriorityLevel> for RecoveryTimeline {
    fn from(level: RecoveryPriorityLevel) -> Self {
        match level {
            RecoveryPriorityLevel::Critical => RecoveryTimeline::Immediate,
            RecoveryPriorityLevel::High => RecoveryTimeline::ShortTerm,
            RecoveryPriorityLevel::Medium => RecoveryTimeline::MediumTerm,
            RecoveryPriorityLevel::Low => RecoveryTimeline::Ongoing,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RecoveryPriorityDecision {
    pub priority_level: RecoveryPriorityLevel,
    pub affected_domains: BTreeSet<Domain>,
    pub interventions: Vec<String>,
    pub trade_offs: Vec<String>,
    pub timeline: RecoveryTimeline,
    pub confidence: f64,
}

impl RecoveryPriorityDecision {
    pub fn affects(&self, domain: Domain) -> bool {
        self.affected_domains.contains(&domain)
    }
}
