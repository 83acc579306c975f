use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

use crate::models::domain::{
    AdequacyLevel, ComplexityLevel, Domain, EnergyDemand, MotivationLevel, RecoveryStatus,
    RiskLevel,
};

pub type JsonMap = serde_json::Map<String, JsonValue>;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FitnessMetrics {
    pub energy_demand: EnergyDemand,
    pub training_load_score: f64,
    pub overtraining_risk: RiskLevel,
}

impl Default for FitnessMetrics {
    fn default() -> Self {
        Self {
            energy_demand: EnergyDemand::Medium,
            training_load_score: 55.0,
            overtraining_risk: RiskLevel::Low,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NutritionMetrics {
    pub nutritional_adequacy: AdequacyLevel,
    pub budget_utilization: f64,
}

impl Default for NutritionMetrics {
    fn default() -> Self {
        Self {
            nutritional_adequacy: AdequacyLevel::High,
            budget_utilization: 0.75,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SleepMetrics {
    pub recovery_status: RecoveryStatus,
    #[serde(default)]
    pub constraints_for_others: JsonMap,
    pub sleep_quality_target: f64,
}

impl Default for SleepMetrics {
    fn default() -> Self {
        Self {
            recovery_status: RecoveryStatus::Good,
            constraints_for_others: JsonMap::new(),
            sleep_quality_target: 85.0,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ComplexityAdjustments {
    #[serde(default)]
    pub simplification_needed: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MentalWellnessMetrics {
    pub motivation_level: MotivationLevel,
    #[serde(default)]
    pub complexity_adjustments: ComplexityAdjustments,
}

impl Default for MentalWellnessMetrics {
    fn default() -> Self {
        Self {
            motivation_level: MotivationLevel::Medium,
            complexity_adjustments: ComplexityAdjustments::default(),
        }
    }
}

/// Domain-specific signals the engine reasons about.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "domain", rename_all = "snake_case")]
pub enum DomainMetrics {
    Fitness(FitnessMetrics),
    Nutrition(NutritionMetrics),
    Sleep(SleepMetrics),
    MentalWellness(MentalWellnessMetrics),
}

impl DomainMetrics {
    pub fn default_for(domain: Domain) -> Self {
        match domain {
            Domain::Fitness => DomainMetrics::Fitness(FitnessMetrics::default()),
            Domain::Nutrition => DomainMetrics::Nutrition(NutritionMetrics::default()),
            Domain::Sleep => DomainMetrics::Sleep(SleepMetrics::default()),
            Domain::MentalWellness => {
                DomainMetrics::MentalWellness(MentalWellnessMetrics::default())
            }
        }
    }

    pub fn domain(&self) -> Domain {
        match self {
            DomainMetrics::Fitness(_) => Domain::Fitness,
            DomainMetrics::Nutrition(_) => Domain::Nutrition,
            DomainMetrics::Sleep(_) => Domain::Sleep,
            DomainMetrics::MentalWellness(_) => Domain::MentalWellness,
        }
    }
}

/// A single domain's structured output for one planning request.
///
/// `content` is the UI-facing plan payload (`workout_plan`, `meal_plan`, ...)
/// and is carried through untouched except for the annotations the
/// coordinator adds while resolving conflicts.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DomainProposal {
    pub domain: Domain,
    pub confidence: f64,
    pub metrics: DomainMetrics,
    #[serde(default)]
    pub content: JsonMap,
    #[serde(default)]
    pub constraints_used: Vec<String>,
    #[serde(default)]
    pub dependencies: Vec<String>,
    pub reasoning: String,
    #[serde(default)]
    pub flags: BTreeMap<String, JsonValue>,
    #[serde(default)]
    pub modifications: Vec<String>,
}

impl DomainProposal {
    pub fn new(metrics: DomainMetrics, confidence: f64, content: JsonMap) -> Self {
        Self {
            domain: metrics.domain(),
            confidence: clamp_unit(confidence),
            metrics,
            content,
            constraints_used: Vec::new(),
            dependencies: Vec::new(),
            reasoning: String::new(),
            flags: BTreeMap::new(),
            modifications: Vec::new(),
        }
    }

    pub fn set_confidence(&mut self, value: f64) {
        self.confidence = clamp_unit(value);
    }

    pub fn record_modification(&mut self, note: impl Into<String>) {
        self.modifications.push(note.into());
    }

    pub fn annotate(&mut self, key: &str, value: impl Into<JsonValue>) {
        self.content.insert(key.to_string(), value.into());
    }

    /// Complexity the producer declared inside its content; `Medium` when absent.
    pub fn declared_complexity(&self) -> ComplexityLevel {
        self.content
            .get("complexity")
            .and_then(JsonValue::as_str)
            .and_then(|raw| ComplexityLevel::try_from(raw).ok())
            .unwrap_or(ComplexityLevel::Medium)
    }
}

pub fn clamp_unit(value: f64) -> f64 {
    if value.is_nan() {
        0.0
    } else {
        value.clamp(0.0, 1.0)
    }
}

/// The working copy of all proposals for one coordination pass.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ProposalSet {
    proposals: BTreeMap<Domain, DomainProposal>,
}

impl ProposalSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, proposal: DomainProposal) {
        self.proposals.insert(proposal.domain, proposal);
    }

    pub fn get(&self, domain: Domain) -> Option<&DomainProposal> {
        self.proposals.get(&domain)
    }

    pub fn get_mut(&mut self, domain: Domain) -> Option<&mut DomainProposal> {
        self.proposals.get_mut(&domain)
    }

    pub fn contains(&self, domain: Domain) -> bool {
        self.proposals.contains_key(&domain)
    }

    pub fn iter(&self) -> impl Iterator<Item = &DomainProposal> {
        self.proposals.values()
    }

    pub fn len(&self) -> usize {
        self.proposals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.proposals.is_empty()
    }

    pub fn fitness(&self) -> Option<&FitnessMetrics> {
        match self.get(Domain::Fitness).map(|p| &p.metrics) {
            Some(DomainMetrics::Fitness(metrics)) => Some(metrics),
            _ => None,
        }
    }

    pub fn fitness_mut(&mut self) -> Option<&mut FitnessMetrics> {
        match self.get_mut(Domain::Fitness).map(|p| &mut p.metrics) {
            Some(DomainMetrics::Fitness(metrics)) => Some(metrics),
            _ => None,
        }
    }

    pub fn nutrition(&self) -> Option<&NutritionMetrics> {
        match self.get(Domain::Nutrition).map(|p| &p.metrics) {
            Some(DomainMetrics::Nutrition(metrics)) => Some(metrics),
            _ => None,
        }
    }

    pub fn nutrition_mut(&mut self) -> Option<&mut NutritionMetrics> {
        match self.get_mut(Domain::Nutrition).map(|p| &mut p.metrics) {
            Some(DomainMetrics::Nutrition(metrics)) => Some(metrics),
            _ => None,
        }
    }

    pub fn sleep(&self) -> Option<&SleepMetrics> {
        match self.get(Domain::Sleep).map(|p| &p.metrics) {
            Some(DomainMetrics::Sleep(metrics)) => Some(metrics),
            _ => None,
        }
    }

    pub fn sleep_mut(&mut self) -> Option<&mut SleepMetrics> {
        match self.get_mut(Domain::Sleep).map(|p| &mut p.metrics) {
            Some(DomainMetrics::Sleep(metrics)) => Some(metrics),
            _ => None,
        }
    }

    pub fn mental_wellness(&self) -> Option<&MentalWellnessMetrics> {
        match self.get(Domain::MentalWellness).map(|p| &p.metrics) {
            Some(DomainMetrics::MentalWellness(metrics)) => Some(metrics),
            _ => None,
        }
    }

    pub fn mental_wellness_mut(&mut self) -> Option<&mut MentalWellnessMetrics> {
        match self.get_mut(Domain::MentalWellness).map(|p| &mut p.metrics) {
            Some(DomainMetrics::MentalWellness(metrics)) => Some(metrics),
            _ => None,
        }
    }

    // Scalar lookups below fall back to neutral values when a domain is absent.

    pub fn energy_demand(&self) -> EnergyDemand {
        self.fitness()
            .map(|m| m.energy_demand)
            .unwrap_or(EnergyDemand::Medium)
    }

    pub fn training_load(&self) -> f64 {
        self.fitness().map(|m| m.training_load_score).unwrap_or(50.0)
    }

    pub fn nutritional_adequacy(&self) -> AdequacyLevel {
        self.nutrition()
            .map(|m| m.nutritional_adequacy)
            .unwrap_or(AdequacyLevel::Medium)
    }

    pub fn budget_utilization(&self) -> f64 {
        self.nutrition().map(|m| m.budget_utilization).unwrap_or(0.0)
    }

    pub fn recovery_status(&self) -> RecoveryStatus {
        self.sleep()
            .map(|m| m.recovery_status)
            .unwrap_or(RecoveryStatus::Fair)
    }

    pub fn motivation_level(&self) -> MotivationLevel {
        self.mental_wellness()
            .map(|m| m.motivation_level)
            .unwrap_or(MotivationLevel::Medium)
    }

    pub fn simplification_needed(&self) -> bool {
        self.mental_wellness()
            .map(|m| m.complexity_adjustments.simplification_needed)
            .unwrap_or(false)
    }
}

/// Field-level findings for one proposal; defects are absorbed, never fatal.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ProposalValidation {
    pub warnings: Vec<String>,
    pub defaults_added: Vec<String>,
}

/// Outcome of validating a proposal set; only a missing domain clears `all_valid`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ValidationReport {
    pub all_valid: bool,
    pub agent_validations: BTreeMap<String, ProposalValidation>,
    pub missing_agents: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub ignored_agents: Vec<String>,
}
