use std::collections::BTreeMap;

use serde::Serialize;
use serde_json::Value as JsonValue;

use crate::models::conflict::{ConflictRecord, ConflictType};
use crate::models::domain::Domain;
use crate::models::energy::{EnergyBalance, EnergyConflict, RecoveryPriorityDecision};
use crate::models::proposal::ValidationReport;

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ContributionType {
    FullProposal,
    ModifiedProposal,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct AgentContribution {
    pub confidence: f64,
    pub contribution_type: ContributionType,
    pub modifications: Vec<String>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub flags: BTreeMap<String, JsonValue>,
}

#[derive(Debug, Clone, Default, Serialize, PartialEq)]
pub struct OptimizationMetrics {
    pub total_agents: usize,
    pub conflicts_count: usize,
    /// Always zero in output; elapsed time is logged instead.
    pub optimization_time_ms: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hard_constraints: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub soft_constraints: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub input_fingerprint: Option<String>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct TradeOffDetail {
    pub trade_off: String,
    pub rationale: String,
    pub benefit: String,
}

/// Human-readable rationale for a recovery prioritization decision.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct TradeOffExplanations {
    pub recovery_rationale: String,
    pub domain_impacts: BTreeMap<Domain, String>,
    pub trade_off_details: Vec<TradeOffDetail>,
    pub sustainability_benefits: Vec<String>,
    pub timeline_explanation: String,
    pub confidence_factors: BTreeMap<String, String>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct RecoveryPrioritizationReport {
    pub energy_balance: EnergyBalance,
    pub energy_conflicts: Vec<EnergyConflict>,
    pub recovery_priority: RecoveryPriorityDecision,
    pub trade_off_explanations: TradeOffExplanations,
}

/// Terminal output of one coordination pass.
#[derive(Debug, Clone, Default, Serialize, PartialEq)]
pub struct UnifiedPlan {
    pub unified_plan: BTreeMap<Domain, JsonValue>,
    pub confidence: f64,
    pub conflicts_detected: Vec<ConflictType>,
    pub conflicts_resolved: Vec<ConflictRecord>,
    pub trade_offs_made: Vec<String>,
    pub agent_contributions: BTreeMap<String, AgentContribution>,
    pub constraint_satisfaction_score: f64,
    pub optimization_metrics: OptimizationMetrics,
    pub reasoning: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recovery_prioritization: Option<RecoveryPrioritizationReport>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub validation_results: Option<ValidationReport>,
}

impl UnifiedPlan {
    /// Envelope returned when an expected domain proposal is absent.
    pub fn invalid_proposals(report: ValidationReport) -> Self {
        Self {
            reasoning: format!(
                "Coordination failed due to invalid proposals from: {}",
                report.missing_agents.join(", ")
            ),
            error: Some("Invalid agent proposals detected".to_string()),
            validation_results: Some(report),
            ..Default::default()
        }
    }

    /// Envelope returned when coordination fails internally.
    pub fn failure(message: impl Into<String>, total_agents: usize) -> Self {
        let message = message.into();
        Self {
            reasoning: format!("Coordination failed with error: {message}"),
            error: Some(message),
            optimization_metrics: OptimizationMetrics {
                total_agents,
                ..Default::default()
            },
            ..Default::default()
        }
    }

    pub fn is_error(&self) -> bool {
        self.error.is_some()
    }

    pub fn to_json(&self) -> serde_json::Result<JsonValue> {
        serde_json::to_value(self)
    }
}
