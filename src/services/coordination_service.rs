use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::time::Instant;

use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use tracing::{error, info, warn};

use crate::error::{AppError, AppResult};
use crate::models::constraints::{PlanningConstraints, UserProfile};
use crate::models::plan::{RecoveryPrioritizationReport, UnifiedPlan};
use crate::models::proposal::JsonMap;
use crate::models::settings::CoordinationSettings;
use crate::services::conflict_detector::ConflictDetector;
use crate::services::conflict_resolver::ConflictResolver;
use crate::services::constraint_analyzer::ConstraintAnalyzer;
use crate::services::energy_balance_service::EnergyBalanceAssessor;
use crate::services::plan_aggregator::PlanAggregator;
use crate::services::proposal_validator::{ProposalValidator, ValidatedProposals};
use crate::services::recovery_prioritizer::RecoveryPrioritizer;
use crate::services::trade_off_explainer::TradeOffExplainer;
use crate::utils::fingerprint::fingerprint;

/// Input of one coordination pass.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct CoordinationRequest {
    /// Raw proposals keyed by producer (`FitnessAgent`) or slot (`fitness`) name.
    pub proposals: JsonMap,
    #[serde(default)]
    pub constraints: JsonValue,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shared_state: Option<JsonValue>,
}

impl CoordinationRequest {
    pub fn new(proposals: JsonMap) -> Self {
        Self {
            proposals,
            constraints: JsonValue::Object(JsonMap::new()),
            shared_state: None,
        }
    }

    pub fn with_constraints(mut self, constraints: JsonValue) -> Self {
        self.constraints = constraints;
        self
    }

    pub fn with_shared_state(mut self, shared_state: JsonValue) -> Self {
        self.shared_state = Some(shared_state);
        self
    }
}

/// Entry point of the coordination engine.
///
/// Every call works on its own copy of the proposals; the service holds only
/// configuration and can be shared freely.
pub struct CoordinationService {
    assessor: EnergyBalanceAssessor,
    prioritizer: RecoveryPrioritizer,
    detector: ConflictDetector,
    resolver: ConflictResolver,
    aggregator: PlanAggregator,
}

impl CoordinationService {
    pub fn new(settings: CoordinationSettings) -> Self {
        Self {
            assessor: EnergyBalanceAssessor::new(settings.thresholds.clone()),
            prioritizer: RecoveryPrioritizer::new(&settings),
            detector: ConflictDetector::new(&settings),
            resolver: ConflictResolver::new(&settings),
            aggregator: PlanAggregator::new(&settings),
        }
    }

    /// Always returns a plan; failures come back as the error envelope.
    pub fn coordinate(&self, request: &CoordinationRequest) -> UnifiedPlan {
        let started = Instant::now();

        let outcome = panic::catch_unwind(AssertUnwindSafe(|| {
            let validated = ProposalValidator::validate_all(&request.proposals);
            if !validated.report.all_valid {
                warn!(
                    target: "app::coordination",
                    missing = ?validated.report.missing_agents,
                    "coordination aborted on invalid proposals"
                );
                return Ok(UnifiedPlan::invalid_proposals(validated.report));
            }
            self.coordinate_validated(validated, request)
        }));

        let plan = match outcome {
            Ok(Ok(plan)) => plan,
            Ok(Err(err)) => UnifiedPlan::failure(err.to_string(), request.proposals.len()),
            Err(payload) => {
                let message = panic_message(payload.as_ref());
                error!(target: "app::coordination", %message, "coordination panicked");
                UnifiedPlan::failure(message, request.proposals.len())
            }
        };

        info!(
            target: "app::coordination",
            elapsed_ms = started.elapsed().as_millis() as u64,
            conflicts = plan.optimization_metrics.conflicts_count,
            confidence = plan.confidence,
            failed = plan.is_error(),
            "coordination finished"
        );

        plan
    }

    /// Like [`coordinate`](Self::coordinate) but surfaces failures as errors.
    pub fn try_coordinate(&self, request: &CoordinationRequest) -> AppResult<UnifiedPlan> {
        let validated = ProposalValidator::validate_all(&request.proposals);
        if !validated.report.missing_agents.is_empty() {
            return Err(AppError::missing_proposals(
                validated.report.missing_agents.clone(),
            ));
        }
        self.coordinate_validated(validated, request)
    }

    /// JSON in, JSON out; only a malformed request body is an error.
    pub fn coordinate_json(&self, raw: &str) -> AppResult<JsonValue> {
        let request: CoordinationRequest = serde_json::from_str(raw)?;
        Ok(self.coordinate(&request).to_json()?)
    }

    fn coordinate_validated(
        &self,
        validated: ValidatedProposals,
        request: &CoordinationRequest,
    ) -> AppResult<UnifiedPlan> {
        let constraints = PlanningConstraints::from_json(&request.constraints);
        let profile = request
            .shared_state
            .as_ref()
            .map(UserProfile::from_shared_state)
            .unwrap_or_default();

        let mut proposals = validated.proposals;

        let balance = self.assessor.assess(&proposals, &profile);
        let energy_conflicts = self
            .assessor
            .detect_energy_conflicts(&balance, &proposals, &profile);

        let recovery_prioritization = if energy_conflicts.is_empty() {
            None
        } else {
            let decision = self
                .prioritizer
                .prioritize(&energy_conflicts, &balance, &proposals);
            proposals = self.prioritizer.apply_to_proposals(&decision, &proposals);
            let trade_off_explanations = TradeOffExplainer::explain(&decision, &balance);
            Some(RecoveryPrioritizationReport {
                energy_balance: balance,
                energy_conflicts,
                recovery_priority: decision,
                trade_off_explanations,
            })
        };

        let analysis = ConstraintAnalyzer::analyze(&proposals, &constraints);
        let conflicts = self.detector.detect(&proposals, &constraints);
        let outcome = self.resolver.resolve_all(conflicts, &proposals);

        let mut plan = self
            .aggregator
            .aggregate(&outcome.proposals, &outcome.resolved, &constraints);

        if !(0.0..=1.0).contains(&plan.confidence) {
            return Err(AppError::internal(format!(
                "aggregate confidence out of range: {}",
                plan.confidence
            )));
        }

        plan.optimization_metrics.hard_constraints = Some(analysis.hard_constraints);
        plan.optimization_metrics.soft_constraints = Some(analysis.soft_constraints);
        plan.optimization_metrics.input_fingerprint = Some(fingerprint(request)?);
        plan.recovery_prioritization = recovery_prioritization;

        Ok(plan)
    }
}

impl Default for CoordinationService {
    fn default() -> Self {
        Self::new(CoordinationSettings::default())
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(text) = payload.downcast_ref::<&str>() {
        text.to_string()
    } else if let Some(text) = payload.downcast_ref::<String>() {
        text.clone()
    } else {
        "unknown panic during coordination".to_string()
    }
}
