use serde_json::{json, Value as JsonValue};
use tracing::debug;

use crate::models::constraints::{
    ConstraintAnalysis, ConstraintKind, PlanningConstraints, WeightedConstraint,
};
use crate::models::domain::RecoveryStatus;
use crate::models::proposal::ProposalSet;

const USER_CONSTRAINT_WEIGHT: f64 = 1.0;
const PRODUCER_CONSTRAINT_WEIGHT: f64 = 0.8;
const RECOVERY_CONSTRAINT_WEIGHT: f64 = 2.0;

/// Classifies user and producer constraints into the hard/soft hierarchy.
pub struct ConstraintAnalyzer;

impl ConstraintAnalyzer {
    pub fn analyze(proposals: &ProposalSet, constraints: &PlanningConstraints) -> ConstraintAnalysis {
        let mut weighted = Vec::new();

        for (key, data) in &constraints.raw {
            let name = match key.as_str() {
                "budget" => "budget_limit",
                "time_available" => "time_limit",
                "dietary_restrictions" => "dietary_restrictions",
                _ => continue,
            };
            weighted.push(WeightedConstraint {
                name: name.to_string(),
                kind: ConstraintKind::Hard,
                weight: USER_CONSTRAINT_WEIGHT,
                source: "user".to_string(),
                data: data.clone(),
            });
        }

        for proposal in proposals.iter() {
            for used in &proposal.constraints_used {
                weighted.push(WeightedConstraint {
                    name: used.clone(),
                    kind: ConstraintKind::Soft,
                    weight: PRODUCER_CONSTRAINT_WEIGHT,
                    source: proposal.domain.agent_name().to_string(),
                    data: JsonValue::Object(Default::default()),
                });
            }
        }

        let recovery_status = proposals.recovery_status();
        if recovery_status == RecoveryStatus::Poor {
            weighted.push(WeightedConstraint {
                name: "recovery_priority".to_string(),
                kind: ConstraintKind::Hard,
                weight: RECOVERY_CONSTRAINT_WEIGHT,
                source: "SleepAgent".to_string(),
                data: json!({"recovery_status": recovery_status.as_str()}),
            });
        }

        let hard_constraints = weighted
            .iter()
            .filter(|c| c.kind == ConstraintKind::Hard)
            .count();
        let soft_constraints = weighted.len() - hard_constraints;

        debug!(
            target: "app::coordination",
            hard = hard_constraints,
            soft = soft_constraints,
            "constraints analyzed"
        );

        ConstraintAnalysis {
            total_constraints: weighted.len(),
            hard_constraints,
            soft_constraints,
            recovery_priority_active: matches!(
                recovery_status,
                RecoveryStatus::Poor | RecoveryStatus::Fair
            ),
            constraints: weighted,
        }
    }
}
