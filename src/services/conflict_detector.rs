use serde_json::Value as JsonValue;
use tracing::{debug, info};

use crate::models::conflict::{ConflictRecord, ConflictType};
use crate::models::constraints::PlanningConstraints;
use crate::models::domain::{
    AdequacyLevel, ComplexityLevel, Domain, EnergyDemand, MotivationLevel, RecoveryStatus,
};
use crate::models::proposal::{JsonMap, ProposalSet};
use crate::models::settings::CoordinationSettings;

// Estimates attached at detection; the resolver replaces them.
const ENERGY_ESTIMATE: f64 = -0.1;
const TIME_ESTIMATE: f64 = -0.15;
const BUDGET_ESTIMATE: f64 = -0.1;
const RECOVERY_ESTIMATE: f64 = -0.2;
const NUTRITIONAL_ESTIMATE: f64 = -0.15;
const MOTIVATION_ESTIMATE: f64 = -0.1;

/// Evaluates the fixed cross-domain rules against the current proposals.
pub struct ConflictDetector {
    default_max_weekly_minutes: f64,
    budget_utilization_limit: f64,
}

impl ConflictDetector {
    pub fn new(settings: &CoordinationSettings) -> Self {
        Self {
            default_max_weekly_minutes: settings.default_max_weekly_minutes,
            budget_utilization_limit: settings.budget_utilization_limit,
        }
    }

    pub fn detect(
        &self,
        proposals: &ProposalSet,
        constraints: &PlanningConstraints,
    ) -> Vec<ConflictRecord> {
        let conflicts: Vec<ConflictRecord> = [
            detect_energy_conflict(proposals),
            self.detect_time_conflict(proposals, constraints),
            self.detect_budget_conflict(proposals),
            detect_recovery_conflict(proposals),
            detect_nutritional_conflict(proposals),
            detect_motivation_conflict(proposals),
        ]
        .into_iter()
        .flatten()
        .collect();

        if conflicts.is_empty() {
            debug!(target: "app::conflict", "no cross-domain conflicts detected");
        } else {
            info!(
                target: "app::conflict",
                count = conflicts.len(),
                types = ?conflicts.iter().map(|c| c.conflict_type.as_str()).collect::<Vec<_>>(),
                "cross-domain conflicts detected"
            );
        }

        conflicts
    }

    fn detect_time_conflict(
        &self,
        proposals: &ProposalSet,
        constraints: &PlanningConstraints,
    ) -> Option<ConflictRecord> {
        let workout_minutes = proposals
            .get(Domain::Fitness)
            .map(|p| workout_minutes(&p.content))
            .unwrap_or(0.0);
        let prep_minutes = proposals
            .get(Domain::Nutrition)
            .and_then(|p| p.content.get("total_prep_time_minutes"))
            .and_then(JsonValue::as_f64)
            .filter(|m| m.is_finite() && *m > 0.0)
            .unwrap_or(0.0);

        let total = workout_minutes + prep_minutes;
        let limit = constraints
            .max_weekly_minutes
            .unwrap_or(self.default_max_weekly_minutes);

        if total <= limit {
            return None;
        }

        let mut affected = Vec::new();
        if workout_minutes > 0.0 {
            affected.push(Domain::Fitness);
        }
        if prep_minutes > 0.0 {
            affected.push(Domain::Nutrition);
        }

        Some(ConflictRecord::new(
            ConflictType::Time,
            affected,
            "reduce_time_demands_or_increase_efficiency",
            TIME_ESTIMATE,
            format!("Total time needed ({total}min) exceeds available time ({limit}min)"),
        ))
    }

    fn detect_budget_conflict(&self, proposals: &ProposalSet) -> Option<ConflictRecord> {
        let utilization = proposals.nutrition()?.budget_utilization;
        if utilization <= self.budget_utilization_limit {
            return None;
        }

        Some(ConflictRecord::new(
            ConflictType::Budget,
            [Domain::Nutrition],
            "optimize_nutrition_costs_or_adjust_goals",
            BUDGET_ESTIMATE,
            format!(
                "Nutrition plan uses {:.1}% of available budget",
                utilization * 100.0
            ),
        ))
    }
}

impl Default for ConflictDetector {
    fn default() -> Self {
        Self::new(&CoordinationSettings::default())
    }
}

fn detect_energy_conflict(proposals: &ProposalSet) -> Option<ConflictRecord> {
    if proposals.fitness()?.energy_demand != EnergyDemand::High {
        return None;
    }

    let underfed = proposals
        .nutrition()
        .is_some_and(|n| n.nutritional_adequacy == AdequacyLevel::Low);
    let under_recovered = proposals.sleep().is_some_and(|s| {
        matches!(s.recovery_status, RecoveryStatus::Poor | RecoveryStatus::Fair)
    });

    (underfed || under_recovered).then(|| {
        ConflictRecord::new(
            ConflictType::Energy,
            [Domain::Fitness, Domain::Nutrition, Domain::Sleep],
            "reduce_fitness_intensity_or_improve_nutrition_recovery",
            ENERGY_ESTIMATE,
            "High fitness energy demands conflict with inadequate nutrition or poor recovery",
        )
    })
}

fn detect_recovery_conflict(proposals: &ProposalSet) -> Option<ConflictRecord> {
    let poor = proposals.sleep()?.recovery_status == RecoveryStatus::Poor;
    let high = proposals.fitness()?.energy_demand == EnergyDemand::High;

    (poor && high).then(|| {
        ConflictRecord::new(
            ConflictType::Recovery,
            [Domain::Fitness, Domain::Sleep],
            "prioritize_recovery_reduce_training_intensity",
            RECOVERY_ESTIMATE,
            "Poor recovery status conflicts with high training intensity demands",
        )
    })
}

fn detect_nutritional_conflict(proposals: &ProposalSet) -> Option<ConflictRecord> {
    let low = proposals.nutrition()?.nutritional_adequacy == AdequacyLevel::Low;
    let high = proposals.fitness()?.energy_demand == EnergyDemand::High;

    (low && high).then(|| {
        ConflictRecord::new(
            ConflictType::Nutritional,
            [Domain::Nutrition, Domain::Fitness],
            "improve_nutrition_or_reduce_fitness_demands",
            NUTRITIONAL_ESTIMATE,
            "Low nutritional adequacy cannot support high fitness energy demands",
        )
    })
}

fn detect_motivation_conflict(proposals: &ProposalSet) -> Option<ConflictRecord> {
    let wellness = proposals.mental_wellness()?;
    if wellness.motivation_level != MotivationLevel::Low
        || !wellness.complexity_adjustments.simplification_needed
    {
        return None;
    }

    let complex: Vec<Domain> = proposals
        .iter()
        .filter(|p| p.domain != Domain::MentalWellness)
        .filter(|p| p.declared_complexity() == ComplexityLevel::High)
        .map(|p| p.domain)
        .collect();

    if complex.is_empty() {
        return None;
    }

    Some(ConflictRecord::new(
        ConflictType::Motivation,
        complex.into_iter().chain([Domain::MentalWellness]),
        "simplify_plans_to_match_motivation_capacity",
        MOTIVATION_ESTIMATE,
        "Low motivation level conflicts with complex plan requirements",
    ))
}

/// Weekly workout minutes; a non-zero `weekly_schedule[].duration_minutes` total wins over
/// `sessions[].duration`.
fn workout_minutes(workout_plan: &JsonMap) -> f64 {
    let sum = |key: &str, field: &str| -> Option<f64> {
        let entries = workout_plan.get(key)?.as_array()?;
        Some(
            entries
                .iter()
                .filter_map(|entry| entry.get(field).and_then(JsonValue::as_f64))
                .filter(|minutes| minutes.is_finite() && *minutes > 0.0)
                .sum(),
        )
    };

    sum("weekly_schedule", "duration_minutes")
        .filter(|minutes| *minutes > 0.0)
        .or_else(|| sum("sessions", "duration"))
        .unwrap_or(0.0)
}
