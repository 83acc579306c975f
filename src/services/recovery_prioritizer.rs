use std::collections::BTreeSet;

use tracing::{debug, info};

use crate::models::domain::{AdequacyLevel, Domain, EnergyDemand};
use crate::models::energy::{
    BalanceStatus, EnergyBalance, EnergyConflict, RecoveryPriorityDecision,
    RecoveryPriorityLevel, RecoveryTimeline,
};
use crate::models::proposal::ProposalSet;
use crate::models::settings::{CoordinationSettings, EnergyThresholds};

const SLEEP_INTERVENTIONS: [&str; 3] = [
    "Prioritize sleep duration (aim for 8+ hours nightly)",
    "Implement consistent sleep schedule",
    "Optimize sleep environment for quality",
];
const TRAINING_INTERVENTIONS: [&str; 3] = [
    "Reduce training intensity by 20-30%",
    "Add extra rest day between intense sessions",
    "Focus on active recovery activities",
];
const NUTRITION_INTERVENTIONS: [&str; 3] = [
    "Increase caloric intake to match energy demands",
    "Optimize pre/post workout nutrition timing",
    "Ensure adequate protein for recovery",
];
const STRESS_INTERVENTIONS: [&str; 3] = [
    "Implement stress reduction techniques",
    "Simplify wellness plan complexity",
    "Consider meditation or relaxation practices",
];
const MULTIPLE_STRESSOR_INTERVENTIONS: [&str; 3] = [
    "Implement comprehensive recovery protocol",
    "Temporarily reduce all wellness demands",
    "Focus on basic health maintenance only",
];

const SLEEP_INTERVENTION_CAPACITY: f64 = 40.0;
const STRESS_INTERVENTION_LOAD: f64 = 70.0;
const BUDGET_TRADE_OFF_UTILIZATION: f64 = 0.8;

/// Decides how strongly recovery overrides performance goals for one pass.
pub struct RecoveryPrioritizer {
    thresholds: EnergyThresholds,
    confidence_penalty: f64,
    confidence_floor: f64,
}

impl RecoveryPrioritizer {
    pub fn new(settings: &CoordinationSettings) -> Self {
        Self {
            thresholds: settings.thresholds.clone(),
            confidence_penalty: settings.recovery_confidence_penalty,
            confidence_floor: settings.recovery_confidence_floor,
        }
    }

    pub fn prioritize(
        &self,
        conflicts: &[EnergyConflict],
        balance: &EnergyBalance,
        proposals: &ProposalSet,
    ) -> RecoveryPriorityDecision {
        let priority_level = self.determine_priority_level(conflicts, balance);
        let affected_domains = affected_domains(conflicts);
        let interventions = interventions(conflicts, balance);
        let trade_offs = trade_offs(conflicts, &interventions, proposals);
        let confidence = decision_confidence(conflicts.len(), balance, interventions.len());

        info!(
            target: "app::recovery",
            level = %priority_level,
            domains = ?affected_domains,
            interventions = interventions.len(),
            confidence,
            "recovery priority decided"
        );

        RecoveryPriorityDecision {
            priority_level,
            affected_domains,
            interventions,
            trade_offs,
            timeline: RecoveryTimeline::from(priority_level),
            confidence,
        }
    }

    /// Pure function of the energy conflicts and the balance; no other input.
    pub fn determine_priority_level(
        &self,
        conflicts: &[EnergyConflict],
        balance: &EnergyBalance,
    ) -> RecoveryPriorityLevel {
        let t = &self.thresholds;
        let has = |conflict: EnergyConflict| conflicts.contains(&conflict);

        let stacked_with_recovery = has(EnergyConflict::MultipleStressors)
            && conflicts.iter().any(EnergyConflict::is_energy_or_recovery);

        if stacked_with_recovery
            || balance.recovery_capacity < t.critical_recovery_capacity
            || balance.sustainability_score < t.critical_sustainability
        {
            return RecoveryPriorityLevel::Critical;
        }

        if conflicts.len() >= 2
            || has(EnergyConflict::HighDemandLowRecovery)
            || has(EnergyConflict::OvertrainingRisk)
            || balance.balance_status == BalanceStatus::Deficit
        {
            return RecoveryPriorityLevel::High;
        }

        if conflicts.len() == 1
            || balance.recovery_capacity < t.medium_recovery_capacity
            || balance.sustainability_score < t.medium_sustainability
        {
            return RecoveryPriorityLevel::Medium;
        }

        RecoveryPriorityLevel::Low
    }

    /// Returns a copy of `proposals` with the decision applied.
    ///
    /// Only critical and high priorities rewrite anything; lower levels return
    /// an unchanged copy.
    pub fn apply_to_proposals(
        &self,
        decision: &RecoveryPriorityDecision,
        proposals: &ProposalSet,
    ) -> ProposalSet {
        let mut next = proposals.clone();
        if !decision.priority_level.is_applied() {
            return next;
        }

        let level = decision.priority_level.as_str();

        if decision.affects(Domain::Fitness) {
            let stepped = next.fitness_mut().map(|fitness| {
                let before = fitness.energy_demand;
                fitness.energy_demand = before.step_down();
                (before, fitness.energy_demand)
            });
            if let Some(proposal) = next.get_mut(Domain::Fitness) {
                proposal.annotate("recovery_prioritization", true);
                proposal.annotate("intensity_reduction", "recovery_focused");
                proposal.annotate(
                    "modification_reason",
                    format!("Recovery prioritization: {level}"),
                );
                let floor = self.confidence_floor.min(proposal.confidence);
                proposal.set_confidence((proposal.confidence - self.confidence_penalty).max(floor));
                proposal.record_modification(format!("Recovery prioritization: {level}"));
                if let Some((before, after)) = stepped.filter(|(b, a)| b != a) {
                    proposal.record_modification(format!(
                        "Energy demand reduced from {before} to {after}"
                    ));
                }
            }
        }

        if decision.affects(Domain::Sleep) {
            let max_intensity = if decision.priority_level == RecoveryPriorityLevel::Critical {
                EnergyDemand::Medium.as_str()
            } else {
                "moderate"
            };
            if let Some(sleep) = next.sleep_mut() {
                sleep
                    .constraints_for_others
                    .insert("recovery_priority".to_string(), level.into());
                sleep
                    .constraints_for_others
                    .insert("max_training_intensity".to_string(), max_intensity.into());
            }
            if let Some(proposal) = next.get_mut(Domain::Sleep) {
                proposal.annotate("recovery_prioritization", true);
                proposal.annotate("priority_level", level);
                proposal.record_modification(format!(
                    "Sleep prioritized as recovery foundation ({level})"
                ));
            }
        }

        if decision.affects(Domain::Nutrition) {
            let low_adequacy = next
                .nutrition()
                .is_some_and(|n| n.nutritional_adequacy == AdequacyLevel::Low);
            if let Some(proposal) = next.get_mut(Domain::Nutrition) {
                proposal.annotate("recovery_optimization", true);
                proposal.annotate("focus", "recovery_and_energy_availability");
                if low_adequacy {
                    proposal
                        .flags
                        .insert("adequacy_priority".to_string(), "critical".into());
                }
                proposal.record_modification("Meal plan optimized for recovery");
            }
        }

        if decision.affects(Domain::MentalWellness) {
            if let Some(wellness) = next.mental_wellness_mut() {
                wellness.complexity_adjustments.simplification_needed = true;
                wellness.complexity_adjustments.reason = Some("recovery_prioritization".to_string());
            }
            if let Some(proposal) = next.get_mut(Domain::MentalWellness) {
                proposal.annotate("complexity_reduction", true);
                proposal.annotate("focus", "stress_reduction_and_recovery");
                proposal.record_modification("Plan complexity reduced for recovery");
            }
        }

        debug!(
            target: "app::recovery",
            level,
            domains = ?decision.affected_domains,
            "recovery prioritization applied to proposals"
        );

        next
    }
}

impl Default for RecoveryPrioritizer {
    fn default() -> Self {
        Self::new(&CoordinationSettings::default())
    }
}

fn affected_domains(conflicts: &[EnergyConflict]) -> BTreeSet<Domain> {
    let has_any = |set: &[EnergyConflict]| set.iter().any(|c| conflicts.contains(c));

    let mut domains = BTreeSet::from([Domain::Sleep]);
    if has_any(&[
        EnergyConflict::HighDemandLowRecovery,
        EnergyConflict::OvertrainingRisk,
        EnergyConflict::MultipleStressors,
    ]) {
        domains.insert(Domain::Fitness);
    }
    if has_any(&[
        EnergyConflict::InsufficientNutrition,
        EnergyConflict::HighDemandLowRecovery,
    ]) {
        domains.insert(Domain::Nutrition);
    }
    if has_any(&[
        EnergyConflict::StressOverload,
        EnergyConflict::MultipleStressors,
    ]) {
        domains.insert(Domain::MentalWellness);
    }
    domains
}

fn interventions(conflicts: &[EnergyConflict], balance: &EnergyBalance) -> Vec<String> {
    let has = |conflict: EnergyConflict| conflicts.contains(&conflict);
    let mut out: Vec<&str> = Vec::new();

    if has(EnergyConflict::SleepDebtAccumulation)
        || balance.recovery_capacity < SLEEP_INTERVENTION_CAPACITY
    {
        out.extend(SLEEP_INTERVENTIONS);
    }
    if has(EnergyConflict::HighDemandLowRecovery) || has(EnergyConflict::OvertrainingRisk) {
        out.extend(TRAINING_INTERVENTIONS);
    }
    if has(EnergyConflict::InsufficientNutrition) {
        out.extend(NUTRITION_INTERVENTIONS);
    }
    if has(EnergyConflict::StressOverload) || balance.stress_load > STRESS_INTERVENTION_LOAD {
        out.extend(STRESS_INTERVENTIONS);
    }
    if has(EnergyConflict::MultipleStressors) {
        out.extend(MULTIPLE_STRESSOR_INTERVENTIONS);
    }

    out.into_iter().map(str::to_string).collect()
}

fn trade_offs(
    conflicts: &[EnergyConflict],
    interventions: &[String],
    proposals: &ProposalSet,
) -> Vec<String> {
    let mut out = Vec::new();

    if proposals.fitness().map(|f| f.energy_demand) == Some(EnergyDemand::High) {
        out.push("Reduced fitness intensity for recovery prioritization");
        out.push("Delayed fitness progression to ensure sustainability");
    }
    if proposals.budget_utilization() > BUDGET_TRADE_OFF_UTILIZATION {
        out.push("May require increased food budget for adequate nutrition");
    }

    let mentions = |needle: &str| {
        interventions
            .iter()
            .any(|text| text.to_lowercase().contains(needle))
    };
    if mentions("sleep duration") {
        out.push("Increased sleep time may reduce available time for other activities");
    }
    if mentions("simplify") {
        out.push("Simplified plans may progress more slowly toward goals");
    }

    if conflicts.len() >= 2 {
        out.push("Extended timeline for achieving wellness goals");
        out.push("Focus on sustainability over aggressive optimization");
    }

    out.into_iter().map(str::to_string).collect()
}

fn decision_confidence(conflict_count: usize, balance: &EnergyBalance, intervention_count: usize) -> f64 {
    let conflict_penalty = (conflict_count as f64 * 0.1).min(0.3);
    let balance_penalty = if balance.balance_status == BalanceStatus::Deficit {
        0.1
    } else {
        0.0
    };
    let intervention_bonus = (intervention_count as f64 * 0.02).min(0.2);

    (0.8 - conflict_penalty - balance_penalty + intervention_bonus).clamp(0.3, 1.0)
}
