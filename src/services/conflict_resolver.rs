use tracing::{debug, info};

use crate::models::conflict::{ConflictRecord, ConflictType};
use crate::models::domain::{AdequacyLevel, Domain, EnergyDemand};
use crate::models::proposal::ProposalSet;
use crate::models::settings::{CoordinationSettings, ResolutionImpacts};

/// One resolved conflict and the proposal set it produced.
#[derive(Debug, Clone)]
pub struct Resolution {
    pub proposals: ProposalSet,
    pub record: ConflictRecord,
}

/// Result of resolving every detected conflict in priority order.
#[derive(Debug, Clone)]
pub struct ResolutionOutcome {
    pub proposals: ProposalSet,
    pub resolved: Vec<ConflictRecord>,
}

impl ResolutionOutcome {
    pub fn trade_offs(&self) -> Vec<String> {
        self.resolved
            .iter()
            .flat_map(|record| record.trade_offs.iter().cloned())
            .collect()
    }
}

/// Applies one resolution strategy per conflict type.
///
/// Strategies never touch confidence. The impact each one assigns is applied
/// once, after every conflict is resolved, to each affected domain.
pub struct ConflictResolver {
    impacts: ResolutionImpacts,
    confidence_floor: f64,
    budget_utilization_target: f64,
}

impl ConflictResolver {
    pub fn new(settings: &CoordinationSettings) -> Self {
        Self {
            impacts: settings.resolution_impacts.clone(),
            confidence_floor: settings.resolution_confidence_floor,
            budget_utilization_target: settings.budget_utilization_target,
        }
    }

    /// Stable sort by the fixed resolution order.
    pub fn prioritize_conflicts(mut conflicts: Vec<ConflictRecord>) -> Vec<ConflictRecord> {
        conflicts.sort_by_key(|conflict| conflict.conflict_type.resolution_rank());
        conflicts
    }

    pub fn resolve_all(
        &self,
        conflicts: Vec<ConflictRecord>,
        proposals: &ProposalSet,
    ) -> ResolutionOutcome {
        let mut current = proposals.clone();
        let mut resolved = Vec::with_capacity(conflicts.len());

        for conflict in Self::prioritize_conflicts(conflicts) {
            let Resolution { proposals, record } = self.resolve_single(&conflict, &current);
            debug!(
                target: "app::resolver",
                conflict = %record.conflict_type,
                strategy = %record.resolution_strategy,
                trade_offs = record.trade_offs.len(),
                "conflict resolved"
            );
            current = proposals;
            resolved.push(record);
        }

        let proposals = self.apply_confidence_impacts(&resolved, current);

        if !resolved.is_empty() {
            info!(
                target: "app::resolver",
                resolved = resolved.len(),
                "conflict resolution complete"
            );
        }

        ResolutionOutcome {
            proposals,
            resolved,
        }
    }

    pub fn resolve_single(&self, conflict: &ConflictRecord, proposals: &ProposalSet) -> Resolution {
        let mut next = proposals.clone();
        let mut record = conflict.clone();

        let (strategy, trade_offs, impact) = match conflict.conflict_type {
            ConflictType::Recovery => (
                "prioritize_recovery_reduce_training_intensity",
                resolve_recovery(&mut next),
                self.impacts.recovery,
            ),
            ConflictType::Energy => (
                "balance_energy_supply_and_demand",
                resolve_energy(&mut next),
                self.impacts.energy,
            ),
            ConflictType::Time => (
                "optimize_for_time_efficiency",
                resolve_time(conflict, &mut next),
                self.impacts.time,
            ),
            ConflictType::Budget => (
                "optimize_nutrition_for_budget",
                self.resolve_budget(&mut next),
                self.impacts.budget,
            ),
            ConflictType::Nutritional => (
                "prioritize_nutritional_adequacy",
                resolve_nutritional(&mut next),
                self.impacts.nutritional,
            ),
            ConflictType::Motivation => (
                "simplify_plans_for_motivation",
                resolve_motivation(conflict, &mut next),
                self.impacts.motivation,
            ),
            ConflictType::Unclassified => (
                "conservative_modification",
                resolve_generic(conflict, &mut next),
                self.impacts.unclassified,
            ),
        };

        record.resolution_strategy = strategy.to_string();
        record.trade_offs = trade_offs;
        record.confidence_impact = impact;

        Resolution {
            proposals: next,
            record,
        }
    }

    fn apply_confidence_impacts(
        &self,
        resolved: &[ConflictRecord],
        mut proposals: ProposalSet,
    ) -> ProposalSet {
        for record in resolved {
            for domain in &record.affected_domains {
                if let Some(proposal) = proposals.get_mut(*domain) {
                    let adjusted = (proposal.confidence + record.confidence_impact)
                        .max(self.confidence_floor);
                    proposal.set_confidence(adjusted);
                }
            }
        }
        proposals
    }

    fn resolve_budget(&self, proposals: &mut ProposalSet) -> Vec<String> {
        let target = self.budget_utilization_target;
        let Some(nutrition) = proposals.nutrition_mut() else {
            return Vec::new();
        };
        nutrition.budget_utilization = nutrition.budget_utilization.min(target);

        let note = "Optimized meal plan for budget constraints";
        if let Some(proposal) = proposals.get_mut(Domain::Nutrition) {
            proposal.annotate("cost_optimization", "maximum_efficiency");
            proposal.record_modification(note);
        }
        vec![note.to_string()]
    }
}

impl Default for ConflictResolver {
    fn default() -> Self {
        Self::new(&CoordinationSettings::default())
    }
}

/// Steps a high fitness demand down to medium; returns whether anything changed.
fn reduce_high_demand(proposals: &mut ProposalSet) -> bool {
    match proposals.fitness_mut() {
        Some(fitness) if fitness.energy_demand == EnergyDemand::High => {
            fitness.energy_demand = EnergyDemand::Medium;
            true
        }
        _ => false,
    }
}

fn low_adequacy(proposals: &ProposalSet) -> bool {
    proposals
        .nutrition()
        .is_some_and(|n| n.nutritional_adequacy == AdequacyLevel::Low)
}

fn resolve_recovery(proposals: &mut ProposalSet) -> Vec<String> {
    if !reduce_high_demand(proposals) {
        return Vec::new();
    }

    let note = "Reduced fitness intensity from high to medium for recovery";
    if let Some(proposal) = proposals.get_mut(Domain::Fitness) {
        proposal.annotate("intensity_adjustment", "reduced_for_recovery");
        proposal.annotate(
            "modification_reason",
            "Poor recovery status requires intensity reduction",
        );
        proposal.record_modification(note);
    }
    vec![note.to_string()]
}

fn resolve_energy(proposals: &mut ProposalSet) -> Vec<String> {
    let mut trade_offs = Vec::new();
    if !low_adequacy(proposals) {
        return trade_offs;
    }

    let note = "Prioritized nutritional adequacy improvement";
    if let Some(proposal) = proposals.get_mut(Domain::Nutrition) {
        proposal
            .flags
            .insert("priority_adjustment".to_string(), "increase_adequacy".into());
        proposal.record_modification(note);
    }
    trade_offs.push(note.to_string());

    if reduce_high_demand(proposals) {
        let note = "Reduced fitness intensity to match energy availability";
        if let Some(proposal) = proposals.get_mut(Domain::Fitness) {
            proposal.record_modification(note);
        }
        trade_offs.push(note.to_string());
    }
    trade_offs
}

fn resolve_time(conflict: &ConflictRecord, proposals: &mut ProposalSet) -> Vec<String> {
    let mut trade_offs = Vec::new();

    if conflict.affects(Domain::Fitness) {
        if let Some(proposal) = proposals.get_mut(Domain::Fitness) {
            let note = "Optimized workout plan for time efficiency";
            proposal.annotate("time_optimization", "high_efficiency_focus");
            proposal.record_modification(note);
            trade_offs.push(note.to_string());
        }
    }
    if conflict.affects(Domain::Nutrition) {
        if let Some(proposal) = proposals.get_mut(Domain::Nutrition) {
            let note = "Simplified meal prep for time savings";
            proposal.annotate("prep_optimization", "quick_prep_focus");
            proposal.record_modification(note);
            trade_offs.push(note.to_string());
        }
    }
    trade_offs
}

fn resolve_nutritional(proposals: &mut ProposalSet) -> Vec<String> {
    let mut trade_offs = Vec::new();
    if !low_adequacy(proposals) {
        return trade_offs;
    }

    let note = "Prioritized nutritional adequacy over fitness intensity";
    if let Some(proposal) = proposals.get_mut(Domain::Nutrition) {
        // A critical flag from recovery prioritization outranks this one.
        proposal
            .flags
            .entry("adequacy_priority".to_string())
            .or_insert_with(|| "high".into());
        proposal.record_modification(note);
    }
    trade_offs.push(note.to_string());

    if reduce_high_demand(proposals) {
        let note = "Reduced fitness intensity to match nutritional capacity";
        if let Some(proposal) = proposals.get_mut(Domain::Fitness) {
            proposal.record_modification(note);
        }
        trade_offs.push(note.to_string());
    }
    trade_offs
}

fn resolve_motivation(conflict: &ConflictRecord, proposals: &mut ProposalSet) -> Vec<String> {
    let mut trade_offs = Vec::new();

    for domain in &conflict.affected_domains {
        let note = match domain {
            Domain::Fitness => "Simplified workout plan for better adherence",
            Domain::Nutrition => "Simplified meal plan for better adherence",
            Domain::Sleep => "Simplified sleep routine for better adherence",
            Domain::MentalWellness => continue,
        };
        if let Some(proposal) = proposals.get_mut(*domain) {
            proposal.annotate("complexity_reduction", "simplified_for_motivation");
            proposal.record_modification(note);
            trade_offs.push(note.to_string());
        }
    }
    trade_offs
}

fn resolve_generic(conflict: &ConflictRecord, proposals: &mut ProposalSet) -> Vec<String> {
    let reason = format!("Resolved {}", conflict.conflict_type);
    for domain in &conflict.affected_domains {
        if let Some(proposal) = proposals.get_mut(*domain) {
            proposal.annotate("conflict_resolution_applied", true);
            proposal.annotate("modification_reason", reason.as_str());
            proposal.record_modification(reason.clone());
        }
    }
    vec!["Applied conservative modifications to resolve conflict".to_string()]
}
