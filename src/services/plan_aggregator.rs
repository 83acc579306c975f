use std::collections::BTreeMap;

use serde_json::Value as JsonValue;
use tracing::debug;

use crate::models::conflict::{ConflictRecord, ConflictType};
use crate::models::constraints::PlanningConstraints;
use crate::models::domain::Domain;
use crate::models::proposal::{clamp_unit, JsonMap, ProposalSet};
use crate::models::plan::{AgentContribution, ContributionType, OptimizationMetrics, UnifiedPlan};
use crate::models::settings::CoordinationSettings;

const FALLBACK_SUMMARY: &str =
    "Your personalized wellness plan has been created based on your goals and constraints.";

/// Folds the final proposal set into one unified plan.
pub struct PlanAggregator {
    major_conflict_penalty: f64,
    minor_conflict_penalty: f64,
}

impl PlanAggregator {
    pub fn new(settings: &CoordinationSettings) -> Self {
        Self {
            major_conflict_penalty: settings.major_conflict_penalty,
            minor_conflict_penalty: settings.minor_conflict_penalty,
        }
    }

    pub fn aggregate(
        &self,
        proposals: &ProposalSet,
        resolved: &[ConflictRecord],
        constraints: &PlanningConstraints,
    ) -> UnifiedPlan {
        let unified_plan: BTreeMap<Domain, JsonValue> = proposals
            .iter()
            .map(|p| (p.domain, JsonValue::Object(p.content.clone())))
            .collect();

        let agent_contributions: BTreeMap<String, AgentContribution> = proposals
            .iter()
            .map(|p| {
                let contribution_type = if p.modifications.is_empty() {
                    ContributionType::FullProposal
                } else {
                    ContributionType::ModifiedProposal
                };
                (
                    p.domain.agent_name().to_string(),
                    AgentContribution {
                        confidence: p.confidence,
                        contribution_type,
                        modifications: p.modifications.clone(),
                        flags: p.flags.clone(),
                    },
                )
            })
            .collect();

        let confidence = if proposals.is_empty() {
            0.0
        } else {
            clamp_unit(proposals.iter().map(|p| p.confidence).sum::<f64>() / proposals.len() as f64)
        };

        let trade_offs_made: Vec<String> = resolved
            .iter()
            .flat_map(|record| record.trade_offs.iter().cloned())
            .collect();
        let constraint_satisfaction_score = self.constraint_satisfaction_score(resolved);

        let reasoning = if resolved.is_empty() {
            plan_summary(proposals, constraints)
        } else {
            coordination_reasoning(resolved, &trade_offs_made, constraint_satisfaction_score)
        };

        debug!(
            target: "app::aggregator",
            domains = unified_plan.len(),
            confidence,
            satisfaction = constraint_satisfaction_score,
            "unified plan aggregated"
        );

        UnifiedPlan {
            unified_plan,
            confidence,
            conflicts_detected: resolved.iter().map(|r| r.conflict_type).collect(),
            conflicts_resolved: resolved.to_vec(),
            trade_offs_made,
            agent_contributions,
            constraint_satisfaction_score,
            optimization_metrics: OptimizationMetrics {
                total_agents: proposals.len(),
                conflicts_count: resolved.len(),
                optimization_time_ms: 0,
                ..Default::default()
            },
            reasoning,
            ..Default::default()
        }
    }

    pub fn constraint_satisfaction_score(&self, resolved: &[ConflictRecord]) -> f64 {
        let penalty: f64 = resolved
            .iter()
            .map(|record| {
                if record.conflict_type.is_major() {
                    self.major_conflict_penalty
                } else {
                    self.minor_conflict_penalty
                }
            })
            .sum();
        (1.0 - penalty).clamp(0.0, 1.0)
    }
}

impl Default for PlanAggregator {
    fn default() -> Self {
        Self::new(&CoordinationSettings::default())
    }
}

fn coordination_reasoning(
    resolved: &[ConflictRecord],
    trade_offs: &[String],
    satisfaction: f64,
) -> String {
    let mut parts = vec![
        format!(
            "Resolved {} conflicts through multi-objective optimization.",
            resolved.len()
        ),
        format!("Constraint satisfaction score: {satisfaction:.2}"),
    ];

    if !trade_offs.is_empty() {
        let key: Vec<&str> = trade_offs.iter().take(3).map(String::as_str).collect();
        parts.push(format!("Key trade-offs made: {}", key.join("; ")));
    }

    let mut seen = Vec::new();
    for record in resolved {
        if seen.contains(&record.conflict_type) {
            continue;
        }
        seen.push(record.conflict_type);
    }
    seen.sort_by_key(ConflictType::resolution_rank);
    parts.extend(seen.into_iter().map(|t| conflict_phrase(t).to_string()));

    parts.join(" ")
}

fn conflict_phrase(conflict_type: ConflictType) -> &'static str {
    match conflict_type {
        ConflictType::Recovery => "Prioritized recovery and sustainability over aggressive training.",
        ConflictType::Energy => "Balanced training demands against available energy and recovery.",
        ConflictType::Time => "Streamlined plans to fit the time available each week.",
        ConflictType::Budget => {
            "Optimized for cost-effectiveness while maintaining nutritional adequacy."
        }
        ConflictType::Nutritional => "Protected nutritional adequacy ahead of training intensity.",
        ConflictType::Motivation => "Simplified plans to match current motivation.",
        ConflictType::Unclassified => "Applied conservative adjustments to remaining conflicts.",
    }
}

/// Per-domain summary used when the plan needed no conflict resolution.
pub fn plan_summary(proposals: &ProposalSet, constraints: &PlanningConstraints) -> String {
    let mut parts = Vec::new();
    let content = |domain: Domain| proposals.get(domain).map(|p| &p.content);

    if let Some(workout) = content(Domain::Fitness) {
        let sessions = array_len(workout, "sessions");
        if sessions > 0 {
            parts.push(format!(
                "**Fitness**: {sessions} workout sessions per week focusing on {} at {} intensity.",
                text_or(workout, "focus", "general fitness"),
                text_or(workout, "intensity", "moderate"),
            ));
        }
    }

    if let Some(meals) = content(Domain::Nutrition) {
        let count = array_len(meals, "meals");
        if count > 0 {
            parts.push(format!(
                "**Nutrition**: {count} balanced meals per day targeting {} calories, {}.",
                text_or(meals, "daily_calories", "2000"),
                text_or(meals, "budget_estimate", "within budget"),
            ));
        }
    }

    if let Some(sleep) = content(Domain::Sleep).filter(|c| !c.is_empty()) {
        parts.push(format!(
            "**Sleep**: {} hours nightly ({} - {}) with optimized sleep hygiene.",
            text_or(sleep, "target_hours", "8"),
            text_or(sleep, "bedtime", "10:30 PM"),
            text_or(sleep, "wake_time", "6:30 AM"),
        ));
    }

    if let Some(wellness) = content(Domain::MentalWellness) {
        let practices = array_len(wellness, "daily_practices");
        if practices > 0 {
            parts.push(format!(
                "**Mental Wellness**: {practices} daily practices for {}.",
                text_or(wellness, "focus", "stress management"),
            ));
        }
    }

    let mut limits = Vec::new();
    if let Some(budget) = constraints.weekly_food_budget {
        limits.push(format!("a ${budget} weekly food budget"));
    }
    if let Some(minutes) = constraints.max_weekly_minutes {
        limits.push(format!("{minutes} minutes of weekly activity time"));
    }
    if !limits.is_empty() {
        parts.push(format!(
            "**Constraints Met**: Plan optimized for {}.",
            limits.join(" and ")
        ));
    }

    if parts.is_empty() {
        FALLBACK_SUMMARY.to_string()
    } else {
        parts.join("\n\n")
    }
}

fn array_len(map: &JsonMap, key: &str) -> usize {
    map.get(key)
        .and_then(JsonValue::as_array)
        .map(Vec::len)
        .unwrap_or(0)
}

fn text_or(map: &JsonMap, key: &str, fallback: &str) -> String {
    match map.get(key) {
        Some(JsonValue::String(text)) => text.clone(),
        Some(JsonValue::Number(number)) => number.to_string(),
        _ => fallback.to_string(),
    }
}
