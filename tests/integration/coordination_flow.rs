// End-to-end coordination scenarios

use serde_json::{json, Value as JsonValue};
use wellsync_coordinator::models::conflict::ConflictType;
use wellsync_coordinator::models::constraints::PlanningConstraints;
use wellsync_coordinator::models::domain::EnergyDemand;
use wellsync_coordinator::models::plan::ContributionType;
use wellsync_coordinator::services::conflict_detector::ConflictDetector;
use wellsync_coordinator::services::conflict_resolver::ConflictResolver;
use wellsync_coordinator::services::proposal_defaults::default_content;
use wellsync_coordinator::services::proposal_validator::ProposalValidator;
use wellsync_coordinator::{AppResult, CoordinationRequest, CoordinationService, Domain};

fn request(proposals: JsonValue) -> CoordinationRequest {
    CoordinationRequest::new(proposals.as_object().cloned().unwrap_or_default())
}

fn default_only() -> JsonValue {
    json!({
        "FitnessAgent": {},
        "NutritionAgent": {},
        "SleepAgent": {},
        "MentalWellnessAgent": {}
    })
}

fn contribution_confidence(plan: &wellsync_coordinator::UnifiedPlan, agent: &str) -> f64 {
    plan.agent_contributions
        .get(agent)
        .map(|c| c.confidence)
        .unwrap_or(f64::NAN)
}

fn assert_close(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() < 1e-9,
        "expected {expected}, got {actual}"
    );
}

#[test]
fn default_only_proposals_are_full_contributions() {
    let service = CoordinationService::default();

    let plan = service.coordinate(&request(default_only()));

    assert!(!plan.is_error());
    assert_eq!(plan.agent_contributions.len(), 4);
    assert!(plan
        .agent_contributions
        .values()
        .all(|c| c.contribution_type == ContributionType::FullProposal));
    assert!(plan.conflicts_detected.is_empty());
    assert_eq!(plan.constraint_satisfaction_score, 1.0);
    assert!(plan.recovery_prioritization.is_none());
    assert_close(plan.confidence, 0.5);
    assert_eq!(plan.optimization_metrics.total_agents, 4);
}

#[test]
fn conflict_free_content_passes_through_verbatim() {
    let service = CoordinationService::default();
    let workout = json!({
        "focus": "mobility",
        "sessions": [{"day": "Tuesday", "duration": 30}],
        "notes": {"equipment": ["mat"]}
    });
    let wellness = json!({"focus": "gratitude", "daily_practices": [{"activity": "Journaling"}]});

    let plan = service.coordinate(&request(json!({
        "FitnessAgent": {"confidence": 0.9, "energy_demand": "low", "workout_plan": workout},
        "NutritionAgent": {"confidence": 0.85, "nutritional_adequacy": "high"},
        "SleepAgent": {"confidence": 0.8, "recovery_status": "excellent"},
        "MentalWellnessAgent": {"confidence": 0.7, "wellness_recommendations": wellness}
    })));

    assert!(plan.conflicts_resolved.is_empty());
    assert_eq!(plan.constraint_satisfaction_score, 1.0);
    assert_eq!(plan.unified_plan.get(&Domain::Fitness), Some(&workout));
    assert_eq!(plan.unified_plan.get(&Domain::MentalWellness), Some(&wellness));
    assert_eq!(
        plan.unified_plan.get(&Domain::Nutrition),
        Some(&JsonValue::Object(default_content(Domain::Nutrition)))
    );
    assert!(plan
        .reasoning
        .contains("**Fitness**: 1 workout sessions per week focusing on mobility at moderate intensity."));
    assert_close(plan.confidence, (0.9 + 0.85 + 0.8 + 0.7) / 4.0);
}

#[test]
fn poor_recovery_under_high_demand_is_rebalanced_before_detection() {
    let service = CoordinationService::default();

    let plan = service.coordinate(&request(json!({
        "FitnessAgent": {"confidence": 0.8, "energy_demand": "high"},
        "NutritionAgent": {"confidence": 0.8},
        "SleepAgent": {"confidence": 0.8, "recovery_status": "poor"},
        "MentalWellnessAgent": {"confidence": 0.8}
    })));

    let recovery = plan
        .recovery_prioritization
        .as_ref()
        .expect("recovery block present");
    assert_eq!(recovery.recovery_priority.priority_level.as_str(), "high");
    assert_eq!(
        recovery
            .energy_conflicts
            .iter()
            .map(|c| c.as_str())
            .collect::<Vec<_>>(),
        vec!["high_demand_low_recovery"]
    );

    // Fitness already stepped down, so no recovery conflict remains.
    assert!(plan.conflicts_detected.is_empty());
    assert_close(contribution_confidence(&plan, "FitnessAgent"), 0.7);
    assert_close(contribution_confidence(&plan, "SleepAgent"), 0.8);

    let fitness = plan.unified_plan.get(&Domain::Fitness).expect("fitness slot");
    assert_eq!(fitness["recovery_prioritization"], json!(true));
    assert_eq!(fitness["modification_reason"], json!("Recovery prioritization: high"));

    let contributions = &plan.agent_contributions;
    assert_eq!(
        contributions["FitnessAgent"].contribution_type,
        ContributionType::ModifiedProposal
    );
    assert_eq!(
        contributions["MentalWellnessAgent"].contribution_type,
        ContributionType::FullProposal
    );
    assert_close(plan.confidence, (0.7 + 0.8 + 0.8 + 0.8) / 4.0);
}

#[test]
fn budget_overrun_is_resolved_with_cost_optimization() {
    let service = CoordinationService::default();

    let plan = service.coordinate(&request(json!({
        "FitnessAgent": {"confidence": 0.8},
        "NutritionAgent": {"confidence": 0.8, "budget_utilization": 0.95},
        "SleepAgent": {"confidence": 0.8},
        "MentalWellnessAgent": {"confidence": 0.8}
    })));

    assert_eq!(plan.conflicts_detected, vec![ConflictType::Budget]);
    let record = &plan.conflicts_resolved[0];
    assert_eq!(record.resolution_strategy, "optimize_nutrition_for_budget");
    assert_eq!(record.confidence_impact, -0.05);
    assert_eq!(
        plan.trade_offs_made,
        vec!["Optimized meal plan for budget constraints".to_string()]
    );

    let nutrition = plan.unified_plan.get(&Domain::Nutrition).expect("nutrition slot");
    assert_eq!(nutrition["cost_optimization"], json!("maximum_efficiency"));
    assert_close(contribution_confidence(&plan, "NutritionAgent"), 0.75);
    assert_close(plan.constraint_satisfaction_score, 0.95);
    assert!(plan
        .reasoning
        .ends_with("Optimized for cost-effectiveness while maintaining nutritional adequacy."));
}

#[test]
fn detector_and_resolver_handle_recovery_and_budget_directly() {
    let raw = json!({
        "FitnessAgent": {"confidence": 0.8, "energy_demand": "high"},
        "NutritionAgent": {"confidence": 0.8, "budget_utilization": 0.95},
        "SleepAgent": {"confidence": 0.8, "recovery_status": "poor"},
        "MentalWellnessAgent": {"confidence": 0.8}
    });
    let validated = ProposalValidator::validate_all(raw.as_object().expect("object literal"));
    assert!(validated.report.all_valid);

    let conflicts =
        ConflictDetector::default().detect(&validated.proposals, &PlanningConstraints::default());
    let types: Vec<ConflictType> = conflicts.iter().map(|c| c.conflict_type).collect();
    assert_eq!(
        types,
        vec![ConflictType::Energy, ConflictType::Budget, ConflictType::Recovery]
    );

    let outcome = ConflictResolver::default().resolve_all(conflicts, &validated.proposals);

    assert_eq!(outcome.proposals.energy_demand(), EnergyDemand::Medium);
    assert!(outcome.proposals.budget_utilization() <= 0.85);
    assert_eq!(validated.proposals.budget_utilization(), 0.95);
    // Recovery (-0.1) and energy (-0.05) both affect fitness.
    let fitness = outcome
        .proposals
        .get(wellsync_coordinator::Domain::Fitness)
        .map(|p| p.confidence)
        .unwrap_or(f64::NAN);
    assert_close(fitness, 0.65);
    assert_eq!(
        outcome
            .resolved
            .iter()
            .map(|r| r.conflict_type)
            .collect::<Vec<_>>(),
        vec![ConflictType::Recovery, ConflictType::Energy, ConflictType::Budget]
    );
}

#[test]
fn stacked_conflicts_apply_each_impact_once() {
    let service = CoordinationService::default();

    let plan = service.coordinate(&request(json!({
        "FitnessAgent": {"confidence": 0.8, "energy_demand": "high"},
        "NutritionAgent": {"confidence": 0.8, "nutritional_adequacy": "low"},
        "SleepAgent": {"confidence": 0.8, "recovery_status": "fair"},
        "MentalWellnessAgent": {"confidence": 0.8}
    })));

    assert_eq!(
        plan.conflicts_detected,
        vec![ConflictType::Energy, ConflictType::Nutritional]
    );
    // Energy (-0.05) and nutritional (-0.1) each land once on fitness and nutrition.
    assert_close(contribution_confidence(&plan, "FitnessAgent"), 0.65);
    assert_close(contribution_confidence(&plan, "NutritionAgent"), 0.65);
    assert_close(contribution_confidence(&plan, "SleepAgent"), 0.75);
    assert_close(contribution_confidence(&plan, "MentalWellnessAgent"), 0.8);
    assert_close(plan.confidence, 0.7125);
    assert_close(plan.constraint_satisfaction_score, 0.85);

    let nutrition_flags = &plan.agent_contributions["NutritionAgent"].flags;
    assert_eq!(nutrition_flags.get("adequacy_priority"), Some(&json!("critical")));
    assert_eq!(
        nutrition_flags.get("priority_adjustment"),
        Some(&json!("increase_adequacy"))
    );
    assert!(plan
        .trade_offs_made
        .contains(&"Reduced fitness intensity to match energy availability".to_string()));
}

#[test]
fn tight_time_budget_only_touches_time_demanding_domains() -> AppResult<()> {
    let service = CoordinationService::default();
    let request = request(default_only())
        .with_constraints(json!({"time_available": {"max_weekly_minutes": 100}}));

    let plan = service.try_coordinate(&request)?;

    assert_eq!(plan.conflicts_detected, vec![ConflictType::Time]);
    let record = &plan.conflicts_resolved[0];
    assert_eq!(
        record.reasoning,
        "Total time needed (130min) exceeds available time (100min)"
    );
    assert_eq!(
        plan.agent_contributions["NutritionAgent"].contribution_type,
        ContributionType::FullProposal
    );
    assert_eq!(plan.optimization_metrics.hard_constraints, Some(1));
    Ok(())
}

#[test]
fn motivation_conflict_simplifies_complex_plans() {
    let service = CoordinationService::default();

    let plan = service.coordinate(&request(json!({
        "FitnessAgent": {"workout_plan": {"complexity": "high", "sessions": []}},
        "NutritionAgent": {},
        "SleepAgent": {},
        "MentalWellnessAgent": {
            "motivation_level": "low",
            "complexity_adjustments": {"simplification_needed": true}
        }
    })));

    assert_eq!(plan.conflicts_detected, vec![ConflictType::Motivation]);
    let fitness = plan.unified_plan.get(&Domain::Fitness).expect("fitness slot");
    assert_eq!(fitness["complexity_reduction"], json!("simplified_for_motivation"));
    assert_eq!(
        plan.trade_offs_made,
        vec!["Simplified workout plan for better adherence".to_string()]
    );
}

#[test]
fn confidence_stays_within_unit_interval() {
    let service = CoordinationService::default();
    let demands = ["low", "medium", "high"];
    let recoveries = ["poor", "fair", "good", "excellent"];
    let adequacies = ["low", "medium", "high"];

    for demand in demands {
        for recovery in recoveries {
            for adequacy in adequacies {
                let plan = service.coordinate(&request(json!({
                    "FitnessAgent": {"confidence": 0.15, "energy_demand": demand, "training_load_score": 95},
                    "NutritionAgent": {"confidence": 1.4, "nutritional_adequacy": adequacy, "budget_utilization": 1.2},
                    "SleepAgent": {"confidence": -0.3, "recovery_status": recovery},
                    "MentalWellnessAgent": {"confidence": 0.2, "motivation_level": "low"}
                })));

                assert!((0.0..=1.0).contains(&plan.confidence));
                assert!((0.0..=1.0).contains(&plan.constraint_satisfaction_score));
                for contribution in plan.agent_contributions.values() {
                    assert!(
                        (0.0..=1.0).contains(&contribution.confidence),
                        "{demand}/{recovery}/{adequacy}: {}",
                        contribution.confidence
                    );
                }
            }
        }
    }
}
