// Recovery prioritization through the full coordination pipeline

use serde_json::{json, Value as JsonValue};
use wellsync_coordinator::models::energy::{
    BalanceStatus, EnergyBalance, EnergyConflict, RecoveryPriorityLevel, RecoveryTimeline,
};
use wellsync_coordinator::models::plan::ContributionType;
use wellsync_coordinator::services::proposal_defaults::default_content;
use wellsync_coordinator::services::recovery_prioritizer::RecoveryPrioritizer;
use wellsync_coordinator::{AppResult, CoordinationRequest, CoordinationService, Domain};

fn request(proposals: JsonValue) -> CoordinationRequest {
    CoordinationRequest::new(proposals.as_object().cloned().unwrap_or_default())
}

fn confident_defaults() -> JsonValue {
    json!({
        "FitnessAgent": {"confidence": 0.8},
        "NutritionAgent": {"confidence": 0.8},
        "SleepAgent": {"confidence": 0.8},
        "MentalWellnessAgent": {"confidence": 0.8}
    })
}

fn balance(recovery_capacity: f64, sustainability_score: f64) -> EnergyBalance {
    EnergyBalance {
        energy_demand: 60.0,
        energy_availability: 70.0,
        recovery_capacity,
        stress_load: 40.0,
        sustainability_score,
        balance_status: BalanceStatus::Balanced,
    }
}

#[test]
fn sleep_debt_and_overtraining_stack_into_critical_priority() -> AppResult<()> {
    let service = CoordinationService::default();
    let mut proposals = confident_defaults();
    proposals["FitnessAgent"]["training_load_score"] = json!(90);
    let request = request(proposals).with_shared_state(json!({
        "user_profile": {
            "user_id": "u-42",
            "recent_data": {"sleep": {"daily_hours": [5, 5, 6]}}
        }
    }));

    let plan = service.try_coordinate(&request)?;

    let report = plan
        .recovery_prioritization
        .as_ref()
        .expect("recovery block present");
    assert_eq!(
        report.energy_conflicts,
        vec![
            EnergyConflict::SleepDebtAccumulation,
            EnergyConflict::OvertrainingRisk,
            EnergyConflict::MultipleStressors,
        ]
    );

    let decision = &report.recovery_priority;
    assert_eq!(decision.priority_level, RecoveryPriorityLevel::Critical);
    assert_eq!(decision.timeline, RecoveryTimeline::Immediate);
    assert_eq!(decision.interventions.len(), 9);
    assert!((decision.confidence - 0.68).abs() < 1e-9);
    assert_eq!(
        decision.trade_offs,
        vec![
            "Increased sleep time may reduce available time for other activities".to_string(),
            "Extended timeline for achieving wellness goals".to_string(),
            "Focus on sustainability over aggressive optimization".to_string(),
        ]
    );

    let explanations = &report.trade_off_explanations;
    assert!(explanations
        .recovery_rationale
        .starts_with("Critical recovery prioritization due to severe energy imbalance."));
    assert!(explanations
        .recovery_rationale
        .contains("Limited recovery capacity (45/100) requires intervention"));
    assert_eq!(explanations.domain_impacts.len(), 3);
    assert_eq!(explanations.sustainability_benefits.len(), 7);

    // Medium demand stepped to low; the lower demand clears every cross-domain conflict.
    assert!(plan.conflicts_detected.is_empty());
    assert!((plan.agent_contributions["FitnessAgent"].confidence - 0.7).abs() < 1e-9);

    let sleep = plan.unified_plan.get(&Domain::Sleep).expect("sleep slot");
    assert_eq!(sleep["priority_level"], json!("critical"));
    let wellness = plan
        .unified_plan
        .get(&Domain::MentalWellness)
        .expect("wellness slot");
    assert_eq!(wellness["focus"], json!("stress_reduction_and_recovery"));
    assert_eq!(
        plan.agent_contributions["NutritionAgent"].contribution_type,
        ContributionType::FullProposal
    );
    Ok(())
}

#[test]
fn medium_priority_is_reported_but_not_applied() -> AppResult<()> {
    let service = CoordinationService::default();
    let mut proposals = confident_defaults();
    proposals["MentalWellnessAgent"]["motivation_level"] = json!("low");
    let request = request(proposals).with_shared_state(json!({
        "stress_indicators": {
            "work_stress_level": 10,
            "relationship_stress": 10,
            "financial_stress": 10
        }
    }));

    let plan = service.try_coordinate(&request)?;

    let report = plan
        .recovery_prioritization
        .as_ref()
        .expect("recovery block present");
    assert_eq!(report.energy_conflicts, vec![EnergyConflict::StressOverload]);
    assert_eq!(report.energy_balance.stress_load, 100.0);
    assert_eq!(
        report.recovery_priority.priority_level,
        RecoveryPriorityLevel::Medium
    );
    assert_eq!(report.recovery_priority.timeline, RecoveryTimeline::MediumTerm);
    assert!(report
        .recovery_priority
        .interventions
        .contains(&"Implement stress reduction techniques".to_string()));

    assert!(plan
        .agent_contributions
        .values()
        .all(|c| c.contribution_type == ContributionType::FullProposal));
    assert_eq!(
        plan.unified_plan.get(&Domain::MentalWellness),
        Some(&JsonValue::Object(default_content(Domain::MentalWellness)))
    );
    Ok(())
}

#[test]
fn no_energy_conflicts_means_no_recovery_block() -> AppResult<()> {
    let service = CoordinationService::default();

    let plan = service.try_coordinate(&request(confident_defaults()))?;

    assert!(plan.recovery_prioritization.is_none());
    assert!(plan.to_json()?.get("recovery_prioritization").is_none());
    Ok(())
}

#[test]
fn recovery_report_serializes_with_wire_names() -> AppResult<()> {
    let service = CoordinationService::default();
    let mut proposals = confident_defaults();
    proposals["FitnessAgent"]["energy_demand"] = json!("high");
    proposals["SleepAgent"]["recovery_status"] = json!("poor");

    let json = service.try_coordinate(&request(proposals))?.to_json()?;

    let report = &json["recovery_prioritization"];
    assert_eq!(report["energy_balance"]["balance_status"], json!("deficit"));
    assert_eq!(report["energy_conflicts"], json!(["high_demand_low_recovery"]));
    assert_eq!(report["recovery_priority"]["priority_level"], json!("high"));
    assert_eq!(report["recovery_priority"]["timeline"], json!("short_term"));
    assert_eq!(
        report["trade_off_explanations"]["timeline_explanation"],
        json!("Short-term focus needed to restore energy balance within 1-2 weeks")
    );
    Ok(())
}

#[test]
fn critical_thresholds_are_strict() {
    let prioritizer = RecoveryPrioritizer::default();

    assert_eq!(
        prioritizer.determine_priority_level(&[], &balance(60.0, 30.0)),
        RecoveryPriorityLevel::Medium
    );
    assert_eq!(
        prioritizer.determine_priority_level(&[], &balance(60.0, 29.9)),
        RecoveryPriorityLevel::Critical
    );
    assert_eq!(
        prioritizer.determine_priority_level(&[], &balance(80.0, 80.0)),
        RecoveryPriorityLevel::Low
    );
}

#[test]
fn stress_alone_never_escalates_to_critical() {
    let prioritizer = RecoveryPrioritizer::default();
    let conflicts = [
        EnergyConflict::StressOverload,
        EnergyConflict::MultipleStressors,
    ];

    assert_eq!(
        prioritizer.determine_priority_level(&conflicts, &balance(80.0, 80.0)),
        RecoveryPriorityLevel::High
    );
}
