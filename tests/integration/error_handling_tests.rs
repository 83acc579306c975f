// Error handling and edge case tests

use std::fs;

use serde_json::{json, Value as JsonValue};
use tempfile::TempDir;
use wellsync_coordinator::models::conflict::ConflictType;
use wellsync_coordinator::models::energy::{BalanceStatus, EnergyBalance, RecoveryPriorityLevel};
use wellsync_coordinator::services::proposal_defaults::default_content;
use wellsync_coordinator::services::recovery_prioritizer::RecoveryPrioritizer;
use wellsync_coordinator::{
    AppError, AppResult, CoordinationRequest, CoordinationService, CoordinationSettings, Domain,
    SettingsService, UnifiedPlan,
};

fn request(proposals: JsonValue) -> CoordinationRequest {
    CoordinationRequest::new(proposals.as_object().cloned().unwrap_or_default())
}

#[test]
fn missing_domain_returns_error_envelope() -> AppResult<()> {
    let service = CoordinationService::default();
    let request = request(json!({
        "FitnessAgent": {"confidence": 0.8},
        "NutritionAgent": {"confidence": 0.8},
        "MentalWellnessAgent": {"confidence": 0.8}
    }));
    let before = request.clone();

    let plan = service.coordinate(&request);

    assert_eq!(request, before);
    assert!(plan.is_error());
    assert!(plan.unified_plan.is_empty());
    assert_eq!(plan.confidence, 0.0);
    assert_eq!(
        plan.reasoning,
        "Coordination failed due to invalid proposals from: SleepAgent"
    );

    let report = plan.validation_results.as_ref().expect("validation report");
    assert!(!report.all_valid);
    assert_eq!(report.missing_agents, vec!["SleepAgent".to_string()]);

    let json = plan.to_json()?;
    assert_eq!(json["error"], json!("Invalid agent proposals detected"));
    assert!(json.get("recovery_prioritization").is_none());
    Ok(())
}

#[test]
fn empty_request_lists_every_domain_as_missing() {
    let plan = CoordinationService::default().coordinate(&CoordinationRequest::default());

    let report = plan.validation_results.expect("validation report");
    assert_eq!(
        report.missing_agents,
        vec![
            "FitnessAgent".to_string(),
            "NutritionAgent".to_string(),
            "SleepAgent".to_string(),
            "MentalWellnessAgent".to_string(),
        ]
    );
}

#[test]
fn malformed_fields_fall_back_to_defaults() -> AppResult<()> {
    let service = CoordinationService::default();

    let plan = service.try_coordinate(&request(json!({
        "FitnessAgent": {"confidence": "high", "energy_demand": 42, "workout_plan": "run a lot"},
        "NutritionAgent": {"confidence": 3.0, "meal_plan": {}},
        "SleepAgent": {"confidence": null, "recovery_status": "exhausted"},
        "MentalWellnessAgent": "be mindful"
    })))?;

    assert!(!plan.is_error());
    assert!(plan.conflicts_detected.is_empty());
    assert_eq!(plan.agent_contributions["FitnessAgent"].confidence, 0.5);
    assert_eq!(plan.agent_contributions["NutritionAgent"].confidence, 1.0);
    assert_eq!(plan.agent_contributions["SleepAgent"].confidence, 0.5);
    for domain in Domain::ALL {
        assert_eq!(
            plan.unified_plan.get(&domain),
            Some(&JsonValue::Object(default_content(domain))),
            "{domain} content should be the default"
        );
    }
    Ok(())
}

#[test]
fn slot_names_and_unknown_agents_are_accepted() -> AppResult<()> {
    let service = CoordinationService::default();

    let plan = service.try_coordinate(&request(json!({
        "fitness": {},
        "nutrition": {},
        "sleep": {},
        "mental_wellness": {},
        "WeatherAgent": {"confidence": 0.99}
    })))?;

    assert_eq!(plan.optimization_metrics.total_agents, 4);
    assert!(!plan.agent_contributions.contains_key("WeatherAgent"));
    Ok(())
}

#[test]
fn try_coordinate_surfaces_missing_domains() {
    let service = CoordinationService::default();

    let err = service
        .try_coordinate(&request(json!({"FitnessAgent": {}})))
        .expect_err("incomplete proposals");

    match &err {
        AppError::MissingProposals { agents } => assert_eq!(agents.len(), 3),
        other => panic!("unexpected error: {other:?}"),
    }
    assert_eq!(
        err.to_string(),
        "missing proposals from: NutritionAgent, SleepAgent, MentalWellnessAgent"
    );
}

#[test]
fn coordinate_json_rejects_malformed_bodies_only() -> AppResult<()> {
    let service = CoordinationService::default();

    assert!(matches!(
        service.coordinate_json("[1, 2, 3]"),
        Err(AppError::Serialization(_))
    ));

    let incomplete = service.coordinate_json(r#"{"proposals": {"SleepAgent": {}}}"#)?;
    assert_eq!(incomplete["error"], json!("Invalid agent proposals detected"));

    let body = json!({
        "proposals": {
            "FitnessAgent": {},
            "NutritionAgent": {"budget_utilization": 0.99},
            "SleepAgent": {},
            "MentalWellnessAgent": {}
        },
        "constraints": {"budget": {"weekly_food_budget": 60}}
    });
    let plan = service.coordinate_json(&body.to_string())?;
    assert_eq!(plan["conflicts_detected"], json!(["budget_conflict"]));
    assert_eq!(plan["optimization_metrics"]["hard_constraints"], json!(1));
    Ok(())
}

#[test]
fn failure_envelope_keeps_agent_count() -> AppResult<()> {
    let plan = UnifiedPlan::failure("proposal store unavailable", 3);

    let json = plan.to_json()?;
    assert_eq!(
        json["reasoning"],
        json!("Coordination failed with error: proposal store unavailable")
    );
    assert_eq!(json["optimization_metrics"]["total_agents"], json!(3));
    assert_eq!(json["confidence"], json!(0.0));
    assert!(json.get("validation_results").is_none());
    Ok(())
}

#[test]
fn settings_file_changes_conflict_thresholds() -> AppResult<()> {
    let dir = TempDir::new()?;
    let path = dir.path().join("coordination.yaml");
    fs::write(
        &path,
        "budget_utilization_limit: 0.97\nbudget_utilization_target: 0.9\n",
    )?;

    let settings = SettingsService::with_file(&path).get()?;
    let relaxed = CoordinationService::new(settings);
    let proposals = json!({
        "FitnessAgent": {},
        "NutritionAgent": {"budget_utilization": 0.95},
        "SleepAgent": {},
        "MentalWellnessAgent": {}
    });

    let plan = relaxed.try_coordinate(&request(proposals.clone()))?;
    assert!(plan.conflicts_detected.is_empty());

    let strict = CoordinationService::default().try_coordinate(&request(proposals))?;
    assert_eq!(strict.conflicts_detected, vec![ConflictType::Budget]);
    Ok(())
}

#[test]
fn invalid_settings_file_is_rejected() -> AppResult<()> {
    let dir = TempDir::new()?;
    let path = dir.path().join("coordination.yaml");
    fs::write(&path, "budget_utilization_target: 0.95\n")?;

    let result = SettingsService::with_file(&path).get();

    assert!(matches!(result, Err(AppError::InvalidSettings { .. })));
    Ok(())
}

#[test]
fn out_of_range_thresholds_do_not_disable_escalation() -> AppResult<()> {
    let dir = TempDir::new()?;
    let path = dir.path().join("coordination.yaml");
    fs::write(
        &path,
        "thresholds:\n  critical_recovery_capacity: .nan\n  critical_sustainability: -1\n",
    )?;

    let result = SettingsService::with_file(&path).get();
    assert!(matches!(result, Err(AppError::InvalidSettings { .. })));

    let defaults = RecoveryPrioritizer::new(&CoordinationSettings::default());
    let depleted = EnergyBalance {
        energy_demand: 50.0,
        energy_availability: 50.0,
        recovery_capacity: 5.0,
        stress_load: 40.0,
        sustainability_score: 5.0,
        balance_status: BalanceStatus::Deficit,
    };
    assert_eq!(
        defaults.determine_priority_level(&[], &depleted),
        RecoveryPriorityLevel::Critical
    );
    Ok(())
}

