// Repeated coordination produces byte-identical output

use serde_json::{json, Value as JsonValue};
use wellsync_coordinator::utils::fingerprint::fingerprint;
use wellsync_coordinator::{AppResult, CoordinationRequest, CoordinationService};

fn conflicted_request() -> CoordinationRequest {
    let proposals = json!({
        "FitnessAgent": {"confidence": 0.82, "energy_demand": "high", "training_load_score": 88},
        "NutritionAgent": {"confidence": 0.77, "nutritional_adequacy": "low", "budget_utilization": 0.96},
        "SleepAgent": {"confidence": 0.9, "recovery_status": "fair"},
        "MentalWellnessAgent": {
            "confidence": 0.6,
            "motivation_level": "low",
            "complexity_adjustments": {"simplification_needed": true}
        }
    });
    CoordinationRequest::new(proposals.as_object().cloned().unwrap_or_default())
        .with_constraints(json!({
            "budget": {"weekly_food_budget": 75},
            "time_available": {"max_weekly_minutes": 90}
        }))
        .with_shared_state(json!({
            "user_profile": {
                "recent_data": {"sleep": {"daily_hours": [7, 6, 6.5, 5, 7]}},
                "stress_indicators": {"work_stress_level": 6, "health_concerns": true}
            }
        }))
}

#[test]
fn repeated_runs_serialize_identically() -> AppResult<()> {
    let service = CoordinationService::default();
    let request = conflicted_request();

    let first = serde_json::to_string(&service.coordinate(&request))?;
    let second = serde_json::to_string(&service.coordinate(&request))?;

    assert_eq!(first, second);
    Ok(())
}

#[test]
fn separate_services_agree() -> AppResult<()> {
    let a = CoordinationService::default().coordinate(&conflicted_request());
    let b = CoordinationService::default().coordinate(&conflicted_request());

    assert_eq!(a, b);
    assert!(!a.conflicts_detected.is_empty());
    assert!(a.recovery_prioritization.is_some());
    assert_eq!(a.optimization_metrics.optimization_time_ms, 0);
    Ok(())
}

#[test]
fn input_key_order_does_not_change_output() -> AppResult<()> {
    let service = CoordinationService::default();
    let forward = r#"{
        "proposals": {
            "FitnessAgent": {"energy_demand": "high", "confidence": 0.8},
            "NutritionAgent": {"confidence": 0.8},
            "SleepAgent": {"recovery_status": "poor", "confidence": 0.8},
            "MentalWellnessAgent": {"confidence": 0.8}
        },
        "constraints": {"budget": {"weekly_food_budget": 80}, "time_available": {"max_weekly_minutes": 200}}
    }"#;
    let reversed = r#"{
        "constraints": {"time_available": {"max_weekly_minutes": 200}, "budget": {"weekly_food_budget": 80}},
        "proposals": {
            "MentalWellnessAgent": {"confidence": 0.8},
            "SleepAgent": {"confidence": 0.8, "recovery_status": "poor"},
            "NutritionAgent": {"confidence": 0.8},
            "FitnessAgent": {"confidence": 0.8, "energy_demand": "high"}
        }
    }"#;

    let a: JsonValue = service.coordinate_json(forward)?;
    let b: JsonValue = service.coordinate_json(reversed)?;

    assert_eq!(serde_json::to_string(&a)?, serde_json::to_string(&b)?);
    assert_eq!(
        a["optimization_metrics"]["input_fingerprint"],
        b["optimization_metrics"]["input_fingerprint"]
    );
    Ok(())
}

#[test]
fn fingerprint_tracks_request_content() -> AppResult<()> {
    let service = CoordinationService::default();
    let request = conflicted_request();
    let changed = request
        .clone()
        .with_constraints(json!({"budget": {"weekly_food_budget": 76}}));

    let plan = service.try_coordinate(&request)?;
    let changed_plan = service.try_coordinate(&changed)?;

    assert_eq!(
        plan.optimization_metrics.input_fingerprint,
        Some(fingerprint(&request)?)
    );
    assert_ne!(
        plan.optimization_metrics.input_fingerprint,
        changed_plan.optimization_metrics.input_fingerprint
    );
    Ok(())
}
