use std::collections::BTreeMap;

use crate::models::domain::Domain;
use crate::models::energy::{
    BalanceStatus, EnergyBalance, RecoveryPriorityDecision, RecoveryPriorityLevel,
    RecoveryTimeline,
};
use crate::models::plan::{TradeOffDetail, TradeOffExplanations};

const BASE_SUSTAINABILITY_BENEFITS: [&str; 5] = [
    "Prevents burnout and overtraining syndrome",
    "Maintains consistent progress over time",
    "Reduces risk of injury and setbacks",
    "Improves adherence to wellness plans",
    "Supports long-term habit formation",
];

const ELEVATED_PRIORITY_BENEFITS: [&str; 2] = [
    "Prevents need for extended recovery periods",
    "Maintains motivation and engagement",
];

/// Formats a recovery decision into user-facing rationale.
pub struct TradeOffExplainer;

impl TradeOffExplainer {
    pub fn explain(
        decision: &RecoveryPriorityDecision,
        balance: &EnergyBalance,
    ) -> TradeOffExplanations {
        TradeOffExplanations {
            recovery_rationale: recovery_rationale(decision, balance),
            domain_impacts: domain_impacts(decision),
            trade_off_details: decision.trade_offs.iter().map(|t| detail(t)).collect(),
            sustainability_benefits: sustainability_benefits(decision.priority_level),
            timeline_explanation: timeline_explanation(decision.timeline).to_string(),
            confidence_factors: confidence_factors(decision.confidence),
        }
    }
}

fn recovery_rationale(decision: &RecoveryPriorityDecision, balance: &EnergyBalance) -> String {
    let mut parts = vec![match decision.priority_level {
        RecoveryPriorityLevel::Critical => {
            "Critical recovery prioritization due to severe energy imbalance".to_string()
        }
        RecoveryPriorityLevel::High => {
            "High recovery priority to prevent overtraining and maintain sustainability"
                .to_string()
        }
        RecoveryPriorityLevel::Medium | RecoveryPriorityLevel::Low => {
            "Moderate recovery focus to optimize long-term wellness outcomes".to_string()
        }
    }];

    if balance.balance_status == BalanceStatus::Deficit {
        parts.push(format!(
            "Current energy deficit (demand: {:.0}, availability: {:.0})",
            balance.energy_demand, balance.energy_availability
        ));
    }
    if balance.recovery_capacity < 50.0 {
        parts.push(format!(
            "Limited recovery capacity ({:.0}/100) requires intervention",
            balance.recovery_capacity
        ));
    }
    if balance.sustainability_score < 60.0 {
        parts.push(format!(
            "Low sustainability score ({:.0}/100) indicates unsustainable current trajectory",
            balance.sustainability_score
        ));
    }

    format!("{}.", parts.join(". "))
}

fn domain_impacts(decision: &RecoveryPriorityDecision) -> BTreeMap<Domain, String> {
    decision
        .affected_domains
        .iter()
        .map(|domain| {
            let impact = match domain {
                Domain::Fitness => {
                    "Training intensity reduced to allow for adequate recovery and prevent overtraining"
                }
                Domain::Nutrition => {
                    "Nutrition plan optimized to support recovery and energy availability"
                }
                Domain::Sleep => "Sleep prioritized as the foundation for all other wellness activities",
                Domain::MentalWellness => {
                    "Plan complexity reduced to match current motivation and stress capacity"
                }
            };
            (*domain, impact.to_string())
        })
        .collect()
}

fn detail(trade_off: &str) -> TradeOffDetail {
    let lowered = trade_off.to_lowercase();
    let (rationale, benefit) = if lowered.contains("fitness intensity") {
        (
            "Reduced intensity prevents overtraining and allows for better adaptation",
            "Improved long-term progress and reduced injury risk",
        )
    } else if lowered.contains("food budget") {
        (
            "Adequate nutrition is essential for recovery and energy availability",
            "Better energy levels and training adaptation",
        )
    } else if lowered.contains("sleep time") {
        (
            "Sleep is the most important recovery intervention",
            "Improved recovery, energy, and overall wellness outcomes",
        )
    } else {
        (
            "Supports overall recovery and sustainability",
            "Better long-term wellness outcomes",
        )
    };

    TradeOffDetail {
        trade_off: trade_off.to_string(),
        rationale: rationale.to_string(),
        benefit: benefit.to_string(),
    }
}

fn sustainability_benefits(level: RecoveryPriorityLevel) -> Vec<String> {
    let mut benefits: Vec<String> = BASE_SUSTAINABILITY_BENEFITS
        .iter()
        .map(|b| b.to_string())
        .collect();
    if level.is_applied() {
        benefits.extend(ELEVATED_PRIORITY_BENEFITS.iter().map(|b| b.to_string()));
    }
    benefits
}

fn timeline_explanation(timeline: RecoveryTimeline) -> &'static str {
    match timeline {
        RecoveryTimeline::Immediate => {
            "Immediate intervention required to prevent further deterioration"
        }
        RecoveryTimeline::ShortTerm => {
            "Short-term focus needed to restore energy balance within 1-2 weeks"
        }
        RecoveryTimeline::MediumTerm => {
            "Medium-term approach allows gradual improvement over 2-4 weeks"
        }
        RecoveryTimeline::Ongoing => "Ongoing maintenance approach for sustained wellness",
    }
}

fn confidence_factors(confidence: f64) -> BTreeMap<String, String> {
    let level = if confidence > 0.8 {
        "High confidence based on clear indicators and established interventions"
    } else if confidence > 0.6 {
        "Moderate confidence with some uncertainty in outcomes"
    } else {
        "Lower confidence due to complex interactions and multiple variables"
    };

    BTreeMap::from([
        ("confidence_level".to_string(), level.to_string()),
        (
            "data_quality".to_string(),
            "Based on current energy balance assessment and domain proposals".to_string(),
        ),
        (
            "intervention_track_record".to_string(),
            "Interventions based on established recovery science principles".to_string(),
        ),
    ])
}
