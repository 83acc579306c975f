use serde_json::Value as JsonValue;
use tracing::{debug, warn};

use crate::models::domain::{
    AdequacyLevel, Domain, EnergyDemand, MotivationLevel, RecoveryStatus, RiskLevel,
};
use crate::models::proposal::{
    ComplexityAdjustments, DomainMetrics, DomainProposal, FitnessMetrics, JsonMap,
    MentalWellnessMetrics, NutritionMetrics, ProposalSet, ProposalValidation, SleepMetrics,
    ValidationReport,
};
use crate::services::proposal_defaults::default_content;

const DEFAULT_CONFIDENCE: f64 = 0.5;
const DEFAULT_REASONING: &str = "Generated by wellness agent";

/// Output of validating a full set of raw proposals.
#[derive(Debug, Clone)]
pub struct ValidatedProposals {
    pub proposals: ProposalSet,
    pub report: ValidationReport,
}

/// Normalizes raw producer output into typed proposals.
///
/// Field defects are absorbed with defaults and recorded as warnings. The only
/// hard failure is a domain that is missing from the input altogether.
pub struct ProposalValidator;

impl ProposalValidator {
    pub fn validate_all(raw: &JsonMap) -> ValidatedProposals {
        let mut proposals = ProposalSet::new();
        let mut report = ValidationReport {
            all_valid: true,
            ..Default::default()
        };

        for (key, value) in raw {
            let Some(domain) = Domain::from_key(key) else {
                debug!(target: "app::validator", agent = %key, "ignoring proposal from unknown agent");
                report.ignored_agents.push(key.clone());
                continue;
            };

            if proposals.contains(domain) {
                warn!(target: "app::validator", agent = %key, %domain, "duplicate proposal ignored");
                report.ignored_agents.push(key.clone());
                continue;
            }

            let (proposal, validation) = Self::validate_single(domain, value);
            report
                .agent_validations
                .insert(domain.agent_name().to_string(), validation);
            proposals.insert(proposal);
        }

        for domain in Domain::ALL {
            if !proposals.contains(domain) {
                report.missing_agents.push(domain.agent_name().to_string());
                report.all_valid = false;
            }
        }

        if !report.missing_agents.is_empty() {
            warn!(
                target: "app::validator",
                missing = ?report.missing_agents,
                "proposal set incomplete"
            );
        }

        ValidatedProposals { proposals, report }
    }

    pub fn validate_single(domain: Domain, raw: &JsonValue) -> (DomainProposal, ProposalValidation) {
        let mut validation = ProposalValidation::default();

        let fields = match raw {
            JsonValue::Object(map) => map.clone(),
            other => {
                validation
                    .warnings
                    .push("Proposal converted from non-dict format".to_string());
                let mut wrapped = JsonMap::new();
                let text = match other {
                    JsonValue::String(text) => text.clone(),
                    value => value.to_string(),
                };
                wrapped.insert("raw_response".to_string(), JsonValue::String(text));
                wrapped
            }
        };

        let mut reader = FieldReader {
            fields: &fields,
            validation: &mut validation,
        };

        let confidence = reader.confidence();
        let reasoning = reader.reasoning();
        let content = reader.content(domain);
        let metrics = reader.metrics(domain);
        let constraints_used = reader.string_list("constraints_used");
        let dependencies = reader.string_list("dependencies");

        let mut proposal = DomainProposal::new(metrics, confidence, content);
        proposal.reasoning = reasoning;
        proposal.constraints_used = constraints_used;
        proposal.dependencies = dependencies;

        if !validation.warnings.is_empty() {
            debug!(
                target: "app::validator",
                %domain,
                warnings = validation.warnings.len(),
                "proposal normalized with defaults"
            );
        }

        (proposal, validation)
    }
}

struct FieldReader<'a> {
    fields: &'a JsonMap,
    validation: &'a mut ProposalValidation,
}

impl FieldReader<'_> {
    fn default_added(&mut self, field: &str, warning: String) {
        self.validation.defaults_added.push(field.to_string());
        self.validation.warnings.push(warning);
    }

    fn confidence(&mut self) -> f64 {
        match self.fields.get("confidence") {
            None | Some(JsonValue::Null) => {
                self.default_added(
                    "confidence=0.5",
                    "Added default confidence value".to_string(),
                );
                DEFAULT_CONFIDENCE
            }
            Some(JsonValue::Number(number)) => match number.as_f64() {
                Some(value) if (0.0..=1.0).contains(&value) => value,
                Some(value) if value.is_finite() => {
                    self.validation
                        .warnings
                        .push("Confidence clamped to [0, 1]".to_string());
                    value.clamp(0.0, 1.0)
                }
                _ => {
                    self.validation
                        .warnings
                        .push("Fixed invalid confidence type".to_string());
                    DEFAULT_CONFIDENCE
                }
            },
            Some(_) => {
                self.validation
                    .warnings
                    .push("Fixed invalid confidence type".to_string());
                DEFAULT_CONFIDENCE
            }
        }
    }

    fn reasoning(&mut self) -> String {
        match self.fields.get("reasoning").and_then(JsonValue::as_str) {
            Some(text) if !text.trim().is_empty() => text.to_string(),
            _ => {
                self.validation.defaults_added.push("reasoning".to_string());
                DEFAULT_REASONING.to_string()
            }
        }
    }

    fn content(&mut self, domain: Domain) -> JsonMap {
        let key = domain.content_key();
        match self.fields.get(key) {
            Some(JsonValue::Object(map)) if !map.is_empty() => map.clone(),
            Some(JsonValue::Object(_)) | None | Some(JsonValue::Null) => {
                self.default_added(key, format!("Added default {key}"));
                default_content(domain)
            }
            Some(_) => {
                self.default_added(key, format!("Replaced non-object {key} with default"));
                default_content(domain)
            }
        }
    }

    fn metrics(&mut self, domain: Domain) -> DomainMetrics {
        match domain {
            Domain::Fitness => {
                let defaults = FitnessMetrics::default();
                DomainMetrics::Fitness(FitnessMetrics {
                    energy_demand: self.level::<EnergyDemand>(
                        "energy_demand",
                        defaults.energy_demand,
                    ),
                    training_load_score: self.score(
                        "training_load_score",
                        defaults.training_load_score,
                        100.0,
                    ),
                    overtraining_risk: self
                        .level::<RiskLevel>("overtraining_risk", defaults.overtraining_risk),
                })
            }
            Domain::Nutrition => {
                let defaults = NutritionMetrics::default();
                DomainMetrics::Nutrition(NutritionMetrics {
                    nutritional_adequacy: self.level::<AdequacyLevel>(
                        "nutritional_adequacy",
                        defaults.nutritional_adequacy,
                    ),
                    budget_utilization: self.score(
                        "budget_utilization",
                        defaults.budget_utilization,
                        f64::MAX,
                    ),
                })
            }
            Domain::Sleep => {
                let defaults = SleepMetrics::default();
                let constraints_for_others = match self.fields.get("constraints_for_others") {
                    Some(JsonValue::Object(map)) => map.clone(),
                    _ => defaults.constraints_for_others,
                };
                DomainMetrics::Sleep(SleepMetrics {
                    recovery_status: self
                        .level::<RecoveryStatus>("recovery_status", defaults.recovery_status),
                    constraints_for_others,
                    sleep_quality_target: self.score(
                        "sleep_quality_target",
                        defaults.sleep_quality_target,
                        100.0,
                    ),
                })
            }
            Domain::MentalWellness => {
                let defaults = MentalWellnessMetrics::default();
                DomainMetrics::MentalWellness(MentalWellnessMetrics {
                    motivation_level: self
                        .level::<MotivationLevel>("motivation_level", defaults.motivation_level),
                    complexity_adjustments: self.complexity_adjustments(),
                })
            }
        }
    }

    fn level<T>(&mut self, key: &str, default: T) -> T
    where
        T: for<'s> TryFrom<&'s str, Error = String> + Copy,
    {
        match self.fields.get(key) {
            None | Some(JsonValue::Null) => {
                self.default_added(key, format!("Added default {key}"));
                default
            }
            Some(JsonValue::String(raw)) => match T::try_from(raw.as_str()) {
                Ok(level) => level,
                Err(reason) => {
                    self.validation
                        .warnings
                        .push(format!("{reason}; using default {key}"));
                    default
                }
            },
            Some(_) => {
                self.validation
                    .warnings
                    .push(format!("Invalid {key} type; using default"));
                default
            }
        }
    }

    fn score(&mut self, key: &str, default: f64, max: f64) -> f64 {
        match self.fields.get(key) {
            None | Some(JsonValue::Null) => {
                self.default_added(key, format!("Added default {key}"));
                default
            }
            Some(value) => match value.as_f64().filter(|v| v.is_finite()) {
                Some(number) if (0.0..=max).contains(&number) => number,
                Some(number) => {
                    self.validation
                        .warnings
                        .push(format!("{key} clamped to [0, {max}]"));
                    number.clamp(0.0, max)
                }
                None => {
                    self.validation
                        .warnings
                        .push(format!("Invalid {key} type; using default"));
                    default
                }
            },
        }
    }

    fn complexity_adjustments(&mut self) -> ComplexityAdjustments {
        match self.fields.get("complexity_adjustments") {
            Some(JsonValue::Object(map)) => ComplexityAdjustments {
                simplification_needed: map
                    .get("simplification_needed")
                    .and_then(JsonValue::as_bool)
                    .unwrap_or(false),
                reason: map
                    .get("reason")
                    .and_then(JsonValue::as_str)
                    .map(str::to_string),
            },
            _ => {
                self.default_added(
                    "complexity_adjustments",
                    "Added default complexity_adjustments".to_string(),
                );
                ComplexityAdjustments::default()
            }
        }
    }

    fn string_list(&mut self, key: &str) -> Vec<String> {
        match self.fields.get(key) {
            Some(JsonValue::Array(items)) => items
                .iter()
                .filter_map(|item| item.as_str().map(str::to_string))
                .collect(),
            _ => Vec::new(),
        }
    }
}
