pub mod conflict_detector;
pub mod conflict_resolver;
pub mod constraint_analyzer;
pub mod coordination_service;
pub mod energy_balance_service;
pub mod plan_aggregator;
pub mod proposal_defaults;
pub mod proposal_validator;
pub mod recovery_prioritizer;
pub mod settings_service;
pub mod trade_off_explainer;
