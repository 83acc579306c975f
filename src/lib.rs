//! Coordination and recovery-prioritization engine for four-domain wellness plans.
//!
//! [`CoordinationService::coordinate`] takes raw fitness, nutrition, sleep and
//! mental-wellness proposals and returns one [`UnifiedPlan`]. The engine is a
//! pure computation: identical requests produce identical output.

pub mod error;
pub mod models;
pub mod services;
pub mod utils;

pub use error::{AppError, AppResult};
pub use models::domain::Domain;
pub use models::plan::UnifiedPlan;
pub use models::settings::CoordinationSettings;
pub use services::coordination_service::{CoordinationRequest, CoordinationService};
pub use services::settings_service::SettingsService;
