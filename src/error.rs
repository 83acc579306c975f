use thiserror::Error;
use tracing::{error, warn};

pub type AppResult<T> = Result<T, AppError>;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("missing proposals from: {}", agents.join(", "))]
    MissingProposals { agents: Vec<String> },

    #[error("invalid coordination settings: {message}")]
    InvalidSettings { message: String },

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("settings parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("internal coordination error: {0}")]
    Internal(String),
}

impl AppError {
    pub fn missing_proposals(agents: Vec<String>) -> Self {
        warn!(target: "app::validator", agents = ?agents, "domain proposals missing");
        AppError::MissingProposals { agents }
    }

    pub fn invalid_settings(message: impl Into<String>) -> Self {
        let message = message.into();
        warn!(target: "app::settings", %message, "invalid settings");
        AppError::InvalidSettings { message }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        let message = message.into();
        error!(target: "app::coordination", %message, "internal coordination error");
        AppError::Internal(message)
    }
}
