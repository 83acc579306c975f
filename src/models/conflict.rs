use std::collections::BTreeSet;
use std::fmt;

use serde::{Serialize, Serializer};

use crate::models::domain::Domain;

/// Category of an incompatibility between proposals.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq, Hash)]
pub enum ConflictType {
    #[serde(rename = "energy_conflict")]
    Energy,
    #[serde(rename = "time_conflict")]
    Time,
    #[serde(rename = "budget_conflict")]
    Budget,
    #[serde(rename = "recovery_conflict")]
    Recovery,
    #[serde(rename = "nutritional_conflict")]
    Nutritional,
    #[serde(rename = "motivation_conflict")]
    Motivation,
    /// Never produced by the detector; callers may hand these to the resolver.
    #[serde(rename = "unclassified_conflict")]
    Unclassified,
}

impl ConflictType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ConflictType::Energy => "energy_conflict",
            ConflictType::Time => "time_conflict",
            ConflictType::Budget => "budget_conflict",
            ConflictType::Recovery => "recovery_conflict",
            ConflictType::Nutritional => "nutritional_conflict",
            ConflictType::Motivation => "motivation_conflict",
            ConflictType::Unclassified => "unclassified_conflict",
        }
    }

    /// Position in the fixed resolution order; lower resolves first.
    pub fn resolution_rank(&self) -> u8 {
        match self {
            ConflictType::Recovery => 1,
            ConflictType::Energy => 2,
            ConflictType::Time => 3,
            ConflictType::Budget => 4,
            ConflictType::Nutritional => 5,
            ConflictType::Motivation => 6,
            ConflictType::Unclassified => 10,
        }
    }

    /// Recovery and energy conflicts weigh double against constraint satisfaction.
    pub fn is_major(&self) -> bool {
        matches!(self, ConflictType::Recovery | ConflictType::Energy)
    }
}

impl fmt::Display for ConflictType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A detected conflict, filled in by the resolver once handled.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ConflictRecord {
    pub conflict_type: ConflictType,
    #[serde(rename = "affected_agents", serialize_with = "serialize_agent_names")]
    pub affected_domains: BTreeSet<Domain>,
    pub resolution_strategy: String,
    #[serde(rename = "trade_offs_made")]
    pub trade_offs: Vec<String>,
    pub confidence_impact: f64,
    pub reasoning: String,
}

impl ConflictRecord {
    pub fn new(
        conflict_type: ConflictType,
        affected_domains: impl IntoIterator<Item = Domain>,
        resolution_strategy: impl Into<String>,
        confidence_impact: f64,
        reasoning: impl Into<String>,
    ) -> Self {
        Self {
            conflict_type,
            affected_domains: affected_domains.into_iter().collect(),
            resolution_strategy: resolution_strategy.into(),
            trade_offs: Vec::new(),
            confidence_impact,
            reasoning: reasoning.into(),
        }
    }

    pub fn affects(&self, domain: Domain) -> bool {
        self.affected_domains.contains(&domain)
    }
}

fn serialize_agent_names<S>(domains: &BTreeSet<Domain>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.collect_seq(domains.iter().map(Domain::agent_name))
}
