use tracing::debug;

use crate::models::constraints::{StressIndicators, UserProfile};
use crate::models::domain::{AdequacyLevel, EnergyDemand, MotivationLevel, RecoveryStatus};
use crate::models::energy::{BalanceStatus, EnergyBalance, EnergyConflict};
use crate::models::proposal::ProposalSet;
use crate::models::settings::EnergyThresholds;

const SLEEP_DEBT_WINDOW: usize = 7;

/// Scores the user's energy situation from the current proposals and raw user signals.
pub struct EnergyBalanceAssessor {
    thresholds: EnergyThresholds,
}

impl EnergyBalanceAssessor {
    pub fn new(thresholds: EnergyThresholds) -> Self {
        Self { thresholds }
    }

    pub fn assess(&self, proposals: &ProposalSet, profile: &UserProfile) -> EnergyBalance {
        let energy_demand = self.demand_score(proposals);
        let energy_availability = availability_score(proposals);
        let recovery_capacity = self.recovery_capacity(proposals, profile);
        let stress_load = stress_load(proposals, &profile.stress_indicators);
        let net_energy = energy_availability - energy_demand;

        let balance_factor = (50.0 + net_energy).clamp(0.0, 100.0);
        let sustainability_score = (balance_factor * 0.4
            + recovery_capacity * 0.35
            + (100.0 - stress_load) * 0.25)
            .clamp(0.0, 100.0);

        let balance_status = self.classify(net_energy, recovery_capacity);

        debug!(
            target: "app::energy",
            energy_demand,
            energy_availability,
            recovery_capacity,
            stress_load,
            sustainability_score,
            status = %balance_status,
            "energy balance assessed"
        );

        EnergyBalance {
            energy_demand,
            energy_availability,
            recovery_capacity,
            stress_load,
            sustainability_score,
            balance_status,
        }
    }

    /// Energy conflicts in a fixed order; `MultipleStressors` closes the list when two or more fire.
    pub fn detect_energy_conflicts(
        &self,
        balance: &EnergyBalance,
        proposals: &ProposalSet,
        profile: &UserProfile,
    ) -> Vec<EnergyConflict> {
        let t = &self.thresholds;
        let mut conflicts = Vec::new();

        if balance.energy_demand > t.high_demand && balance.recovery_capacity < t.low_recovery {
            conflicts.push(EnergyConflict::HighDemandLowRecovery);
        }

        if balance.energy_demand > t.nutrition_demand
            && adequacy_score(proposals.nutritional_adequacy()) < t.nutrition_adequacy_floor
        {
            conflicts.push(EnergyConflict::InsufficientNutrition);
        }

        if self.sleep_debt(&profile.daily_sleep_hours) > t.sleep_debt_hours {
            conflicts.push(EnergyConflict::SleepDebtAccumulation);
        }

        if proposals.training_load() > t.overtraining_load {
            conflicts.push(EnergyConflict::OvertrainingRisk);
        }

        if balance.stress_load > t.stress_overload {
            conflicts.push(EnergyConflict::StressOverload);
        }

        if conflicts.len() >= 2 {
            conflicts.push(EnergyConflict::MultipleStressors);
        }

        if !conflicts.is_empty() {
            debug!(target: "app::energy", conflicts = ?conflicts, "energy conflicts detected");
        }

        conflicts
    }

    /// Hours short of the nightly target, summed over the most recent week.
    pub fn sleep_debt(&self, daily_hours: &[f64]) -> f64 {
        daily_hours
            .iter()
            .rev()
            .take(SLEEP_DEBT_WINDOW)
            .map(|hours| (self.thresholds.sleep_target_hours - hours).max(0.0))
            .sum()
    }

    fn demand_score(&self, proposals: &ProposalSet) -> f64 {
        let base = match proposals.energy_demand() {
            EnergyDemand::Low => 30.0,
            EnergyDemand::Medium => 60.0,
            EnergyDemand::High => 90.0,
        };
        let load_adjustment = (proposals.training_load() - 50.0) * 0.4;
        (base + load_adjustment).clamp(0.0, 100.0)
    }

    fn recovery_capacity(&self, proposals: &ProposalSet, profile: &UserProfile) -> f64 {
        let base = match proposals.recovery_status() {
            RecoveryStatus::Poor => 25.0,
            RecoveryStatus::Fair => 50.0,
            RecoveryStatus::Good => 75.0,
            RecoveryStatus::Excellent => 95.0,
        };
        let sleep_debt_penalty = (self.sleep_debt(&profile.daily_sleep_hours) * 10.0).min(30.0);

        let stress = &profile.stress_indicators;
        let health_penalty = if stress.health_concerns { 10.0 } else { 0.0 };
        let stress_penalty =
            (stress.work_stress_level * 2.0 + stress.life_stress_level * 1.5 + health_penalty)
                .min(40.0);

        (base - sleep_debt_penalty - stress_penalty).clamp(0.0, 100.0)
    }

    fn classify(&self, net_energy: f64, recovery_capacity: f64) -> BalanceStatus {
        let t = &self.thresholds;
        if net_energy < -t.deficit_margin || recovery_capacity < t.deficit_recovery_capacity {
            BalanceStatus::Deficit
        } else if net_energy > t.surplus_margin && recovery_capacity > t.surplus_recovery_capacity
        {
            BalanceStatus::Surplus
        } else {
            BalanceStatus::Balanced
        }
    }
}

impl Default for EnergyBalanceAssessor {
    fn default() -> Self {
        Self::new(EnergyThresholds::default())
    }
}

fn availability_score(proposals: &ProposalSet) -> f64 {
    let nutrition: f64 = match proposals.nutritional_adequacy() {
        AdequacyLevel::Low => 20.0,
        AdequacyLevel::Medium => 60.0,
        AdequacyLevel::High => 90.0,
    };
    let sleep: f64 = match proposals.recovery_status() {
        RecoveryStatus::Poor => 20.0,
        RecoveryStatus::Fair => 50.0,
        RecoveryStatus::Good => 80.0,
        RecoveryStatus::Excellent => 95.0,
    };
    (nutrition * 0.6 + sleep * 0.4).clamp(0.0, 100.0)
}

fn stress_load(proposals: &ProposalSet, stress: &StressIndicators) -> f64 {
    let motivation = match proposals.motivation_level() {
        MotivationLevel::Low => 70.0,
        MotivationLevel::Medium => 40.0,
        MotivationLevel::High => 20.0,
    };
    let external = (stress.work_stress_level * 3.0
        + stress.relationship_stress * 2.0
        + stress.financial_stress * 2.5)
        .min(60.0);
    (motivation + external).clamp(0.0, 100.0)
}

pub(crate) fn adequacy_score(level: AdequacyLevel) -> f64 {
    match level {
        AdequacyLevel::Low => 30.0,
        AdequacyLevel::Medium => 65.0,
        AdequacyLevel::High => 90.0,
    }
}
