use serde::{Deserialize, Serialize};
use std::fmt;

/// One of the four wellness domains that submit proposals.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Domain {
    Fitness,
    Nutrition,
    Sleep,
    MentalWellness,
}

impl Domain {
    pub const ALL: [Domain; 4] = [
        Domain::Fitness,
        Domain::Nutrition,
        Domain::Sleep,
        Domain::MentalWellness,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Domain::Fitness => "fitness",
            Domain::Nutrition => "nutrition",
            Domain::Sleep => "sleep",
            Domain::MentalWellness => "mental_wellness",
        }
    }

    /// Name of the producer that owns this domain.
    pub fn agent_name(&self) -> &'static str {
        match self {
            Domain::Fitness => "FitnessAgent",
            Domain::Nutrition => "NutritionAgent",
            Domain::Sleep => "SleepAgent",
            Domain::MentalWellness => "MentalWellnessAgent",
        }
    }

    /// Key of the primary content payload inside a raw proposal.
    pub fn content_key(&self) -> &'static str {
        match self {
            Domain::Fitness => "workout_plan",
            Domain::Nutrition => "meal_plan",
            Domain::Sleep => "sleep_recommendations",
            Domain::MentalWellness => "wellness_recommendations",
        }
    }

    /// Accepts either the producer name (`SleepAgent`) or the slot name (`sleep`).
    pub fn from_key(key: &str) -> Option<Domain> {
        let normalized = key.trim();
        Domain::ALL.into_iter().find(|domain| {
            domain.agent_name().eq_ignore_ascii_case(normalized)
                || domain.as_str().eq_ignore_ascii_case(normalized)
        })
    }
}

impl fmt::Display for Domain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

macro_rules! level_enum {
    ($(#[$meta:meta])* $name:ident { $($variant:ident => $text:literal),+ $(,)? }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
        #[serde(rename_all = "lowercase")]
        pub enum $name {
            $($variant),+
        }

        impl $name {
            pub fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => $text),+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl TryFrom<&str> for $name {
            type Error = String;

            fn try_from(value: &str) -> Result<Self, Self::Error> {
                match value.trim().to_ascii_lowercase().as_str() {
                    $($text => Ok($name::$variant),)+
                    other => Err(format!(
                        "unsupported {} value: {other}",
                        stringify!($name)
                    )),
                }
            }
        }
    };
}

level_enum!(
    /// Energy a fitness plan asks of the user.
    EnergyDemand {
        Low => "low",
        Medium => "medium",
        High => "high",
    }
);

level_enum!(
    /// How well a meal plan covers nutritional needs.
    AdequacyLevel {
        Low => "low",
        Medium => "medium",
        High => "high",
    }
);

level_enum!(
    RecoveryStatus {
        Poor => "poor",
        Fair => "fair",
        Good => "good",
        Excellent => "excellent",
    }
);

level_enum!(
    MotivationLevel {
        Low => "low",
        Medium => "medium",
        High => "high",
    }
);

level_enum!(
    /// Self-reported complexity of a domain's plan content.
    ComplexityLevel {
        Low => "low",
        Medium => "medium",
        High => "high",
    }
);

level_enum!(
    RiskLevel {
        Low => "low",
        Medium => "medium",
        High => "high",
    }
);

impl EnergyDemand {
    /// One notch lower; `Low` stays `Low`.
    pub fn step_down(self) -> Self {
        match self {
            EnergyDemand::High => EnergyDemand::Medium,
            EnergyDemand::Medium | EnergyDemand::Low => EnergyDemand::Low,
        }
    }
}
