pub mod conflict;
pub mod constraints;
pub mod domain;
pub mod energy;
pub mod plan;
pub mod proposal;
pub mod settings;
