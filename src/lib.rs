pub mod ai;
pub mod cli;
pub mod email;

pub use ai::{AIConfig, AIFactory, TriageOutcome, TriageService};
