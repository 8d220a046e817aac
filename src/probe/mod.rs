pub mod outcome;
pub mod runner;
pub mod spec;

pub mod prelude {
    pub use super::outcome::{Outcome, ProbeError, classify, error_chain};
    pub use super::runner::{ProbeRecord, run_probe};
    pub use super::spec::{BodyCheck, ProbeGroup, ProbeSpec, WarnRule};
}
