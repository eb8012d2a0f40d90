/// IB requirement matching module
mod config;
mod error;
mod evaluator;
mod grouper;
mod processor;
mod selector;
mod types;

pub use config::{validate_program, validate_student, ProgramCatalog, MAX_IB_POINTS};
pub use error::MatchError;
pub use evaluator::{EvaluationPolicy, NOT_TAKEN_REASON};
pub use grouper::group_requirements;
pub use processor::ProgramMatchProcessor;
pub use selector::{evaluate_requirement, public_view};
pub use types::*;
