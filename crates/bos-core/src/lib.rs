pub mod action_log;
pub mod cleaning;
pub mod config;
pub mod error;
pub mod workspace;

pub use action_log::ActionLog;
pub use cleaning::{run_clean, CleanOutcome, CleanRequest, CleanStatus, JobFailure};
pub use config::PipelineConfig;
pub use error::{PipelineError, Result};
pub use workspace::Workspace;
