//! Workflow controller module.
//!
//! # Module Structure
//!
//! - `step`: `WorkflowStep` and the loading kinds with their status messages
//! - `progress`: cancellable progress simulation published on a watch channel
//! - `controller`: the step state machine, loading gate and minimum waits

mod controller;
mod progress;
mod step;

pub use controller::{Submission, WorkflowController};
pub use progress::{
    LoadingProgress, PROGRESS_CEILING, ProgressRun, ProgressSimulator, simulated_percent,
};
pub use step::{LoadingKind, WorkflowStep};
