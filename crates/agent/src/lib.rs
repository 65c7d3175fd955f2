//! Plan/execute agent loop for Slugline.
//!
//! The [`AgentRunner`] takes an assist request (message + screenplay +
//! history), plans with one model call, then executes the plan in a
//! tool-calling loop, streaming [`StreamEvent`]s to the caller as it goes.

pub mod plan;
pub mod runner;
pub mod stream_event;

#[cfg(test)]
mod test_helpers;

pub use plan::{Plan, parse_plan};
pub use runner::{AgentRunner, AssistRequest, PhaseProfile, RunConfig};
pub use stream_event::{Phase, RunOutcome, StepStatus, StreamEvent};
