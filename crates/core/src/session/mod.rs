//! Long-running owner of the workflow state for interactive front ends.

pub mod actor;

pub use actor::WorkflowSession;
