//! Workflow state management.
//!
//! This module provides the `WorkflowState` state machine that every
//! controller validates against and mutates.

pub mod workflow;

pub use workflow::{ModelFit, WorkflowState};
