//! Stage controllers.
//!
//! One module per user action. Each validates its precondition against
//! [`WorkflowState`](crate::state::WorkflowState), talks to the
//! [`Transport`](crate::transport::Transport) when the action needs the
//! service, and applies the result.
//!
//! Network-backed controllers are split in two phases so a caller that owns
//! the state can release it while the request is pending:
//! - `begin`: validate, set the busy flag, build the request
//! - `complete`: clear the busy flag, apply or reject the outcome
//!
//! `run` chains both around the transport call for sequential callers.

pub mod ingestion;
pub mod prediction;
pub mod selection;
pub mod training;
