//! Error taxonomy for workflow actions.
//!
//! Every failure is terminal for the action that raised it and leaves the
//! workflow state at its last good value.

use rk_protocol::ipc::FailureKind;
use rk_protocol::workflow_models::WorkflowAction;
use std::path::PathBuf;
use thiserror::Error;

use crate::transport::TransportError;

/// Bad input, caught before any request is sent.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("{role} variable must be selected")]
    EmptyColumn { role: ColumnRole },

    #[error("X and Y variables must be different (both are '{column}')")]
    SameColumn { column: String },

    #[error("Column '{column}' is not in the current dataset")]
    UnknownColumn { column: String },

    #[error("Prediction input must not be empty")]
    EmptyPredictionInput,
}

/// Which side of the regression a column was chosen for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnRole {
    Independent,
    Dependent,
}

impl std::fmt::Display for ColumnRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ColumnRole::Independent => f.write_str("Independent (X)"),
            ColumnRole::Dependent => f.write_str("Dependent (Y)"),
        }
    }
}

/// An action was invoked while its precondition did not hold.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StateError {
    #[error("No dataset loaded")]
    NoDataset,

    #[error("Select both X and Y variables before training")]
    NoSelection,

    #[error("Model not trained")]
    NoModel,

    #[error("Cannot start a new action while {action} is in progress")]
    Busy { action: WorkflowAction },

    #[error("Training result discarded: the variable selection changed while it was pending")]
    StaleResponse,
}

/// Any failure of a workflow action.
#[derive(Error, Debug)]
pub enum WorkflowError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    State(#[from] StateError),

    #[error(transparent)]
    Transport(#[from] TransportError),

    #[error("Failed to access {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
}

impl WorkflowError {
    /// Protocol-level category of this error.
    pub fn kind(&self) -> FailureKind {
        match self {
            WorkflowError::Validation(_) => FailureKind::Validation,
            WorkflowError::State(_) => FailureKind::State,
            WorkflowError::Transport(_) => FailureKind::Transport,
            WorkflowError::Io { .. } => FailureKind::Io,
        }
    }
}

/// Type alias for Result with WorkflowError.
pub type WorkflowResult<T> = Result<T, WorkflowError>;
