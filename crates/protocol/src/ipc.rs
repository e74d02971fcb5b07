//! Inter-process communication protocol.
//!
//! This module defines the message types for asynchronous communication
//! between a user interface and the workflow session in the core.
//!
//! The protocol follows an Operation/Event pattern:
//! - `Op`: user actions sent from the UI to the core
//! - `Event`: outcomes and state changes sent from the core to the UI
//!
//! The UI never mutates workflow state itself; it only mirrors the
//! snapshots it receives.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use ts_rs::TS;

use crate::workflow_models::{Prediction, WorkflowAction, WorkflowSnapshot};

/// Operations sent from the UI to the workflow session.
///
/// Uses tagged enum serialization:
/// ```json
/// {
///   "type": "selectVariables",
///   "payload": { "x": "age", "y": "income" }
/// }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[serde(tag = "type", content = "payload", rename_all = "camelCase")]
pub enum Op {
    /// Upload a dataset file to the service.
    ///
    /// Always legal; a success replaces everything built on a previous dataset.
    LoadDataset { path: PathBuf },

    /// Choose the independent (`x`) and dependent (`y`) columns.
    SelectVariables { x: String, y: String },

    /// Fit a model on the current selection.
    Train,

    /// Ask the current model for a prediction at `value`.
    Predict { value: String },

    /// Write the current model's plot bytes to `path`.
    SavePlot { path: PathBuf },

    /// Request a fresh snapshot of the workflow state.
    GetSnapshot,

    /// Stop the session.
    Shutdown,
}

impl Op {
    /// The workflow action this op performs, if it performs one.
    pub fn action(&self) -> Option<WorkflowAction> {
        match self {
            Op::LoadDataset { .. } => Some(WorkflowAction::Ingest),
            Op::SelectVariables { .. } => Some(WorkflowAction::Select),
            Op::Train => Some(WorkflowAction::Train),
            Op::Predict { .. } => Some(WorkflowAction::Predict),
            Op::SavePlot { .. } => Some(WorkflowAction::SavePlot),
            Op::GetSnapshot | Op::Shutdown => None,
        }
    }
}

/// Category of a failed action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FailureKind {
    /// Bad input caught locally before any request was sent.
    Validation,
    /// The action's precondition did not hold.
    State,
    /// The network call failed or the service reported an error.
    Transport,
    /// A local file could not be read or written.
    Io,
}

/// Events sent from the workflow session to the UI.
///
/// ```json
/// {
///   "type": "actionFailed",
///   "payload": { "action": "TRAIN", "kind": "TRANSPORT", "message": "..." }
/// }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[serde(tag = "type", content = "payload", rename_all = "camelCase")]
pub enum Event {
    /// A network-backed action was accepted and its request is in flight.
    ActionStarted { action: WorkflowAction },

    /// The workflow state changed (or a snapshot was requested).
    StateChanged { snapshot: WorkflowSnapshot },

    /// A prediction request succeeded.
    PredictionReady { prediction: Prediction },

    /// The plot was written to disk.
    PlotSaved { path: PathBuf, bytes: usize },

    /// An action failed. Workflow state is unchanged.
    ActionFailed {
        action: WorkflowAction,
        kind: FailureKind,
        message: String,
    },
}
