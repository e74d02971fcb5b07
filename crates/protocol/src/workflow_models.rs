//! Workflow entities held by the client.
//!
//! These mirror what the client knows about the service-side session: the
//! loaded dataset (by its columns only), the chosen variable pair, and the
//! model trained on that pair. Each one is only meaningful while the entity
//! before it is unchanged.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;
use uuid::Uuid;

/// Coarse position in the ingest → select → train workflow.
///
/// Always derived from which entities are present; never stored on its own.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, TS)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum WorkflowStage {
    /// Nothing has been ingested yet.
    Empty,
    /// A dataset is loaded but no valid variable pair is chosen.
    DatasetLoaded,
    /// A valid variable pair is chosen; training is possible.
    VariablesSelected,
    /// A model exists for the current pair; prediction is possible.
    ModelTrained,
}

/// A user-initiated action that drives the workflow.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash, TS)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum WorkflowAction {
    Ingest,
    Select,
    Train,
    Predict,
    SavePlot,
}

impl std::fmt::Display for WorkflowAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            WorkflowAction::Ingest => "ingest",
            WorkflowAction::Select => "select",
            WorkflowAction::Train => "train",
            WorkflowAction::Predict => "predict",
            WorkflowAction::SavePlot => "save plot",
        };
        f.write_str(name)
    }
}

/// The currently loaded tabular data, known only by its columns and a label.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, TS)]
pub struct Dataset {
    /// Client-side generation id.
    ///
    /// A fresh id is minted for every successful ingestion. It is never sent
    /// to the service.
    #[ts(type = "string")]
    pub id: Uuid,

    /// Display label, usually the origin file name.
    pub label: String,

    /// Ordered column names as reported by the service.
    pub columns: Vec<String>,

    /// When the ingestion succeeded.
    pub loaded_at: DateTime<Utc>,
}

impl Dataset {
    /// Create a dataset with a fresh generation id.
    pub fn new(columns: Vec<String>, label: String) -> Self {
        Self {
            id: Uuid::new_v4(),
            label,
            columns,
            loaded_at: Utc::now(),
        }
    }

    /// Whether `name` is one of this dataset's columns.
    pub fn has_column(&self, name: &str) -> bool {
        self.columns.iter().any(|c| c == name)
    }
}

/// The independent/dependent column pair chosen for modelling.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, TS)]
pub struct VariableSelection {
    /// Independent column.
    pub x: String,
    /// Dependent column.
    pub y: String,
}

impl VariableSelection {
    pub fn new(x: impl Into<String>, y: impl Into<String>) -> Self {
        Self {
            x: x.into(),
            y: y.into(),
        }
    }
}

/// Rendered plot returned by the service, kept as opaque bytes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PlotArtifact(Vec<u8>);

const PNG_MAGIC: &[u8] = b"\x89PNG\r\n\x1a\n";

impl PlotArtifact {
    pub fn new(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Informational only; the client never renders the plot itself.
    pub fn looks_like_png(&self) -> bool {
        self.0.starts_with(PNG_MAGIC)
    }
}

/// Result of a successful training call.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, TS)]
pub struct TrainedModel {
    /// The variable pair the model was fitted on.
    pub selection: VariableSelection,

    pub slope: f64,

    pub intercept: f64,

    /// Goodness of fit (R²).
    pub r2: f64,

    /// Mean squared error, when the service reports one.
    pub mse: Option<f64>,

    /// Plot bytes. Not serialized; consumers that need the image ask the
    /// core to write it to disk.
    #[serde(skip)]
    #[ts(skip)]
    pub plot: PlotArtifact,

    pub trained_at: DateTime<Utc>,
}

impl TrainedModel {
    /// Human-readable line equation, e.g. `y = 2.50x + 10.00`.
    pub fn equation(&self) -> String {
        let sign = if self.intercept < 0.0 { '-' } else { '+' };
        format!(
            "y = {:.2}x {} {:.2}",
            self.slope,
            sign,
            self.intercept.abs()
        )
    }
}

/// A single point prediction. Never stored; each request stands alone.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, TS)]
pub struct Prediction {
    /// The raw value that was sent to the service.
    pub input: String,
    /// The service's prediction for that input.
    pub value: f64,
}

/// Read-only copy of the workflow state, published to user interfaces.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, TS)]
pub struct WorkflowSnapshot {
    pub stage: WorkflowStage,
    pub dataset: Option<Dataset>,
    pub selection: Option<VariableSelection>,
    pub model: Option<TrainedModel>,
    /// Action whose network call is still pending, if any.
    pub busy: Option<WorkflowAction>,
}

impl Default for WorkflowSnapshot {
    fn default() -> Self {
        Self {
            stage: WorkflowStage::Empty,
            dataset: None,
            selection: None,
            model: None,
            busy: None,
        }
    }
}
